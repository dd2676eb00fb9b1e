pub mod auth;
pub mod brands;
pub mod car_models;
pub mod comments;
pub mod error;
pub mod extract;
pub mod guard;
pub mod health;
pub mod listings;
pub mod locations;
pub mod middleware;
pub mod password;
pub mod tags;
pub mod token;
mod views;

use std::sync::Arc;

use axum::{
    Router, middleware as axum_middleware,
    routing::{delete, get, post, put},
};
use tracing::error;

use carlot_db::Database;

use crate::error::ApiError;
use crate::middleware::require_auth;
use crate::password::{PasswordConfig, PasswordHashing};
use crate::token::{TokenConfig, TokenKeys};

pub type AppState = Arc<AppStateInner>;

pub struct AppStateInner {
    pub db: Database,
    pub tokens: TokenKeys,
    pub passwords: PasswordHashing,
}

impl AppStateInner {
    pub fn new(db: Database, tokens: &TokenConfig, passwords: &PasswordConfig) -> anyhow::Result<AppState> {
        Ok(Arc::new(Self {
            db,
            tokens: TokenKeys::new(tokens),
            passwords: PasswordHashing::new(passwords)?,
        }))
    }
}

/// Run storage and hashing work off the async runtime.
pub(crate) async fn blocking<F, T>(state: &AppState, f: F) -> Result<T, ApiError>
where
    F: FnOnce(&AppStateInner) -> Result<T, ApiError> + Send + 'static,
    T: Send + 'static,
{
    let state = state.clone();
    tokio::task::spawn_blocking(move || f(&state))
        .await
        .map_err(|e| {
            error!("spawn_blocking join error: {}", e);
            ApiError::Internal(anyhow::anyhow!("blocking task failed"))
        })?
}

/// Every route of the service. Transport layers (CORS, tracing) are added by
/// the binary.
pub fn router(state: AppState) -> Router {
    let public_routes = Router::new()
        .route("/api/auth/register", post(auth::register))
        .route("/api/auth/login", post(auth::login))
        .route("/health", get(health::health));

    let protected_routes = Router::new()
        .route("/api/carbrands", get(brands::list_brands).post(brands::create_brand))
        .route(
            "/api/carbrands/{id}",
            get(brands::get_brand).put(brands::update_brand).delete(brands::delete_brand),
        )
        .route("/api/carmodels", get(car_models::list_models).post(car_models::create_model))
        .route(
            "/api/carmodels/{id}",
            get(car_models::get_model)
                .put(car_models::update_model)
                .delete(car_models::delete_model),
        )
        .route("/api/listings", get(listings::list_listings).post(listings::create_listing))
        .route(
            "/api/listings/{id}",
            get(listings::get_listing)
                .put(listings::update_listing)
                .delete(listings::delete_listing),
        )
        .route("/api/comments", post(comments::create_comment))
        .route(
            "/api/comments/{id}",
            put(comments::update_comment).delete(comments::delete_comment),
        )
        .route("/api/tags", get(tags::list_tags).post(tags::create_tag))
        .route("/api/tags/listing", post(tags::assign_tag))
        .route("/api/tags/{tag_id}/listing/{listing_id}", delete(tags::remove_tag))
        .route("/api/locations", get(locations::list_locations).post(locations::create_location))
        .route(
            "/api/locations/{id}",
            put(locations::update_location).delete(locations::delete_location),
        )
        .layer(axum_middleware::from_fn_with_state(state.clone(), require_auth));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .with_state(state)
}
