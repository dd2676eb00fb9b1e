use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
};
use tracing::info;

use carlot_db::is_unique_violation;
use carlot_types::api::{CarBrandRequest, MessageResponse};

use crate::error::ApiError;
use crate::extract::{ApiPath, ValidJson};
use crate::{AppState, blocking, views};

pub async fn list_brands(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let brands = blocking(&state, |state| {
        let brands = state.db.list_brands()?;
        let models = state.db.list_models(None)?;
        Ok(views::brands_with_models(brands, models))
    })
    .await?;

    Ok(Json(brands))
}

pub async fn get_brand(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let brand = blocking(&state, move |state| {
        let brand = state.db.get_brand(id)?.ok_or(ApiError::NotFound("car brand"))?;
        let models = state.db.list_models(Some(id))?;
        Ok(views::brand(
            brand,
            Some(models.into_iter().map(views::bare_car_model).collect()),
        ))
    })
    .await?;

    Ok(Json(brand))
}

pub async fn create_brand(
    State(state): State<AppState>,
    ValidJson(req): ValidJson<CarBrandRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let brand = blocking(&state, move |state| {
        if state.db.get_brand_by_name(&req.name)?.is_some() {
            return Err(ApiError::DuplicateName("car brand"));
        }

        let id = state.db.create_brand(&req.name).map_err(brand_conflict)?;
        info!("Created car brand {} ({})", id, req.name);

        let brand = state.db.get_brand(id)?.ok_or(ApiError::NotFound("car brand"))?;
        Ok(views::brand(brand, None))
    })
    .await?;

    Ok((StatusCode::CREATED, Json(brand)))
}

pub async fn update_brand(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
    ValidJson(req): ValidJson<CarBrandRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let brand = blocking(&state, move |state| {
        if !state.db.update_brand(id, &req.name).map_err(brand_conflict)? {
            return Err(ApiError::NotFound("car brand"));
        }

        let brand = state.db.get_brand(id)?.ok_or(ApiError::NotFound("car brand"))?;
        Ok(views::brand(brand, None))
    })
    .await?;

    Ok(Json(brand))
}

pub async fn delete_brand(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> Result<impl IntoResponse, ApiError> {
    blocking(&state, move |state| {
        if !state.db.delete_brand(id)? {
            return Err(ApiError::NotFound("car brand"));
        }
        info!("Deleted car brand {}", id);
        Ok(())
    })
    .await?;

    Ok(Json(MessageResponse::new("car brand deleted")))
}

fn brand_conflict(e: anyhow::Error) -> ApiError {
    if is_unique_violation(&e) {
        ApiError::DuplicateName("car brand")
    } else {
        ApiError::Internal(e)
    }
}
