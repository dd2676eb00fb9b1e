use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Bearer},
    typed_header::TypedHeaderRejection,
};

use crate::AppState;
use crate::error::ApiError;
use crate::token::AuthError;

/// Extract and validate the bearer token from the Authorization header.
/// On success the token's `Claims` are available to handlers as an
/// `Extension`.
pub async fn require_auth(
    State(state): State<AppState>,
    bearer: Result<TypedHeader<Authorization<Bearer>>, TypedHeaderRejection>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let TypedHeader(Authorization(bearer)) = bearer.map_err(|rejection| {
        if rejection.is_missing() {
            AuthError::Missing
        } else {
            AuthError::Malformed
        }
    })?;

    let claims = state.tokens.verify(bearer.token())?;

    req.extensions_mut().insert(claims);
    Ok(next.run(req).await)
}
