use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
};

use carlot_types::api::{LocationRequest, MessageResponse};

use crate::error::ApiError;
use crate::extract::{ApiPath, ValidJson};
use crate::{AppState, blocking, views};

pub async fn list_locations(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let locations = blocking(&state, |state| {
        let rows = state.db.list_locations()?;
        Ok(rows.into_iter().map(views::location).collect::<Vec<_>>())
    })
    .await?;

    Ok(Json(locations))
}

pub async fn create_location(
    State(state): State<AppState>,
    ValidJson(req): ValidJson<LocationRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let location = blocking(&state, move |state| {
        let id = state.db.create_location(&req.name, &req.zip_code)?;
        let row = state.db.get_location(id)?.ok_or(ApiError::NotFound("location"))?;
        Ok(views::location(row))
    })
    .await?;

    Ok((StatusCode::CREATED, Json(location)))
}

pub async fn update_location(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
    ValidJson(req): ValidJson<LocationRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let location = blocking(&state, move |state| {
        if !state.db.update_location(id, &req.name, &req.zip_code)? {
            return Err(ApiError::NotFound("location"));
        }
        let row = state.db.get_location(id)?.ok_or(ApiError::NotFound("location"))?;
        Ok(views::location(row))
    })
    .await?;

    Ok(Json(location))
}

pub async fn delete_location(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> Result<impl IntoResponse, ApiError> {
    blocking(&state, move |state| {
        if !state.db.delete_location(id)? {
            return Err(ApiError::NotFound("location"));
        }
        Ok(())
    })
    .await?;

    Ok(Json(MessageResponse::new("location deleted")))
}
