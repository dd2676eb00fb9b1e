use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
};
use tracing::info;

use carlot_types::api::{CarModelQuery, CreateCarModelRequest, MessageResponse, UpdateCarModelRequest};

use crate::error::ApiError;
use crate::extract::{ApiPath, ApiQuery, ValidJson};
use crate::{AppState, AppStateInner, blocking, views};

pub async fn list_models(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<CarModelQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let models = blocking(&state, move |state| {
        let rows = state.db.list_models(query.car_brand_id)?;
        Ok(rows.into_iter().map(views::car_model).collect::<Vec<_>>())
    })
    .await?;

    Ok(Json(models))
}

pub async fn get_model(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let model = blocking(&state, move |state| fetch_model(state, id)).await?;
    Ok(Json(model))
}

pub async fn create_model(
    State(state): State<AppState>,
    ValidJson(req): ValidJson<CreateCarModelRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let model = blocking(&state, move |state| {
        if state.db.get_brand(req.car_brand_id)?.is_none() {
            return Err(ApiError::NotFound("car brand"));
        }

        let id = state
            .db
            .create_model(&req.name, req.car_brand_id, &req.engine, req.power)?;
        info!("Created car model {} ({})", id, req.name);

        fetch_model(state, id)
    })
    .await?;

    Ok((StatusCode::CREATED, Json(model)))
}

pub async fn update_model(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
    ValidJson(req): ValidJson<UpdateCarModelRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let model = blocking(&state, move |state| {
        if state.db.get_model(id)?.is_none() {
            return Err(ApiError::NotFound("car model"));
        }
        if let Some(brand_id) = req.car_brand_id {
            if state.db.get_brand(brand_id)?.is_none() {
                return Err(ApiError::NotFound("car brand"));
            }
        }

        state.db.update_model(
            id,
            req.name.as_deref(),
            req.car_brand_id,
            req.engine.as_deref(),
            req.power,
        )?;

        fetch_model(state, id)
    })
    .await?;

    Ok(Json(model))
}

pub async fn delete_model(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> Result<impl IntoResponse, ApiError> {
    blocking(&state, move |state| {
        if !state.db.delete_model(id)? {
            return Err(ApiError::NotFound("car model"));
        }
        info!("Deleted car model {}", id);
        Ok(())
    })
    .await?;

    Ok(Json(MessageResponse::new("car model deleted")))
}

fn fetch_model(state: &AppStateInner, id: i64) -> Result<carlot_types::models::CarModel, ApiError> {
    let row = state.db.get_model(id)?.ok_or(ApiError::NotFound("car model"))?;
    Ok(views::car_model(row))
}
