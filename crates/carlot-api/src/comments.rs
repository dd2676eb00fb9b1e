use axum::{
    Extension, Json,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
};
use tracing::info;

use carlot_types::api::{Claims, CreateCommentRequest, MessageResponse, UpdateCommentRequest};
use carlot_types::models::Comment;

use crate::error::ApiError;
use crate::extract::{ApiPath, ValidJson};
use crate::guard::ensure_can_mutate;
use crate::{AppState, AppStateInner, blocking, views};

pub async fn create_comment(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    ValidJson(req): ValidJson<CreateCommentRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let comment = blocking(&state, move |state| {
        if !state.db.listing_exists(req.listing_id)? {
            return Err(ApiError::NotFound("listing"));
        }

        let id = state.db.create_comment(req.listing_id, claims.user_id, &req.text)?;
        fetch_comment(state, id)
    })
    .await?;

    Ok((StatusCode::CREATED, Json(comment)))
}

pub async fn update_comment(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
    Extension(claims): Extension<Claims>,
    ValidJson(req): ValidJson<UpdateCommentRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let comment = blocking(&state, move |state| {
        let existing = state.db.get_comment(id)?.ok_or(ApiError::NotFound("comment"))?;
        ensure_can_mutate(claims.user_id, existing.added_by_user_id, "comment")?;

        state.db.update_comment(id, &req.text)?;
        fetch_comment(state, id)
    })
    .await?;

    Ok(Json(comment))
}

pub async fn delete_comment(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, ApiError> {
    blocking(&state, move |state| {
        let existing = state.db.get_comment(id)?.ok_or(ApiError::NotFound("comment"))?;
        ensure_can_mutate(claims.user_id, existing.added_by_user_id, "comment")?;

        state.db.delete_comment(id)?;
        info!("User {} deleted comment {}", claims.user_id, id);
        Ok(())
    })
    .await?;

    Ok(Json(MessageResponse::new("comment deleted")))
}

fn fetch_comment(state: &AppStateInner, id: i64) -> Result<Comment, ApiError> {
    let row = state.db.get_comment(id)?.ok_or(ApiError::NotFound("comment"))?;
    Ok(views::comment(row))
}
