use axum::{
    Extension, Json,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
};
use tracing::{info, warn};

use carlot_db::is_unique_violation;
use carlot_types::api::{AssignTagRequest, Claims, CreateTagRequest, MessageResponse, RemoveTagQuery};

use crate::error::ApiError;
use crate::extract::{ApiPath, ApiQuery, ValidJson};
use crate::guard::ensure_can_mutate;
use crate::{AppState, blocking, views};

pub async fn list_tags(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let tags = blocking(&state, |state| {
        let rows = state.db.list_tags()?;
        Ok(rows.into_iter().map(views::tag).collect::<Vec<_>>())
    })
    .await?;

    Ok(Json(tags))
}

pub async fn create_tag(
    State(state): State<AppState>,
    ValidJson(req): ValidJson<CreateTagRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let tag = blocking(&state, move |state| {
        if state.db.get_tag_by_name(&req.name)?.is_some() {
            return Err(ApiError::DuplicateName("tag"));
        }

        let id = match state.db.create_tag(&req.name, &req.color) {
            Ok(id) => id,
            Err(e) if is_unique_violation(&e) => return Err(ApiError::DuplicateName("tag")),
            Err(e) => return Err(e.into()),
        };
        info!("Created tag {} ({})", id, req.name);

        let row = state.db.get_tag(id)?.ok_or(ApiError::NotFound("tag"))?;
        Ok(views::tag(row))
    })
    .await?;

    Ok((StatusCode::CREATED, Json(tag)))
}

/// Attach a tag to a listing on behalf of the caller.
///
/// As with registration, the existence check is a fast path and the primary
/// key on (tag, listing, user) is what actually rejects a duplicate.
pub async fn assign_tag(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    ValidJson(req): ValidJson<AssignTagRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let user_id = claims.user_id;

    let assignment = blocking(&state, move |state| {
        if state.db.get_tag(req.tag_id)?.is_none() {
            return Err(ApiError::NotFound("tag"));
        }
        if !state.db.listing_exists(req.listing_id)? {
            return Err(ApiError::NotFound("listing"));
        }
        if state.db.get_assignment(req.tag_id, req.listing_id, user_id)?.is_some() {
            return Err(ApiError::DuplicateAssignment);
        }

        match state.db.assign_tag(req.tag_id, req.listing_id, user_id) {
            Ok(()) => {}
            Err(e) if is_unique_violation(&e) => {
                warn!(
                    "Tag {} on listing {} by user {} lost the race to a concurrent assignment",
                    req.tag_id, req.listing_id, user_id
                );
                return Err(ApiError::DuplicateAssignment);
            }
            Err(e) => return Err(e.into()),
        }

        let row = state
            .db
            .get_assignment(req.tag_id, req.listing_id, user_id)?
            .ok_or(ApiError::NotFound("tag assignment"))?;
        Ok(views::assignment(row))
    })
    .await?;

    Ok((StatusCode::CREATED, Json(assignment)))
}

/// Remove a tag assignment. Targets the caller's own assignment unless
/// `?userId=` names another owner, in which case the guard refuses it.
pub async fn remove_tag(
    State(state): State<AppState>,
    ApiPath((tag_id, listing_id)): ApiPath<(i64, i64)>,
    ApiQuery(query): ApiQuery<RemoveTagQuery>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, ApiError> {
    let owner_id = query.user_id.unwrap_or(claims.user_id);

    blocking(&state, move |state| {
        let existing = state
            .db
            .get_assignment(tag_id, listing_id, owner_id)?
            .ok_or(ApiError::NotFound("tag assignment"))?;
        ensure_can_mutate(claims.user_id, existing.user_id, "tag assignment")?;

        state.db.remove_assignment(tag_id, listing_id, owner_id)?;
        Ok(())
    })
    .await?;

    Ok(Json(MessageResponse::new("tag removed from listing")))
}
