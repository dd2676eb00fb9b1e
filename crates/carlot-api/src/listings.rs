use axum::{
    Extension, Json,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
};
use tracing::info;

use carlot_db::models::{ListingChanges, ListingFilter, NewListing};
use carlot_types::api::{
    Claims, CreateListingRequest, ListingQuery, MessageResponse, UpdateListingRequest,
};
use carlot_types::models::Listing;

use crate::error::ApiError;
use crate::extract::{ApiPath, ApiQuery, ValidJson};
use crate::views::{self, Thread};
use crate::{AppState, AppStateInner, blocking};

pub async fn list_listings(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<ListingQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let filter = ListingFilter {
        car_brand_id: query.car_brand_id,
        car_model_id: query.car_model_id,
        tag_ids: parse_tag_ids(query.tag_ids.as_deref())?,
    };

    let listings = blocking(&state, move |state| {
        let rows = state.db.list_listings(&filter)?;

        let ids: Vec<i64> = rows.iter().map(|r| r.id).collect();
        let comments = state.db.get_comments_for_listings(&ids)?;
        let assignments = state.db.get_assignments_for_listings(&ids)?;

        Ok(views::listings(rows, comments, assignments, Thread::Latest))
    })
    .await?;

    Ok(Json(listings))
}

pub async fn get_listing(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let listing = blocking(&state, move |state| fetch_listing(state, id)).await?;
    Ok(Json(listing))
}

pub async fn create_listing(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    ValidJson(req): ValidJson<CreateListingRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let listing = blocking(&state, move |state| {
        check_references(state, req.car_model_id, req.location_id)?;

        let id = state.db.create_listing(&NewListing {
            name: &req.name,
            price: req.price,
            link: &req.link,
            image_link: &req.image_link,
            car_model_id: req.car_model_id,
            location_id: req.location_id,
            added_by_user_id: claims.user_id,
        })?;
        info!("User {} created listing {}", claims.user_id, id);

        fetch_listing(state, id)
    })
    .await?;

    Ok((StatusCode::CREATED, Json(listing)))
}

/// Any signed-in user may edit or delete a listing; ownership is only
/// enforced for comments and tag assignments.
pub async fn update_listing(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
    ValidJson(req): ValidJson<UpdateListingRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let listing = blocking(&state, move |state| {
        if !state.db.listing_exists(id)? {
            return Err(ApiError::NotFound("listing"));
        }
        check_references(state, req.car_model_id, req.location_id)?;

        state.db.update_listing(
            id,
            &ListingChanges {
                name: req.name.as_deref(),
                price: req.price,
                link: req.link.as_deref(),
                image_link: req.image_link.as_deref(),
                car_model_id: req.car_model_id,
                location_id: req.location_id,
                is_deleted: req.is_deleted,
            },
        )?;

        fetch_listing(state, id)
    })
    .await?;

    Ok(Json(listing))
}

pub async fn delete_listing(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, ApiError> {
    blocking(&state, move |state| {
        if !state.db.delete_listing(id)? {
            return Err(ApiError::NotFound("listing"));
        }
        info!("User {} deleted listing {}", claims.user_id, id);
        Ok(())
    })
    .await?;

    Ok(Json(MessageResponse::new("listing deleted")))
}

/// Listing with its full comment thread.
fn fetch_listing(state: &AppStateInner, id: i64) -> Result<Listing, ApiError> {
    let row = state.db.get_listing(id)?.ok_or(ApiError::NotFound("listing"))?;
    let comments = state.db.get_comments_for_listings(&[id])?;
    let assignments = state.db.get_assignments_for_listings(&[id])?;

    views::listings(vec![row], comments, assignments, Thread::Full)
        .pop()
        .ok_or(ApiError::NotFound("listing"))
}

fn check_references(
    state: &AppStateInner,
    car_model_id: Option<i64>,
    location_id: Option<i64>,
) -> Result<(), ApiError> {
    if let Some(model_id) = car_model_id {
        if state.db.get_model(model_id)?.is_none() {
            return Err(ApiError::NotFound("car model"));
        }
    }
    if let Some(location_id) = location_id {
        if state.db.get_location(location_id)?.is_none() {
            return Err(ApiError::NotFound("location"));
        }
    }
    Ok(())
}

/// "1, 4,7" -> [1, 4, 7]. Empty segments are ignored.
fn parse_tag_ids(raw: Option<&str>) -> Result<Vec<i64>, ApiError> {
    let Some(raw) = raw else {
        return Ok(vec![]);
    };

    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<i64>()
                .map_err(|_| ApiError::BadRequest(format!("invalid tag id '{}'", s)))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tag_ids_parse_from_comma_list() {
        assert_eq!(parse_tag_ids(None).unwrap(), Vec::<i64>::new());
        assert_eq!(parse_tag_ids(Some("1, 4,7")).unwrap(), [1, 4, 7]);
        assert_eq!(parse_tag_ids(Some("3,,")).unwrap(), [3]);
    }

    #[test]
    fn bad_tag_id_is_a_bad_request() {
        let err = parse_tag_ids(Some("1,x")).unwrap_err();
        assert!(matches!(err, ApiError::BadRequest(_)));
    }
}
