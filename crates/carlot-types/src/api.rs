use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::User;

// -- Token claims --

/// Claims carried by every bearer token. Issued by carlot-api on register and
/// login, checked by its auth middleware on every protected route.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Claims {
    pub user_id: i64,
    pub name: String,
    pub iat: i64,
    pub exp: i64,
}

// -- Auth --

#[derive(Debug, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct RegisterRequest {
    #[validate(length(min = 3, message = "name must be at least 3 characters"))]
    pub name: String,
    #[validate(length(min = 6, message = "password must be at least 6 characters"))]
    pub password: String,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "name is required"))]
    pub name: String,
    #[validate(length(min = 1, message = "password is required"))]
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AuthResponse {
    pub message: String,
    pub user: User,
    pub token: String,
}

// -- Generic bodies --

#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ValidationErrorResponse {
    pub errors: Vec<FieldError>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
}

// -- Catalog --

#[derive(Debug, Deserialize, Validate)]
pub struct CarBrandRequest {
    #[validate(length(min = 1, message = "name is required"))]
    pub name: String,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateCarModelRequest {
    #[validate(length(min = 1, message = "name is required"))]
    pub name: String,
    pub car_brand_id: i64,
    #[validate(length(min = 1, message = "engine is required"))]
    pub engine: String,
    #[validate(range(min = 1, message = "power must be a positive number"))]
    pub power: i64,
}

/// Partial update; absent fields keep their stored value.
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCarModelRequest {
    #[validate(length(min = 1, message = "name must not be empty"))]
    pub name: Option<String>,
    pub car_brand_id: Option<i64>,
    #[validate(length(min = 1, message = "engine must not be empty"))]
    pub engine: Option<String>,
    #[validate(range(min = 1, message = "power must be a positive number"))]
    pub power: Option<i64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CarModelQuery {
    pub car_brand_id: Option<i64>,
}

// -- Listings --

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateListingRequest {
    #[validate(length(min = 1, message = "name is required"))]
    pub name: String,
    #[validate(range(min = 0.0, message = "price must be a non-negative number"))]
    pub price: f64,
    #[validate(url(message = "link must be a valid URL"))]
    pub link: String,
    #[validate(url(message = "imageLink must be a valid URL"))]
    pub image_link: String,
    pub car_model_id: Option<i64>,
    pub location_id: Option<i64>,
}

/// Scalar fields are optional and keep their stored value when absent.
/// `carModelId` and `locationId` are always written: omitting them clears the
/// relation.
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateListingRequest {
    #[validate(length(min = 1, message = "name must not be empty"))]
    pub name: Option<String>,
    #[validate(range(min = 0.0, message = "price must be a non-negative number"))]
    pub price: Option<f64>,
    #[validate(url(message = "link must be a valid URL"))]
    pub link: Option<String>,
    #[validate(url(message = "imageLink must be a valid URL"))]
    pub image_link: Option<String>,
    pub car_model_id: Option<i64>,
    pub location_id: Option<i64>,
    pub is_deleted: Option<bool>,
}

/// `tagIds` is a comma separated list, e.g. `?tagIds=1,4`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingQuery {
    pub car_brand_id: Option<i64>,
    pub car_model_id: Option<i64>,
    pub tag_ids: Option<String>,
}

// -- Comments --

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateCommentRequest {
    #[validate(length(min = 1, message = "text is required"))]
    pub text: String,
    pub listing_id: i64,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateCommentRequest {
    #[validate(length(min = 1, message = "text is required"))]
    pub text: String,
}

// -- Tags --

#[derive(Debug, Deserialize, Validate)]
pub struct CreateTagRequest {
    #[validate(length(min = 1, message = "name is required"))]
    pub name: String,
    #[validate(length(min = 1, message = "color is required"))]
    pub color: String,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AssignTagRequest {
    pub tag_id: i64,
    pub listing_id: i64,
}

/// Owner of the assignment to remove. Defaults to the caller.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoveTagQuery {
    pub user_id: Option<i64>,
}

// -- Locations --

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct LocationRequest {
    #[validate(length(min = 1, message = "name is required"))]
    pub name: String,
    #[validate(length(min = 1, message = "zipCode is required"))]
    pub zip_code: String,
}
