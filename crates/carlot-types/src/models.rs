use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Public view of a user. The password digest never leaves the storage layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CarBrand {
    pub id: i64,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub car_models: Option<Vec<CarModel>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CarModel {
    pub id: i64,
    pub name: String,
    pub car_brand_id: i64,
    pub engine: String,
    pub power: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub car_brand: Option<CarBrand>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    pub id: i64,
    pub name: String,
    pub zip_code: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tag {
    pub id: i64,
    pub name: String,
    pub color: String,
}

/// A tag attached to a listing by one user. The same tag may be attached to
/// the same listing by several users, once each.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TagAssignment {
    pub tag_id: i64,
    pub listing_id: i64,
    pub user_id: i64,
    pub tag: Tag,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: i64,
    pub text: String,
    pub date: DateTime<Utc>,
    pub listing_id: i64,
    pub added_by_user_id: i64,
    pub added_by_user: User,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Listing {
    pub id: i64,
    pub name: String,
    pub price: f64,
    pub link: String,
    pub image_link: String,
    pub added_by_user_id: i64,
    pub is_deleted: bool,
    pub car_model_id: Option<i64>,
    pub location_id: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub modified_at: DateTime<Utc>,
    pub added_by_user: User,
    pub car_model: Option<CarModel>,
    pub location: Option<Location>,
    /// Newest comment only in list views, full thread (oldest first) in detail views.
    pub comments: Vec<Comment>,
    pub tag_to_listings: Vec<TagAssignment>,
}
