//! Database row types — these map directly to SQLite rows.
//! Distinct from carlot-types API models to keep the DB layer independent.

pub struct UserRow {
    pub id: i64,
    pub name: String,
    pub password: String,
}

#[derive(Debug, Clone)]
pub struct CarBrandRow {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone)]
pub struct CarModelRow {
    pub id: i64,
    pub name: String,
    pub car_brand_id: i64,
    pub engine: String,
    pub power: i64,
    pub brand_name: String,
}

#[derive(Debug, Clone)]
pub struct LocationRow {
    pub id: i64,
    pub name: String,
    pub zip_code: String,
}

#[derive(Debug, Clone)]
pub struct TagRow {
    pub id: i64,
    pub name: String,
    pub color: String,
}

/// Tag assignment joined with its tag.
#[derive(Debug, Clone)]
pub struct TagAssignmentRow {
    pub tag_id: i64,
    pub listing_id: i64,
    pub user_id: i64,
    pub tag_name: String,
    pub tag_color: String,
}

/// Comment joined with its author's name.
#[derive(Debug, Clone)]
pub struct CommentRow {
    pub id: i64,
    pub text: String,
    pub date: String,
    pub listing_id: i64,
    pub added_by_user_id: i64,
    pub author_name: String,
}

/// Listing joined with its author, model, brand and location.
#[derive(Debug, Clone)]
pub struct ListingRow {
    pub id: i64,
    pub name: String,
    pub price: f64,
    pub link: String,
    pub image_link: String,
    pub added_by_user_id: i64,
    pub author_name: String,
    pub is_deleted: bool,
    pub car_model: Option<CarModelRow>,
    pub location: Option<LocationRow>,
    pub created_at: String,
    pub modified_at: String,
}

pub struct NewListing<'a> {
    pub name: &'a str,
    pub price: f64,
    pub link: &'a str,
    pub image_link: &'a str,
    pub car_model_id: Option<i64>,
    pub location_id: Option<i64>,
    pub added_by_user_id: i64,
}

/// `None` scalars keep the stored value; the two relations are always written.
pub struct ListingChanges<'a> {
    pub name: Option<&'a str>,
    pub price: Option<f64>,
    pub link: Option<&'a str>,
    pub image_link: Option<&'a str>,
    pub car_model_id: Option<i64>,
    pub location_id: Option<i64>,
    pub is_deleted: Option<bool>,
}

#[derive(Debug, Default, Clone)]
pub struct ListingFilter {
    pub car_brand_id: Option<i64>,
    pub car_model_id: Option<i64>,
    /// Match listings carrying any of these tags. Empty means no tag filter.
    pub tag_ids: Vec<i64>,
}
