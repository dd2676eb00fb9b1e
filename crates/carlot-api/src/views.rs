//! Row -> API model conversions.

use std::collections::HashMap;

use chrono::{DateTime, NaiveDateTime, Utc};
use tracing::warn;

use carlot_db::models::{
    CarBrandRow, CarModelRow, CommentRow, ListingRow, LocationRow, TagAssignmentRow, TagRow,
};
use carlot_types::models::{
    CarBrand, CarModel, Comment, Listing, Location, Tag, TagAssignment, User,
};

/// SQLite stores timestamps as "YYYY-MM-DD HH:MM:SS" without timezone.
pub fn timestamp(raw: &str) -> DateTime<Utc> {
    raw.parse::<DateTime<Utc>>()
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S").map(|ndt| ndt.and_utc()))
        .unwrap_or_else(|e| {
            warn!("Corrupt timestamp '{}': {}", raw, e);
            DateTime::default()
        })
}

pub fn brand(row: CarBrandRow, models: Option<Vec<CarModel>>) -> CarBrand {
    CarBrand {
        id: row.id,
        name: row.name,
        car_models: models,
    }
}

/// Model with its brand embedded.
pub fn car_model(row: CarModelRow) -> CarModel {
    let brand = CarBrand {
        id: row.car_brand_id,
        name: row.brand_name.clone(),
        car_models: None,
    };

    CarModel {
        car_brand: Some(brand),
        ..bare_car_model(row)
    }
}

/// Model without its brand, as listed under a brand.
pub fn bare_car_model(row: CarModelRow) -> CarModel {
    CarModel {
        id: row.id,
        name: row.name,
        car_brand_id: row.car_brand_id,
        engine: row.engine,
        power: row.power,
        car_brand: None,
    }
}

/// Brands with their models nested, preserving the order of `brands`.
pub fn brands_with_models(brands: Vec<CarBrandRow>, models: Vec<CarModelRow>) -> Vec<CarBrand> {
    let mut by_brand: HashMap<i64, Vec<CarModel>> = HashMap::new();
    for m in models {
        by_brand.entry(m.car_brand_id).or_default().push(bare_car_model(m));
    }

    brands
        .into_iter()
        .map(|b| {
            let models = by_brand.remove(&b.id).unwrap_or_default();
            brand(b, Some(models))
        })
        .collect()
}

pub fn location(row: LocationRow) -> Location {
    Location {
        id: row.id,
        name: row.name,
        zip_code: row.zip_code,
    }
}

pub fn tag(row: TagRow) -> Tag {
    Tag {
        id: row.id,
        name: row.name,
        color: row.color,
    }
}

pub fn assignment(row: TagAssignmentRow) -> TagAssignment {
    TagAssignment {
        tag_id: row.tag_id,
        listing_id: row.listing_id,
        user_id: row.user_id,
        tag: Tag {
            id: row.tag_id,
            name: row.tag_name,
            color: row.tag_color,
        },
    }
}

pub fn comment(row: CommentRow) -> Comment {
    Comment {
        id: row.id,
        date: timestamp(&row.date),
        text: row.text,
        listing_id: row.listing_id,
        added_by_user_id: row.added_by_user_id,
        added_by_user: User {
            id: row.added_by_user_id,
            name: row.author_name,
        },
    }
}

/// How much of each comment thread to embed in a listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Thread {
    /// Newest comment only
    Latest,
    /// Every comment, oldest first
    Full,
}

/// Assemble listings with their comments and tag assignments. `comments`
/// must be ordered oldest first.
pub fn listings(
    rows: Vec<ListingRow>,
    comments: Vec<CommentRow>,
    assignments: Vec<TagAssignmentRow>,
    thread: Thread,
) -> Vec<Listing> {
    let mut comment_map: HashMap<i64, Vec<Comment>> = HashMap::new();
    for c in comments {
        comment_map.entry(c.listing_id).or_default().push(comment(c));
    }

    let mut tag_map: HashMap<i64, Vec<TagAssignment>> = HashMap::new();
    for a in assignments {
        tag_map.entry(a.listing_id).or_default().push(assignment(a));
    }

    rows.into_iter()
        .map(|row| {
            let mut comments = comment_map.remove(&row.id).unwrap_or_default();
            if thread == Thread::Latest && comments.len() > 1 {
                comments = comments.split_off(comments.len() - 1);
            }
            let tag_to_listings = tag_map.remove(&row.id).unwrap_or_default();

            Listing {
                id: row.id,
                name: row.name,
                price: row.price,
                link: row.link,
                image_link: row.image_link,
                added_by_user_id: row.added_by_user_id,
                is_deleted: row.is_deleted,
                car_model_id: row.car_model.as_ref().map(|m| m.id),
                location_id: row.location.as_ref().map(|l| l.id),
                created_at: timestamp(&row.created_at),
                modified_at: timestamp(&row.modified_at),
                added_by_user: User {
                    id: row.added_by_user_id,
                    name: row.author_name,
                },
                car_model: row.car_model.map(car_model),
                location: row.location.map(location),
                comments,
                tag_to_listings,
            }
        })
        .collect()
}
