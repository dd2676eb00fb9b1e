use anyhow::Result;
use rusqlite::types::Value;
use rusqlite::{Connection, Row};

use super::{OptionalExt, placeholders};
use crate::Database;
use crate::models::{CarModelRow, ListingChanges, ListingFilter, ListingRow, LocationRow, NewListing};

// JOIN author, model, brand and location in a single query
const LISTING_SELECT: &str = "
    SELECT l.id, l.name, l.price, l.link, l.image_link, l.added_by_user_id, u.name, l.is_deleted,
           m.id, m.name, m.car_brand_id, m.engine, m.power, b.name,
           loc.id, loc.name, loc.zip_code,
           l.created_at, l.modified_at
    FROM listings l
    JOIN users u ON u.id = l.added_by_user_id
    LEFT JOIN car_models m ON m.id = l.car_model_id
    LEFT JOIN car_brands b ON b.id = m.car_brand_id
    LEFT JOIN locations loc ON loc.id = l.location_id";

impl Database {
    /// Newest first.
    pub fn list_listings(&self, filter: &ListingFilter) -> Result<Vec<ListingRow>> {
        self.with_conn(|conn| query_listings(conn, filter))
    }

    pub fn get_listing(&self, id: i64) -> Result<Option<ListingRow>> {
        self.with_conn(|conn| {
            let sql = format!("{} WHERE l.id = ?1", LISTING_SELECT);
            conn.query_row(&sql, [id], map_listing).optional()
        })
    }

    pub fn listing_exists(&self, id: i64) -> Result<bool> {
        self.with_conn(|conn| {
            let found = conn
                .query_row("SELECT 1 FROM listings WHERE id = ?1", [id], |_| Ok(()))
                .optional()?;
            Ok(found.is_some())
        })
    }

    pub fn create_listing(&self, listing: &NewListing<'_>) -> Result<i64> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO listings (name, price, link, image_link, car_model_id, location_id, added_by_user_id)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                rusqlite::params![
                    listing.name,
                    listing.price,
                    listing.link,
                    listing.image_link,
                    listing.car_model_id,
                    listing.location_id,
                    listing.added_by_user_id,
                ],
            )?;
            Ok(conn.last_insert_rowid())
        })
    }

    pub fn update_listing(&self, id: i64, changes: &ListingChanges<'_>) -> Result<bool> {
        self.with_conn(|conn| {
            let n = conn.execute(
                "UPDATE listings SET
                    name = COALESCE(?1, name),
                    price = COALESCE(?2, price),
                    link = COALESCE(?3, link),
                    image_link = COALESCE(?4, image_link),
                    car_model_id = ?5,
                    location_id = ?6,
                    is_deleted = COALESCE(?7, is_deleted),
                    modified_at = datetime('now')
                 WHERE id = ?8",
                rusqlite::params![
                    changes.name,
                    changes.price,
                    changes.link,
                    changes.image_link,
                    changes.car_model_id,
                    changes.location_id,
                    changes.is_deleted,
                    id,
                ],
            )?;
            Ok(n > 0)
        })
    }

    /// Comments and tag assignments go with the listing.
    pub fn delete_listing(&self, id: i64) -> Result<bool> {
        self.with_conn(|conn| {
            let n = conn.execute("DELETE FROM listings WHERE id = ?1", [id])?;
            Ok(n > 0)
        })
    }
}

fn query_listings(conn: &Connection, filter: &ListingFilter) -> Result<Vec<ListingRow>> {
    let mut clauses: Vec<String> = Vec::new();
    let mut params: Vec<Value> = Vec::new();

    if let Some(brand_id) = filter.car_brand_id {
        params.push(Value::Integer(brand_id));
        clauses.push(format!("m.car_brand_id = ?{}", params.len()));
    }
    if let Some(model_id) = filter.car_model_id {
        params.push(Value::Integer(model_id));
        clauses.push(format!("l.car_model_id = ?{}", params.len()));
    }
    if !filter.tag_ids.is_empty() {
        let first = params.len() + 1;
        params.extend(filter.tag_ids.iter().copied().map(Value::Integer));
        clauses.push(format!(
            "EXISTS (SELECT 1 FROM tag_to_listings t WHERE t.listing_id = l.id AND t.tag_id IN ({}))",
            placeholders(first, filter.tag_ids.len())
        ));
    }

    let mut sql = LISTING_SELECT.to_string();
    if !clauses.is_empty() {
        sql.push_str(" WHERE ");
        sql.push_str(&clauses.join(" AND "));
    }
    sql.push_str(" ORDER BY l.created_at DESC, l.id DESC");

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map(rusqlite::params_from_iter(params), map_listing)?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    Ok(rows)
}

fn map_listing(row: &Row<'_>) -> rusqlite::Result<ListingRow> {
    let car_model = match row.get::<_, Option<i64>>(8)? {
        Some(id) => Some(CarModelRow {
            id,
            name: row.get(9)?,
            car_brand_id: row.get(10)?,
            engine: row.get(11)?,
            power: row.get(12)?,
            brand_name: row.get(13)?,
        }),
        None => None,
    };

    let location = match row.get::<_, Option<i64>>(14)? {
        Some(id) => Some(LocationRow {
            id,
            name: row.get(15)?,
            zip_code: row.get(16)?,
        }),
        None => None,
    };

    Ok(ListingRow {
        id: row.get(0)?,
        name: row.get(1)?,
        price: row.get(2)?,
        link: row.get(3)?,
        image_link: row.get(4)?,
        added_by_user_id: row.get(5)?,
        author_name: row.get(6)?,
        is_deleted: row.get(7)?,
        car_model,
        location,
        created_at: row.get(17)?,
        modified_at: row.get(18)?,
    })
}
