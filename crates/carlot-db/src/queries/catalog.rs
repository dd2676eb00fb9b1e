use anyhow::Result;
use rusqlite::{Connection, Row};

use super::OptionalExt;
use crate::Database;
use crate::models::{CarBrandRow, CarModelRow};

const MODEL_COLUMNS: &str = "m.id, m.name, m.car_brand_id, m.engine, m.power, b.name
     FROM car_models m
     JOIN car_brands b ON b.id = m.car_brand_id";

impl Database {
    // -- Brands --

    pub fn list_brands(&self) -> Result<Vec<CarBrandRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare("SELECT id, name FROM car_brands ORDER BY name ASC")?;
            let rows = stmt
                .query_map([], map_brand)?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    pub fn get_brand(&self, id: i64) -> Result<Option<CarBrandRow>> {
        self.with_conn(|conn| {
            conn.query_row("SELECT id, name FROM car_brands WHERE id = ?1", [id], map_brand)
                .optional()
        })
    }

    pub fn get_brand_by_name(&self, name: &str) -> Result<Option<CarBrandRow>> {
        self.with_conn(|conn| {
            conn.query_row("SELECT id, name FROM car_brands WHERE name = ?1", [name], map_brand)
                .optional()
        })
    }

    pub fn create_brand(&self, name: &str) -> Result<i64> {
        self.with_conn(|conn| {
            conn.execute("INSERT INTO car_brands (name) VALUES (?1)", [name])?;
            Ok(conn.last_insert_rowid())
        })
    }

    /// Returns false when no brand has this id.
    pub fn update_brand(&self, id: i64, name: &str) -> Result<bool> {
        self.with_conn(|conn| {
            let n = conn.execute("UPDATE car_brands SET name = ?1 WHERE id = ?2", (name, id))?;
            Ok(n > 0)
        })
    }

    /// Deleting a brand deletes its models.
    pub fn delete_brand(&self, id: i64) -> Result<bool> {
        self.with_conn(|conn| {
            let n = conn.execute("DELETE FROM car_brands WHERE id = ?1", [id])?;
            Ok(n > 0)
        })
    }

    // -- Models --

    pub fn list_models(&self, car_brand_id: Option<i64>) -> Result<Vec<CarModelRow>> {
        self.with_conn(|conn| query_models(conn, car_brand_id))
    }

    pub fn get_model(&self, id: i64) -> Result<Option<CarModelRow>> {
        self.with_conn(|conn| {
            let sql = format!("SELECT {} WHERE m.id = ?1", MODEL_COLUMNS);
            conn.query_row(&sql, [id], map_model).optional()
        })
    }

    pub fn create_model(&self, name: &str, car_brand_id: i64, engine: &str, power: i64) -> Result<i64> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO car_models (name, car_brand_id, engine, power) VALUES (?1, ?2, ?3, ?4)",
                rusqlite::params![name, car_brand_id, engine, power],
            )?;
            Ok(conn.last_insert_rowid())
        })
    }

    /// Partial update: `None` keeps the stored value.
    pub fn update_model(
        &self,
        id: i64,
        name: Option<&str>,
        car_brand_id: Option<i64>,
        engine: Option<&str>,
        power: Option<i64>,
    ) -> Result<bool> {
        self.with_conn(|conn| {
            let n = conn.execute(
                "UPDATE car_models SET
                    name = COALESCE(?1, name),
                    car_brand_id = COALESCE(?2, car_brand_id),
                    engine = COALESCE(?3, engine),
                    power = COALESCE(?4, power)
                 WHERE id = ?5",
                rusqlite::params![name, car_brand_id, engine, power, id],
            )?;
            Ok(n > 0)
        })
    }

    pub fn delete_model(&self, id: i64) -> Result<bool> {
        self.with_conn(|conn| {
            let n = conn.execute("DELETE FROM car_models WHERE id = ?1", [id])?;
            Ok(n > 0)
        })
    }
}

fn query_models(conn: &Connection, car_brand_id: Option<i64>) -> Result<Vec<CarModelRow>> {
    let sql = format!(
        "SELECT {} WHERE (?1 IS NULL OR m.car_brand_id = ?1) ORDER BY m.name ASC",
        MODEL_COLUMNS
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map([car_brand_id], map_model)?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(rows)
}

fn map_brand(row: &Row<'_>) -> rusqlite::Result<CarBrandRow> {
    Ok(CarBrandRow {
        id: row.get(0)?,
        name: row.get(1)?,
    })
}

fn map_model(row: &Row<'_>) -> rusqlite::Result<CarModelRow> {
    Ok(CarModelRow {
        id: row.get(0)?,
        name: row.get(1)?,
        car_brand_id: row.get(2)?,
        engine: row.get(3)?,
        power: row.get(4)?,
        brand_name: row.get(5)?,
    })
}
