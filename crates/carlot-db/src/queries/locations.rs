use anyhow::Result;
use rusqlite::Row;

use super::OptionalExt;
use crate::Database;
use crate::models::LocationRow;

impl Database {
    pub fn list_locations(&self) -> Result<Vec<LocationRow>> {
        self.with_conn(|conn| {
            let mut stmt =
                conn.prepare("SELECT id, name, zip_code FROM locations ORDER BY name ASC")?;
            let rows = stmt
                .query_map([], map_location)?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    pub fn get_location(&self, id: i64) -> Result<Option<LocationRow>> {
        self.with_conn(|conn| {
            conn.query_row(
                "SELECT id, name, zip_code FROM locations WHERE id = ?1",
                [id],
                map_location,
            )
            .optional()
        })
    }

    pub fn create_location(&self, name: &str, zip_code: &str) -> Result<i64> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO locations (name, zip_code) VALUES (?1, ?2)",
                (name, zip_code),
            )?;
            Ok(conn.last_insert_rowid())
        })
    }

    pub fn update_location(&self, id: i64, name: &str, zip_code: &str) -> Result<bool> {
        self.with_conn(|conn| {
            let n = conn.execute(
                "UPDATE locations SET name = ?1, zip_code = ?2 WHERE id = ?3",
                (name, zip_code, id),
            )?;
            Ok(n > 0)
        })
    }

    /// Listings placed at this location keep existing with no location.
    pub fn delete_location(&self, id: i64) -> Result<bool> {
        self.with_conn(|conn| {
            let n = conn.execute("DELETE FROM locations WHERE id = ?1", [id])?;
            Ok(n > 0)
        })
    }
}

fn map_location(row: &Row<'_>) -> rusqlite::Result<LocationRow> {
    Ok(LocationRow {
        id: row.get(0)?,
        name: row.get(1)?,
        zip_code: row.get(2)?,
    })
}

#[cfg(test)]
mod tests {
    use crate::queries::test_support::db;

    #[test]
    fn location_crud() {
        let db = db();
        let brno = db.create_location("Brno", "60200").unwrap();
        db.create_location("Aš", "35201").unwrap();

        let names: Vec<String> = db.list_locations().unwrap().into_iter().map(|l| l.name).collect();
        assert_eq!(names, ["Aš", "Brno"]);

        assert!(db.update_location(brno, "Brno-střed", "60200").unwrap());
        assert_eq!(db.get_location(brno).unwrap().unwrap().name, "Brno-střed");

        assert!(db.delete_location(brno).unwrap());
        assert!(db.get_location(brno).unwrap().is_none());
        assert!(!db.update_location(brno, "x", "y").unwrap());
    }
}
