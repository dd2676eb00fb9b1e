use anyhow::Result;
use rusqlite::Row;

use super::{OptionalExt, placeholders};
use crate::Database;
use crate::models::{TagAssignmentRow, TagRow};

const ASSIGNMENT_SELECT: &str = "
    SELECT a.tag_id, a.listing_id, a.user_id, t.name, t.color
    FROM tag_to_listings a
    JOIN tags t ON t.id = a.tag_id";

impl Database {
    // -- Tags --

    pub fn list_tags(&self) -> Result<Vec<TagRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare("SELECT id, name, color FROM tags ORDER BY name ASC")?;
            let rows = stmt
                .query_map([], map_tag)?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    pub fn get_tag(&self, id: i64) -> Result<Option<TagRow>> {
        self.with_conn(|conn| {
            conn.query_row("SELECT id, name, color FROM tags WHERE id = ?1", [id], map_tag)
                .optional()
        })
    }

    pub fn get_tag_by_name(&self, name: &str) -> Result<Option<TagRow>> {
        self.with_conn(|conn| {
            conn.query_row("SELECT id, name, color FROM tags WHERE name = ?1", [name], map_tag)
                .optional()
        })
    }

    pub fn create_tag(&self, name: &str, color: &str) -> Result<i64> {
        self.with_conn(|conn| {
            conn.execute("INSERT INTO tags (name, color) VALUES (?1, ?2)", (name, color))?;
            Ok(conn.last_insert_rowid())
        })
    }

    // -- Assignments --

    pub fn get_assignment(
        &self,
        tag_id: i64,
        listing_id: i64,
        user_id: i64,
    ) -> Result<Option<TagAssignmentRow>> {
        self.with_conn(|conn| {
            let sql = format!(
                "{} WHERE a.tag_id = ?1 AND a.listing_id = ?2 AND a.user_id = ?3",
                ASSIGNMENT_SELECT
            );
            conn.query_row(&sql, (tag_id, listing_id, user_id), map_assignment)
                .optional()
        })
    }

    /// Attaches `tag_id` to `listing_id` on behalf of `user_id`. A repeat of
    /// the same triple surfaces as a PRIMARY KEY violation, see
    /// [`crate::is_unique_violation`].
    pub fn assign_tag(&self, tag_id: i64, listing_id: i64, user_id: i64) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO tag_to_listings (tag_id, listing_id, user_id) VALUES (?1, ?2, ?3)",
                (tag_id, listing_id, user_id),
            )?;
            Ok(())
        })
    }

    pub fn remove_assignment(&self, tag_id: i64, listing_id: i64, user_id: i64) -> Result<bool> {
        self.with_conn(|conn| {
            let n = conn.execute(
                "DELETE FROM tag_to_listings WHERE tag_id = ?1 AND listing_id = ?2 AND user_id = ?3",
                (tag_id, listing_id, user_id),
            )?;
            Ok(n > 0)
        })
    }

    /// Batch-fetch assignments (with their tag) for a set of listings.
    pub fn get_assignments_for_listings(&self, listing_ids: &[i64]) -> Result<Vec<TagAssignmentRow>> {
        if listing_ids.is_empty() {
            return Ok(vec![]);
        }

        self.with_conn(|conn| {
            let sql = format!(
                "{} WHERE a.listing_id IN ({}) ORDER BY t.name ASC, a.user_id ASC",
                ASSIGNMENT_SELECT,
                placeholders(1, listing_ids.len())
            );

            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt
                .query_map(rusqlite::params_from_iter(listing_ids), map_assignment)?
                .collect::<std::result::Result<Vec<_>, _>>()?;

            Ok(rows)
        })
    }
}

fn map_tag(row: &Row<'_>) -> rusqlite::Result<TagRow> {
    Ok(TagRow {
        id: row.get(0)?,
        name: row.get(1)?,
        color: row.get(2)?,
    })
}

fn map_assignment(row: &Row<'_>) -> rusqlite::Result<TagAssignmentRow> {
    Ok(TagAssignmentRow {
        tag_id: row.get(0)?,
        listing_id: row.get(1)?,
        user_id: row.get(2)?,
        tag_name: row.get(3)?,
        tag_color: row.get(4)?,
    })
}

#[cfg(test)]
mod tests {
    use crate::is_unique_violation;
    use crate::models::NewListing;
    use crate::queries::test_support::{db, user};

    #[test]
    fn same_user_cannot_assign_twice_but_others_can() {
        let db = db();
        let alice = user(&db, "alice");
        let bob = user(&db, "bob");
        let listing = db
            .create_listing(&NewListing {
                name: "Felicia",
                price: 15_000.0,
                link: "https://example.com/1",
                image_link: "https://example.com/1.jpg",
                car_model_id: None,
                location_id: None,
                added_by_user_id: alice,
            })
            .unwrap();
        let tag = db.create_tag("bargain", "#00aa00").unwrap();

        db.assign_tag(tag, listing, alice).unwrap();
        let err = db.assign_tag(tag, listing, alice).unwrap_err();
        assert!(is_unique_violation(&err));

        db.assign_tag(tag, listing, bob).unwrap();
        let rows = db.get_assignments_for_listings(&[listing]).unwrap();
        assert_eq!(rows.len(), 2);
        assert!(rows.iter().all(|r| r.tag_name == "bargain"));

        assert!(db.remove_assignment(tag, listing, alice).unwrap());
        assert!(db.get_assignment(tag, listing, alice).unwrap().is_none());
        assert!(db.get_assignment(tag, listing, bob).unwrap().is_some());
        assert!(!db.remove_assignment(tag, listing, alice).unwrap());
    }

    #[test]
    fn tag_names_are_unique() {
        let db = db();
        db.create_tag("bargain", "#00aa00").unwrap();
        assert!(db.get_tag_by_name("bargain").unwrap().is_some());

        let err = db.create_tag("bargain", "#ffffff").unwrap_err();
        assert!(is_unique_violation(&err));
    }
}
