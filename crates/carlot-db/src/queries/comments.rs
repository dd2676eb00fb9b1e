use anyhow::Result;
use rusqlite::Row;

use super::{OptionalExt, placeholders};
use crate::Database;
use crate::models::CommentRow;

const COMMENT_SELECT: &str = "
    SELECT c.id, c.text, c.date, c.listing_id, c.added_by_user_id, u.name
    FROM comments c
    JOIN users u ON u.id = c.added_by_user_id";

impl Database {
    pub fn get_comment(&self, id: i64) -> Result<Option<CommentRow>> {
        self.with_conn(|conn| {
            let sql = format!("{} WHERE c.id = ?1", COMMENT_SELECT);
            conn.query_row(&sql, [id], map_comment).optional()
        })
    }

    pub fn create_comment(&self, listing_id: i64, author_id: i64, text: &str) -> Result<i64> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO comments (text, listing_id, added_by_user_id) VALUES (?1, ?2, ?3)",
                (text, listing_id, author_id),
            )?;
            Ok(conn.last_insert_rowid())
        })
    }

    pub fn update_comment(&self, id: i64, text: &str) -> Result<bool> {
        self.with_conn(|conn| {
            let n = conn.execute("UPDATE comments SET text = ?1 WHERE id = ?2", (text, id))?;
            Ok(n > 0)
        })
    }

    pub fn delete_comment(&self, id: i64) -> Result<bool> {
        self.with_conn(|conn| {
            let n = conn.execute("DELETE FROM comments WHERE id = ?1", [id])?;
            Ok(n > 0)
        })
    }

    /// Batch-fetch comments for a set of listings, oldest first.
    pub fn get_comments_for_listings(&self, listing_ids: &[i64]) -> Result<Vec<CommentRow>> {
        if listing_ids.is_empty() {
            return Ok(vec![]);
        }

        self.with_conn(|conn| {
            let sql = format!(
                "{} WHERE c.listing_id IN ({}) ORDER BY c.date ASC, c.id ASC",
                COMMENT_SELECT,
                placeholders(1, listing_ids.len())
            );

            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt
                .query_map(rusqlite::params_from_iter(listing_ids), map_comment)?
                .collect::<std::result::Result<Vec<_>, _>>()?;

            Ok(rows)
        })
    }
}

fn map_comment(row: &Row<'_>) -> rusqlite::Result<CommentRow> {
    Ok(CommentRow {
        id: row.get(0)?,
        text: row.get(1)?,
        date: row.get(2)?,
        listing_id: row.get(3)?,
        added_by_user_id: row.get(4)?,
        author_name: row.get(5)?,
    })
}

#[cfg(test)]
mod tests {
    use crate::models::NewListing;
    use crate::queries::test_support::{db, user};

    #[test]
    fn comments_follow_their_listing() {
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

        let first = db.create_comment(listing, bob, "still available?").unwrap();
        let second = db.create_comment(listing, alice, "yes").unwrap();

        let thread = db.get_comments_for_listings(&[listing]).unwrap();
        let ids: Vec<i64> = thread.iter().map(|c| c.id).collect();
        assert_eq!(ids, [first, second]);
        assert_eq!(thread[0].author_name, "bob");

        assert!(db.update_comment(first, "is it still available?").unwrap());
        assert_eq!(db.get_comment(first).unwrap().unwrap().text, "is it still available?");

        db.delete_listing(listing).unwrap();
        assert!(db.get_comment(second).unwrap().is_none());
        assert!(db.get_comments_for_listings(&[]).unwrap().is_empty());
    }
}
