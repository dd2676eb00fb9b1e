use anyhow::Result;
use rusqlite::{Connection, Row};

use super::OptionalExt;
use crate::Database;
use crate::models::UserRow;

impl Database {
    /// Inserts a user and returns its id. A taken name surfaces as a
    /// UNIQUE violation, see [`crate::is_unique_violation`].
    pub fn create_user(&self, name: &str, password_hash: &str) -> Result<i64> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO users (name, password) VALUES (?1, ?2)",
                (name, password_hash),
            )?;
            Ok(conn.last_insert_rowid())
        })
    }

    pub fn get_user_by_name(&self, name: &str) -> Result<Option<UserRow>> {
        self.with_conn(|conn| query_user(conn, name))
    }
}

fn query_user(conn: &Connection, name: &str) -> Result<Option<UserRow>> {
    let mut stmt = conn.prepare("SELECT id, name, password FROM users WHERE name = ?1")?;

    stmt.query_row([name], map_user).optional()
}

fn map_user(row: &Row<'_>) -> rusqlite::Result<UserRow> {
    Ok(UserRow {
        id: row.get(0)?,
        name: row.get(1)?,
        password: row.get(2)?,
    })
}
