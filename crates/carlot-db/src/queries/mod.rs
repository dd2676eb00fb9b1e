mod catalog;
mod comments;
mod listings;
mod locations;
mod tags;
mod users;

use anyhow::Result;

/// Extension trait for optional query results
pub(crate) trait OptionalExt<T> {
    fn optional(self) -> Result<Option<T>>;
}

impl<T> OptionalExt<T> for std::result::Result<T, rusqlite::Error> {
    fn optional(self) -> Result<Option<T>> {
        match self {
            Ok(val) => Ok(Some(val)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

/// `?1, ?2, ... ?n` for an IN (...) clause starting at parameter `first`.
pub(crate) fn placeholders(first: usize, count: usize) -> String {
    (first..first + count)
        .map(|i| format!("?{}", i))
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
pub(crate) mod test_support {
    use crate::Database;

    pub fn db() -> Database {
        Database::open_in_memory().unwrap()
    }

    pub fn user(db: &Database, name: &str) -> i64 {
        db.create_user(name, "$argon2id$placeholder").unwrap()
    }
}
