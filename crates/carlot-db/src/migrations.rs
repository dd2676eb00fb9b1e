use anyhow::Result;
use rusqlite::Connection;
use tracing::info;

pub fn run(conn: &Connection) -> Result<()> {
    conn.execute_batch("CREATE TABLE IF NOT EXISTS schema_version (version INTEGER NOT NULL);")?;

    let version: i64 =
        conn.query_row("SELECT COALESCE(MAX(version), 0) FROM schema_version", [], |r| r.get(0))?;

    if version < 1 {
        info!("Running migration v1 (initial schema)");
        conn.execute_batch(
            "
            CREATE TABLE users (
                id          INTEGER PRIMARY KEY AUTOINCREMENT,
                name        TEXT NOT NULL UNIQUE,
                password    TEXT NOT NULL,
                created_at  TEXT NOT NULL DEFAULT (datetime('now'))
            );

            CREATE TABLE car_brands (
                id          INTEGER PRIMARY KEY AUTOINCREMENT,
                name        TEXT NOT NULL UNIQUE
            );

            CREATE TABLE car_models (
                id              INTEGER PRIMARY KEY AUTOINCREMENT,
                name            TEXT NOT NULL,
                car_brand_id    INTEGER NOT NULL REFERENCES car_brands(id) ON DELETE CASCADE,
                engine          TEXT NOT NULL,
                power           INTEGER NOT NULL
            );

            CREATE INDEX idx_car_models_brand ON car_models(car_brand_id);

            CREATE TABLE locations (
                id          INTEGER PRIMARY KEY AUTOINCREMENT,
                name        TEXT NOT NULL,
                zip_code    TEXT NOT NULL
            );

            CREATE TABLE listings (
                id                  INTEGER PRIMARY KEY AUTOINCREMENT,
                name                TEXT NOT NULL,
                price               REAL NOT NULL,
                link                TEXT NOT NULL,
                image_link          TEXT NOT NULL,
                added_by_user_id    INTEGER NOT NULL REFERENCES users(id),
                is_deleted          INTEGER NOT NULL DEFAULT 0,
                car_model_id        INTEGER REFERENCES car_models(id) ON DELETE SET NULL,
                location_id         INTEGER REFERENCES locations(id) ON DELETE SET NULL,
                created_at          TEXT NOT NULL DEFAULT (datetime('now')),
                modified_at         TEXT NOT NULL DEFAULT (datetime('now'))
            );

            CREATE INDEX idx_listings_created ON listings(created_at);

            CREATE TABLE comments (
                id                  INTEGER PRIMARY KEY AUTOINCREMENT,
                text                TEXT NOT NULL,
                date                TEXT NOT NULL DEFAULT (datetime('now')),
                listing_id          INTEGER NOT NULL REFERENCES listings(id) ON DELETE CASCADE,
                added_by_user_id    INTEGER NOT NULL REFERENCES users(id)
            );

            CREATE INDEX idx_comments_listing ON comments(listing_id, date);

            CREATE TABLE tags (
                id          INTEGER PRIMARY KEY AUTOINCREMENT,
                name        TEXT NOT NULL UNIQUE,
                color       TEXT NOT NULL
            );

            -- One row per (tag, listing, user): a user attaches a tag to a
            -- listing at most once, other users may attach it too.
            CREATE TABLE tag_to_listings (
                tag_id      INTEGER NOT NULL REFERENCES tags(id) ON DELETE CASCADE,
                listing_id  INTEGER NOT NULL REFERENCES listings(id) ON DELETE CASCADE,
                user_id     INTEGER NOT NULL REFERENCES users(id),
                PRIMARY KEY (tag_id, listing_id, user_id)
            );

            CREATE INDEX idx_tag_to_listings_listing ON tag_to_listings(listing_id);

            INSERT INTO schema_version (version) VALUES (1);
            ",
        )?;
    }

    info!("Database migrations complete");
    Ok(())
}
