//! SQLite pool and schema.

use std::path::Path;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use tracing::info;

use super::error::CatalogResult;

/// Open the catalog database at `path`, or a private in-memory database.
///
/// An in-memory database lives exactly as long as its single connection,
/// so that pool never lets the connection go.
pub async fn init_pool(path: Option<&Path>) -> CatalogResult<SqlitePool> {
    let pool = match path {
        Some(path) => {
            let options = SqliteConnectOptions::new()
                .filename(path)
                .create_if_missing(true)
                .foreign_keys(true);
            let pool = SqlitePoolOptions::new()
                .max_connections(5)
                .connect_with(options)
                .await?;
            info!("Opened tool catalog {}", path.display());
            pool
        }
        None => {
            let options = "sqlite::memory:"
                .parse::<SqliteConnectOptions>()?
                .foreign_keys(true);
            SqlitePoolOptions::new()
                .max_connections(1)
                .min_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
                .connect_with(options)
                .await?
        }
    };

    Ok(pool)
}

pub async fn run_migrations(pool: &SqlitePool) -> CatalogResult<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS tools (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL UNIQUE COLLATE NOCASE,
            slug TEXT NOT NULL UNIQUE,
            description TEXT NOT NULL,
            enabled INTEGER NOT NULL DEFAULT 1,
            premium_required INTEGER NOT NULL DEFAULT 0,
            category TEXT NOT NULL,
            file_name TEXT
        );
    "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS users (
            id TEXT PRIMARY KEY,
            premium INTEGER NOT NULL DEFAULT 0,
            request_premium INTEGER NOT NULL DEFAULT 0,
            first_seen TEXT NOT NULL,
            last_seen TEXT NOT NULL
        );
    "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS favourites (
            user_id TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
            tool_id INTEGER NOT NULL REFERENCES tools(id) ON DELETE CASCADE,
            PRIMARY KEY (user_id, tool_id)
        );
    "#,
    )
    .execute(pool)
    .await?;

    info!("Catalog migrations complete");
    Ok(())
}
