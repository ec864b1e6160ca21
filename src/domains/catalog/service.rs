//! Tool catalog service.
//!
//! Tool records and favourites live in SQLite. Single changes are one
//! statement; changes spanning several statements run in a transaction, so
//! a failed write never leaves part of it behind.

use std::collections::BTreeMap;
use std::path::Path;

use sqlx::SqlitePool;
use tracing::{info, instrument};

use super::db::{init_pool, run_migrations};
use super::error::{CatalogError, CatalogResult};
use super::model::ToolRecord;
use super::users::ensure_user;
use crate::domains::plugins::LoadedPlugin;

const TOOL_COLUMNS: &str =
    "id, name, slug, description, enabled, premium_required, category, file_name";

/// Tool records, users and favourites.
pub struct ToolCatalog {
    pub(super) pool: SqlitePool,
}

impl ToolCatalog {
    /// Open the catalog database at `path`, creating it and its tables as
    /// needed. Without a path the catalog lives in memory.
    pub async fn open(path: Option<&Path>) -> CatalogResult<Self> {
        let pool = init_pool(path).await?;
        run_migrations(&pool).await?;
        Ok(Self { pool })
    }

    /// An empty catalog that is never persisted.
    pub async fn in_memory() -> CatalogResult<Self> {
        Self::open(None).await
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    /// Every record, ordered by category then name.
    pub async fn all_tools(&self) -> CatalogResult<Vec<ToolRecord>> {
        let sql = format!("SELECT {TOOL_COLUMNS} FROM tools ORDER BY category, name");
        Ok(sqlx::query_as::<_, ToolRecord>(&sql).fetch_all(&self.pool).await?)
    }

    /// Enabled records.
    pub async fn enabled_tools(&self) -> CatalogResult<Vec<ToolRecord>> {
        let sql = format!(
            "SELECT {TOOL_COLUMNS} FROM tools WHERE enabled = 1 ORDER BY category, name"
        );
        Ok(sqlx::query_as::<_, ToolRecord>(&sql).fetch_all(&self.pool).await?)
    }

    /// Records grouped by category. Admins also see disabled tools.
    pub async fn categorized(
        &self,
        is_admin: bool,
    ) -> CatalogResult<BTreeMap<String, Vec<ToolRecord>>> {
        let tools = if is_admin {
            self.all_tools().await?
        } else {
            self.enabled_tools().await?
        };

        let mut categories: BTreeMap<String, Vec<ToolRecord>> = BTreeMap::new();
        for tool in tools.into_iter().filter(|t| !t.category.is_empty()) {
            categories.entry(tool.category.clone()).or_default().push(tool);
        }
        Ok(categories)
    }

    pub async fn get_by_id(&self, id: i64) -> CatalogResult<Option<ToolRecord>> {
        let sql = format!("SELECT {TOOL_COLUMNS} FROM tools WHERE id = ?");
        Ok(sqlx::query_as::<_, ToolRecord>(&sql).bind(id).fetch_optional(&self.pool).await?)
    }

    pub async fn get_by_slug(&self, slug: &str) -> CatalogResult<Option<ToolRecord>> {
        let sql = format!("SELECT {TOOL_COLUMNS} FROM tools WHERE slug = ?");
        Ok(sqlx::query_as::<_, ToolRecord>(&sql).bind(slug).fetch_optional(&self.pool).await?)
    }

    /// Records whose name or description contains `query`, ignoring case.
    /// Admins also see disabled tools.
    pub async fn search(&self, query: &str, is_admin: bool) -> CatalogResult<Vec<ToolRecord>> {
        let query = query.trim().to_lowercase();
        let tools = if is_admin {
            self.all_tools().await?
        } else {
            self.enabled_tools().await?
        };

        Ok(tools
            .into_iter()
            .filter(|t| {
                query.is_empty()
                    || t.name.to_lowercase().contains(&query)
                    || t.description.to_lowercase().contains(&query)
            })
            .collect())
    }

    // ------------------------------------------------------------------
    // Mutations
    // ------------------------------------------------------------------

    /// Flip the enabled flag.
    pub async fn toggle_enabled(&self, id: i64) -> CatalogResult<ToolRecord> {
        self.update_returning("UPDATE tools SET enabled = NOT enabled WHERE id = ?", id)
            .await
    }

    /// Flip the premium flag.
    pub async fn toggle_premium(&self, id: i64) -> CatalogResult<ToolRecord> {
        self.update_returning(
            "UPDATE tools SET premium_required = NOT premium_required WHERE id = ?",
            id,
        )
        .await
    }

    /// Delete a record. Its favourites go with it.
    #[instrument(skip(self))]
    pub async fn delete_tool(&self, id: i64) -> CatalogResult<ToolRecord> {
        let record = self
            .update_returning("DELETE FROM tools WHERE id = ?", id)
            .await?;
        info!("Deleted tool record {} '{}'", record.id, record.name);
        Ok(record)
    }

    async fn update_returning(&self, statement: &str, id: i64) -> CatalogResult<ToolRecord> {
        let sql = format!("{statement} RETURNING {TOOL_COLUMNS}");
        sqlx::query_as::<_, ToolRecord>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(CatalogError::NotFound(id))
    }

    /// Give every tool of a loaded plugin a record if it has none.
    ///
    /// New records are enabled and free. A tool whose name or slug is
    /// already taken keeps the existing record. Returns the records created.
    #[instrument(skip(self, plugin), fields(plugin = %plugin.name))]
    pub async fn sync_plugin(&self, plugin: &LoadedPlugin) -> CatalogResult<Vec<ToolRecord>> {
        let file_name = plugin.file_name();
        let sql = format!(
            "INSERT INTO tools (name, slug, description, category, file_name) \
             VALUES (?, ?, ?, ?, ?) ON CONFLICT DO NOTHING RETURNING {TOOL_COLUMNS}"
        );

        let mut tx = self.pool.begin().await?;
        let mut created = Vec::new();
        for tool in &plugin.tools {
            let record = sqlx::query_as::<_, ToolRecord>(&sql)
                .bind(&tool.name)
                .bind(&tool.slug)
                .bind(&tool.description)
                .bind(&tool.category)
                .bind(&file_name)
                .fetch_optional(&mut *tx)
                .await?;
            created.extend(record);
        }
        tx.commit().await?;

        if !created.is_empty() {
            info!(
                "Created {} tool records for plugin '{}'",
                created.len(),
                plugin.name
            );
        }
        Ok(created)
    }

    // ------------------------------------------------------------------
    // Favourites
    // ------------------------------------------------------------------

    /// Mark a tool as a user's favourite. Adding twice is a no-op.
    ///
    /// Users are created on first sight, so an unknown user id is fine.
    pub async fn add_favourite(&self, user_id: &str, tool_id: i64) -> CatalogResult<()> {
        let mut tx = self.pool.begin().await?;

        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM tools WHERE id = ?)")
            .bind(tool_id)
            .fetch_one(&mut *tx)
            .await?;
        if !exists {
            return Err(CatalogError::NotFound(tool_id));
        }

        ensure_user(&mut *tx, user_id).await?;
        sqlx::query("INSERT INTO favourites (user_id, tool_id) VALUES (?, ?) ON CONFLICT DO NOTHING")
            .bind(user_id)
            .bind(tool_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(())
    }

    /// Returns whether a favourite was removed.
    pub async fn remove_favourite(&self, user_id: &str, tool_id: i64) -> CatalogResult<bool> {
        let result = sqlx::query("DELETE FROM favourites WHERE user_id = ? AND tool_id = ?")
            .bind(user_id)
            .bind(tool_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Enabled favourite tools of a user.
    pub async fn favourites_for_user(&self, user_id: &str) -> CatalogResult<Vec<ToolRecord>> {
        let sql = format!(
            "SELECT {TOOL_COLUMNS} FROM tools \
             JOIN favourites ON favourites.tool_id = tools.id \
             WHERE favourites.user_id = ? AND enabled = 1 \
             ORDER BY category, name"
        );
        Ok(sqlx::query_as::<_, ToolRecord>(&sql).bind(user_id).fetch_all(&self.pool).await?)
    }

    pub async fn is_favourite(&self, user_id: &str, tool_id: i64) -> CatalogResult<bool> {
        Ok(sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM favourites WHERE user_id = ? AND tool_id = ?)",
        )
        .bind(user_id)
        .bind(tool_id)
        .fetch_one(&self.pool)
        .await?)
    }
}
