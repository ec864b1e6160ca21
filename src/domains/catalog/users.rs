//! Users and premium requests.
//!
//! Identity comes from the auth layer; a row is created the first time a
//! user id shows up and only carries what this server decides about it.

use chrono::Utc;
use sqlx::SqliteExecutor;
use tracing::{info, instrument};

use super::error::{CatalogError, CatalogResult};
use super::model::UserRecord;
use super::service::ToolCatalog;

const USER_COLUMNS: &str = "id, premium, request_premium, first_seen, last_seen";

/// Insert the user if unknown and bump its last-seen time.
pub(super) async fn ensure_user<'e, E>(executor: E, id: &str) -> CatalogResult<UserRecord>
where
    E: SqliteExecutor<'e>,
{
    let now = Utc::now();
    let sql = format!(
        "INSERT INTO users (id, first_seen, last_seen) VALUES (?, ?, ?) \
         ON CONFLICT(id) DO UPDATE SET last_seen = excluded.last_seen \
         RETURNING {USER_COLUMNS}"
    );
    Ok(sqlx::query_as::<_, UserRecord>(&sql)
        .bind(id)
        .bind(now)
        .bind(now)
        .fetch_one(executor)
        .await?)
}

impl ToolCatalog {
    /// Record a request from `id`, returning what is stored about it.
    pub async fn touch_user(&self, id: &str) -> CatalogResult<UserRecord> {
        ensure_user(&self.pool, id).await
    }

    /// Every known user, by id.
    pub async fn users(&self) -> CatalogResult<Vec<UserRecord>> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users ORDER BY id");
        Ok(sqlx::query_as::<_, UserRecord>(&sql)
            .fetch_all(&self.pool)
            .await?)
    }

    /// Users waiting for an answer to their premium request.
    pub async fn premium_requests(&self) -> CatalogResult<Vec<UserRecord>> {
        let sql = format!(
            "SELECT {USER_COLUMNS} FROM users WHERE request_premium = 1 ORDER BY first_seen, id"
        );
        Ok(sqlx::query_as::<_, UserRecord>(&sql)
            .fetch_all(&self.pool)
            .await?)
    }

    /// Ask an administrator for premium.
    #[instrument(skip(self))]
    pub async fn request_premium(&self, id: &str) -> CatalogResult<UserRecord> {
        let now = Utc::now();
        let sql = format!(
            "INSERT INTO users (id, request_premium, first_seen, last_seen) VALUES (?, 1, ?, ?) \
             ON CONFLICT(id) DO UPDATE SET request_premium = 1, last_seen = excluded.last_seen \
             WHERE users.premium = 0 \
             RETURNING {USER_COLUMNS}"
        );
        let user = sqlx::query_as::<_, UserRecord>(&sql)
            .bind(id)
            .bind(now)
            .bind(now)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| CatalogError::AlreadyPremium(id.to_string()))?;

        info!("User {} requested premium", id);
        Ok(user)
    }

    /// Grant or revoke premium. Granting answers a pending request.
    #[instrument(skip(self))]
    pub async fn toggle_user_premium(&self, id: &str) -> CatalogResult<UserRecord> {
        let user = self
            .update_user(
                "UPDATE users SET premium = NOT premium, \
                 request_premium = CASE WHEN premium = 0 THEN 0 ELSE request_premium END \
                 WHERE id = ?",
                id,
            )
            .await?;

        info!("User {} premium: {}", user.id, user.premium);
        Ok(user)
    }

    /// Turn a premium request down without granting anything.
    #[instrument(skip(self))]
    pub async fn deny_premium_request(&self, id: &str) -> CatalogResult<UserRecord> {
        self.update_user("UPDATE users SET request_premium = 0 WHERE id = ?", id)
            .await
    }

    /// Forget a user. Their favourites go with them.
    #[instrument(skip(self))]
    pub async fn delete_user(&self, id: &str) -> CatalogResult<UserRecord> {
        let user = self.update_user("DELETE FROM users WHERE id = ?", id).await?;
        info!("Deleted user {}", user.id);
        Ok(user)
    }

    async fn update_user(&self, statement: &str, id: &str) -> CatalogResult<UserRecord> {
        let sql = format!("{statement} RETURNING {USER_COLUMNS}");
        sqlx::query_as::<_, UserRecord>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| CatalogError::UserNotFound(id.to_string()))
    }
}
