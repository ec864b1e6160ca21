//! Catalog-specific error types.

use thiserror::Error;

/// Result type for catalog operations.
pub type CatalogResult<T> = Result<T, CatalogError>;

/// Errors that can occur while reading or changing catalog rows.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// No tool record with this id.
    #[error("Tool record not found: {0}")]
    NotFound(i64),

    /// No user with this id.
    #[error("User not found: {0}")]
    UserNotFound(String),

    /// Premium was requested by a user who already has it.
    #[error("User {0} is already premium")]
    AlreadyPremium(String),

    /// The database rejected a query or could not be opened.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}
