//! Catalog domain module.
//!
//! Tool records hold the metadata administrators manage (enabled and
//! premium flags, category, owning plugin file) apart from the loaded tool
//! code. Users carry premium grants and requests; favourites link the two.
//! Everything is stored in SQLite through `sqlx`.

mod db;
mod error;
pub mod model;
mod service;
mod users;

pub use error::{CatalogError, CatalogResult};
pub use model::{ToolRecord, UserRecord};
pub use service::ToolCatalog;
