//! Domains module containing business logic organized by bounded contexts.
//!
//! - **tools**: the tool capability and every built-in tool
//! - **plugins**: loading and unloading plugin manifests
//! - **catalog**: persisted tool records and favourites
//! - **access**: premium gating on the caller's session

pub mod access;
pub mod catalog;
pub mod plugins;
pub mod tools;
