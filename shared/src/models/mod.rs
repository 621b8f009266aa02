//! Data models
//!
//! Shared between agri-server and frontend (via API).
//! DB row types use `#[cfg_attr(feature = "db", derive(sqlx::FromRow))]`.
//! All IDs are `i64` (SQLite INTEGER PRIMARY KEY).

pub mod category;
pub mod product;
pub mod role;
pub mod user;

// Re-exports
pub use category::*;
pub use product::*;
pub use role::*;
pub use user::*;
