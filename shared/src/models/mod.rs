//! Data models
//!
//! Persisted catalog entities shared between the server and API consumers.
//! DB row types use `#[cfg_attr(feature = "db", derive(sqlx::FromRow))]`.
//! All IDs are `i64` (SQLite INTEGER PRIMARY KEY).

pub mod product;
pub mod taxonomy;
pub mod variant;

// Re-exports
pub use product::*;
pub use taxonomy::*;
pub use variant::*;
