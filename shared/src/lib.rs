//! Shared types for the Mumbies platform
//!
//! Common types used across the platform crates: persisted catalog models,
//! external catalog feed DTOs, error types, and response structures.

pub mod catalog;
pub mod error;
pub mod models;
pub mod util;

// Re-exports
pub use serde::{Deserialize, Serialize};
