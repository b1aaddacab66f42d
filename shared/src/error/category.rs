//! Error category classification

use super::ErrorCode;
use serde::{Deserialize, Serialize};

/// High-level classification of an error, derived from its code range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// 0xxx: general errors
    General,
    /// 1xxx: authentication errors
    Auth,
    /// 2xxx: permission errors
    Permission,
    /// 6xxx: catalog errors
    Catalog,
    /// 9xxx: system errors
    System,
}

impl ErrorCategory {
    /// Derive the category from a numeric error code
    pub const fn from_code(code: u16) -> Self {
        match code {
            0..=999 => ErrorCategory::General,
            1000..=1999 => ErrorCategory::Auth,
            2000..=2999 => ErrorCategory::Permission,
            6000..=6999 => ErrorCategory::Catalog,
            _ => ErrorCategory::System,
        }
    }

    /// Human-readable category name
    pub const fn name(&self) -> &'static str {
        match self {
            ErrorCategory::General => "general",
            ErrorCategory::Auth => "auth",
            ErrorCategory::Permission => "permission",
            ErrorCategory::Catalog => "catalog",
            ErrorCategory::System => "system",
        }
    }
}

impl ErrorCode {
    /// Get the category for this error code
    pub const fn category(&self) -> ErrorCategory {
        ErrorCategory::from_code(self.code())
    }
}
