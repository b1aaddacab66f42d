//! Unified error codes for the Mumbies platform
//!
//! Error codes are organized by category:
//! - 0xxx: General errors
//! - 1xxx: Authentication errors
//! - 2xxx: Permission errors
//! - 6xxx: Catalog errors
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// All error codes are represented as u16 values for efficient serialization
/// and cross-language compatibility (Rust, TypeScript, etc.)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Operation completed successfully
    Success = 0,
    /// Unknown error
    Unknown = 1,
    /// Validation failed
    ValidationFailed = 2,
    /// Resource not found
    NotFound = 3,
    /// Resource already exists
    AlreadyExists = 4,
    /// Invalid request
    InvalidRequest = 5,
    /// Invalid format
    InvalidFormat = 6,

    // ==================== 1xxx: Auth ====================
    /// User is not authenticated
    NotAuthenticated = 1001,
    /// Invalid credentials (username/password)
    InvalidCredentials = 1002,
    /// Token has expired
    TokenExpired = 1003,
    /// Token is invalid
    TokenInvalid = 1004,

    // ==================== 2xxx: Permission ====================
    /// Permission denied
    PermissionDenied = 2001,
    /// Administrator role required
    AdminRequired = 2003,

    // ==================== 6xxx: Catalog ====================
    /// Product not found
    ProductNotFound = 6001,
    /// Product variant not found
    VariantNotFound = 6002,
    /// Vendor not found
    VendorNotFound = 6101,
    /// Category not found
    CategoryNotFound = 6102,
    /// Tag not found
    TagNotFound = 6103,

    // ==================== 64xx: Catalog Sync ====================
    /// Catalog feed URL or access token not configured
    FeedNotConfigured = 6401,
    /// Catalog feed returned a non-success status
    FeedUnavailable = 6402,
    /// Catalog feed payload failed validation
    FeedMalformed = 6403,
    /// Catalog sync aborted mid-run
    SyncFailed = 6404,

    // ==================== 9xxx: System ====================
    /// Internal server error
    InternalError = 9001,
    /// Database error
    DatabaseError = 9002,
    /// Network error
    NetworkError = 9003,
    /// Operation timeout
    TimeoutError = 9004,
    /// Configuration error
    ConfigError = 9005,
}

impl ErrorCode {
    /// Get the numeric code value
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    /// Check if this is a success code
    #[inline]
    pub const fn is_success(&self) -> bool {
        matches!(self, ErrorCode::Success)
    }

    /// Get the developer-facing English message for this error code
    pub const fn message(&self) -> &'static str {
        match self {
            // General
            ErrorCode::Success => "Operation completed successfully",
            ErrorCode::Unknown => "An unknown error occurred",
            ErrorCode::ValidationFailed => "Validation failed",
            ErrorCode::NotFound => "Resource not found",
            ErrorCode::AlreadyExists => "Resource already exists",
            ErrorCode::InvalidRequest => "Invalid request",
            ErrorCode::InvalidFormat => "Invalid format",

            // Auth
            ErrorCode::NotAuthenticated => "User is not authenticated",
            ErrorCode::InvalidCredentials => "Invalid username or password",
            ErrorCode::TokenExpired => "Authentication token has expired",
            ErrorCode::TokenInvalid => "Authentication token is invalid",

            // Permission
            ErrorCode::PermissionDenied => "Permission denied",
            ErrorCode::AdminRequired => "Administrator role is required",

            // Catalog
            ErrorCode::ProductNotFound => "Product not found",
            ErrorCode::VariantNotFound => "Product variant not found",
            ErrorCode::VendorNotFound => "Vendor not found",
            ErrorCode::CategoryNotFound => "Category not found",
            ErrorCode::TagNotFound => "Tag not found",

            // Catalog sync
            ErrorCode::FeedNotConfigured => "Catalog feed is not configured",
            ErrorCode::FeedUnavailable => "Catalog feed is unavailable",
            ErrorCode::FeedMalformed => "Catalog feed payload is malformed",
            ErrorCode::SyncFailed => "Catalog sync failed",

            // System
            ErrorCode::InternalError => "Internal server error",
            ErrorCode::DatabaseError => "Database error",
            ErrorCode::NetworkError => "Network error",
            ErrorCode::TimeoutError => "Operation timed out",
            ErrorCode::ConfigError => "Configuration error",
        }
    }

    /// Get the HTTP status code for this error code
    pub fn http_status(&self) -> http::StatusCode {
        use http::StatusCode;
        match self {
            ErrorCode::Success => StatusCode::OK,

            ErrorCode::ValidationFailed
            | ErrorCode::InvalidRequest
            | ErrorCode::InvalidFormat
            | ErrorCode::InvalidCredentials
            | ErrorCode::FeedNotConfigured => StatusCode::BAD_REQUEST,

            ErrorCode::NotAuthenticated | ErrorCode::TokenExpired | ErrorCode::TokenInvalid => {
                StatusCode::UNAUTHORIZED
            }

            ErrorCode::PermissionDenied | ErrorCode::AdminRequired => StatusCode::FORBIDDEN,

            ErrorCode::NotFound
            | ErrorCode::ProductNotFound
            | ErrorCode::VariantNotFound
            | ErrorCode::VendorNotFound
            | ErrorCode::CategoryNotFound
            | ErrorCode::TagNotFound => StatusCode::NOT_FOUND,

            ErrorCode::AlreadyExists => StatusCode::CONFLICT,

            ErrorCode::Unknown
            | ErrorCode::FeedUnavailable
            | ErrorCode::FeedMalformed
            | ErrorCode::SyncFailed
            | ErrorCode::InternalError
            | ErrorCode::DatabaseError
            | ErrorCode::NetworkError
            | ErrorCode::TimeoutError
            | ErrorCode::ConfigError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "E{:04}", self.code())
    }
}

impl From<ErrorCode> for u16 {
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// Error returned when converting an unknown u16 into an [`ErrorCode`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        let code = match value {
            0 => ErrorCode::Success,
            1 => ErrorCode::Unknown,
            2 => ErrorCode::ValidationFailed,
            3 => ErrorCode::NotFound,
            4 => ErrorCode::AlreadyExists,
            5 => ErrorCode::InvalidRequest,
            6 => ErrorCode::InvalidFormat,

            1001 => ErrorCode::NotAuthenticated,
            1002 => ErrorCode::InvalidCredentials,
            1003 => ErrorCode::TokenExpired,
            1004 => ErrorCode::TokenInvalid,

            2001 => ErrorCode::PermissionDenied,
            2003 => ErrorCode::AdminRequired,

            6001 => ErrorCode::ProductNotFound,
            6002 => ErrorCode::VariantNotFound,
            6101 => ErrorCode::VendorNotFound,
            6102 => ErrorCode::CategoryNotFound,
            6103 => ErrorCode::TagNotFound,

            6401 => ErrorCode::FeedNotConfigured,
            6402 => ErrorCode::FeedUnavailable,
            6403 => ErrorCode::FeedMalformed,
            6404 => ErrorCode::SyncFailed,

            9001 => ErrorCode::InternalError,
            9002 => ErrorCode::DatabaseError,
            9003 => ErrorCode::NetworkError,
            9004 => ErrorCode::TimeoutError,
            9005 => ErrorCode::ConfigError,

            other => return Err(InvalidErrorCode(other)),
        };
        Ok(code)
    }
}
