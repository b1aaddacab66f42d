//! Product Model

use serde::{Deserialize, Serialize};

/// Product entity
///
/// `images` is stored as a JSON array of URLs in a TEXT column and exposed
/// here as raw JSON text; API handlers re-parse it before responding.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Product {
    pub id: i64,
    pub title: String,
    pub slug: String,
    /// HTML product description from the upstream catalog
    pub description: Option<String>,
    /// JSON array of image URLs
    pub images: String,
    pub vendor_id: Option<i64>,
    pub category_id: Option<i64>,
    /// Upstream catalog identifier, unique per store
    pub external_id: i64,
    pub is_published: bool,
    pub created_at: String,
    pub updated_at: String,
}

/// Fields written when creating or updating a product during a sync run
#[derive(Debug, Clone, PartialEq)]
pub struct ProductWrite {
    pub title: String,
    pub slug: String,
    pub description: Option<String>,
    /// JSON array of image URLs
    pub images: String,
    pub vendor_id: Option<i64>,
    pub category_id: Option<i64>,
    pub external_id: i64,
    pub is_published: bool,
}
