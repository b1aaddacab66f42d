//! Product Variant Model

use serde::{Deserialize, Serialize};

/// Product variant entity
///
/// Variants form at most a two-level hierarchy: a parent variant groups
/// children by first option value, children carry the second option value.
/// Flat (single-option) products have standalone variants with no parent.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct ProductVariant {
    pub id: i64,
    pub product_id: i64,
    /// Grouping parent; NULL for flat variants and for parents themselves
    pub parent_variant_id: Option<i64>,
    pub title: String,
    pub sku: Option<String>,
    /// Upstream catalog identifier for this variant
    pub external_id: Option<i64>,
    /// Selling price
    pub discounted_price: f64,
    /// Original (compare-at) price
    pub price: f64,
    pub quantity: i64,
    /// Weight in grams
    pub weight: f64,
    pub requires_shipping: bool,
    pub taxable: bool,
    /// Ordering within the product, from the upstream feed
    pub position: i64,
    /// JSON array of image URLs
    pub images: String,
    pub is_available: bool,
    /// Commission rate, operator-managed; never overwritten by sync
    pub referral_percentage: f64,
    pub created_at: String,
    pub updated_at: String,
}

/// Fields written when creating or updating a variant during a sync run
#[derive(Debug, Clone, PartialEq)]
pub struct VariantWrite {
    pub title: String,
    pub sku: Option<String>,
    pub external_id: Option<i64>,
    pub discounted_price: f64,
    pub price: f64,
    pub quantity: i64,
    pub weight: f64,
    pub requires_shipping: bool,
    pub taxable: bool,
    pub position: i64,
    /// JSON array of image URLs
    pub images: String,
    pub is_available: bool,
}
