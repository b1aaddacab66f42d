//! Upstream catalog feed DTOs
//!
//! Typed, validated schema for the external catalog feed. The feed is
//! deserialized into these structs at the boundary and validated before any
//! reconciliation runs; a payload that fails validation aborts the sync.
//!
//! Price fields arrive as decimal strings (`"19.99"`). [`CatalogVariant::pricing`]
//! resolves them into a `(discounted_price, price)` pair.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// One page of the upstream catalog feed
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CatalogPage {
    #[validate(nested)]
    pub products: Vec<CatalogProduct>,
}

/// A product as published by the upstream catalog
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CatalogProduct {
    pub id: i64,
    #[validate(length(min = 1, message = "product title must not be empty"))]
    pub title: String,
    #[serde(default)]
    pub handle: String,
    #[serde(default)]
    pub body_html: Option<String>,
    #[serde(default)]
    pub vendor: Option<String>,
    #[serde(default)]
    pub product_type: Option<String>,
    /// Comma-separated tag list
    #[serde(default)]
    pub tags: String,
    #[serde(default)]
    pub options: Vec<CatalogOption>,
    #[validate(
        length(min = 1, message = "product must have at least one variant"),
        nested
    )]
    pub variants: Vec<CatalogVariant>,
    #[serde(default)]
    pub images: Vec<CatalogImage>,
    #[serde(default)]
    pub published_at: Option<String>,
    #[serde(default = "default_true")]
    pub available: bool,
}

/// A variant as published by the upstream catalog
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CatalogVariant {
    pub id: i64,
    #[validate(length(min = 1, message = "variant title must not be empty"))]
    pub title: String,
    /// First option value (e.g. size)
    #[serde(default)]
    pub option1: Option<String>,
    /// Second option value (e.g. color)
    #[serde(default)]
    pub option2: Option<String>,
    #[serde(default)]
    pub sku: Option<String>,
    /// Selling price as a decimal string; feeds may omit it entirely
    #[serde(default)]
    pub price: String,
    /// Original price as a decimal string, when discounted
    #[serde(default)]
    pub compare_at_price: Option<String>,
    #[serde(default)]
    pub inventory_quantity: i64,
    /// Weight in grams
    #[serde(default)]
    pub grams: i64,
    #[serde(default = "default_true")]
    pub requires_shipping: bool,
    #[serde(default = "default_true")]
    pub taxable: bool,
    #[serde(default)]
    pub position: i64,
    #[serde(default)]
    pub images: Vec<CatalogImage>,
    #[serde(default = "default_true")]
    pub available: bool,
}

/// A named option axis (e.g. "Size" with values ["S", "M", "L"])
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogOption {
    pub name: String,
    #[serde(default)]
    pub position: i64,
    #[serde(default)]
    pub values: Vec<String>,
}

/// A product image reference
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogImage {
    pub src: String,
    #[serde(default)]
    pub position: i64,
}

fn default_true() -> bool {
    true
}

impl CatalogProduct {
    /// Split the comma-separated tag field into trimmed, non-empty names
    pub fn tag_names(&self) -> Vec<&str> {
        self.tags
            .split(',')
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .collect()
    }

    /// Whether this product uses two option axes (parent/child variant layout)
    pub fn is_two_level(&self) -> bool {
        self.options.len() >= 2
    }

    /// Whether the feed marks this product as published
    ///
    /// A publish timestamp, when present, is authoritative; feeds that omit
    /// it fall back to the `available` flag.
    pub fn is_published(&self) -> bool {
        match self.published_at.as_deref() {
            Some(ts) => !ts.trim().is_empty(),
            None => self.available,
        }
    }

    /// Image URLs in feed order
    pub fn image_urls(&self) -> Vec<&str> {
        self.images.iter().map(|i| i.src.as_str()).collect()
    }
}

impl CatalogVariant {
    /// Resolve the price strings into `(discounted_price, price)`
    ///
    /// `price` is the selling price; `compare_at_price` is the pre-discount
    /// original. An unparsable selling price resolves to 0.0; a missing or
    /// unparsable compare-at price falls back to the selling price.
    pub fn pricing(&self) -> (f64, f64) {
        let discounted = parse_money(&self.price).unwrap_or(0.0);
        let original = self
            .compare_at_price
            .as_deref()
            .and_then(parse_money)
            .unwrap_or(discounted);
        (discounted, original)
    }

    /// SKU with whitespace-only values treated as absent
    pub fn sku_normalized(&self) -> Option<&str> {
        self.sku.as_deref().map(str::trim).filter(|s| !s.is_empty())
    }
}

/// Parse a decimal money string, tolerating surrounding whitespace
pub fn parse_money(raw: &str) -> Option<f64> {
    let value: f64 = raw.trim().parse().ok()?;
    if value.is_finite() { Some(value) } else { None }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn variant(price: &str, compare_at: Option<&str>) -> CatalogVariant {
        CatalogVariant {
            id: 1,
            title: "Default".to_string(),
            option1: None,
            option2: None,
            sku: None,
            price: price.to_string(),
            compare_at_price: compare_at.map(String::from),
            inventory_quantity: 0,
            grams: 0,
            requires_shipping: true,
            taxable: true,
            position: 0,
            images: vec![],
            available: true,
        }
    }

    #[test]
    fn test_pricing_with_compare_at() {
        let (discounted, original) = variant("19.99", Some("29.99")).pricing();
        assert_eq!(discounted, 19.99);
        assert_eq!(original, 29.99);
    }

    #[test]
    fn test_pricing_without_compare_at() {
        let (discounted, original) = variant("19.99", None).pricing();
        assert_eq!(discounted, 19.99);
        assert_eq!(original, 19.99);
    }

    #[test]
    fn test_pricing_unparsable() {
        let (discounted, original) = variant("free", None).pricing();
        assert_eq!(discounted, 0.0);
        assert_eq!(original, 0.0);

        let (discounted, original) = variant("9.50", Some("n/a")).pricing();
        assert_eq!(discounted, 9.5);
        assert_eq!(original, 9.5);
    }

    #[test]
    fn test_sku_normalized() {
        let mut v = variant("1.00", None);
        assert_eq!(v.sku_normalized(), None);
        v.sku = Some("   ".to_string());
        assert_eq!(v.sku_normalized(), None);
        v.sku = Some(" ABC-1 ".to_string());
        assert_eq!(v.sku_normalized(), Some("ABC-1"));
    }

    #[test]
    fn test_tag_names() {
        let product = CatalogProduct {
            id: 1,
            title: "Tea".to_string(),
            handle: "tea".to_string(),
            body_html: None,
            vendor: None,
            product_type: None,
            tags: "organic, Fair Trade , ,new".to_string(),
            options: vec![],
            variants: vec![variant("1.00", None)],
            images: vec![],
            published_at: None,
            available: true,
        };
        assert_eq!(product.tag_names(), vec!["organic", "Fair Trade", "new"]);
    }

    #[test]
    fn test_validation_rejects_empty_title() {
        let page: CatalogPage = serde_json::from_str(
            r#"{"products":[{"id":1,"title":"","variants":[{"id":10,"title":"Default","price":"5.00"}]}]}"#,
        )
        .unwrap();
        assert!(page.validate().is_err());
    }

    #[test]
    fn test_validation_rejects_no_variants() {
        let page: CatalogPage = serde_json::from_str(
            r#"{"products":[{"id":1,"title":"Tea","variants":[]}]}"#,
        )
        .unwrap();
        assert!(page.validate().is_err());
    }

    #[test]
    fn test_deserialize_defaults() {
        let product: CatalogProduct = serde_json::from_str(
            r#"{"id":7,"title":"Mug","variants":[{"id":70,"title":"Default","price":"12.00"}]}"#,
        )
        .unwrap();
        assert!(product.available);
        assert!(product.variants[0].available);
        assert_eq!(product.variants[0].inventory_quantity, 0);
        assert!(!product.is_two_level());
    }

    #[test]
    fn test_deserialize_missing_price_resolves_to_zero() {
        let product: CatalogProduct = serde_json::from_str(
            r#"{"id":7,"title":"Mug","variants":[{"id":70,"title":"Default"}]}"#,
        )
        .unwrap();
        assert_eq!(product.variants[0].price, "");
        assert_eq!(product.variants[0].pricing(), (0.0, 0.0));
    }

    #[test]
    fn test_publish_timestamp_overrides_available_flag() {
        let mut product: CatalogProduct = serde_json::from_str(
            r#"{"id":7,"title":"Mug","variants":[{"id":70,"title":"Default","price":"12.00"}]}"#,
        )
        .unwrap();
        assert!(product.is_published());

        product.available = false;
        assert!(!product.is_published());

        product.published_at = Some("2024-05-01T09:00:00-04:00".to_string());
        assert!(product.is_published());

        product.published_at = Some("  ".to_string());
        assert!(!product.is_published());
    }
}
