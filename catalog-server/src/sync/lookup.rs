//! Sync lookup cache
//!
//! Name→id maps for vendors, categories and tags (matched case-insensitively)
//! plus external_id→product-id for existing products. Loaded once per run
//! before any chunk is processed; rows created during the run are recorded
//! back into the cache so later chunks see them.

use crate::db::repository::{RepoResult, lookup, product};
use sqlx::SqlitePool;
use std::collections::HashMap;

#[derive(Debug, Default)]
pub struct LookupCache {
    vendors: HashMap<String, i64>,
    categories: HashMap<String, i64>,
    tags: HashMap<String, i64>,
    /// external_id → local product id
    products: HashMap<i64, i64>,
}

impl LookupCache {
    /// Load all lookup maps from the store. Failure here aborts the sync.
    pub async fn load(pool: &SqlitePool) -> RepoResult<Self> {
        let mut cache = Self::default();

        for v in lookup::find_all_vendors(pool).await? {
            cache.vendors.insert(v.name.to_lowercase(), v.id);
        }
        for c in lookup::find_all_categories(pool).await? {
            cache.categories.insert(c.name.to_lowercase(), c.id);
        }
        for t in lookup::find_all_tags(pool).await? {
            cache.tags.insert(t.name.to_lowercase(), t.id);
        }
        for p in product::find_all_by_external_id(pool).await? {
            cache.products.insert(p.external_id, p.id);
        }

        tracing::debug!(
            vendors = cache.vendors.len(),
            categories = cache.categories.len(),
            tags = cache.tags.len(),
            products = cache.products.len(),
            "Sync lookup cache loaded"
        );
        Ok(cache)
    }

    pub fn vendor_id(&self, name: &str) -> Option<i64> {
        self.vendors.get(&name.to_lowercase()).copied()
    }

    pub fn category_id(&self, name: &str) -> Option<i64> {
        self.categories.get(&name.to_lowercase()).copied()
    }

    pub fn tag_id(&self, name: &str) -> Option<i64> {
        self.tags.get(&name.to_lowercase()).copied()
    }

    pub fn product_id(&self, external_id: i64) -> Option<i64> {
        self.products.get(&external_id).copied()
    }

    pub fn add_vendor(&mut self, name: &str, id: i64) {
        self.vendors.insert(name.to_lowercase(), id);
    }

    pub fn add_category(&mut self, name: &str, id: i64) {
        self.categories.insert(name.to_lowercase(), id);
    }

    pub fn add_tag(&mut self, name: &str, id: i64) {
        self.tags.insert(name.to_lowercase(), id);
    }

    pub fn add_product(&mut self, external_id: i64, id: i64) {
        self.products.insert(external_id, id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_case_insensitive_lookup() {
        let mut cache = LookupCache::default();
        cache.add_vendor("Acme Teas", 1);
        cache.add_tag("Organic", 7);

        assert_eq!(cache.vendor_id("acme teas"), Some(1));
        assert_eq!(cache.vendor_id("ACME TEAS"), Some(1));
        assert_eq!(cache.vendor_id("Other"), None);
        assert_eq!(cache.tag_id("ORGANIC"), Some(7));
    }

    #[test]
    fn test_product_lookup() {
        let mut cache = LookupCache::default();
        cache.add_product(9001, 42);
        assert_eq!(cache.product_id(9001), Some(42));
        assert_eq!(cache.product_id(9002), None);
    }
}
