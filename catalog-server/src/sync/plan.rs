//! Per-product reconciliation planner
//!
//! Pure decision logic: given the lookup cache, the product's existing
//! variants and the incoming feed product, produce a [`ProductPlan`] that the
//! apply step executes inside the chunk transaction. No I/O happens here.
//!
//! Matching rules:
//! - SKU match takes priority over external-id match (SKU is merchant-owned;
//!   external ids can be reissued by the source on re-export).
//! - Two-option products group variants by first option value. Groups of one
//!   collapse to flat standalone rows; groups of two or more get a parent row
//!   (title = option value, no SKU, zero price) with the members as children.
//! - Existing variants not claimed by any incoming variant are deleted,
//!   parents included once their group disappears.

use super::lookup::LookupCache;
use shared::catalog::{CatalogProduct, CatalogVariant};
use shared::models::{ProductVariant, VariantWrite};
use shared::util::slugify;
use std::collections::{HashMap, HashSet};

/// Reference to a taxonomy row that may not exist yet
#[derive(Debug, Clone, PartialEq)]
pub enum TaxonomyRef {
    Existing(i64),
    /// Row must be created (name as it appeared in the feed)
    Create(String),
}

/// Whether the product row itself is created or updated
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProductTarget {
    Create,
    Update(i64),
}

/// Product fields to persist, with taxonomy still unresolved
#[derive(Debug, Clone, PartialEq)]
pub struct ProductDraft {
    pub title: String,
    pub slug: String,
    pub description: Option<String>,
    /// JSON array of image URLs
    pub images: String,
    pub external_id: i64,
    pub is_published: bool,
    pub vendor: Option<TaxonomyRef>,
    pub category: Option<TaxonomyRef>,
}

/// A single variant write decision
#[derive(Debug, Clone, PartialEq)]
pub enum SlotOp {
    Create(VariantWrite),
    Update { id: i64, write: VariantWrite },
}

impl SlotOp {
    pub fn write(&self) -> &VariantWrite {
        match self {
            SlotOp::Create(w) => w,
            SlotOp::Update { write, .. } => write,
        }
    }
}

/// A parent row with its children (two-option groups of size >= 2)
#[derive(Debug, Clone, PartialEq)]
pub struct GroupPlan {
    pub parent: SlotOp,
    pub children: Vec<SlotOp>,
}

/// Complete reconciliation plan for one product
#[derive(Debug, Clone, PartialEq)]
pub struct ProductPlan {
    pub target: ProductTarget,
    pub draft: ProductDraft,
    pub tags: Vec<TaxonomyRef>,
    /// Standalone variants (no parent)
    pub flat: Vec<SlotOp>,
    pub groups: Vec<GroupPlan>,
    /// Existing variants untouched by this run, to delete
    pub delete_ids: Vec<i64>,
}

impl ProductPlan {
    pub fn is_create(&self) -> bool {
        matches!(self.target, ProductTarget::Create)
    }
}

/// Build the reconciliation plan for one incoming product
pub fn plan_product(
    cache: &LookupCache,
    existing: &[ProductVariant],
    incoming: &CatalogProduct,
) -> ProductPlan {
    let target = match cache.product_id(incoming.id) {
        Some(id) => ProductTarget::Update(id),
        None => ProductTarget::Create,
    };

    let vendor = nonempty(incoming.vendor.as_deref())
        .map(|name| taxonomy_ref(cache.vendor_id(name), name));
    let category = nonempty(incoming.product_type.as_deref())
        .map(|name| taxonomy_ref(cache.category_id(name), name));

    let mut tags = Vec::new();
    let mut seen_tags = HashSet::new();
    for name in incoming.tag_names() {
        if seen_tags.insert(name.to_lowercase()) {
            tags.push(taxonomy_ref(cache.tag_id(name), name));
        }
    }

    let draft = ProductDraft {
        title: incoming.title.clone(),
        slug: slugify(&incoming.title),
        description: incoming.body_html.clone(),
        images: serde_json::to_string(&incoming.image_urls()).unwrap_or_else(|_| "[]".into()),
        external_id: incoming.id,
        is_published: incoming.is_published(),
        vendor,
        category,
    };

    let mut matcher = VariantMatcher::new(existing);
    let mut flat = Vec::new();
    let mut groups = Vec::new();

    if incoming.is_two_level() {
        for (label, members) in group_by_option1(&incoming.variants) {
            if members.len() == 1 {
                // Single-member group degrades to a flat standalone variant
                let v = members[0];
                flat.push(slot_op(&mut matcher, v, v.title.clone()));
            } else {
                let parent = match matcher.claim_parent(&label) {
                    Some(id) => SlotOp::Update {
                        id,
                        write: parent_write(&label),
                    },
                    None => SlotOp::Create(parent_write(&label)),
                };
                let children = members
                    .iter()
                    .map(|v| {
                        let title = nonempty(v.option2.as_deref())
                            .map(str::to_string)
                            .unwrap_or_else(|| v.title.clone());
                        slot_op(&mut matcher, v, title)
                    })
                    .collect();
                groups.push(GroupPlan { parent, children });
            }
        }
    } else {
        for v in &incoming.variants {
            flat.push(slot_op(&mut matcher, v, v.title.clone()));
        }
    }

    let delete_ids = matcher.unused_ids();

    ProductPlan {
        target,
        draft,
        tags,
        flat,
        groups,
        delete_ids,
    }
}

fn nonempty(s: Option<&str>) -> Option<&str> {
    s.map(str::trim).filter(|s| !s.is_empty())
}

fn taxonomy_ref(existing: Option<i64>, name: &str) -> TaxonomyRef {
    match existing {
        Some(id) => TaxonomyRef::Existing(id),
        None => TaxonomyRef::Create(name.to_string()),
    }
}

fn variant_write(v: &CatalogVariant, title: String) -> VariantWrite {
    let (discounted_price, price) = v.pricing();
    let image_urls: Vec<&str> = v.images.iter().map(|i| i.src.as_str()).collect();
    VariantWrite {
        title,
        sku: v.sku_normalized().map(str::to_string),
        external_id: Some(v.id),
        discounted_price,
        price,
        quantity: v.inventory_quantity,
        weight: v.grams as f64,
        requires_shipping: v.requires_shipping,
        taxable: v.taxable,
        position: v.position,
        images: serde_json::to_string(&image_urls).unwrap_or_else(|_| "[]".into()),
        is_available: v.available,
    }
}

fn parent_write(title: &str) -> VariantWrite {
    VariantWrite {
        title: title.to_string(),
        sku: None,
        external_id: None,
        discounted_price: 0.0,
        price: 0.0,
        quantity: 0,
        weight: 0.0,
        requires_shipping: true,
        taxable: true,
        position: 0,
        images: "[]".to_string(),
        is_available: true,
    }
}

fn slot_op(matcher: &mut VariantMatcher<'_>, v: &CatalogVariant, title: String) -> SlotOp {
    let write = variant_write(v, title);
    match matcher.claim(v) {
        Some(id) => SlotOp::Update { id, write },
        None => SlotOp::Create(write),
    }
}

/// Group incoming variants by first option value (case-insensitive),
/// preserving feed order. Variants without an option1 fall back to title.
fn group_by_option1(variants: &[CatalogVariant]) -> Vec<(String, Vec<&CatalogVariant>)> {
    let mut order: Vec<String> = Vec::new();
    let mut map: HashMap<String, Vec<&CatalogVariant>> = HashMap::new();

    for v in variants {
        let label = nonempty(v.option1.as_deref()).unwrap_or(&v.title);
        let key = label.to_lowercase();
        if !map.contains_key(&key) {
            order.push(label.to_string());
        }
        map.entry(key).or_default().push(v);
    }

    order
        .into_iter()
        .map(|label| {
            let members = map.remove(&label.to_lowercase()).unwrap_or_default();
            (label, members)
        })
        .collect()
}

/// Tracks which existing variants have been claimed by incoming ones
struct VariantMatcher<'a> {
    existing: &'a [ProductVariant],
    by_sku: HashMap<&'a str, i64>,
    by_external: HashMap<i64, i64>,
    used: HashSet<i64>,
}

impl<'a> VariantMatcher<'a> {
    fn new(existing: &'a [ProductVariant]) -> Self {
        let mut by_sku = HashMap::new();
        let mut by_external = HashMap::new();
        for row in existing {
            if let Some(sku) = row.sku.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
                by_sku.entry(sku).or_insert(row.id);
            }
            if let Some(ext) = row.external_id {
                by_external.entry(ext).or_insert(row.id);
            }
        }
        Self {
            existing,
            by_sku,
            by_external,
            used: HashSet::new(),
        }
    }

    /// Claim an existing row for an incoming variant: SKU first, then external id
    fn claim(&mut self, v: &CatalogVariant) -> Option<i64> {
        if let Some(sku) = v.sku_normalized()
            && let Some(&id) = self.by_sku.get(sku)
            && self.used.insert(id)
        {
            return Some(id);
        }
        if let Some(&id) = self.by_external.get(&v.id)
            && self.used.insert(id)
        {
            return Some(id);
        }
        None
    }

    /// Claim an existing parent row by group label (no SKU, no parent, title match)
    fn claim_parent(&mut self, label: &str) -> Option<i64> {
        let id = self.existing.iter().find_map(|row| {
            (row.parent_variant_id.is_none()
                && row.sku.is_none()
                && row.external_id.is_none()
                && row.title.eq_ignore_ascii_case(label)
                && !self.used.contains(&row.id))
            .then_some(row.id)
        })?;
        self.used.insert(id);
        Some(id)
    }

    /// Existing variant ids not claimed by this run
    fn unused_ids(&self) -> Vec<i64> {
        self.existing
            .iter()
            .filter(|row| !self.used.contains(&row.id))
            .map(|row| row.id)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::catalog::CatalogOption;

    fn feed_variant(id: i64, title: &str, sku: Option<&str>, price: &str) -> CatalogVariant {
        CatalogVariant {
            id,
            title: title.to_string(),
            option1: None,
            option2: None,
            sku: sku.map(String::from),
            price: price.to_string(),
            compare_at_price: None,
            inventory_quantity: 10,
            grams: 0,
            requires_shipping: true,
            taxable: true,
            position: 0,
            images: vec![],
            available: true,
        }
    }

    fn feed_product(id: i64, title: &str, variants: Vec<CatalogVariant>) -> CatalogProduct {
        CatalogProduct {
            id,
            title: title.to_string(),
            handle: slugify(title),
            body_html: None,
            vendor: None,
            product_type: None,
            tags: String::new(),
            options: vec![],
            variants,
            images: vec![],
            published_at: None,
            available: true,
        }
    }

    fn two_options() -> Vec<CatalogOption> {
        vec![
            CatalogOption {
                name: "Size".to_string(),
                position: 1,
                values: vec![],
            },
            CatalogOption {
                name: "Pack".to_string(),
                position: 2,
                values: vec![],
            },
        ]
    }

    fn existing_variant(
        id: i64,
        title: &str,
        sku: Option<&str>,
        external_id: Option<i64>,
        parent: Option<i64>,
    ) -> ProductVariant {
        ProductVariant {
            id,
            product_id: 1,
            parent_variant_id: parent,
            title: title.to_string(),
            sku: sku.map(String::from),
            external_id,
            discounted_price: 5.0,
            price: 5.0,
            quantity: 1,
            weight: 0.0,
            requires_shipping: true,
            taxable: true,
            position: 0,
            images: "[]".to_string(),
            is_available: true,
            referral_percentage: 3.5,
            created_at: "2026-01-01T00:00:00Z".to_string(),
            updated_at: "2026-01-01T00:00:00Z".to_string(),
        }
    }

    #[test]
    fn test_new_product_plans_creates() {
        let cache = LookupCache::default();
        let incoming = feed_product(
            100,
            "Green Tea",
            vec![feed_variant(1000, "Default", Some("ABC"), "10.00")],
        );
        let plan = plan_product(&cache, &[], &incoming);

        assert!(plan.is_create());
        assert_eq!(plan.draft.slug, "green-tea");
        assert_eq!(plan.flat.len(), 1);
        assert!(plan.groups.is_empty());
        assert!(plan.delete_ids.is_empty());
        match &plan.flat[0] {
            SlotOp::Create(w) => {
                assert_eq!(w.sku.as_deref(), Some("ABC"));
                assert_eq!(w.discounted_price, 10.0);
                assert_eq!(w.price, 10.0);
            }
            other => panic!("expected create, got {other:?}"),
        }
    }

    #[test]
    fn test_publish_state_follows_feed_timestamp() {
        let cache = LookupCache::default();
        let mut incoming = feed_product(
            100,
            "Green Tea",
            vec![feed_variant(1000, "Default", Some("ABC"), "10.00")],
        );
        incoming.available = false;
        incoming.published_at = Some("2026-02-01T08:00:00Z".to_string());

        let plan = plan_product(&cache, &[], &incoming);
        assert!(plan.draft.is_published);

        incoming.published_at = None;
        let plan = plan_product(&cache, &[], &incoming);
        assert!(!plan.draft.is_published);
    }

    #[test]
    fn test_existing_product_matched_by_sku() {
        let mut cache = LookupCache::default();
        cache.add_product(100, 1);
        let existing = vec![existing_variant(50, "Default", Some("ABC"), Some(999), None)];
        // External id changed upstream, SKU did not: SKU wins
        let incoming = feed_product(
            100,
            "Green Tea",
            vec![feed_variant(1000, "Default", Some("ABC"), "12.00")],
        );
        let plan = plan_product(&cache, &existing, &incoming);

        assert_eq!(plan.target, ProductTarget::Update(1));
        assert_eq!(
            plan.flat,
            vec![SlotOp::Update {
                id: 50,
                write: VariantWrite {
                    title: "Default".to_string(),
                    sku: Some("ABC".to_string()),
                    external_id: Some(1000),
                    discounted_price: 12.0,
                    price: 12.0,
                    quantity: 10,
                    weight: 0.0,
                    requires_shipping: true,
                    taxable: true,
                    position: 0,
                    images: "[]".to_string(),
                    is_available: true,
                },
            }]
        );
        assert!(plan.delete_ids.is_empty());
    }

    #[test]
    fn test_sku_match_beats_external_id_match() {
        let mut cache = LookupCache::default();
        cache.add_product(100, 1);
        let existing = vec![
            existing_variant(50, "A", Some("SKU-1"), Some(2000), None),
            existing_variant(51, "B", None, Some(1000), None),
        ];
        // Incoming variant 1000 carries SKU-1: must claim row 50, not row 51
        let incoming = feed_product(
            100,
            "Green Tea",
            vec![feed_variant(1000, "A", Some("SKU-1"), "9.00")],
        );
        let plan = plan_product(&cache, &existing, &incoming);

        match &plan.flat[0] {
            SlotOp::Update { id, .. } => assert_eq!(*id, 50),
            other => panic!("expected update, got {other:?}"),
        }
        assert_eq!(plan.delete_ids, vec![51]);
    }

    #[test]
    fn test_untouched_variants_deleted() {
        let mut cache = LookupCache::default();
        cache.add_product(100, 1);
        let existing = vec![
            existing_variant(50, "V1", Some("ABC"), Some(1000), None),
            existing_variant(51, "V2", Some("DEF"), Some(1001), None),
        ];
        let incoming = feed_product(
            100,
            "Green Tea",
            vec![feed_variant(1000, "V1", Some("ABC"), "10.00")],
        );
        let plan = plan_product(&cache, &existing, &incoming);

        assert_eq!(plan.flat.len(), 1);
        assert_eq!(plan.delete_ids, vec![51]);
    }

    #[test]
    fn test_two_option_mixed_group_sizes() {
        // Size=Large has two Pack variants, Size=Small has one:
        // Large gets a parent with two children, Small stays flat
        let cache = LookupCache::default();
        let mut v1 = feed_variant(1, "Large / 2-pack", Some("L2"), "10.00");
        v1.option1 = Some("Large".to_string());
        v1.option2 = Some("2-pack".to_string());
        let mut v2 = feed_variant(2, "Large / 4-pack", Some("L4"), "18.00");
        v2.option1 = Some("Large".to_string());
        v2.option2 = Some("4-pack".to_string());
        let mut v3 = feed_variant(3, "Small / 2-pack", Some("S2"), "6.00");
        v3.option1 = Some("Small".to_string());
        v3.option2 = Some("2-pack".to_string());

        let mut incoming = feed_product(100, "Tea Box", vec![v1, v2, v3]);
        incoming.options = two_options();

        let plan = plan_product(&cache, &[], &incoming);

        assert_eq!(plan.groups.len(), 1);
        let group = &plan.groups[0];
        assert_eq!(group.parent.write().title, "Large");
        assert_eq!(group.parent.write().sku, None);
        assert_eq!(group.parent.write().discounted_price, 0.0);
        assert_eq!(group.children.len(), 2);
        assert_eq!(group.children[0].write().title, "2-pack");
        assert_eq!(group.children[1].write().title, "4-pack");

        // Lone Small variant is flat, keeps its own title
        assert_eq!(plan.flat.len(), 1);
        assert_eq!(plan.flat[0].write().title, "Small / 2-pack");
    }

    #[test]
    fn test_single_option_never_groups() {
        let cache = LookupCache::default();
        let mut v1 = feed_variant(1, "Large", Some("L"), "10.00");
        v1.option1 = Some("Large".to_string());
        let mut v2 = feed_variant(2, "Small", Some("S"), "6.00");
        v2.option1 = Some("Small".to_string());
        let mut incoming = feed_product(100, "Tea", vec![v1, v2]);
        incoming.options = vec![CatalogOption {
            name: "Size".to_string(),
            position: 1,
            values: vec![],
        }];

        let plan = plan_product(&cache, &[], &incoming);
        assert_eq!(plan.flat.len(), 2);
        assert!(plan.groups.is_empty());
    }

    #[test]
    fn test_parent_reused_by_title() {
        let mut cache = LookupCache::default();
        cache.add_product(100, 1);
        let existing = vec![
            existing_variant(40, "Large", None, None, None), // parent row
            existing_variant(41, "2-pack", Some("L2"), Some(1), Some(40)),
            existing_variant(42, "4-pack", Some("L4"), Some(2), Some(40)),
        ];

        let mut v1 = feed_variant(1, "Large / 2-pack", Some("L2"), "10.00");
        v1.option1 = Some("Large".to_string());
        v1.option2 = Some("2-pack".to_string());
        let mut v2 = feed_variant(2, "Large / 4-pack", Some("L4"), "18.00");
        v2.option1 = Some("Large".to_string());
        v2.option2 = Some("4-pack".to_string());
        let mut incoming = feed_product(100, "Tea Box", vec![v1, v2]);
        incoming.options = two_options();

        let plan = plan_product(&cache, &existing, &incoming);
        assert_eq!(plan.groups.len(), 1);
        match &plan.groups[0].parent {
            SlotOp::Update { id, .. } => assert_eq!(*id, 40),
            other => panic!("expected parent reuse, got {other:?}"),
        }
        assert!(plan.delete_ids.is_empty());
    }

    #[test]
    fn test_orphaned_parent_deleted_when_group_vanishes() {
        let mut cache = LookupCache::default();
        cache.add_product(100, 1);
        let existing = vec![
            existing_variant(40, "Large", None, None, None),
            existing_variant(41, "2-pack", Some("L2"), Some(1), Some(40)),
        ];
        // Feed now sends a single flat variant; parent and old child go away
        let incoming = feed_product(
            100,
            "Tea Box",
            vec![feed_variant(9, "Default", Some("D1"), "5.00")],
        );
        let plan = plan_product(&cache, &existing, &incoming);

        assert_eq!(plan.flat.len(), 1);
        let mut deleted = plan.delete_ids.clone();
        deleted.sort();
        assert_eq!(deleted, vec![40, 41]);
    }

    #[test]
    fn test_taxonomy_resolution() {
        let mut cache = LookupCache::default();
        cache.add_vendor("Acme Teas", 7);
        let mut incoming = feed_product(
            100,
            "Green Tea",
            vec![feed_variant(1, "Default", None, "4.00")],
        );
        incoming.vendor = Some("ACME TEAS".to_string());
        incoming.product_type = Some("Beverages".to_string());
        incoming.tags = "organic, Organic, new".to_string();

        let plan = plan_product(&cache, &[], &incoming);
        assert_eq!(plan.draft.vendor, Some(TaxonomyRef::Existing(7)));
        assert_eq!(
            plan.draft.category,
            Some(TaxonomyRef::Create("Beverages".to_string()))
        );
        // Duplicate tag (case-insensitive) collapsed
        assert_eq!(
            plan.tags,
            vec![
                TaxonomyRef::Create("organic".to_string()),
                TaxonomyRef::Create("new".to_string()),
            ]
        );
    }
}
