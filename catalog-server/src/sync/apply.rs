//! Plan execution
//!
//! Applies a [`ProductPlan`] inside the chunk transaction. Taxonomy rows are
//! resolved first (creating missing ones and recording them in the cache so a
//! later product in the same run reuses them), then the product row, then
//! variants. Deletes run last so parent rows are never removed before their
//! surviving children are re-pointed.

use super::lookup::LookupCache;
use super::plan::{GroupPlan, ProductPlan, ProductTarget, SlotOp, TaxonomyRef};
use crate::db::repository::{RepoResult, lookup, product, variant};
use shared::models::ProductWrite;
use sqlx::SqliteConnection;

/// Execute one product's plan. Returns the persisted product id.
pub async fn apply_plan(
    conn: &mut SqliteConnection,
    cache: &mut LookupCache,
    plan: &ProductPlan,
    now: &str,
) -> RepoResult<i64> {
    let vendor_id = match &plan.draft.vendor {
        Some(r) => Some(resolve_vendor(conn, cache, r).await?),
        None => None,
    };
    let category_id = match &plan.draft.category {
        Some(r) => Some(resolve_category(conn, cache, r).await?),
        None => None,
    };
    let mut tag_ids = Vec::with_capacity(plan.tags.len());
    for r in &plan.tags {
        tag_ids.push(resolve_tag(conn, cache, r).await?);
    }

    let write = ProductWrite {
        title: plan.draft.title.clone(),
        slug: plan.draft.slug.clone(),
        description: plan.draft.description.clone(),
        images: plan.draft.images.clone(),
        vendor_id,
        category_id,
        external_id: plan.draft.external_id,
        is_published: plan.draft.is_published,
    };

    let product_id = match plan.target {
        ProductTarget::Create => {
            let id = product::insert(&mut *conn, &write, now).await?;
            cache.add_product(write.external_id, id);
            id
        }
        ProductTarget::Update(id) => {
            product::update(&mut *conn, id, &write, now).await?;
            id
        }
    };

    product::replace_tags(conn, product_id, &tag_ids).await?;

    for op in &plan.flat {
        apply_slot(conn, product_id, None, op, now).await?;
    }
    for group in &plan.groups {
        apply_group(conn, product_id, group, now).await?;
    }

    // Deletes last: claimed rows have already been re-parented above
    for id in &plan.delete_ids {
        variant::delete(&mut *conn, *id).await?;
    }

    Ok(product_id)
}

async fn apply_group(
    conn: &mut SqliteConnection,
    product_id: i64,
    group: &GroupPlan,
    now: &str,
) -> RepoResult<()> {
    let parent_id = apply_slot(conn, product_id, None, &group.parent, now).await?;
    for child in &group.children {
        apply_slot(conn, product_id, Some(parent_id), child, now).await?;
    }
    Ok(())
}

async fn apply_slot(
    conn: &mut SqliteConnection,
    product_id: i64,
    parent_id: Option<i64>,
    op: &SlotOp,
    now: &str,
) -> RepoResult<i64> {
    match op {
        SlotOp::Create(write) => variant::insert(&mut *conn, product_id, parent_id, write, now).await,
        SlotOp::Update { id, write } => {
            variant::update(&mut *conn, *id, parent_id, write, now).await?;
            Ok(*id)
        }
    }
}

async fn resolve_vendor(
    conn: &mut SqliteConnection,
    cache: &mut LookupCache,
    r: &TaxonomyRef,
) -> RepoResult<i64> {
    match r {
        TaxonomyRef::Existing(id) => Ok(*id),
        TaxonomyRef::Create(name) => {
            // A plan from the same chunk may have created it already
            if let Some(id) = cache.vendor_id(name) {
                return Ok(id);
            }
            let id = lookup::insert_vendor(&mut *conn, name).await?;
            cache.add_vendor(name, id);
            Ok(id)
        }
    }
}

async fn resolve_category(
    conn: &mut SqliteConnection,
    cache: &mut LookupCache,
    r: &TaxonomyRef,
) -> RepoResult<i64> {
    match r {
        TaxonomyRef::Existing(id) => Ok(*id),
        TaxonomyRef::Create(name) => {
            if let Some(id) = cache.category_id(name) {
                return Ok(id);
            }
            let id = lookup::insert_category(&mut *conn, name).await?;
            cache.add_category(name, id);
            Ok(id)
        }
    }
}

async fn resolve_tag(
    conn: &mut SqliteConnection,
    cache: &mut LookupCache,
    r: &TaxonomyRef,
) -> RepoResult<i64> {
    match r {
        TaxonomyRef::Existing(id) => Ok(*id),
        TaxonomyRef::Create(name) => {
            if let Some(id) = cache.tag_id(name) {
                return Ok(id);
            }
            let id = lookup::insert_tag(&mut *conn, name).await?;
            cache.add_tag(name, id);
            Ok(id)
        }
    }
}
