//! Product Variant Repository

use super::RepoResult;
use shared::models::{ProductVariant, VariantWrite};
use sqlx::{SqliteExecutor, SqlitePool};

const VARIANT_COLUMNS: &str = "id, product_id, parent_variant_id, title, sku, external_id, \
     discounted_price, price, quantity, weight, requires_shipping, taxable, position, images, \
     is_available, referral_percentage, created_at, updated_at";

pub async fn find_by_product(pool: &SqlitePool, product_id: i64) -> RepoResult<Vec<ProductVariant>> {
    let rows = sqlx::query_as::<_, ProductVariant>(&format!(
        "SELECT {VARIANT_COLUMNS} FROM product_variant WHERE product_id = ? ORDER BY position, id"
    ))
    .bind(product_id)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Insert a variant; `referral_percentage` starts at 0 for synced variants
pub async fn insert(
    ex: impl SqliteExecutor<'_>,
    product_id: i64,
    parent_variant_id: Option<i64>,
    w: &VariantWrite,
    now: &str,
) -> RepoResult<i64> {
    let row: (i64,) = sqlx::query_as(
        "INSERT INTO product_variant (product_id, parent_variant_id, title, sku, external_id, \
         discounted_price, price, quantity, weight, requires_shipping, taxable, position, images, \
         is_available, referral_percentage, created_at, updated_at) \
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, 0, ?, ?) RETURNING id",
    )
    .bind(product_id)
    .bind(parent_variant_id)
    .bind(&w.title)
    .bind(&w.sku)
    .bind(w.external_id)
    .bind(w.discounted_price)
    .bind(w.price)
    .bind(w.quantity)
    .bind(w.weight)
    .bind(w.requires_shipping)
    .bind(w.taxable)
    .bind(w.position)
    .bind(&w.images)
    .bind(w.is_available)
    .bind(now)
    .bind(now)
    .fetch_one(ex)
    .await?;
    Ok(row.0)
}

/// Update a variant in place; `referral_percentage` is deliberately not touched
pub async fn update(
    ex: impl SqliteExecutor<'_>,
    id: i64,
    parent_variant_id: Option<i64>,
    w: &VariantWrite,
    now: &str,
) -> RepoResult<()> {
    sqlx::query(
        "UPDATE product_variant SET parent_variant_id = ?, title = ?, sku = ?, external_id = ?, \
         discounted_price = ?, price = ?, quantity = ?, weight = ?, requires_shipping = ?, \
         taxable = ?, position = ?, images = ?, is_available = ?, updated_at = ? \
         WHERE id = ?",
    )
    .bind(parent_variant_id)
    .bind(&w.title)
    .bind(&w.sku)
    .bind(w.external_id)
    .bind(w.discounted_price)
    .bind(w.price)
    .bind(w.quantity)
    .bind(w.weight)
    .bind(w.requires_shipping)
    .bind(w.taxable)
    .bind(w.position)
    .bind(&w.images)
    .bind(w.is_available)
    .bind(now)
    .bind(id)
    .execute(ex)
    .await?;
    Ok(())
}

pub async fn delete(ex: impl SqliteExecutor<'_>, id: i64) -> RepoResult<()> {
    sqlx::query("DELETE FROM product_variant WHERE id = ?")
        .bind(id)
        .execute(ex)
        .await?;
    Ok(())
}
