//! Product Repository

use super::RepoResult;
use shared::models::{Product, ProductWrite};
use sqlx::{SqliteConnection, SqliteExecutor, SqlitePool};

const PRODUCT_COLUMNS: &str = "id, title, slug, description, images, vendor_id, category_id, \
     external_id, is_published, created_at, updated_at";

pub async fn find_all(pool: &SqlitePool) -> RepoResult<Vec<Product>> {
    let rows = sqlx::query_as::<_, Product>(&format!(
        "SELECT {PRODUCT_COLUMNS} FROM product ORDER BY title"
    ))
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Product>> {
    let row = sqlx::query_as::<_, Product>(&format!(
        "SELECT {PRODUCT_COLUMNS} FROM product WHERE id = ?"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

/// All products keyed by their upstream external_id, for the sync lookup cache
pub async fn find_all_by_external_id(pool: &SqlitePool) -> RepoResult<Vec<Product>> {
    let rows = sqlx::query_as::<_, Product>(&format!("SELECT {PRODUCT_COLUMNS} FROM product"))
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

pub async fn insert(ex: impl SqliteExecutor<'_>, w: &ProductWrite, now: &str) -> RepoResult<i64> {
    let row: (i64,) = sqlx::query_as(
        "INSERT INTO product (title, slug, description, images, vendor_id, category_id, \
         external_id, is_published, created_at, updated_at) \
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?) RETURNING id",
    )
    .bind(&w.title)
    .bind(&w.slug)
    .bind(&w.description)
    .bind(&w.images)
    .bind(w.vendor_id)
    .bind(w.category_id)
    .bind(w.external_id)
    .bind(w.is_published)
    .bind(now)
    .bind(now)
    .fetch_one(ex)
    .await?;
    Ok(row.0)
}

pub async fn update(
    ex: impl SqliteExecutor<'_>,
    id: i64,
    w: &ProductWrite,
    now: &str,
) -> RepoResult<()> {
    sqlx::query(
        "UPDATE product SET title = ?, slug = ?, description = ?, images = ?, vendor_id = ?, \
         category_id = ?, is_published = ?, updated_at = ? WHERE id = ?",
    )
    .bind(&w.title)
    .bind(&w.slug)
    .bind(&w.description)
    .bind(&w.images)
    .bind(w.vendor_id)
    .bind(w.category_id)
    .bind(w.is_published)
    .bind(now)
    .bind(id)
    .execute(ex)
    .await?;
    Ok(())
}

/// Replace the tag set of a product with the given tag IDs
pub async fn replace_tags(
    conn: &mut SqliteConnection,
    product_id: i64,
    tag_ids: &[i64],
) -> RepoResult<()> {
    sqlx::query("DELETE FROM product_tag WHERE product_id = ?")
        .bind(product_id)
        .execute(&mut *conn)
        .await?;
    for tag_id in tag_ids {
        sqlx::query("INSERT OR IGNORE INTO product_tag (product_id, tag_id) VALUES (?, ?)")
            .bind(product_id)
            .bind(tag_id)
            .execute(&mut *conn)
            .await?;
    }
    Ok(())
}

pub async fn find_tag_ids(pool: &SqlitePool, product_id: i64) -> RepoResult<Vec<i64>> {
    let rows: Vec<(i64,)> =
        sqlx::query_as("SELECT tag_id FROM product_tag WHERE product_id = ? ORDER BY tag_id")
            .bind(product_id)
            .fetch_all(pool)
            .await?;
    Ok(rows.into_iter().map(|(id,)| id).collect())
}
