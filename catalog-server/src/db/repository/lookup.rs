//! Vendor / Category / Tag Repository
//!
//! Taxonomy rows are matched by name case-insensitively (COLLATE NOCASE).

use super::RepoResult;
use shared::models::{Category, Tag, Vendor};
use shared::util::slugify;
use sqlx::{SqliteExecutor, SqlitePool};

pub async fn find_all_vendors(pool: &SqlitePool) -> RepoResult<Vec<Vendor>> {
    let rows = sqlx::query_as::<_, Vendor>("SELECT id, name, slug FROM vendor ORDER BY name")
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

pub async fn find_all_categories(pool: &SqlitePool) -> RepoResult<Vec<Category>> {
    let rows = sqlx::query_as::<_, Category>("SELECT id, name, slug FROM category ORDER BY name")
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

pub async fn find_all_tags(pool: &SqlitePool) -> RepoResult<Vec<Tag>> {
    let rows = sqlx::query_as::<_, Tag>("SELECT id, name, slug FROM tag ORDER BY name")
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

pub async fn insert_vendor(ex: impl SqliteExecutor<'_>, name: &str) -> RepoResult<i64> {
    let row: (i64,) = sqlx::query_as("INSERT INTO vendor (name, slug) VALUES (?, ?) RETURNING id")
        .bind(name)
        .bind(slugify(name))
        .fetch_one(ex)
        .await?;
    Ok(row.0)
}

pub async fn insert_category(ex: impl SqliteExecutor<'_>, name: &str) -> RepoResult<i64> {
    let row: (i64,) =
        sqlx::query_as("INSERT INTO category (name, slug) VALUES (?, ?) RETURNING id")
            .bind(name)
            .bind(slugify(name))
            .fetch_one(ex)
            .await?;
    Ok(row.0)
}

pub async fn insert_tag(ex: impl SqliteExecutor<'_>, name: &str) -> RepoResult<i64> {
    let row: (i64,) = sqlx::query_as("INSERT INTO tag (name, slug) VALUES (?, ?) RETURNING id")
        .bind(name)
        .bind(slugify(name))
        .fetch_one(ex)
        .await?;
    Ok(row.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::sqlite::SqlitePoolOptions;

    async fn test_pool() -> SqlitePool {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        sqlx::query(
            "CREATE TABLE vendor (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL COLLATE NOCASE UNIQUE,
                slug TEXT NOT NULL
            )",
        )
        .execute(&pool)
        .await
        .unwrap();
        pool
    }

    #[tokio::test]
    async fn test_insert_and_list_vendors() {
        let pool = test_pool().await;
        let id = insert_vendor(&pool, "Acme Teas").await.unwrap();
        assert!(id > 0);

        let vendors = find_all_vendors(&pool).await.unwrap();
        assert_eq!(vendors.len(), 1);
        assert_eq!(vendors[0].name, "Acme Teas");
        assert_eq!(vendors[0].slug, "acme-teas");
    }

    #[tokio::test]
    async fn test_vendor_name_nocase_unique() {
        let pool = test_pool().await;
        insert_vendor(&pool, "Acme Teas").await.unwrap();
        let err = insert_vendor(&pool, "ACME TEAS").await.unwrap_err();
        assert!(matches!(err, super::super::RepoError::Duplicate(_)));
    }
}
