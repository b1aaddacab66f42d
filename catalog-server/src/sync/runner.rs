//! Batch sync runner
//!
//! Drives the run: loads the lookup cache once, then walks the feed in
//! fixed-size chunks. Each chunk is planned concurrently (reads against the
//! pool), applied sequentially inside a single transaction, and bounded by a
//! 60s execution budget; connection acquisition is bounded by the pool's 30s
//! acquire timeout. Chunks run strictly one after another, so a mid-run
//! failure leaves earlier chunks committed — the run is atomic per chunk,
//! never as a whole. No retries: the operator re-invokes the endpoint and
//! idempotent matching absorbs the replay.

use super::lookup::LookupCache;
use super::plan::{self, ProductPlan};
use super::{SyncError, SyncOutcome};
use crate::db::repository::{RepoError, RepoResult, variant};
use shared::catalog::CatalogProduct;
use shared::util::now_rfc3339;
use sqlx::SqlitePool;
use std::time::Duration;

/// Products per chunk transaction; keeps each transaction short under
/// default store limits.
pub const SYNC_BATCH_SIZE: usize = 5;

/// Execution budget for one chunk, planning and transaction included.
pub const CHUNK_TIMEOUT: Duration = Duration::from_secs(60);

/// Reconcile the full incoming catalog into the store.
pub async fn run_sync(
    pool: &SqlitePool,
    products: &[CatalogProduct],
) -> Result<SyncOutcome, SyncError> {
    // Fatal if the store is unreachable; nothing has been written yet
    let mut cache = LookupCache::load(pool).await?;

    let mut outcome = SyncOutcome::default();
    for (index, chunk) in products.chunks(SYNC_BATCH_SIZE).enumerate() {
        let chunk_outcome = tokio::time::timeout(CHUNK_TIMEOUT, sync_chunk(pool, &mut cache, chunk))
            .await
            .map_err(|_| SyncError::Timeout(format!("chunk {index} exceeded 60s budget")))??;
        outcome = outcome.merge(chunk_outcome);
        tracing::debug!(
            chunk = index,
            created = chunk_outcome.created,
            updated = chunk_outcome.updated,
            "Sync chunk committed"
        );
    }

    tracing::info!(
        total = outcome.total,
        created = outcome.created,
        updated = outcome.updated,
        "Catalog sync completed"
    );
    Ok(outcome)
}

/// Process one chunk: plan all products concurrently, then apply the plans
/// inside a single transaction. Any failure rolls back the whole chunk.
async fn sync_chunk(
    pool: &SqlitePool,
    cache: &mut LookupCache,
    chunk: &[CatalogProduct],
) -> Result<SyncOutcome, SyncError> {
    let plans: Vec<ProductPlan> = futures::future::try_join_all(
        chunk
            .iter()
            .map(|incoming| plan_one(pool, cache, incoming)),
    )
    .await?;

    let outcome = plans.iter().fold(SyncOutcome::default(), |acc, plan| {
        acc.merge(if plan.is_create() {
            SyncOutcome::created_one()
        } else {
            SyncOutcome::updated_one()
        })
    });

    let now = now_rfc3339();
    let mut tx = pool
        .begin()
        .await
        .map_err(|e| SyncError::Store(RepoError::from(e)))?;
    for plan in &plans {
        super::apply::apply_plan(&mut *tx, cache, plan, &now).await?;
    }
    tx.commit()
        .await
        .map_err(|e| SyncError::Store(RepoError::from(e)))?;

    Ok(outcome)
}

async fn plan_one(
    pool: &SqlitePool,
    cache: &LookupCache,
    incoming: &CatalogProduct,
) -> RepoResult<ProductPlan> {
    let existing = match cache.product_id(incoming.id) {
        Some(product_id) => variant::find_by_product(pool, product_id).await?,
        None => Vec::new(),
    };
    Ok(plan::plan_product(cache, &existing, incoming))
}
