//! Catalog sync trigger endpoint

use axum::Json;
use axum::extract::State;
use shared::error::{ApiResponse, AppResult};

use crate::state::AppState;
use crate::sync::feed::FeedClient;
use crate::sync::{SyncError, SyncOutcome, runner};

/// POST /api/admin/catalog/sync
///
/// Pulls the upstream feed and reconciles it into the store. Takes no body.
/// Responds 400 when feed credentials are unset, 500 on upstream or storage
/// failure (earlier chunks stay committed), 200 with the outcome summary on
/// completion.
pub async fn trigger_sync(
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<SyncOutcome>>> {
    let (url, token) = state
        .config
        .feed_credentials()
        .ok_or(SyncError::NotConfigured)?;

    let client = FeedClient::new(url, token, state.config.feed_page_size)?;
    let products = client.fetch_all().await?;

    tracing::info!(products = products.len(), "Catalog sync started");
    let outcome = runner::run_sync(state.pool(), &products).await?;

    Ok(Json(ApiResponse::success_with_message(
        format!(
            "Catalog sync completed: {} created, {} updated of {} products",
            outcome.created, outcome.updated, outcome.total
        ),
        outcome,
    )))
}
