//! Catalog synchronization
//!
//! Pulls the upstream catalog feed and reconciles it into the local store:
//!
//! - [`feed`]: paginated feed client with typed, validated payloads
//! - [`lookup`]: name→id lookup cache, loaded once per run
//! - [`plan`]: pure per-product reconciliation planner (no I/O)
//! - [`apply`]: executes a plan inside a chunk transaction
//! - [`runner`]: chunked batch driver and outcome fold
//!
//! Products are processed in chunks of [`runner::SYNC_BATCH_SIZE`]; each chunk
//! commits atomically and chunks run sequentially, so a failed run can leave
//! the catalog partially synced. Re-running is safe: matching by SKU and
//! external id is idempotent.

pub mod apply;
pub mod feed;
pub mod lookup;
pub mod plan;
pub mod runner;

use crate::db::repository::RepoError;
use serde::Serialize;
use shared::error::AppError;
use thiserror::Error;

/// Errors raised during a sync run
#[derive(Debug, Error)]
pub enum SyncError {
    #[error("Catalog feed URL or access token is not configured")]
    NotConfigured,

    #[error("Catalog feed returned status {status}: {body}")]
    Feed { status: u16, body: String },

    #[error("Failed to reach catalog feed: {0}")]
    Transport(String),

    #[error("Catalog feed payload is malformed: {0}")]
    Malformed(String),

    #[error("Store error: {0}")]
    Store(#[from] RepoError),

    #[error("Sync chunk timed out: {0}")]
    Timeout(String),
}

impl From<SyncError> for AppError {
    fn from(err: SyncError) -> Self {
        match err {
            SyncError::NotConfigured => AppError::feed_not_configured(),
            SyncError::Feed { status, body } => {
                AppError::feed_unavailable(format!("upstream returned {status}"))
                    .with_detail("status", status)
                    .with_detail("body", body)
            }
            SyncError::Transport(msg) => AppError::network(msg),
            SyncError::Malformed(msg) => AppError::feed_malformed(msg),
            SyncError::Store(e) => AppError::database(e.to_string()),
            SyncError::Timeout(msg) => AppError::timeout(msg),
        }
    }
}

/// Aggregated outcome of a sync run
///
/// `created`/`updated` count products; `total` is their sum. Outcomes are
/// combined with [`SyncOutcome::merge`] as an explicit fold over chunks.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SyncOutcome {
    pub total: u64,
    pub created: u64,
    pub updated: u64,
}

impl SyncOutcome {
    pub fn created_one() -> Self {
        Self {
            total: 1,
            created: 1,
            updated: 0,
        }
    }

    pub fn updated_one() -> Self {
        Self {
            total: 1,
            created: 0,
            updated: 1,
        }
    }

    /// Combine two outcomes
    pub fn merge(self, other: SyncOutcome) -> SyncOutcome {
        SyncOutcome {
            total: self.total + other.total,
            created: self.created + other.created,
            updated: self.updated + other.updated,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::error::ErrorCode as Code;

    #[test]
    fn test_outcome_merge() {
        let a = SyncOutcome {
            total: 5,
            created: 2,
            updated: 3,
        };
        let b = SyncOutcome {
            total: 3,
            created: 1,
            updated: 2,
        };
        let merged = a.merge(b);
        assert_eq!(merged.total, 8);
        assert_eq!(merged.created, 3);
        assert_eq!(merged.updated, 5);
        assert_eq!(SyncOutcome::default().merge(a), a);
    }

    #[test]
    fn test_error_mapping() {
        let err: AppError = SyncError::NotConfigured.into();
        assert_eq!(err.code, Code::FeedNotConfigured);
        assert_eq!(err.http_status(), http::StatusCode::BAD_REQUEST);

        let err: AppError = SyncError::Feed {
            status: 503,
            body: "down".into(),
        }
        .into();
        assert_eq!(err.code, Code::FeedUnavailable);
        assert_eq!(err.http_status(), http::StatusCode::INTERNAL_SERVER_ERROR);

        let err: AppError = SyncError::Malformed("bad price".into()).into();
        assert_eq!(err.code, Code::FeedMalformed);

        let err: AppError =
            SyncError::Store(RepoError::Database("locked".into())).into();
        assert_eq!(err.code, Code::DatabaseError);
    }
}
