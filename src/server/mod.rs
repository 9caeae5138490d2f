//! HTTP surface of the bot.
//!
//! The chat transport is an outside collaborator; what the server exposes is
//! the delivery seam it would call (typed actions in, outcomes out) plus
//! liveness probes and read-only state inspection.

pub mod accounts;
pub mod health;

use std::path::PathBuf;
use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use crate::access::AccessList;
use crate::dispatch::Dispatcher;
use crate::types::AccountId;

use accounts::ApiError;

/// Shared state for all handlers.
#[derive(Clone)]
pub struct AppState {
    pub dispatcher: Arc<Dispatcher>,
    pub access: Arc<RwLock<AccessList>>,
    pub access_path: PathBuf,
    pub started_at: DateTime<Utc>,
}

impl AppState {
    pub fn new(dispatcher: Dispatcher, access: AccessList, access_path: PathBuf) -> Self {
        AppState {
            dispatcher: Arc::new(dispatcher),
            access: Arc::new(RwLock::new(access)),
            access_path,
            started_at: Utc::now(),
        }
    }

    /// Rejects accounts that are not on the allow-list.
    pub async fn require_authorized(&self, account: AccountId) -> Result<(), ApiError> {
        if self.access.read().await.is_authorized(account) {
            Ok(())
        } else {
            tracing::warn!(%account, "unauthorized access attempt");
            Err(ApiError::Forbidden { account })
        }
    }
}

/// Builds the application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/status", get(health::status_handler))
        .route("/accounts/:account/state", get(accounts::state_handler))
        .route("/accounts/:account/actions", post(accounts::action_handler))
        .route("/accounts/:account/plan", get(accounts::plan_handler))
        .route("/access", get(accounts::access_list_handler))
        .route("/access/grant", post(accounts::grant_handler))
        .route("/access/revoke", post(accounts::revoke_handler))
        .with_state(state)
}

/// Builds an `AppState` over a temp directory, with account 100 as admin.
/// The TempDir must be kept alive for the duration of the test.
#[cfg(test)]
pub(crate) fn test_state() -> (tempfile::TempDir, AppState) {
    use crate::persistence::{AccountStore, RetryConfig};

    let dir = tempfile::tempdir().unwrap();
    let access_path = dir.path().join("access.json");
    let access = AccessList::load_or_create(&access_path, AccountId(100)).unwrap();
    let dispatcher = Dispatcher::new(AccountStore::new(dir.path()), RetryConfig::DEFAULT);
    let state = AppState::new(dispatcher, access, access_path);
    (dir, state)
}
