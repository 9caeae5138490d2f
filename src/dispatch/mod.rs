//! Serialized application of actions to account state.
//!
//! Transitions read-modify-write a whole account record with no
//! partial-update protocol, so all actions for one account must run one at a
//! time. The dispatcher enforces that with a per-account async mutex;
//! different accounts proceed in parallel.

use std::collections::HashMap;
use std::sync::{Arc, Mutex as StdMutex};

use thiserror::Error;
use tokio::sync::Mutex;

use crate::commands::Action;
use crate::engine::{self, ActionOutcome, EngineError};
use crate::persistence::{with_retry, AccountStore, RetryConfig, StoreError};
use crate::types::{AccountId, AccountRecord};

/// Errors from dispatching an action.
///
/// Whichever variant is returned, the stored record is unchanged: engine
/// rejections happen before any mutation, and a storage failure means the
/// updated record never replaced the snapshot.
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error("storage failure, action not applied: {0}")]
    Store(#[from] StoreError),
}

/// Applies actions to accounts, one at a time per account.
pub struct Dispatcher {
    store: AccountStore,
    retry: RetryConfig,
    locks: StdMutex<HashMap<AccountId, Arc<Mutex<()>>>>,
}

impl Dispatcher {
    pub fn new(store: AccountStore, retry: RetryConfig) -> Self {
        Dispatcher {
            store,
            retry,
            locks: StdMutex::new(HashMap::new()),
        }
    }

    /// The mutex guarding one account's record.
    fn account_lock(&self, account: AccountId) -> Arc<Mutex<()>> {
        let mut locks = self.locks.lock().expect("lock map poisoned");
        locks.entry(account).or_default().clone()
    }

    /// Runs one action against an account: lock, load (an absent record
    /// means a fresh account), apply, save with bounded retry.
    pub async fn dispatch(
        &self,
        account: AccountId,
        action: Action,
    ) -> Result<ActionOutcome, DispatchError> {
        let lock = self.account_lock(account);
        let _guard = lock.lock().await;

        tracing::debug!(%account, ?action, "dispatching action");

        let mut record = with_retry(&self.retry, || self.store.load(account))?
            .unwrap_or_else(|| AccountRecord::new(account));

        let outcome = engine::apply(&mut record, action)?;
        with_retry(&self.retry, || self.store.save(&record))?;

        Ok(outcome)
    }

    /// Reads an account's record without mutating anything.
    pub async fn inspect(&self, account: AccountId) -> Result<Option<AccountRecord>, DispatchError> {
        let lock = self.account_lock(account);
        let _guard = lock.lock().await;
        Ok(with_retry(&self.retry, || self.store.load(account))?)
    }
}
