//! Persistence layer for account state.
//!
//! The storage contract is deliberately small: load a record (absence means
//! "no banks yet"), save a record, and retry transient failures a bounded
//! number of times. Snapshots are whole-record JSON files written
//! atomically; there is no partial-update protocol, so the dispatcher must
//! serialize all transitions per account.

pub mod retry;
pub mod store;

pub use retry::{with_retry, RetryConfig};
pub use store::{
    read_json, write_json_atomic, AccountSnapshot, AccountStore, StoreError, SCHEMA_VERSION,
};
