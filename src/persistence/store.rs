//! Account snapshot storage.
//!
//! Each account's record is stored as a single JSON file at
//! `<state_dir>/accounts/<account_id>.json`. A missing file means the
//! account has no banks yet.
//!
//! # Atomic Writes
//!
//! Snapshots are written atomically using a write-to-temp-then-rename
//! pattern:
//! 1. Write to `<account_id>.json.tmp`
//! 2. fsync the file
//! 3. Rename to `<account_id>.json`
//! 4. fsync the directory
//!
//! This ensures that readers always see either the old or new snapshot,
//! never a partial write. Directory fsync matters: on POSIX, a rename that
//! is not followed by a directory sync may not survive a power loss even if
//! the file contents were synced.

use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::{AccountId, AccountRecord};

/// Current schema version. Increment when making breaking changes.
pub const SCHEMA_VERSION: u32 = 1;

/// Errors that can occur during store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// IO error during file operations.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Schema version mismatch.
    #[error("schema version mismatch: expected {expected}, got {got}")]
    SchemaMismatch { expected: u32, got: u32 },
}

impl StoreError {
    /// Whether retrying the same call can plausibly succeed. IO failures are
    /// treated as transient; malformed data and schema mismatches are not.
    pub fn is_transient(&self) -> bool {
        matches!(self, StoreError::Io(_))
    }
}

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;

/// The on-disk envelope around an account record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountSnapshot {
    /// Schema version for forward-compatible migrations.
    pub schema_version: u32,

    /// When this snapshot was written.
    pub saved_at: DateTime<Utc>,

    /// The account record itself.
    pub record: AccountRecord,
}

/// File-backed storage for account records.
#[derive(Debug, Clone)]
pub struct AccountStore {
    accounts_dir: PathBuf,
}

impl AccountStore {
    /// Creates a store rooted at the given state directory. Nothing is
    /// touched on disk until the first save.
    pub fn new(state_dir: impl Into<PathBuf>) -> Self {
        AccountStore {
            accounts_dir: state_dir.into().join("accounts"),
        }
    }

    /// The snapshot path for an account.
    pub fn account_path(&self, account: AccountId) -> PathBuf {
        self.accounts_dir.join(format!("{}.json", account.0))
    }

    /// Loads an account's record. `None` means the account has no stored
    /// state yet; that is not an error.
    pub fn load(&self, account: AccountId) -> Result<Option<AccountRecord>> {
        let snapshot: Option<AccountSnapshot> = read_json(&self.account_path(account))?;
        match snapshot {
            None => Ok(None),
            Some(snapshot) => {
                if snapshot.schema_version != SCHEMA_VERSION {
                    return Err(StoreError::SchemaMismatch {
                        expected: SCHEMA_VERSION,
                        got: snapshot.schema_version,
                    });
                }
                Ok(Some(snapshot.record))
            }
        }
    }

    /// Saves an account's record atomically.
    pub fn save(&self, record: &AccountRecord) -> Result<()> {
        let snapshot = AccountSnapshot {
            schema_version: SCHEMA_VERSION,
            saved_at: Utc::now(),
            record: record.clone(),
        };
        write_json_atomic(&self.account_path(record.account_id), &snapshot)
    }
}

/// Writes a value as pretty JSON atomically: temp file, fsync, rename,
/// directory fsync. Parent directories are created as needed.
pub fn write_json_atomic<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let tmp_path = path.with_extension("json.tmp");
    let bytes = serde_json::to_vec_pretty(value)?;

    {
        let mut file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&tmp_path)?;
        file.write_all(&bytes)?;
        file.sync_all()?;
    }

    std::fs::rename(&tmp_path, path)?;

    if let Some(parent) = path.parent() {
        fsync_dir(parent)?;
    }

    Ok(())
}

/// Reads a JSON value, mapping a missing file to `None`. Malformed content
/// is an error, not `None`.
pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<Option<T>> {
    let bytes = match std::fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e.into()),
    };
    Ok(Some(serde_json::from_slice(&bytes)?))
}

/// Syncs a directory so its entries (a fresh rename, in particular) are
/// durable.
fn fsync_dir(dir_path: &Path) -> io::Result<()> {
    let dir = File::open(dir_path)?;
    dir.sync_all()
}
