//! Runtime configuration from environment variables.
//!
//! - `BANKROLL_STATE_DIR`: where account snapshots and the allow-list live
//!   (default `state`)
//! - `BANKROLL_LISTEN_ADDR`: HTTP bind address (default `0.0.0.0:8080`)
//! - `BANKROLL_ADMIN_ACCOUNT`: the administrator's account id (required)

use std::net::SocketAddr;
use std::path::PathBuf;

use thiserror::Error;

use crate::types::AccountId;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("BANKROLL_ADMIN_ACCOUNT is not set")]
    MissingAdminAccount,

    #[error("invalid admin account id {value:?}")]
    InvalidAdminAccount { value: String },

    #[error("invalid listen address {value:?}")]
    InvalidListenAddr { value: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Root directory for persisted state.
    pub state_dir: PathBuf,

    /// Address the HTTP server binds to.
    pub listen_addr: SocketAddr,

    /// The account that administers the allow-list.
    pub admin_account: AccountId,
}

impl Config {
    /// Reads configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Reads configuration through an arbitrary variable lookup. `from_env`
    /// delegates here; tests supply a map instead of mutating the process
    /// environment.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let state_dir = lookup("BANKROLL_STATE_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("state"));

        let listen_addr = match lookup("BANKROLL_LISTEN_ADDR") {
            None => SocketAddr::from(([0, 0, 0, 0], 8080)),
            Some(value) => value
                .parse()
                .map_err(|_| ConfigError::InvalidListenAddr { value })?,
        };

        let admin_account = match lookup("BANKROLL_ADMIN_ACCOUNT") {
            None => return Err(ConfigError::MissingAdminAccount),
            Some(value) => value
                .parse::<i64>()
                .map(AccountId)
                .map_err(|_| ConfigError::InvalidAdminAccount { value })?,
        };

        Ok(Config {
            state_dir,
            listen_addr,
            admin_account,
        })
    }

    /// Where the allow-list is persisted.
    pub fn access_list_path(&self) -> PathBuf {
        self.state_dir.join("access.json")
    }
}
