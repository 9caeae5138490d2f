//! Core domain types for the bankroll bot.
//!
//! This module contains all the fundamental types used throughout the
//! application, designed to encode invariants via the type system.

pub mod account;
pub mod bank;
pub mod ids;

// Re-export commonly used types at the module level
pub use account::{AccountRecord, MAX_BANKS, MAX_BANK_NAME_LEN};
pub use bank::{BankState, BetOutcome, BetRecord, MAX_BET_HISTORY};
pub use ids::{AccountId, BankId};
