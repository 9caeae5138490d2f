//! Typed actions delivered by the input collaborator.
//!
//! Each action maps to exactly one engine transition. The chat transport (or
//! the HTTP action endpoint) constructs these from button presses and typed
//! amounts; they arrive at the dispatcher one at a time per account.

use serde::{Deserialize, Serialize};

use crate::types::{BankId, BetOutcome};

/// A single user action against an account's banks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Action {
    /// Creates a named bank (at most 4 per account) and makes it active.
    CreateBank { name: String },

    /// Establishes the active bank's starting balance, in [10, 100000].
    SetInitialBalance { amount: f64 },

    /// Enters the odds for the next bet, in [1.1, 9.9]. Replaces any
    /// previously entered pending bet.
    SetCoefficient { value: f64 },

    /// Enters the stake for the next bet, in (0, 0.20 × balance]. Arms the
    /// bet for settlement.
    SetStake { amount: f64 },

    /// Settles the pending bet as a win or a loss.
    ReportResult { outcome: BetOutcome },

    /// Overrides the active target with a user-chosen positive amount.
    ModifyGoal { amount: f64 },

    /// Splits the main goal into 4 recovery parts.
    SplitMainGoal,

    /// Splits one outstanding recovery goal into 2..=6 parts.
    SplitRecoveryGoal { index: usize, parts: u32 },

    /// Makes another of the account's banks active.
    SwitchBank { bank: BankId },

    /// Deletes a bank, clearing the active pointer if it was active.
    DeleteBank { bank: BankId },

    /// Zeroes a bank's bet counters and clears its history.
    ResetStatistics { bank: BankId },
}
