//! The progression engine: pure state transitions over bank records.
//!
//! This is the functional core. Every transition either fully applies or is
//! rejected before any mutation; the only side effect is logging. All I/O
//! (persistence, locking, transport) is handled elsewhere.

pub mod apply;
pub mod day;
pub mod goals;
pub mod recovery;
pub mod settle;
pub mod split;

// Re-export commonly used functions and types
pub use apply::{apply, ActionOutcome};
pub use day::{advance_day_if_due, advance_due_days};
pub use goals::{daily_goal, day_goal, round2, stake_for, target_bank, target_day};
pub use recovery::{pay_down, recovery_target};
pub use settle::{settle, Settlement};
pub use split::{split_into_parts, split_main_goal, split_recovery_goal};

use thiserror::Error;

use crate::types::BankId;

/// Input outside an allowed numeric range or shape. Rejected before any
/// state mutation; the caller re-prompts.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("initial balance {amount} outside allowed range 10..=100000")]
    InitialBalanceOutOfRange { amount: f64 },

    #[error("coefficient {value} outside allowed range 1.1..=9.9")]
    CoefficientOutOfRange { value: f64 },

    #[error("stake {stake} outside allowed range (0, {max}]")]
    StakeOutOfRange { stake: f64, max: f64 },

    #[error("goal {amount} must be positive")]
    GoalNotPositive { amount: f64 },

    #[error("bank name must not be empty")]
    BankNameEmpty,

    #[error("bank name too long ({length} characters, maximum 30)")]
    BankNameTooLong { length: usize },

    #[error("part count {parts} outside allowed range 2..=6")]
    PartCountOutOfRange { parts: u32 },
}

/// The state does not admit the requested transition. Rejected before any
/// state mutation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PreconditionError {
    #[error("no active bank; create or select one first")]
    NoActiveBank,

    #[error("bank {bank} not found")]
    BankNotFound { bank: BankId },

    #[error("bank limit reached (maximum {max})")]
    BankLimitReached { max: usize },

    #[error("bank balance {balance} is below the minimum of {minimum}")]
    BankNotFunded { balance: f64, minimum: f64 },

    #[error("the initial balance is already established")]
    InitialBalanceAlreadySet,

    #[error("the initial balance is not established yet")]
    InitialBalanceNotSet,

    #[error("no coefficient entered for this bet")]
    CoefficientNotSet,

    #[error("no pending bet to settle")]
    NoPendingBet,

    #[error("no positive goal to split")]
    NoGoalToSplit,

    #[error("the goal is already split")]
    GoalAlreadySplit,

    #[error("the main goal cannot be split while recovery mode is active")]
    RecoveryModeActive,

    #[error("no outstanding recovery goals to split")]
    RecoveryModeInactive,

    #[error("recovery goal index {index} out of bounds (have {len})")]
    GoalIndexOutOfBounds { index: usize, len: usize },
}

/// Any reason the engine can refuse a transition. The state is guaranteed
/// untouched whichever variant is returned.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EngineError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Precondition(#[from] PreconditionError),
}
