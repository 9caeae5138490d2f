//! Bank state record and bet history types.
//!
//! A `BankState` is one independent bankroll/progression track. It is created
//! empty, mutated exclusively through the engine's transition functions, and
//! destroyed on explicit deletion.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ids::BankId;

/// Maximum number of entries retained in a bank's bet history.
pub const MAX_BET_HISTORY: usize = 10;

/// The outcome of a settled bet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BetOutcome {
    Win,
    Loss,
}

impl BetOutcome {
    pub fn is_win(self) -> bool {
        matches!(self, BetOutcome::Win)
    }
}

/// One entry in the bet history: the odds played and how the bet went.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BetRecord {
    pub coefficient: f64,
    pub outcome: BetOutcome,
}

/// The full state of one bank.
///
/// INVARIANTS (maintained by the engine, not enforced by this type):
/// - `in_recovery_mode` is true only while `loss_record` is non-empty.
/// - `day` only increases; it is never reset except by bank re-creation.
/// - `bet_history` holds at most [`MAX_BET_HISTORY`] entries, newest first.
/// - `awaiting_bet_result` is true exactly when a stake has been fully
///   specified and a win/loss outcome is pending.
///
/// `balance` is NOT clamped to stay non-negative: a loss larger than the
/// balance drives it negative.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BankState {
    /// Identifier, unique within the owning account.
    pub id: BankId,

    /// User-chosen display name (1..=30 characters).
    pub name: String,

    /// Current bankroll in currency units.
    pub balance: f64,

    /// Progression day counter (not a calendar date). Starts at 1.
    pub day: u32,

    /// The day-1 baseline of the compounding target curve. Zero until the
    /// first real balance is established, fixed afterwards.
    pub initial_balance: f64,

    /// The day-based profit goal last derived from the target curve.
    pub daily_goal: f64,

    /// The profit amount still needed to reach the active target. While in
    /// recovery mode this is driven by outstanding losses instead of the
    /// day-based goal.
    pub current_target: f64,

    /// Odds entered for the pending stake; 0 when no stake is pending.
    pub current_coeff: f64,

    /// Stake amount for the pending bet; 0 when none pending.
    pub current_stake: f64,

    /// True once two or more losses have accumulated without being recovered.
    pub in_recovery_mode: bool,

    /// Outstanding recovery-goal amounts, settled front-to-back.
    pub loss_record: Vec<f64>,

    /// Snapshot of the parts produced by a main-goal split. Informational,
    /// except that a non-empty value blocks re-splitting.
    pub sub_goals: Vec<f64>,

    /// The main-goal value that was split, retained for display.
    pub original_goal: f64,

    /// Total bets settled since the last statistics reset.
    pub total_bets: u64,

    /// Total winning bets since the last statistics reset.
    pub total_wins: u64,

    /// Most-recent-first history of settled bets, capped at
    /// [`MAX_BET_HISTORY`] entries.
    pub bet_history: Vec<BetRecord>,

    /// True exactly when a fully specified bet awaits its outcome.
    pub awaiting_bet_result: bool,

    /// When this bank was created.
    pub created_at: DateTime<Utc>,
}

impl BankState {
    /// Creates a fresh, unfunded bank: balance 0, day 1, nothing pending.
    pub fn new(id: BankId, name: impl Into<String>) -> Self {
        BankState {
            id,
            name: name.into(),
            balance: 0.0,
            day: 1,
            initial_balance: 0.0,
            daily_goal: 0.0,
            current_target: 0.0,
            current_coeff: 0.0,
            current_stake: 0.0,
            in_recovery_mode: false,
            loss_record: Vec::new(),
            sub_goals: Vec::new(),
            original_goal: 0.0,
            total_bets: 0,
            total_wins: 0,
            bet_history: Vec::new(),
            awaiting_bet_result: false,
            created_at: Utc::now(),
        }
    }

    /// Returns true if a fully specified bet is pending settlement.
    pub fn has_pending_bet(&self) -> bool {
        self.awaiting_bet_result && self.current_stake > 0.0
    }

    /// Front-inserts a settled bet into the history, dropping the oldest
    /// entry once the cap is reached.
    pub fn record_bet(&mut self, coefficient: f64, outcome: BetOutcome) {
        self.bet_history.insert(
            0,
            BetRecord {
                coefficient,
                outcome,
            },
        );
        self.bet_history.truncate(MAX_BET_HISTORY);
    }

    /// Clears the pending stake and odds.
    pub fn clear_pending(&mut self) {
        self.current_stake = 0.0;
        self.current_coeff = 0.0;
    }

    /// Total losing bets since the last statistics reset.
    pub fn total_losses(&self) -> u64 {
        self.total_bets - self.total_wins
    }

    /// Win rate in percent; 0 when no bets have been settled.
    pub fn win_rate(&self) -> f64 {
        if self.total_bets == 0 {
            0.0
        } else {
            self.total_wins as f64 / self.total_bets as f64 * 100.0
        }
    }

    /// Sum of all outstanding recovery-goal amounts.
    pub fn outstanding_recovery(&self) -> f64 {
        self.loss_record.iter().sum()
    }

    /// Zeroes the counters and clears the bet history.
    pub fn reset_statistics(&mut self) {
        self.total_bets = 0;
        self.total_wins = 0;
        self.bet_history.clear();
    }
}
