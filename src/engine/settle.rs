//! Bet settlement: the win and loss transitions.
//!
//! Settlement is invoked exactly once per pending bet. Both paths count the
//! bet, record it in the capped history, update the balance, and recompute
//! the active target; the win path additionally pays down the recovery
//! queue, the loss path appends to it.

use serde::{Deserialize, Serialize};

use crate::types::{BankState, BetOutcome};

use super::day::advance_due_days;
use super::goals::{day_goal, round2};
use super::recovery::{pay_down, recovery_target};
use super::{EngineError, PreconditionError};

/// Summary of a settled bet, for the caller to report back to the user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settlement {
    /// How the bet went.
    pub outcome: BetOutcome,

    /// The stake that was riding on the bet.
    pub stake: f64,

    /// The odds the bet was placed at.
    pub coefficient: f64,

    /// Balance change: `+stake × (coeff − 1)` on a win, `−stake` on a loss.
    pub balance_delta: f64,

    /// How many day advances the settlement triggered (each advance may
    /// itself span several days).
    pub days_advanced: u32,
}

/// Settles the pending bet with the given outcome.
///
/// Rejects with [`PreconditionError::NoPendingBet`] unless a fully specified
/// bet is awaiting its result; the state is untouched in that case. On
/// success the pending stake and odds are zeroed and any due day advances
/// have been applied.
pub fn settle(state: &mut BankState, outcome: BetOutcome) -> Result<Settlement, EngineError> {
    if !state.has_pending_bet() {
        return Err(PreconditionError::NoPendingBet.into());
    }

    let stake = state.current_stake;
    let coefficient = state.current_coeff;

    state.total_bets += 1;
    state.record_bet(coefficient, outcome);
    state.awaiting_bet_result = false;

    let balance_delta = match outcome {
        BetOutcome::Win => {
            let profit = stake * (coefficient - 1.0);
            settle_win(state, profit);
            profit
        }
        BetOutcome::Loss => {
            settle_loss(state, stake);
            -stake
        }
    };

    let days_advanced = advance_due_days(state);
    state.clear_pending();

    Ok(Settlement {
        outcome,
        stake,
        coefficient,
        balance_delta,
        days_advanced,
    })
}

/// Applies a win: credit the profit, then either pay down the recovery queue
/// or refresh the day-based goal.
fn settle_win(state: &mut BankState, profit: f64) {
    state.balance = round2(state.balance + profit);
    state.total_wins += 1;

    if state.in_recovery_mode && !state.loss_record.is_empty() {
        state.loss_record = pay_down(&state.loss_record, profit);
        if state.loss_record.is_empty() {
            // Recovery complete; back to the day-based goal.
            state.in_recovery_mode = false;
            state.current_target = day_goal(state.initial_balance, state.balance, state.day);
        } else {
            state.current_target = recovery_target(state);
        }
    } else {
        state.in_recovery_mode = false;
        state.current_target = day_goal(state.initial_balance, state.balance, state.day);
    }
}

/// Applies a loss: debit the stake and queue it as a new recovery goal.
/// Recovery mode engages only once two or more losses are outstanding.
fn settle_loss(state: &mut BankState, stake: f64) {
    state.balance = round2(state.balance - stake);
    state.loss_record.push(stake);

    if state.loss_record.len() >= 2 {
        state.in_recovery_mode = true;
    }

    state.current_target = if state.in_recovery_mode {
        recovery_target(state)
    } else {
        day_goal(state.initial_balance, state.balance, state.day)
    };
}
