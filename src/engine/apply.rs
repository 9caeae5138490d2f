//! Applies typed actions to an account record.
//!
//! This is the single entry point the dispatcher drives: one [`Action`] in,
//! one [`ActionOutcome`] (or a rejection that left the record untouched)
//! out. Bank-management actions address banks explicitly; betting and goal
//! actions operate on the active bank.

use serde::{Deserialize, Serialize};

use crate::commands::Action;
use crate::types::{
    AccountRecord, BankId, BankState, BetOutcome, MAX_BANKS, MAX_BANK_NAME_LEN,
};

use super::goals::{
    day_goal, round2, stake_for, MAX_COEFFICIENT, MAX_INITIAL_BALANCE, MAX_STAKE_FRACTION,
    MIN_COEFFICIENT, MIN_INITIAL_BALANCE,
};
use super::settle::{settle, Settlement};
use super::split::{split_main_goal, split_recovery_goal};
use super::{EngineError, PreconditionError, ValidationError};

/// What an applied action did, for the caller to report back.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ActionOutcome {
    BankCreated {
        bank: BankId,
        name: String,
    },

    BankSwitched {
        bank: BankId,
    },

    BankDeleted {
        bank: BankId,
        name: String,
    },

    StatisticsReset {
        bank: BankId,
    },

    InitialBalanceSet {
        balance: f64,
        target: f64,
    },

    /// Odds accepted; the recommended stake hits the active target exactly.
    BetPrepared {
        coefficient: f64,
        recommended_stake: f64,
    },

    /// Stake accepted; the bet now awaits its result.
    BetArmed {
        stake: f64,
        potential_profit: f64,
    },

    BetSettled(Settlement),

    GoalModified {
        target: f64,
    },

    /// A goal was split; `target` is the recomputed active target.
    GoalSplit {
        parts: Vec<f64>,
        target: f64,
    },
}

/// Applies one action to the record.
///
/// Every rejection happens before any mutation: on `Err` the record is
/// exactly as it was.
pub fn apply(record: &mut AccountRecord, action: Action) -> Result<ActionOutcome, EngineError> {
    match action {
        Action::CreateBank { name } => create_bank(record, name),
        Action::SwitchBank { bank } => switch_bank(record, bank),
        Action::DeleteBank { bank } => delete_bank(record, bank),
        Action::ResetStatistics { bank } => reset_statistics(record, bank),

        Action::SetInitialBalance { amount } => set_initial_balance(active_mut(record)?, amount),
        Action::SetCoefficient { value } => set_coefficient(active_mut(record)?, value),
        Action::SetStake { amount } => set_stake(active_mut(record)?, amount),
        Action::ReportResult { outcome } => report_result(active_mut(record)?, outcome),
        Action::ModifyGoal { amount } => modify_goal(active_mut(record)?, amount),
        Action::SplitMainGoal => {
            let bank = active_mut(record)?;
            let parts = split_main_goal(bank)?;
            Ok(ActionOutcome::GoalSplit {
                parts,
                target: bank.current_target,
            })
        }
        Action::SplitRecoveryGoal { index, parts } => {
            let bank = active_mut(record)?;
            let pieces = split_recovery_goal(bank, index, parts)?;
            Ok(ActionOutcome::GoalSplit {
                parts: pieces,
                target: bank.current_target,
            })
        }
    }
}

fn active_mut(record: &mut AccountRecord) -> Result<&mut BankState, EngineError> {
    record
        .active_mut()
        .ok_or_else(|| PreconditionError::NoActiveBank.into())
}

fn create_bank(record: &mut AccountRecord, name: String) -> Result<ActionOutcome, EngineError> {
    let name = name.trim().to_string();
    if name.is_empty() {
        return Err(ValidationError::BankNameEmpty.into());
    }
    let length = name.chars().count();
    if length > MAX_BANK_NAME_LEN {
        return Err(ValidationError::BankNameTooLong { length }.into());
    }
    if record.banks.len() >= MAX_BANKS {
        return Err(PreconditionError::BankLimitReached { max: MAX_BANKS }.into());
    }

    let bank = record.allocate_bank_id();
    record.banks.push(BankState::new(bank, name.clone()));
    record.active_bank = Some(bank);

    tracing::info!(account = %record.account_id, %bank, "bank created");
    Ok(ActionOutcome::BankCreated { bank, name })
}

fn switch_bank(record: &mut AccountRecord, bank: BankId) -> Result<ActionOutcome, EngineError> {
    if record.bank(bank).is_none() {
        return Err(PreconditionError::BankNotFound { bank }.into());
    }
    record.active_bank = Some(bank);
    Ok(ActionOutcome::BankSwitched { bank })
}

fn delete_bank(record: &mut AccountRecord, bank: BankId) -> Result<ActionOutcome, EngineError> {
    let removed = record
        .remove_bank(bank)
        .ok_or(PreconditionError::BankNotFound { bank })?;

    tracing::info!(account = %record.account_id, %bank, "bank deleted");
    Ok(ActionOutcome::BankDeleted {
        bank,
        name: removed.name,
    })
}

fn reset_statistics(record: &mut AccountRecord, bank: BankId) -> Result<ActionOutcome, EngineError> {
    let state = record
        .bank_mut(bank)
        .ok_or(PreconditionError::BankNotFound { bank })?;
    state.reset_statistics();
    Ok(ActionOutcome::StatisticsReset { bank })
}

/// Establishes the starting balance: the day-1 baseline of the target curve.
/// Only ever accepted once per bank; re-creation is the reset path.
fn set_initial_balance(bank: &mut BankState, amount: f64) -> Result<ActionOutcome, EngineError> {
    if bank.initial_balance > 0.0 {
        return Err(PreconditionError::InitialBalanceAlreadySet.into());
    }
    if !(MIN_INITIAL_BALANCE..=MAX_INITIAL_BALANCE).contains(&amount) {
        return Err(ValidationError::InitialBalanceOutOfRange { amount }.into());
    }

    let amount = round2(amount);
    bank.balance = amount;
    bank.initial_balance = amount;
    bank.current_target = day_goal(amount, amount, bank.day);
    bank.daily_goal = bank.current_target;

    Ok(ActionOutcome::InitialBalanceSet {
        balance: amount,
        target: bank.current_target,
    })
}

/// Enters (or re-enters) the odds for the next bet.
///
/// A funded bank whose initial balance was never explicitly established
/// adopts its current balance as the baseline here: the first real balance
/// fixes the curve. Any previously armed bet is discarded; the stake must be
/// re-entered before settlement.
fn set_coefficient(bank: &mut BankState, value: f64) -> Result<ActionOutcome, EngineError> {
    if bank.balance < MIN_INITIAL_BALANCE {
        return Err(PreconditionError::BankNotFunded {
            balance: bank.balance,
            minimum: MIN_INITIAL_BALANCE,
        }
        .into());
    }
    if !(MIN_COEFFICIENT..=MAX_COEFFICIENT).contains(&value) {
        return Err(ValidationError::CoefficientOutOfRange { value }.into());
    }

    if bank.initial_balance == 0.0 {
        bank.initial_balance = bank.balance;
        bank.current_target = day_goal(bank.initial_balance, bank.balance, bank.day);
        bank.daily_goal = bank.current_target;
    }

    let recommended_stake = stake_for(bank.current_target, value);
    bank.current_coeff = value;
    bank.current_stake = recommended_stake;
    bank.awaiting_bet_result = false;

    Ok(ActionOutcome::BetPrepared {
        coefficient: value,
        recommended_stake,
    })
}

/// Enters the stake and arms the bet for settlement.
fn set_stake(bank: &mut BankState, amount: f64) -> Result<ActionOutcome, EngineError> {
    if bank.current_coeff == 0.0 {
        return Err(PreconditionError::CoefficientNotSet.into());
    }
    let max = bank.balance * MAX_STAKE_FRACTION;
    if amount <= 0.0 || amount > max {
        return Err(ValidationError::StakeOutOfRange { stake: amount, max }.into());
    }

    let stake = round2(amount);
    bank.current_stake = stake;
    bank.awaiting_bet_result = true;

    Ok(ActionOutcome::BetArmed {
        stake,
        potential_profit: round2(stake * (bank.current_coeff - 1.0)),
    })
}

fn report_result(bank: &mut BankState, outcome: BetOutcome) -> Result<ActionOutcome, EngineError> {
    let settlement = settle(bank, outcome)?;
    tracing::info!(
        bank = %bank.id,
        outcome = ?settlement.outcome,
        delta = settlement.balance_delta,
        days_advanced = settlement.days_advanced,
        "bet settled"
    );
    Ok(ActionOutcome::BetSettled(settlement))
}

fn modify_goal(bank: &mut BankState, amount: f64) -> Result<ActionOutcome, EngineError> {
    if amount <= 0.0 {
        return Err(ValidationError::GoalNotPositive { amount }.into());
    }
    bank.current_target = round2(amount);
    Ok(ActionOutcome::GoalModified {
        target: bank.current_target,
    })
}
