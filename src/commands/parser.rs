//! Parsers for raw transport input.
//!
//! The chat transport delivers two kinds of raw input: button-callback
//! payloads (short machine strings baked into inline keyboards) and free-form
//! text typed in response to a numeric prompt. Both parsers here are pure and
//! total: anything unrecognised is simply `None`.

use crate::types::{BankId, BetOutcome};

use super::types::Action;

/// Parses a button-callback payload into an action.
///
/// Recognised payloads:
///
/// - `result_win` / `result_loss`: settle the pending bet
/// - `confirm_split`: split the main goal 4 ways
/// - `select_bank_<id>`: switch the active bank
/// - `delete_bank_<id>`: delete a bank
/// - `split_parts_<index>_<parts>`: split a recovery goal
///
/// Payloads that only drive menu navigation have no action mapping and
/// return `None`, as does anything malformed.
pub fn parse_callback(data: &str) -> Option<Action> {
    match data {
        "result_win" => {
            return Some(Action::ReportResult {
                outcome: BetOutcome::Win,
            });
        }
        "result_loss" => {
            return Some(Action::ReportResult {
                outcome: BetOutcome::Loss,
            });
        }
        "confirm_split" => return Some(Action::SplitMainGoal),
        _ => {}
    }

    if let Some(rest) = data.strip_prefix("select_bank_") {
        let id: u64 = rest.parse().ok()?;
        return Some(Action::SwitchBank { bank: BankId(id) });
    }
    if let Some(rest) = data.strip_prefix("delete_bank_") {
        let id: u64 = rest.parse().ok()?;
        return Some(Action::DeleteBank { bank: BankId(id) });
    }
    if let Some(rest) = data.strip_prefix("split_parts_") {
        let (index, parts) = rest.split_once('_')?;
        let index: usize = index.parse().ok()?;
        let parts: u32 = parts.parse().ok()?;
        return Some(Action::SplitRecoveryGoal { index, parts });
    }

    None
}

/// Parses a typed monetary or odds amount.
///
/// Users type decimal commas as often as decimal points, so `,` is accepted
/// as the separator. Non-finite values are rejected.
pub fn parse_amount(text: &str) -> Option<f64> {
    let normalized = text.trim().replace(',', ".");
    let value: f64 = normalized.parse().ok()?;
    value.is_finite().then_some(value)
}
