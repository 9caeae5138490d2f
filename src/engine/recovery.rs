//! Recovery-mode target calculation and loss-queue pay-down.
//!
//! While two or more losses are outstanding, the active target is driven by
//! the loss queue instead of the day-based goal: only the two oldest goals
//! are targeted at once, later entries stay queued.

use crate::types::BankState;

use super::goals::{day_goal, round2};

/// The active target for a bank, honouring recovery mode.
///
/// - Two or more outstanding goals: the sum of the two oldest.
/// - One or zero outstanding goals: the day-based goal. A single uncovered
///   loss sits in the queue but does not yet engage recovery targeting.
pub fn recovery_target(state: &BankState) -> f64 {
    if state.loss_record.len() >= 2 {
        round2(state.loss_record[0] + state.loss_record[1])
    } else {
        day_goal(state.initial_balance, state.balance, state.day)
    }
}

/// Applies a win's profit against the recovery queue, front to back.
///
/// Each goal that the remaining profit fully covers is removed; the first
/// goal it only partially covers is reduced and iteration stops, leaving all
/// later goals untouched. Returns the new queue.
pub fn pay_down(queue: &[f64], profit: f64) -> Vec<f64> {
    let mut remaining = profit;
    let mut rest = Vec::new();
    for &goal in queue {
        if remaining >= goal {
            remaining -= goal;
        } else if remaining > 0.0 {
            rest.push(round2(goal - remaining));
            remaining = 0.0;
        } else {
            rest.push(goal);
        }
    }
    rest
}
