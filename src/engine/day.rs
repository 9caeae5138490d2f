//! Day advancement over the compounding target curve.

use crate::types::BankState;

use super::goals::{day_goal, target_day};

/// Advances the bank to a new day if its balance has earned one.
///
/// The due day is `target_day(balance, initial) + 1`: one past the highest
/// day whose target the balance has reached. When that exceeds the current
/// day, the bank moves there in one step: recovery mode and all split/loss
/// bookkeeping are wiped, and the goal is recomputed against the new day's
/// target.
///
/// Returns whether an advance occurred. Callers must invoke this in a loop
/// after every settled bet until it returns false (see
/// [`advance_due_days`]); a single large win can jump several days at once.
pub fn advance_day_if_due(state: &mut BankState) -> bool {
    let due = target_day(state.balance, state.initial_balance) + 1;
    if due <= state.day {
        return false;
    }

    state.day = due;
    state.in_recovery_mode = false;
    state.loss_record.clear();
    state.sub_goals.clear();
    state.original_goal = 0.0;
    state.current_target = day_goal(state.initial_balance, state.balance, due);
    state.daily_goal = state.current_target;

    tracing::debug!(bank = %state.id, day = due, "advanced to new day");
    true
}

/// Runs [`advance_day_if_due`] until quiescent and reports how many advances
/// occurred (each advance may itself span several days).
pub fn advance_due_days(state: &mut BankState) -> u32 {
    let mut advances = 0;
    while advance_day_if_due(state) {
        advances += 1;
    }
    advances
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::goals::target_bank;
    use crate::types::BankId;

    fn funded_bank(balance: f64) -> BankState {
        let mut bank = BankState::new(BankId(1), "main");
        bank.initial_balance = 100.0;
        bank.balance = balance;
        bank
    }

    #[test]
    fn day_one_is_always_due() {
        // The due day is target_day + 1 and target_day never reports below
        // 1, so a bank on day 1 advances to day 2 at the first check
        // regardless of balance.
        let mut bank = funded_bank(100.0);
        assert!(advance_day_if_due(&mut bank));
        assert_eq!(bank.day, 2);
        assert_eq!(bank.current_target, day_goal(100.0, 100.0, 2));
        assert_eq!(bank.daily_goal, bank.current_target);
    }

    #[test]
    fn no_advance_while_the_next_target_is_unmet() {
        // Day 2's target is 103.02; a balance short of it earns nothing.
        let mut bank = funded_bank(103.01);
        bank.day = 2;
        assert!(!advance_day_if_due(&mut bank));
        assert_eq!(bank.day, 2);
    }

    #[test]
    fn advances_once_the_days_target_is_reached() {
        let mut bank = funded_bank(103.02);
        bank.day = 2;
        assert!(advance_day_if_due(&mut bank));
        assert_eq!(bank.day, 3);
        assert_eq!(bank.current_target, day_goal(100.0, 103.02, 3));
    }

    #[test]
    fn repeated_calls_are_idempotent_until_balance_changes() {
        let mut bank = funded_bank(101.5);
        assert!(advance_day_if_due(&mut bank));
        assert!(!advance_day_if_due(&mut bank));
        assert!(!advance_day_if_due(&mut bank));

        bank.balance = 103.02; // day-2 target reached
        assert!(advance_day_if_due(&mut bank));
        assert_eq!(bank.day, 3);
        assert!(!advance_day_if_due(&mut bank));
    }

    #[test]
    fn one_advance_can_span_several_days() {
        // 110 clears targets for days 1..=6 (1.015^6 ≈ 1.0934).
        let mut bank = funded_bank(110.0);
        let advances = advance_due_days(&mut bank);

        assert_eq!(advances, 1);
        assert_eq!(bank.day, 7);
    }

    #[test]
    fn advance_wipes_recovery_state() {
        let mut bank = funded_bank(101.5);
        bank.in_recovery_mode = true;
        bank.loss_record = vec![4.0, 3.0];
        bank.sub_goals = vec![1.0, 1.0, 1.0, 1.0];
        bank.original_goal = 4.0;

        assert!(advance_day_if_due(&mut bank));

        assert!(!bank.in_recovery_mode);
        assert!(bank.loss_record.is_empty());
        assert!(bank.sub_goals.is_empty());
        assert_eq!(bank.original_goal, 0.0);
    }

    #[test]
    fn saturates_at_the_day_cap() {
        // A balance beyond the whole curve pins target_day at 300.
        let mut bank = funded_bank(target_bank(100.0, 300) * 2.0);
        assert!(advance_day_if_due(&mut bank));
        assert_eq!(bank.day, 301);
        assert!(!advance_day_if_due(&mut bank));
    }
}
