//! Goal splitting: breaking a target into smaller recovery goals.
//!
//! Two independent paths with mutually exclusive preconditions:
//!
//! - The main (day-based) goal splits into exactly 4 parts and moves the
//!   bank into recovery mode so the parts are chased one pair at a time.
//! - A single recovery goal splits into 2..=6 parts, replaced in place so
//!   the queue order is preserved.

use crate::types::BankState;

use super::goals::round2;
use super::recovery::recovery_target;
use super::{EngineError, PreconditionError, ValidationError};

/// Allowed part counts for a recovery-goal split.
pub const MIN_SPLIT_PARTS: u32 = 2;
pub const MAX_SPLIT_PARTS: u32 = 6;

/// A main-goal split always produces this many parts.
pub const MAIN_SPLIT_PARTS: u32 = 4;

/// Splits `total` into `parts` pieces that sum back to it at 2 decimals:
/// `parts − 1` copies of the rounded equal share, then a final remainder
/// part that absorbs the rounding drift.
pub fn split_into_parts(total: f64, parts: u32) -> Vec<f64> {
    let share = round2(total / parts as f64);
    let mut out = vec![share; (parts - 1) as usize];
    let remainder = total - share * (parts - 1) as f64;
    out.push(round2(remainder));
    out
}

/// Splits the main goal into 4 recovery parts and engages recovery mode.
///
/// Rejected while recovery mode is active, while a previous split is still
/// in effect (`sub_goals` non-empty), or when there is no positive target to
/// split. The split is undone only by a day advance.
pub fn split_main_goal(state: &mut BankState) -> Result<Vec<f64>, EngineError> {
    if state.in_recovery_mode {
        return Err(PreconditionError::RecoveryModeActive.into());
    }
    if !state.sub_goals.is_empty() {
        return Err(PreconditionError::GoalAlreadySplit.into());
    }
    if state.current_target <= 0.0 {
        return Err(PreconditionError::NoGoalToSplit.into());
    }

    let target = state.current_target;
    let parts = split_into_parts(target, MAIN_SPLIT_PARTS);

    state.loss_record.extend(parts.iter().copied());
    state.in_recovery_mode = true;
    state.sub_goals = parts.clone();
    state.original_goal = target;
    state.current_target = recovery_target(state);

    Ok(parts)
}

/// Splits one outstanding recovery goal, chosen by index, into `parts`
/// equal-plus-remainder pieces, replacing it in place.
pub fn split_recovery_goal(
    state: &mut BankState,
    index: usize,
    parts: u32,
) -> Result<Vec<f64>, EngineError> {
    if !(MIN_SPLIT_PARTS..=MAX_SPLIT_PARTS).contains(&parts) {
        return Err(ValidationError::PartCountOutOfRange { parts }.into());
    }
    if !state.in_recovery_mode || state.loss_record.is_empty() {
        return Err(PreconditionError::RecoveryModeInactive.into());
    }
    let len = state.loss_record.len();
    if index >= len {
        return Err(PreconditionError::GoalIndexOutOfBounds { index, len }.into());
    }

    let selected = state.loss_record[index];
    let pieces = split_into_parts(selected, parts);
    state
        .loss_record
        .splice(index..=index, pieces.iter().copied());
    state.current_target = recovery_target(state);

    Ok(pieces)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::day::advance_day_if_due;
    use crate::types::BankId;
    use proptest::prelude::*;

    fn bank_with_target(target: f64) -> BankState {
        let mut bank = BankState::new(BankId(1), "main");
        bank.initial_balance = 100.0;
        bank.balance = 100.0;
        bank.current_target = target;
        bank.daily_goal = target;
        bank
    }

    mod split_into_parts_tests {
        use super::*;

        #[test]
        fn even_total_splits_evenly() {
            assert_eq!(split_into_parts(100.0, 4), vec![25.0, 25.0, 25.0, 25.0]);
        }

        #[test]
        fn remainder_part_absorbs_rounding() {
            // 10 / 3 rounds to 3.33; the last part makes up the difference.
            assert_eq!(split_into_parts(10.0, 3), vec![3.33, 3.33, 3.34]);
            assert_eq!(split_into_parts(0.1, 4), vec![0.03, 0.03, 0.03, 0.01]);
        }

        proptest! {
            /// Exactly N parts, summing back to the total at 2 decimals, for
            /// every allowed part count.
            #[test]
            fn parts_sum_to_total(
                total in 0.01f64..100_000.0,
                parts in MIN_SPLIT_PARTS..=MAX_SPLIT_PARTS
            ) {
                let total = round2(total);
                let pieces = split_into_parts(total, parts);

                prop_assert_eq!(pieces.len(), parts as usize);
                let sum: f64 = pieces.iter().sum();
                prop_assert_eq!(round2(sum), total);
            }
        }
    }

    mod main_split_tests {
        use super::*;

        #[test]
        fn splits_into_four_and_engages_recovery() {
            let mut bank = bank_with_target(10.0);

            let parts = split_main_goal(&mut bank).unwrap();

            assert_eq!(parts, vec![2.5, 2.5, 2.5, 2.5]);
            assert_eq!(bank.loss_record, parts);
            assert_eq!(bank.sub_goals, parts);
            assert!(bank.in_recovery_mode);
            assert_eq!(bank.original_goal, 10.0);
            // Target is now the two oldest parts.
            assert_eq!(bank.current_target, 5.0);
        }

        #[test]
        fn rejected_without_a_positive_target() {
            let mut bank = bank_with_target(0.0);
            assert!(matches!(
                split_main_goal(&mut bank),
                Err(EngineError::Precondition(PreconditionError::NoGoalToSplit))
            ));

            bank.current_target = -2.0;
            assert!(split_main_goal(&mut bank).is_err());
        }

        #[test]
        fn rejected_while_in_recovery_mode() {
            let mut bank = bank_with_target(10.0);
            bank.in_recovery_mode = true;
            bank.loss_record = vec![4.0, 3.0];

            let before = bank.clone();
            let result = split_main_goal(&mut bank);

            assert!(matches!(
                result,
                Err(EngineError::Precondition(
                    PreconditionError::RecoveryModeActive
                ))
            ));
            assert_eq!(bank, before);
        }

        #[test]
        fn split_remains_blocked_after_recovery_completes_without_day_advance() {
            let mut bank = bank_with_target(10.0);
            split_main_goal(&mut bank).unwrap();

            // Wins can clear the recovery queue without earning a day, but
            // only a day advance clears `sub_goals`.
            bank.loss_record.clear();
            bank.in_recovery_mode = false;
            bank.current_target = 5.0;

            assert!(matches!(
                split_main_goal(&mut bank),
                Err(EngineError::Precondition(
                    PreconditionError::GoalAlreadySplit
                ))
            ));
        }

        #[test]
        fn resplit_rejected_until_a_day_advance_clears_it() {
            let mut bank = bank_with_target(10.0);
            split_main_goal(&mut bank).unwrap();

            assert!(matches!(
                split_main_goal(&mut bank),
                Err(EngineError::Precondition(
                    PreconditionError::RecoveryModeActive
                ))
            ));

            // A day advance wipes the split bookkeeping...
            bank.balance = 101.5;
            assert!(advance_day_if_due(&mut bank));
            assert!(bank.sub_goals.is_empty());
            assert!(!bank.in_recovery_mode);

            // ...after which splitting is allowed again.
            assert!(split_main_goal(&mut bank).is_ok());
        }
    }

    mod recovery_split_tests {
        use super::*;

        fn recovery_bank(goals: &[f64]) -> BankState {
            let mut bank = bank_with_target(1.5);
            bank.loss_record = goals.to_vec();
            bank.in_recovery_mode = true;
            bank
        }

        #[test]
        fn replaces_the_selected_goal_in_place() {
            let mut bank = recovery_bank(&[5.0, 10.0, 20.0]);

            let pieces = split_recovery_goal(&mut bank, 1, 2).unwrap();

            assert_eq!(pieces, vec![5.0, 5.0]);
            assert_eq!(bank.loss_record, vec![5.0, 5.0, 5.0, 20.0]);
            // Two oldest after the split.
            assert_eq!(bank.current_target, 10.0);
        }

        #[test]
        fn splitting_the_front_goal_retargets() {
            let mut bank = recovery_bank(&[9.0, 4.0]);

            split_recovery_goal(&mut bank, 0, 3).unwrap();

            assert_eq!(bank.loss_record, vec![3.0, 3.0, 3.0, 4.0]);
            assert_eq!(bank.current_target, 6.0);
        }

        #[test]
        fn part_count_outside_range_is_rejected() {
            let mut bank = recovery_bank(&[5.0, 10.0]);
            for parts in [0, 1, 7, 100] {
                assert!(matches!(
                    split_recovery_goal(&mut bank, 0, parts),
                    Err(EngineError::Validation(
                        ValidationError::PartCountOutOfRange { .. }
                    ))
                ));
            }
        }

        #[test]
        fn rejected_outside_recovery_mode() {
            let mut bank = bank_with_target(10.0);
            assert!(matches!(
                split_recovery_goal(&mut bank, 0, 2),
                Err(EngineError::Precondition(
                    PreconditionError::RecoveryModeInactive
                ))
            ));
        }

        #[test]
        fn index_out_of_bounds_is_rejected() {
            let mut bank = recovery_bank(&[5.0, 10.0]);
            let before = bank.clone();

            let result = split_recovery_goal(&mut bank, 2, 2);

            assert!(matches!(
                result,
                Err(EngineError::Precondition(
                    PreconditionError::GoalIndexOutOfBounds { index: 2, len: 2 }
                ))
            ));
            assert_eq!(bank, before);
        }

        proptest! {
            /// In-place replacement preserves the rest of the queue and the
            /// outstanding total.
            #[test]
            fn preserves_order_and_total(
                goals in prop::collection::vec(0.5f64..500.0, 2..6),
                index_seed in 0usize..6,
                parts in MIN_SPLIT_PARTS..=MAX_SPLIT_PARTS
            ) {
                let goals: Vec<f64> = goals.iter().map(|g| round2(*g)).collect();
                let index = index_seed % goals.len();
                let mut bank = recovery_bank(&goals);

                let pieces = split_recovery_goal(&mut bank, index, parts).unwrap();

                // Prefix and suffix are untouched.
                prop_assert_eq!(&bank.loss_record[..index], &goals[..index]);
                prop_assert_eq!(
                    &bank.loss_record[index + pieces.len()..],
                    &goals[index + 1..]
                );
                // Total outstanding is unchanged at 2 decimals.
                let before: f64 = goals.iter().sum();
                let after: f64 = bank.loss_record.iter().sum();
                prop_assert_eq!(round2(after), round2(before));
            }
        }
    }
}
