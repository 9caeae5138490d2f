//! Target-curve and stake arithmetic.
//!
//! Pure functions over plain numbers; no state is touched here. All monetary
//! results are rounded to 2 decimal places, matching what gets persisted.

/// Daily compounding factor of the target curve.
pub const DAILY_GROWTH: f64 = 1.015;

/// Hard cap on the progression day. The day search never reports past this,
/// so the day counter saturates one past it.
pub const MAX_DAY: u32 = 300;

/// Allowed range for an initial bank amount.
pub const MIN_INITIAL_BALANCE: f64 = 10.0;
pub const MAX_INITIAL_BALANCE: f64 = 100_000.0;

/// Allowed range for bet odds.
pub const MIN_COEFFICIENT: f64 = 1.1;
pub const MAX_COEFFICIENT: f64 = 9.9;

/// A stake may not exceed this fraction of the current balance.
pub const MAX_STAKE_FRACTION: f64 = 0.20;

/// Rounds a currency amount to 2 decimal places.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// The target bank value for a given day: `initial × 1.015^day`, rounded.
///
/// `day` is a plain exponent; day 0 is the initial balance itself.
pub fn target_bank(initial: f64, day: u32) -> f64 {
    round2(initial * DAILY_GROWTH.powi(day as i32))
}

/// The profit still needed to lift `balance` to `target`.
///
/// May be negative when the balance already exceeds the target; the raw
/// signed value is surfaced so callers can tell the account is ahead of
/// schedule.
pub fn daily_goal(balance: f64, target: f64) -> f64 {
    round2(target - balance)
}

/// The day-based goal for a bank on a given day.
pub fn day_goal(initial: f64, balance: f64, day: u32) -> f64 {
    daily_goal(balance, target_bank(initial, day))
}

/// The stake size such that a win at the given odds yields exactly `target`
/// profit: `stake × (coeff − 1) = target`.
///
/// Returns 0 for odds at or below even money, or a non-positive target.
pub fn stake_for(target: f64, coeff: f64) -> f64 {
    if coeff <= 1.0 || target <= 0.0 {
        return 0.0;
    }
    round2(target / (coeff - 1.0))
}

/// The largest day `d` in `[1, MAX_DAY]` whose target bank value the balance
/// has reached (`target_bank(initial, d) <= balance`).
///
/// Returns 1 when no initial balance is set or the balance is below it.
///
/// Solved in closed form from the logarithm and then corrected against the
/// rounded curve, so the result is identical to walking the curve day by
/// day, including the advance-at-equality rule.
pub fn target_day(balance: f64, initial: f64) -> u32 {
    if initial <= 0.0 || balance < initial {
        return 1;
    }

    let estimate = (balance / initial).ln() / DAILY_GROWTH.ln();
    let mut day = estimate.floor().clamp(1.0, MAX_DAY as f64) as u32;

    // The estimate ignores per-day rounding; nudge to the exact boundary.
    while day > 1 && target_bank(initial, day) > balance {
        day -= 1;
    }
    while day < MAX_DAY && target_bank(initial, day + 1) <= balance {
        day += 1;
    }
    day
}

/// The target-bank curve over an inclusive day range, for plan listings.
pub fn plan_between(initial: f64, from_day: u32, to_day: u32) -> Vec<(u32, f64)> {
    (from_day..=to_day.min(MAX_DAY))
        .map(|day| (day, target_bank(initial, day)))
        .collect()
}
