//! The input collaborator's vocabulary and parsers.
//!
//! User interaction arrives as discrete, typed [`Action`]s, one engine
//! transition each. This module defines that vocabulary and the pure parsers
//! that map raw transport input (button-callback payloads, typed amounts)
//! onto it.
//!
//! # Example
//!
//! ```
//! use bankroll_bot::commands::{parse_amount, parse_callback, Action};
//! use bankroll_bot::types::{BankId, BetOutcome};
//!
//! assert_eq!(
//!     parse_callback("result_win"),
//!     Some(Action::ReportResult { outcome: BetOutcome::Win })
//! );
//! assert_eq!(
//!     parse_callback("select_bank_3"),
//!     Some(Action::SwitchBank { bank: BankId(3) })
//! );
//! assert_eq!(parse_amount("2,5"), Some(2.5));
//! ```

mod parser;
mod types;

pub use parser::{parse_amount, parse_callback};
pub use types::Action;
