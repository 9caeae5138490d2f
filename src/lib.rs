//! Bankroll Bot - a staking-plan calculator for multi-day bank progressions.
//!
//! This library provides the core domain types and logic for the bankroll
//! bot: the progression engine (daily compounding targets, stake sizing, and
//! the loss-recovery state machine), the typed action vocabulary, and the
//! storage, access-control, and dispatch collaborators around it.

pub mod access;
pub mod commands;
pub mod config;
pub mod dispatch;
pub mod engine;
pub mod persistence;
pub mod server;
pub mod types;
