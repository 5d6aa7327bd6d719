//! Config Module
//!
//! Centralized configuration for the coin scene, toss randomization and settling.

pub mod oracle_config;

pub use oracle_config::{CoinConfig, OracleConfig, SettleConfig, SettleMode, TossConfig};
