//! Game Module
//!
//! The coin oracle built on top of the engine's physics: scene setup,
//! toss sequencing, outcome classification and the hexagram table.

pub mod classifier;
pub mod coins;
pub mod config;
pub mod display;
pub mod error;
pub mod hexagram;
pub mod reading;
pub mod toss;

pub use classifier::{Classifier, DEFAULT_FLAT_THRESHOLD};
pub use coins::{CoinSet, TossLaunch};
pub use config::{CoinConfig, OracleConfig, SettleConfig, SettleMode, TossConfig};
pub use display::{ConsoleDisplay, DisplaySink, LatestDisplay, RecordingDisplay, TriggerState};
pub use error::OracleError;
pub use hexagram::{Hexagram, HexagramEntry, HexagramTable, UNRECOGNIZED_MESSAGE};
pub use reading::{COIN_COUNT, Outcome, Reading, ReadingKey};
pub use toss::{Simulation, TossPhase};
