//! Coin Oracle Engine Library
//!
//! Three-coin divination built on a small rigid-body simulation.
//!
//! # Modules
//!
//! - [`physics`] - Rigid bodies, the contact engine and the fallback stepper
//! - [`render`] - Per-coin instance records for renderers
//! - [`game`] - Toss sequencing, outcome classification and the hexagram table
//!
//! # Example
//!
//! ```ignore
//! use coin_oracle_engine::game::{OracleConfig, RecordingDisplay, Simulation};
//!
//! let mut sim = Simulation::new(OracleConfig::default())?;
//! let mut display = RecordingDisplay::new();
//!
//! sim.request_toss(&mut display);
//! loop {
//!     if let Some(reading) = sim.frame(1.0 / 60.0, &mut display) {
//!         println!("{}", reading.title());
//!         break;
//!     }
//! }
//! ```

pub mod physics;
pub mod render;

// Game-specific modules (located in src/game/ directory)
#[path = "../../src/game/mod.rs"]
pub mod game;

// Browser bindings
#[cfg(target_arch = "wasm32")]
pub mod wasm;

// Re-export commonly used types for convenience
pub use game::{OracleConfig, OracleError, Reading, ReadingKey, Simulation, TossPhase};
pub use physics::{EngineKind, PhysicsEngine, PhysicsWorld};
pub use render::CoinInstance;
