//! Physics module for the coin oracle
//!
//! Custom rigid-body physics for flat cylindrical coins. Built from
//! scratch without external physics library dependencies.
//!
//! # Unit System
//!
//! **1 unit = 1 meter** (SI units throughout)
//!
//! - Distances in meters
//! - Velocities in m/s
//! - Accelerations in m/s²
//! - Mass in kg
//!
//! # Submodules
//!
//! - [`types`] - Core mathematical types (Vec3, Quat) re-exported from glam
//! - [`rigid_body`] - Coin-shaped rigid bodies and impulse application
//! - [`world`] - Body storage shared by every engine
//! - [`engine`] - The [`PhysicsEngine`] strategy and engine selection
//! - [`contact`] - Full engine: sub-stepping, rim contacts, friction
//! - [`fallback`] - Minimal stepper with a resting-plane response
//! - [`config`] - Gravity, time step and per-engine parameters

pub mod config;
pub mod contact;
pub mod engine;
pub mod error;
pub mod fallback;
pub mod rigid_body;
pub mod types;
pub mod world;

// Re-export commonly used types at the physics module level
pub use config::{ContactParams, EngineKind, FallbackParams, PhysicsConfig};
pub use contact::ContactEngine;
pub use engine::{PhysicsEngine, create_engine};
pub use error::PhysicsError;
pub use fallback::FallbackEngine;
pub use rigid_body::{BodyHandle, CoinShape, RigidBody};
pub use types::{Quat, Vec3};
pub use world::{DEFAULT_GRAVITY, PhysicsWorld};
