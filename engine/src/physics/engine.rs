//! Engine strategy
//!
//! Both engines share [`PhysicsWorld`] storage and only differ in how a
//! step advances it. The engine is picked once at startup.

use super::config::{EngineKind, PhysicsConfig};
use super::contact::ContactEngine;
use super::fallback::FallbackEngine;
use super::rigid_body::RigidBody;
use super::world::PhysicsWorld;

/// A stepping strategy for a [`PhysicsWorld`].
pub trait PhysicsEngine: Send {
    /// Short name for logs.
    fn name(&self) -> &'static str;

    /// Advance every dynamic body in `world` by `dt` seconds.
    fn step(&mut self, world: &mut PhysicsWorld, dt: f32);

    /// Whether `body` has come to rest, as this engine leaves bodies at rest.
    fn is_at_rest(&self, body: &RigidBody, linear_epsilon: f32, angular_epsilon: f32) -> bool {
        body.is_resting(linear_epsilon, angular_epsilon)
    }
}

/// Build the engine requested by `config`.
///
/// When the contact engine cannot be built from the configured parameters
/// the fallback stepper is substituted and a warning is logged.
pub fn create_engine(kind: EngineKind, config: &PhysicsConfig) -> Box<dyn PhysicsEngine> {
    match kind {
        EngineKind::Contact => match ContactEngine::new(config.contact) {
            Ok(engine) => {
                tracing::info!(engine = engine.name(), params = ?engine.params(), "physics engine ready");
                Box::new(engine)
            }
            Err(err) => {
                tracing::warn!(error = %err, "contact engine unavailable, using fallback stepper");
                fallback(config)
            }
        },
        EngineKind::Fallback => fallback(config),
    }
}

fn fallback(config: &PhysicsConfig) -> Box<dyn PhysicsEngine> {
    let engine = FallbackEngine::new(config.fallback);
    tracing::info!(engine = engine.name(), params = ?engine.params(), "physics engine ready");
    Box::new(engine)
}
