//! Fallback rigid-body stepper
//!
//! Minimal substitute used when the contact engine is unavailable.
//! Bodies never interact with each other, only with the implicit ground
//! plane: a body rests when its centre sits at `shape.height / 2`.
//!
//! Per dynamic body and step:
//! - `v += g * dt`
//! - `p += v * dt`
//! - `q = normalize(delta(ω * dt) * q)`, with `delta` built from XYZ Euler increments
//! - below the rest height: clamp, invert and scale vertical speed by the
//!   restitution, scale horizontal and angular velocity by the damping
//!
//! Accumulated forces are not integrated.
//!
//! A body resting on the ground never stops bouncing vertically: each step
//! gravity pulls it below the rest height and the clamp sends it back up at
//! about `g * dt / 3`. Rest detection therefore looks at a body sitting at
//! the rest height and ignores that vertical speed.

use super::config::FallbackParams;
use super::engine::PhysicsEngine;
use super::rigid_body::RigidBody;
use super::types::{quat_from_euler_xyz, renormalize};
use super::world::PhysicsWorld;

/// Slack above the rest height that still counts as lying on the ground.
const REST_HEIGHT_TOLERANCE: f32 = 1e-4;

#[derive(Debug, Clone, Copy, Default)]
pub struct FallbackEngine {
    params: FallbackParams,
}

impl FallbackEngine {
    pub fn new(params: FallbackParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &FallbackParams {
        &self.params
    }
}

impl PhysicsEngine for FallbackEngine {
    fn name(&self) -> &'static str {
        "fallback"
    }

    fn step(&mut self, world: &mut PhysicsWorld, dt: f32) {
        let gravity = world.gravity;
        let FallbackParams {
            restitution,
            damping,
        } = self.params;

        for body in world.dynamic_bodies_mut() {
            body.velocity += gravity * dt;
            body.position += body.velocity * dt;

            let delta = quat_from_euler_xyz(body.angular_velocity * dt);
            body.orientation = renormalize(delta * body.orientation);

            let rest_height = body.shape.half_height();
            if body.position.y < rest_height {
                body.position.y = rest_height;
                body.velocity.y = -body.velocity.y * restitution;
                body.velocity.x *= damping;
                body.velocity.z *= damping;
                body.angular_velocity *= damping;
            }
        }
    }

    fn is_at_rest(&self, body: &RigidBody, linear_epsilon: f32, angular_epsilon: f32) -> bool {
        let grounded = body.position.y <= body.shape.half_height() + REST_HEIGHT_TOLERANCE;
        let horizontal = body.velocity.x.hypot(body.velocity.z);
        grounded && horizontal < linear_epsilon && body.angular_velocity.length() < angular_epsilon
    }
}
