//! Rigid bodies for coin simulation
//!
//! A coin is a flat cylinder: its face normal is local +Y, the head face
//! sits at `+height/2` and the tail face at `-height/2`.
//!
//! # Example
//!
//! ```ignore
//! use coin_oracle_engine::physics::{CoinShape, RigidBody};
//! use glam::{Quat, Vec3};
//!
//! let mut coin = RigidBody::new(1.0, CoinShape::default(), Vec3::new(0.0, 10.0, 0.0), Quat::IDENTITY);
//! coin.apply_impulse(Vec3::new(0.0, 7.5, 0.0));
//! ```

use glam::{Mat3, Quat, Vec3};
use serde::{Deserialize, Serialize};

use super::types::{UP, renormalize};

/// Flat cylinder descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CoinShape {
    /// Face radius (meters)
    pub radius: f32,
    /// Thickness along the local Y axis (meters)
    pub height: f32,
}

impl Default for CoinShape {
    fn default() -> Self {
        Self {
            radius: 2.0,
            height: 0.2,
        }
    }
}

impl CoinShape {
    /// Half thickness; the fallback stepper rests the body centre at this height.
    pub fn half_height(&self) -> f32 {
        self.height * 0.5
    }

    /// Principal moments of inertia of a solid cylinder about its centre,
    /// in body space (X, Y = symmetry axis, Z).
    pub fn principal_inertia(&self, mass: f32) -> Vec3 {
        let r2 = self.radius * self.radius;
        let h2 = self.height * self.height;
        let transverse = mass * (3.0 * r2 + h2) / 12.0;
        let axial = 0.5 * mass * r2;
        Vec3::new(transverse, axial, transverse)
    }
}

/// Index of a body inside a [`PhysicsWorld`](super::PhysicsWorld).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BodyHandle(pub(crate) usize);

impl BodyHandle {
    pub fn index(self) -> usize {
        self.0
    }
}

/// A simulated rigid body.
#[derive(Debug, Clone, Copy)]
pub struct RigidBody {
    /// Centre of mass in world space (meters)
    pub position: Vec3,
    /// Body-to-world rotation, kept at unit length
    pub orientation: Quat,
    /// Linear velocity (m/s)
    pub velocity: Vec3,
    /// Angular velocity in world space (rad/s)
    pub angular_velocity: Vec3,
    /// Accumulated force for the next step (N)
    pub force: Vec3,
    /// Mass (kg). Zero marks an immovable body.
    pub mass: f32,
    pub shape: CoinShape,
    /// Time spent slow and on the ground (seconds), kept by the contact engine
    pub rest_time: f32,
    /// Sleeping bodies are skipped by the contact engine until woken
    pub asleep: bool,
}

impl RigidBody {
    pub fn new(mass: f32, shape: CoinShape, position: Vec3, orientation: Quat) -> Self {
        Self {
            position,
            orientation: renormalize(orientation),
            velocity: Vec3::ZERO,
            angular_velocity: Vec3::ZERO,
            force: Vec3::ZERO,
            mass: mass.max(0.0),
            shape,
            rest_time: 0.0,
            asleep: false,
        }
    }

    /// An immovable body (the ground).
    pub fn fixed(shape: CoinShape, position: Vec3) -> Self {
        Self::new(0.0, shape, position, Quat::IDENTITY)
    }

    pub fn is_static(&self) -> bool {
        self.mass <= 0.0
    }

    pub fn inv_mass(&self) -> f32 {
        if self.is_static() { 0.0 } else { 1.0 / self.mass }
    }

    /// Clear the sleep state so the next step simulates the body again.
    pub fn wake(&mut self) {
        self.asleep = false;
        self.rest_time = 0.0;
    }

    /// `velocity += impulse / mass`; no-op for static bodies. Wakes the body.
    pub fn apply_impulse(&mut self, impulse: Vec3) {
        if self.is_static() {
            return;
        }
        self.velocity += impulse / self.mass;
        self.wake();
    }

    /// Impulse applied at an offset `r` from the centre of mass.
    /// Solver-internal: does not wake the body or reset its rest time.
    pub fn apply_impulse_at(&mut self, impulse: Vec3, r: Vec3) {
        if self.is_static() {
            return;
        }
        self.velocity += impulse * self.inv_mass();
        self.angular_velocity += self.inv_inertia_world() * r.cross(impulse);
    }

    /// Accumulate a force for the next step.
    pub fn apply_force(&mut self, force: Vec3) {
        self.force += force;
        self.wake();
    }

    pub fn clear_forces(&mut self) {
        self.force = Vec3::ZERO;
    }

    /// Teleport the body and zero every velocity.
    pub fn set_pose(&mut self, position: Vec3, orientation: Quat) {
        self.position = position;
        self.orientation = renormalize(orientation);
        self.velocity = Vec3::ZERO;
        self.angular_velocity = Vec3::ZERO;
        self.force = Vec3::ZERO;
        self.wake();
    }

    /// The body's local up axis expressed in world space.
    pub fn up_axis(&self) -> Vec3 {
        self.orientation * UP
    }

    /// Inverse inertia tensor in world space. Zero for static bodies.
    pub fn inv_inertia_world(&self) -> Mat3 {
        if self.is_static() {
            return Mat3::ZERO;
        }
        let inertia = self.shape.principal_inertia(self.mass);
        let inv_body = Mat3::from_diagonal(Vec3::new(
            1.0 / inertia.x.max(1e-6),
            1.0 / inertia.y.max(1e-6),
            1.0 / inertia.z.max(1e-6),
        ));
        let rot = Mat3::from_quat(self.orientation);
        rot * inv_body * rot.transpose()
    }

    /// True when both linear and angular speed are under the given limits.
    pub fn is_resting(&self, linear_epsilon: f32, angular_epsilon: f32) -> bool {
        self.velocity.length() < linear_epsilon && self.angular_velocity.length() < angular_epsilon
    }
}
