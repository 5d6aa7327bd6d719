//! Body storage shared by every physics engine
//!
//! The world owns the bodies and the gravity vector; engines only
//! decide how a step advances them.

use glam::{Quat, Vec3};

use super::rigid_body::{BodyHandle, RigidBody};

/// Standard gravity used by the coin scene (m/s²).
pub const DEFAULT_GRAVITY: Vec3 = Vec3::new(0.0, -9.82, 0.0);

/// Collection of rigid bodies plus global parameters.
#[derive(Debug, Clone)]
pub struct PhysicsWorld {
    bodies: Vec<RigidBody>,
    pub gravity: Vec3,
}

impl Default for PhysicsWorld {
    fn default() -> Self {
        Self::new(DEFAULT_GRAVITY)
    }
}

impl PhysicsWorld {
    pub fn new(gravity: Vec3) -> Self {
        Self {
            bodies: Vec::new(),
            gravity,
        }
    }

    /// Add a body and return its handle. Bodies are never removed.
    pub fn add_body(&mut self, body: RigidBody) -> BodyHandle {
        self.bodies.push(body);
        BodyHandle(self.bodies.len() - 1)
    }

    pub fn body(&self, handle: BodyHandle) -> Option<&RigidBody> {
        self.bodies.get(handle.0)
    }

    pub fn body_mut(&mut self, handle: BodyHandle) -> Option<&mut RigidBody> {
        self.bodies.get_mut(handle.0)
    }

    pub fn bodies(&self) -> &[RigidBody] {
        &self.bodies
    }

    /// Bodies with `mass > 0`.
    pub fn dynamic_bodies_mut(&mut self) -> impl Iterator<Item = &mut RigidBody> {
        self.bodies.iter_mut().filter(|b| !b.is_static())
    }

    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    /// Returns false when the handle does not name a body.
    pub fn apply_impulse(&mut self, handle: BodyHandle, impulse: Vec3) -> bool {
        match self.body_mut(handle) {
            Some(body) => {
                body.apply_impulse(impulse);
                true
            }
            None => false,
        }
    }

    pub fn apply_force(&mut self, handle: BodyHandle, force: Vec3) -> bool {
        match self.body_mut(handle) {
            Some(body) => {
                body.apply_force(force);
                true
            }
            None => false,
        }
    }

    pub fn set_pose(&mut self, handle: BodyHandle, position: Vec3, orientation: Quat) -> bool {
        match self.body_mut(handle) {
            Some(body) => {
                body.set_pose(position, orientation);
                true
            }
            None => false,
        }
    }

    pub fn set_angular_velocity(&mut self, handle: BodyHandle, angular_velocity: Vec3) -> bool {
        match self.body_mut(handle) {
            Some(body) if !body.is_static() => {
                body.angular_velocity = angular_velocity;
                body.wake();
                true
            }
            _ => false,
        }
    }
}
