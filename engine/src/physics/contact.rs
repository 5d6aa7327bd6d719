//! Contact engine
//!
//! The full-featured coin engine. Each `step` is split into sub-steps;
//! every sub-step does semi-implicit integration, then resolves ground
//! contacts with sequential impulses (restitution plus Coulomb friction),
//! then lifts the body out of any remaining penetration.
//!
//! Each face rim is sampled; the samples below the ground are reduced to
//! one contact per face at their centroid, so a coin landing flat gets a
//! pure vertical impulse.
//!
//! A body that stays on or near the ground below both sleep speeds for
//! `sleep_time` is put to sleep: its velocities are zeroed, a nearly flat
//! coin is laid exactly flat at half its height, and later steps skip it
//! until an impulse, force or pose change wakes it.
//!
//! The ground is the plane `y = 0` with normal +Y. Bodies never touch
//! each other.

use std::f32::consts::TAU;

use glam::{Quat, Vec3};

use super::config::ContactParams;
use super::engine::PhysicsEngine;
use super::error::PhysicsError;
use super::rigid_body::RigidBody;
use super::types::{UP, renormalize};
use super::world::PhysicsWorld;

const GROUND_Y: f32 = 0.0;
const EPS: f32 = 1e-6;
/// A lowest point this close to the ground still counts as supported.
const SUPPORT_MARGIN: f32 = 0.02;
/// Minimum |up · Y| for a sleeping coin to be laid flat.
const FLAT_SNAP: f32 = 0.9;

#[derive(Debug, Clone)]
pub struct ContactEngine {
    params: ContactParams,
    /// Unit circle samples (cos, sin) shared by every body.
    rim: Vec<(f32, f32)>,
}

impl ContactEngine {
    pub fn new(params: ContactParams) -> Result<Self, PhysicsError> {
        params.validate()?;
        let rim = (0..params.rim_samples)
            .map(|i| {
                let angle = i as f32 / params.rim_samples as f32 * TAU;
                (angle.cos(), angle.sin())
            })
            .collect();
        Ok(Self { params, rim })
    }

    pub fn params(&self) -> &ContactParams {
        &self.params
    }

    /// Rim points of one face relative to the centre of mass, in world space.
    fn rim_offsets(&self, body: &RigidBody, face_y: f32) -> impl Iterator<Item = Vec3> + '_ {
        let radius = body.shape.radius;
        let orientation = body.orientation;
        self.rim
            .iter()
            .map(move |&(c, s)| orientation * Vec3::new(radius * c, face_y, radius * s))
    }

    /// One contact per face: the centroid of that face's rim samples below the ground.
    fn face_contact(&self, body: &RigidBody, face_y: f32) -> Option<Vec3> {
        let (sum, count) = self
            .rim_offsets(body, face_y)
            .filter(|r| body.position.y + r.y < GROUND_Y)
            .fold((Vec3::ZERO, 0u32), |(sum, count), r| (sum + r, count + 1));
        (count > 0).then(|| sum / count as f32)
    }

    fn integrate(&self, body: &mut RigidBody, gravity: Vec3, h: f32) {
        let acceleration = gravity + body.force * body.inv_mass();
        body.velocity += acceleration * h;
        body.position += body.velocity * h;

        // q' = 0.5 * ω * q
        let w = body.angular_velocity;
        let spin = Quat::from_xyzw(w.x, w.y, w.z, 0.0) * body.orientation;
        body.orientation = renormalize(body.orientation + spin * (0.5 * h));
    }

    fn resolve_contacts(&self, body: &mut RigidBody) -> bool {
        let half = body.shape.half_height();
        let mut touching = false;
        for _ in 0..self.params.iterations {
            for face_y in [half, -half] {
                if let Some(r) = self.face_contact(body, face_y) {
                    touching = true;
                    self.resolve_point(body, r);
                }
            }
        }
        touching
    }

    fn resolve_point(&self, body: &mut RigidBody, r: Vec3) {
        let n = UP;
        let v_rel = body.velocity + body.angular_velocity.cross(r);
        let vn = v_rel.dot(n);
        if vn >= 0.0 {
            return;
        }

        let inv_inertia = body.inv_inertia_world();
        let inv_mass = body.inv_mass();
        let angular = (inv_inertia * r.cross(n)).cross(r).dot(n);
        let denom = (inv_mass + angular).max(EPS);

        let e = if vn < -self.params.restitution_threshold {
            self.params.restitution
        } else {
            0.0
        };
        let jn = (-(1.0 + e) * vn / denom).max(0.0);
        body.apply_impulse_at(n * jn, r);

        let v_post = body.velocity + body.angular_velocity.cross(r);
        let vt = v_post - n * v_post.dot(n);
        let vt_len = vt.length();
        if vt_len <= EPS {
            return;
        }
        let t = vt / vt_len;
        let angular_t = (inv_inertia * r.cross(t)).cross(r).dot(t);
        let denom_t = (inv_mass + angular_t).max(EPS);
        let jt = -v_post.dot(t) / denom_t;

        let jf = if jt.abs() > self.params.static_friction * jn {
            self.params.dynamic_friction * jn * jt.signum()
        } else {
            jt
        };
        body.apply_impulse_at(t * jf, r);
    }

    /// Height of the lowest rim sample.
    fn lowest_point(&self, body: &RigidBody) -> f32 {
        let half = body.shape.half_height();
        self.rim_offsets(body, half)
            .chain(self.rim_offsets(body, -half))
            .map(|r| body.position.y + r.y)
            .fold(f32::INFINITY, f32::min)
    }

    fn lift_out_of_ground(&self, body: &mut RigidBody) {
        let lowest = self.lowest_point(body);
        if lowest < GROUND_Y {
            body.position.y += GROUND_Y - lowest;
            if body.velocity.y < 0.0 {
                body.velocity.y = 0.0;
            }
        }
    }

    /// Track how long the body has been slow and supported; sleep it once
    /// that lasts `sleep_time`.
    fn update_rest(&self, body: &mut RigidBody, touched: bool, dt: f32) {
        let supported = touched || self.lowest_point(body) <= GROUND_Y + SUPPORT_MARGIN;
        let slow = body.velocity.length() < self.params.sleep_linear_speed
            && body.angular_velocity.length() < self.params.sleep_angular_speed;
        if !(supported && slow) {
            body.rest_time = 0.0;
            return;
        }
        body.rest_time += dt;
        if body.rest_time >= self.params.sleep_time {
            Self::put_to_sleep(body);
        }
    }

    fn put_to_sleep(body: &mut RigidBody) {
        body.velocity = Vec3::ZERO;
        body.angular_velocity = Vec3::ZERO;
        let up = body.up_axis();
        if up.y.abs() >= FLAT_SNAP {
            let target = if up.y > 0.0 { UP } else { -UP };
            body.orientation = renormalize(Quat::from_rotation_arc(up, target) * body.orientation);
            body.position.y = GROUND_Y + body.shape.half_height();
        }
        body.asleep = true;
    }
}

impl PhysicsEngine for ContactEngine {
    fn name(&self) -> &'static str {
        "contact"
    }

    fn step(&mut self, world: &mut PhysicsWorld, dt: f32) {
        let gravity = world.gravity;
        let h = dt / self.params.substeps as f32;
        let damping = (1.0 - self.params.angular_damping * h).clamp(0.0, 1.0);
        let ground_damping = (1.0 - self.params.contact_damping * h).clamp(0.0, 1.0);

        for body in world.dynamic_bodies_mut() {
            if body.asleep {
                continue;
            }
            let mut touched = false;
            for _ in 0..self.params.substeps {
                self.integrate(body, gravity, h);
                let touching = self.resolve_contacts(body);
                self.lift_out_of_ground(body);
                body.angular_velocity *= damping;

                if touching {
                    touched = true;
                    body.velocity.x *= ground_damping;
                    body.velocity.z *= ground_damping;
                    body.angular_velocity *= ground_damping;
                }
            }
            self.update_rest(body, touched, dt);
            body.clear_forces();
        }
    }

    fn is_at_rest(&self, body: &RigidBody, linear_epsilon: f32, angular_epsilon: f32) -> bool {
        body.asleep || body.is_resting(linear_epsilon, angular_epsilon)
    }
}
