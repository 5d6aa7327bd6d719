//! Physics type re-exports from glam
//!
//! This module provides the core mathematical types used throughout
//! the physics system, re-exported from the glam library, plus the
//! couple of rotation helpers both engines share.

pub use glam::{EulerRot, Mat3, Mat4, Quat, Vec3};

/// World up axis. Coins are modelled with their face normal along local +Y.
pub const UP: Vec3 = Vec3::Y;

/// Build a rotation from XYZ Euler increments (radians).
///
/// Matches the classic `setFromEuler(x, y, z)` composition used by
/// browser physics libraries: `q = qx * qy * qz`.
pub fn quat_from_euler_xyz(angles: Vec3) -> Quat {
    Quat::from_euler(EulerRot::XYZ, angles.x, angles.y, angles.z)
}

/// Renormalize a quaternion, falling back to identity when it has collapsed.
pub fn renormalize(q: Quat) -> Quat {
    let len_sq = q.length_squared();
    if !len_sq.is_finite() || len_sq < 1e-12 {
        return Quat::IDENTITY;
    }
    q * len_sq.sqrt().recip()
}
