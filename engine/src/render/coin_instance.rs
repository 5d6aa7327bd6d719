//! Per-coin instance data for renderers
//!
//! The renderer owns meshes and materials; each frame it only needs the
//! pose of every coin. `CoinInstance` is the record a host copies into an
//! instance buffer.
//!
//! Layout (80 bytes, matches a WGSL `struct { model: mat4x4<f32>, face_up: u32, pad: vec3<u32> }`):
//!   offset  0: model (mat4x4<f32>, column-major) = 64 bytes
//!   offset 64: face_up (u32)                     = 4 bytes
//!   offset 68: _pad ([u32; 3])                   = 12 bytes

use glam::Mat4;

use crate::physics::{RigidBody, Vec3};

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct CoinInstance {
    /// Body-to-world transform, column-major
    pub model: [[f32; 4]; 4],
    /// 1 when the head face currently points up
    pub face_up: u32,
    pub _pad: [u32; 3],
}

static_assertions::assert_eq_size!(CoinInstance, [u8; 80]);

impl Default for CoinInstance {
    fn default() -> Self {
        Self {
            model: Mat4::IDENTITY.to_cols_array_2d(),
            face_up: 1,
            _pad: [0; 3],
        }
    }
}

impl CoinInstance {
    pub fn from_body(body: &RigidBody) -> Self {
        let model = Mat4::from_rotation_translation(body.orientation, body.position);
        Self {
            model: model.to_cols_array_2d(),
            face_up: u32::from(body.up_axis().dot(Vec3::Y) >= 0.0),
            _pad: [0; 3],
        }
    }

    pub fn model_matrix(&self) -> Mat4 {
        Mat4::from_cols_array_2d(&self.model)
    }
}

/// Instances for a list of bodies, in order.
pub fn coin_instances<'a>(bodies: impl IntoIterator<Item = &'a RigidBody>) -> Vec<CoinInstance> {
    bodies.into_iter().map(CoinInstance::from_body).collect()
}
