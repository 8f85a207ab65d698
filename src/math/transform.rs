//! Composite transform: position, rotation, scale
//!
//! The world matrix composes as translate x rotate x scale. Constructors run
//! `fix`, which repairs the one degenerate input the engine accepts: a
//! zero quaternion becomes the identity orientation derived from forward.

use cgmath::{Matrix4, One, Quaternion, Vector3, Zero};

use super::direction::FORWARD;
use super::rotation::{is_zero_quat, rotation_from_direction};

/// Position, orientation and scale of an entity
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub position: Vector3<f32>,
    pub rotation: Quaternion<f32>,
    pub scale: Vector3<f32>,
}

impl Transform {
    /// Build a transform, repairing a zero-quaternion rotation
    pub fn new(position: Vector3<f32>, rotation: Quaternion<f32>, scale: Vector3<f32>) -> Self {
        let mut t = Self {
            position,
            rotation,
            scale,
        };
        t.fix();
        t
    }

    /// Identity transform at the origin with unit scale
    pub fn identity() -> Self {
        Self {
            position: Vector3::zero(),
            rotation: Quaternion::one(),
            scale: Vector3::new(1.0, 1.0, 1.0),
        }
    }

    /// Replace a zero-quaternion rotation with the forward identity
    ///
    /// Any non-zero rotation is left untouched.
    pub fn fix(&mut self) {
        if is_zero_quat(self.rotation) {
            self.rotation = rotation_from_direction(FORWARD);
        }
    }

    /// World matrix, composed as T * R * S
    pub fn matrix(&self) -> Matrix4<f32> {
        Matrix4::from_translation(self.position)
            * Matrix4::from(self.rotation)
            * Matrix4::from_nonuniform_scale(self.scale.x, self.scale.y, self.scale.z)
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::identity()
    }
}
