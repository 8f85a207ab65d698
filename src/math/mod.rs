//! Math semantics on top of cgmath
//!
//! The raw vector/matrix/quaternion types come from cgmath. This module adds
//! the conventions the engine is built on: semantic direction axes, zero-safe
//! normalization, tolerance-based equality and the `Transform` composite.

pub mod direction;
pub mod rotation;
pub mod transform;

pub use direction::{
    normalize_safe, quat_approx_eq, scalar_approx_eq, vec3_approx_eq, BACK, DOWN, FORWARD, LEFT,
    RIGHT, UP,
};
pub use rotation::{is_zero_quat, normalize_quat_safe, rotation_from_direction};
pub use transform::Transform;
