//! Quaternion construction helpers
//!
//! Orientations are expressed as unit quaternions. Identity is the rotation
//! that maps the forward axis onto itself.

use cgmath::{InnerSpace, One, Quaternion, Vector3};

use super::direction::{normalize_safe, FORWARD};

/// True if every component of the quaternion is zero
pub fn is_zero_quat(q: Quaternion<f32>) -> bool {
    q.magnitude2() == 0.0
}

/// Normalize a quaternion; the zero quaternion is returned unchanged
pub fn normalize_quat_safe(q: Quaternion<f32>) -> Quaternion<f32> {
    if is_zero_quat(q) {
        q
    } else {
        q.normalize()
    }
}

/// Rotation carrying the forward axis onto `dir`
///
/// The zero vector and the forward axis itself both map to identity. For the
/// exact opposite of forward, cgmath picks an arbitrary perpendicular axis.
pub fn rotation_from_direction(dir: Vector3<f32>) -> Quaternion<f32> {
    let dir = normalize_safe(dir);
    if dir.magnitude2() == 0.0 {
        return Quaternion::one();
    }
    Quaternion::from_arc(FORWARD, dir, None)
}
