//! Contact data shared by detection, resolution and event dispatch

use cgmath::Vector3;

use super::BodyId;

/// Single contact point between two colliders
#[derive(Debug, Clone, Copy)]
pub struct ContactPoint {
    /// World-space contact position
    pub position: Vector3<f32>,
    /// Contact normal, pointing from the first body of the pair to the second
    pub normal: Vector3<f32>,
    /// Overlap depth along the normal
    pub penetration_depth: f32,
}

impl ContactPoint {
    pub fn new(position: Vector3<f32>, normal: Vector3<f32>, penetration_depth: f32) -> Self {
        Self {
            position,
            normal,
            penetration_depth,
        }
    }

    /// Same point with the normal flipped, for the swapped pair order
    pub fn flipped(&self) -> Self {
        Self {
            position: self.position,
            normal: -self.normal,
            penetration_depth: self.penetration_depth,
        }
    }
}

/// Ordered pair of bodies in contact
///
/// The smaller id is always stored first so a pair has one canonical key
/// regardless of detection order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ContactPair {
    pub body_a: BodyId,
    pub body_b: BodyId,
}

impl ContactPair {
    pub fn new(a: BodyId, b: BodyId) -> Self {
        if a < b {
            Self {
                body_a: a,
                body_b: b,
            }
        } else {
            Self {
                body_a: b,
                body_b: a,
            }
        }
    }

    pub fn contains(&self, body: BodyId) -> bool {
        self.body_a == body || self.body_b == body
    }
}
