//! Axis-aligned bounding boxes for the contact detection pass
//!
//! Oriented boxes are conservatively wrapped by the AABB of their rotated
//! corners; spheres by their center plus radius. Overlap, closest point and
//! minimum penetration are all the detection pass needs.

use cgmath::{Quaternion, Vector3};

use super::shape::Shape;

/// Axis-aligned bounding box in world space
#[derive(Debug, Clone, Copy)]
pub struct Aabb {
    pub min: Vector3<f32>,
    pub max: Vector3<f32>,
}

impl Aabb {
    pub fn from_center_half_extents(center: Vector3<f32>, half_extents: Vector3<f32>) -> Self {
        Self {
            min: center - half_extents,
            max: center + half_extents,
        }
    }

    /// Smallest AABB containing every point of the iterator
    ///
    /// Returns a degenerate box at the origin for an empty iterator.
    pub fn from_points(points: impl IntoIterator<Item = Vector3<f32>>) -> Self {
        let mut iter = points.into_iter();
        let first = match iter.next() {
            Some(p) => p,
            None => Vector3::new(0.0, 0.0, 0.0),
        };
        let mut min = first;
        let mut max = first;
        for p in iter {
            min.x = min.x.min(p.x);
            min.y = min.y.min(p.y);
            min.z = min.z.min(p.z);
            max.x = max.x.max(p.x);
            max.y = max.y.max(p.y);
            max.z = max.z.max(p.z);
        }
        Self { min, max }
    }

    /// World AABB of a scaled shape at a body pose
    pub fn from_shape(
        shape: &Shape,
        position: Vector3<f32>,
        rotation: Quaternion<f32>,
    ) -> Option<Self> {
        match *shape {
            Shape::Empty => None,
            Shape::Sphere { radius } => {
                let r = Vector3::new(radius, radius, radius);
                Some(Self::from_center_half_extents(position, r))
            }
            Shape::Box { half_extents } => {
                let corners = Shape::box_vertices(half_extents)
                    .into_iter()
                    .map(|v| position + rotation * v);
                Some(Self::from_points(corners))
            }
        }
    }

    pub fn center(&self) -> Vector3<f32> {
        (self.min + self.max) * 0.5
    }

    pub fn half_extents(&self) -> Vector3<f32> {
        (self.max - self.min) * 0.5
    }

    /// Overlap test, inclusive at the boundary so resting contact persists
    pub fn intersects(&self, other: &Aabb) -> bool {
        self.min.x <= other.max.x
            && self.max.x >= other.min.x
            && self.min.y <= other.max.y
            && self.max.y >= other.min.y
            && self.min.z <= other.max.z
            && self.max.z >= other.min.z
    }

    /// Point on or inside the box closest to `p`
    pub fn closest_point(&self, p: Vector3<f32>) -> Vector3<f32> {
        Vector3::new(
            p.x.clamp(self.min.x, self.max.x),
            p.y.clamp(self.min.y, self.max.y),
            p.z.clamp(self.min.z, self.max.z),
        )
    }

    /// Minimum translation to apply to `self` so it no longer overlaps
    /// `other`, along the axis of least overlap
    pub fn penetration_vector(&self, other: &Aabb) -> Option<Vector3<f32>> {
        if !self.intersects(other) {
            return None;
        }

        let x_overlap = self.max.x.min(other.max.x) - self.min.x.max(other.min.x);
        let y_overlap = self.max.y.min(other.max.y) - self.min.y.max(other.min.y);
        let z_overlap = self.max.z.min(other.max.z) - self.min.z.max(other.min.z);

        let c_self = self.center();
        let c_other = other.center();

        if x_overlap <= y_overlap && x_overlap <= z_overlap {
            let sign = if c_self.x < c_other.x { -1.0 } else { 1.0 };
            Some(Vector3::new(x_overlap * sign, 0.0, 0.0))
        } else if y_overlap <= x_overlap && y_overlap <= z_overlap {
            let sign = if c_self.y < c_other.y { -1.0 } else { 1.0 };
            Some(Vector3::new(0.0, y_overlap * sign, 0.0))
        } else {
            let sign = if c_self.z < c_other.z { -1.0 } else { 1.0 };
            Some(Vector3::new(0.0, 0.0, z_overlap * sign))
        }
    }
}
