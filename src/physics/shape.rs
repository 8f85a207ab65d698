//! Collision shape variants
//!
//! A shape is a plain value: either a box described by half-extents or a
//! sphere described by its radius. Colliders hold the local, unscaled shape;
//! the owning body's scale is applied on interrogation.

use cgmath::Vector3;

/// Collision geometry variant
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Shape {
    /// No geometry; a body parameterized with it gets no collider
    #[default]
    Empty,
    /// Axis-aligned box in local space, described by positive half-extents
    Box { half_extents: Vector3<f32> },
    /// Sphere described by a positive radius
    Sphere { radius: f32 },
}

impl Shape {
    /// Box shape from half-extents (each component must be positive)
    pub fn new_box(half_extents: Vector3<f32>) -> Self {
        debug_assert!(
            half_extents.x > 0.0 && half_extents.y > 0.0 && half_extents.z > 0.0,
            "box half-extents must be positive, got {:?}",
            half_extents
        );
        Shape::Box { half_extents }
    }

    /// Sphere shape from a radius (must be positive)
    pub fn new_sphere(radius: f32) -> Self {
        debug_assert!(radius > 0.0, "sphere radius must be positive, got {}", radius);
        Shape::Sphere { radius }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Shape::Empty)
    }

    /// Shape as reshaped by a body scale
    ///
    /// Box half-extents scale componentwise by the absolute scale. A sphere
    /// scales its radius by `|scale.y|` only; the y convention is a contract
    /// the application layer depends on.
    pub fn scaled(&self, scale: Vector3<f32>) -> Shape {
        match *self {
            Shape::Empty => Shape::Empty,
            Shape::Box { half_extents } => Shape::Box {
                half_extents: Vector3::new(
                    half_extents.x * scale.x.abs(),
                    half_extents.y * scale.y.abs(),
                    half_extents.z * scale.z.abs(),
                ),
            },
            Shape::Sphere { radius } => Shape::Sphere {
                radius: radius * scale.y.abs(),
            },
        }
    }

    /// Canonical local vertex table of a box
    ///
    /// Indices 0..3 trace the +z face counter-clockwise starting at
    /// `(-x, -y)`; indices 4..7 repeat the same `(x, y)` order on the -z
    /// face. This ordering is a public contract.
    pub fn box_vertices(half_extents: Vector3<f32>) -> [Vector3<f32>; 8] {
        let h = half_extents;
        [
            Vector3::new(-h.x, -h.y, h.z),
            Vector3::new(h.x, -h.y, h.z),
            Vector3::new(h.x, h.y, h.z),
            Vector3::new(-h.x, h.y, h.z),
            Vector3::new(-h.x, -h.y, -h.z),
            Vector3::new(h.x, -h.y, -h.z),
            Vector3::new(h.x, h.y, -h.z),
            Vector3::new(-h.x, h.y, -h.z),
        ]
    }

    /// Local vertex positions of a box shape, `None` for other variants
    pub fn local_vertices(&self) -> Option<[Vector3<f32>; 8]> {
        match *self {
            Shape::Box { half_extents } => Some(Self::box_vertices(half_extents)),
            _ => None,
        }
    }
}
