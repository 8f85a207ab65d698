//! Collider: a shape bound to a rigid body
//!
//! A collider lives inside exactly one rigid body for its whole lifetime.
//! It carries the category/mask filter bits, the trigger flag and the three
//! contact callbacks. The local offset against the body is always identity,
//! so the cached world transform simply mirrors the body pose.

use cgmath::{Quaternion, Vector3};

use crate::error::{EngineError, EngineResult};

use super::events::ContactEvent;
use super::shape::Shape;

/// Contact callback invoked from inside the field advance
///
/// Callbacks receive value snapshots of both sides; they must not create or
/// destroy physics objects.
pub type ContactCallback = Box<dyn FnMut(&ContactEvent) + Send>;

/// Category and collide-with mask bits gating pair interaction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CategoryProperties {
    pub category_bits: u16,
    pub collide_mask_bits: u16,
}

impl Default for CategoryProperties {
    fn default() -> Self {
        Self {
            category_bits: 0x0001,
            collide_mask_bits: 0xffff,
        }
    }
}

/// Construction parameters for a collider
#[derive(Default)]
pub struct ColliderParameters {
    /// Local geometry; `Shape::Empty` nested in rigid body parameters means
    /// "no collider"
    pub shape: Shape,
    pub is_trigger: bool,
    pub category: CategoryProperties,
    pub on_start: Option<ContactCallback>,
    pub on_stay: Option<ContactCallback>,
    pub on_end: Option<ContactCallback>,
}

/// Shape plus filter bits plus contact callbacks, owned by one rigid body
pub struct Collider {
    shape: Shape,
    category_bits: u16,
    collide_mask_bits: u16,
    is_trigger: bool,
    world_position: Vector3<f32>,
    world_rotation: Quaternion<f32>,
    scale: Vector3<f32>,
    pub(crate) on_start: Option<ContactCallback>,
    pub(crate) on_stay: Option<ContactCallback>,
    pub(crate) on_end: Option<ContactCallback>,
}

impl Collider {
    /// Build a collider at the given body pose
    ///
    /// Fails on an empty shape: a collider without geometry is a parameter
    /// error at this level.
    pub(crate) fn from_parameters(
        params: ColliderParameters,
        world_position: Vector3<f32>,
        world_rotation: Quaternion<f32>,
        scale: Vector3<f32>,
    ) -> EngineResult<Self> {
        if params.shape.is_empty() {
            return Err(EngineError::EmptyShape {
                context: "collider",
            });
        }
        Ok(Self {
            shape: params.shape,
            category_bits: params.category.category_bits,
            collide_mask_bits: params.category.collide_mask_bits,
            is_trigger: params.is_trigger,
            world_position,
            world_rotation,
            scale,
            on_start: params.on_start,
            on_stay: params.on_stay,
            on_end: params.on_end,
        })
    }

    /// Local shape as configured, before body scale
    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    /// Shape reshaped by the owning body's current scale
    pub fn scaled_shape(&self) -> Shape {
        self.shape.scaled(self.scale)
    }

    /// Scaled half-extents for a box collider
    pub fn half_extents(&self) -> Option<Vector3<f32>> {
        match self.scaled_shape() {
            Shape::Box { half_extents } => Some(half_extents),
            _ => None,
        }
    }

    /// Scaled radius for a sphere collider
    pub fn radius(&self) -> Option<f32> {
        match self.scaled_shape() {
            Shape::Sphere { radius } => Some(radius),
            _ => None,
        }
    }

    /// Local vertex positions of a box collider under the body scale
    pub fn local_vertex_positions(&self) -> Option<[Vector3<f32>; 8]> {
        self.scaled_shape().local_vertices()
    }

    pub fn is_trigger(&self) -> bool {
        self.is_trigger
    }

    pub fn category_bits(&self) -> u16 {
        self.category_bits
    }

    pub fn collide_mask_bits(&self) -> u16 {
        self.collide_mask_bits
    }

    /// World position; equals the body position (identity local offset)
    pub fn world_position(&self) -> Vector3<f32> {
        self.world_position
    }

    /// World rotation; equals the body rotation (identity local offset)
    pub fn world_rotation(&self) -> Quaternion<f32> {
        self.world_rotation
    }

    pub fn scale(&self) -> Vector3<f32> {
        self.scale
    }

    /// Bidirectional category/mask filter
    pub fn can_collide_with(&self, other: &Collider) -> bool {
        (self.category_bits & other.collide_mask_bits) != 0
            && (other.category_bits & self.collide_mask_bits) != 0
    }

    pub(crate) fn set_world_transform(&mut self, position: Vector3<f32>, rotation: Quaternion<f32>) {
        self.world_position = position;
        self.world_rotation = rotation;
    }

    pub(crate) fn set_scale(&mut self, scale: Vector3<f32>) {
        self.scale = scale;
    }
}

impl std::fmt::Debug for Collider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Collider")
            .field("shape", &self.shape)
            .field("category_bits", &self.category_bits)
            .field("collide_mask_bits", &self.collide_mask_bits)
            .field("is_trigger", &self.is_trigger)
            .field("world_position", &self.world_position)
            .field("scale", &self.scale)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::vec3_approx_eq;
    use cgmath::{One, Zero};

    fn collider_with_bits(category: u16, mask: u16) -> Collider {
        Collider::from_parameters(
            ColliderParameters {
                shape: Shape::new_sphere(1.0),
                category: CategoryProperties {
                    category_bits: category,
                    collide_mask_bits: mask,
                },
                ..Default::default()
            },
            Vector3::zero(),
            Quaternion::one(),
            Vector3::new(1.0, 1.0, 1.0),
        )
        .expect("valid collider")
    }

    #[test]
    fn test_empty_shape_is_rejected() {
        let result = Collider::from_parameters(
            ColliderParameters::default(),
            Vector3::zero(),
            Quaternion::one(),
            Vector3::new(1.0, 1.0, 1.0),
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_filter_requires_both_directions() {
        let a = collider_with_bits(0b01, 0b10);
        let b = collider_with_bits(0b10, 0b01);
        assert!(a.can_collide_with(&b));
        assert!(b.can_collide_with(&a));

        // One-directional interest is not enough.
        let c = collider_with_bits(0b01, 0b01);
        let d = collider_with_bits(0b10, 0b01);
        assert!(!c.can_collide_with(&d));
        assert!(!d.can_collide_with(&c));
    }

    #[test]
    fn test_scaled_interrogation() {
        let mut c = Collider::from_parameters(
            ColliderParameters {
                shape: Shape::new_box(Vector3::new(1.0, 2.0, 3.0)),
                ..Default::default()
            },
            Vector3::zero(),
            Quaternion::one(),
            Vector3::new(2.0, 2.0, 2.0),
        )
        .expect("valid collider");
        assert!(vec3_approx_eq(
            c.half_extents().expect("box"),
            Vector3::new(2.0, 4.0, 6.0)
        ));
        c.set_scale(Vector3::new(1.0, 1.0, 1.0));
        assert!(vec3_approx_eq(
            c.half_extents().expect("box"),
            Vector3::new(1.0, 2.0, 3.0)
        ));
    }
}
