//! Physics core: shapes, colliders, rigid bodies, fields and the event
//! dispatcher
//!
//! All physics objects are created through the [`system`] service and
//! addressed by handle. A `Field` owns its bodies exclusively; a body owns at
//! most one collider.

pub mod aabb;
pub mod collider;
pub mod contact;
pub mod events;
pub mod field;
pub mod rigid_body;
pub mod shape;
pub mod system;

pub use aabb::Aabb;
pub use collider::{CategoryProperties, Collider, ColliderParameters, ContactCallback};
pub use contact::{ContactPair, ContactPoint};
pub use events::{ContactEvent, ContactEventKind, ContactSide};
pub use field::{Field, FieldParameters, FieldSettings};
pub use rigid_body::{BodyType, RigidBody, RigidBodyParameters};
pub use shape::Shape;

/// Handle to a physics world owned by the service
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FieldId(pub(crate) u32);

/// Handle to a rigid body within a field
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BodyId(pub(crate) u32);
