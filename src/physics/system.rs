//! Physics service: process-wide factory and lifetime owner
//!
//! All fields, bodies, colliders and shapes are created through these
//! module-level operations; handles stay valid until the matching destroy.
//! The registry sits behind one mutex. A scene holds that lock for the
//! duration of its tick, so code running inside a tick (doodad or contact
//! callbacks) must use the context it is given instead of re-entering the
//! service.

use cgmath::Vector3;
use lazy_static::lazy_static;
use parking_lot::Mutex;
use rustc_hash::FxHashMap;

use crate::error::{EngineError, EngineResult};
use crate::math::Transform;

use super::collider::ColliderParameters;
use super::field::{Field, FieldParameters};
use super::rigid_body::RigidBodyParameters;
use super::shape::Shape;
use super::{BodyId, FieldId};

/// Registry of live fields
struct PhysicsSystem {
    fields: FxHashMap<FieldId, Field>,
    next_field: u32,
}

impl PhysicsSystem {
    fn new() -> Self {
        Self {
            fields: FxHashMap::default(),
            next_field: 0,
        }
    }
}

lazy_static! {
    static ref PHYSICS_SYSTEM: Mutex<PhysicsSystem> = Mutex::new(PhysicsSystem::new());
}

/// Create a physics world with solver defaults
pub fn create_field(params: FieldParameters) -> FieldId {
    let mut system = PHYSICS_SYSTEM.lock();
    let id = FieldId(system.next_field);
    system.next_field += 1;
    log::debug!(
        "[PhysicsSystem] Created field {:?} (gravity {:?}, step {})",
        id,
        params.gravity,
        params.fixed_step
    );
    system.fields.insert(id, Field::new(id, params));
    id
}

/// Destroy a field; its bodies are torn down first
pub fn destroy_field(id: FieldId) -> EngineResult<()> {
    let mut system = PHYSICS_SYSTEM.lock();
    let mut field = system
        .fields
        .remove(&id)
        .ok_or(EngineError::FieldNotFound(id))?;
    field.clear_bodies();
    log::debug!("[PhysicsSystem] Destroyed field {:?}", id);
    Ok(())
}

/// Create a rigid body (and its collider, when the shape is non-empty) in a
/// field at the given transform
pub fn create_rigid_body(
    field: FieldId,
    transform: &Transform,
    params: RigidBodyParameters,
) -> EngineResult<BodyId> {
    let mut system = PHYSICS_SYSTEM.lock();
    let field = system
        .fields
        .get_mut(&field)
        .ok_or(EngineError::FieldNotFound(field))?;
    field.create_body(transform, params)
}

/// Destroy a rigid body; pending contact pairs involving it are forgotten
pub fn destroy_rigid_body(field: FieldId, body: BodyId) -> EngineResult<()> {
    let mut system = PHYSICS_SYSTEM.lock();
    let field = system
        .fields
        .get_mut(&field)
        .ok_or(EngineError::FieldNotFound(field))?;
    field.destroy_body(body)
}

/// Attach a collider to a body that does not own one yet
pub fn create_collider(
    field: FieldId,
    body: BodyId,
    params: ColliderParameters,
) -> EngineResult<()> {
    let mut system = PHYSICS_SYSTEM.lock();
    let field = system
        .fields
        .get_mut(&field)
        .ok_or(EngineError::FieldNotFound(field))?;
    field.attach_collider(body, params)
}

/// Lower-level shape factory for box geometry
pub fn create_box_shape(half_extents: Vector3<f32>) -> Shape {
    Shape::new_box(half_extents)
}

/// Lower-level shape factory for sphere geometry
pub fn create_sphere_shape(radius: f32) -> Shape {
    Shape::new_sphere(radius)
}

/// Run `f` with shared access to a field
pub fn with_field<R>(id: FieldId, f: impl FnOnce(&Field) -> R) -> EngineResult<R> {
    let system = PHYSICS_SYSTEM.lock();
    let field = system.fields.get(&id).ok_or(EngineError::FieldNotFound(id))?;
    Ok(f(field))
}

/// Run `f` with exclusive access to a field
pub fn with_field_mut<R>(id: FieldId, f: impl FnOnce(&mut Field) -> R) -> EngineResult<R> {
    let mut system = PHYSICS_SYSTEM.lock();
    let field = system
        .fields
        .get_mut(&id)
        .ok_or(EngineError::FieldNotFound(id))?;
    Ok(f(field))
}

/// Number of live fields
pub fn field_count() -> usize {
    PHYSICS_SYSTEM.lock().fields.len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::rigid_body::BodyType;

    #[test]
    fn test_field_lifecycle() {
        let id = create_field(FieldParameters::default());
        assert!(with_field(id, |f| f.body_count()).is_ok());
        destroy_field(id).expect("field destroyed");
        assert!(matches!(
            with_field(id, |f| f.body_count()),
            Err(EngineError::FieldNotFound(_))
        ));
        assert!(destroy_field(id).is_err());
    }

    #[test]
    fn test_body_lifecycle_through_service() {
        let field = create_field(FieldParameters::default());
        let body = create_rigid_body(
            field,
            &Transform::identity(),
            RigidBodyParameters {
                body_type: BodyType::Static,
                collider: ColliderParameters {
                    shape: create_sphere_shape(1.0),
                    ..Default::default()
                },
                ..Default::default()
            },
        )
        .expect("body created");

        let has_collider =
            with_field(field, |f| f.body(body).map(|b| b.collider().is_some()))
                .expect("field exists")
                .expect("body exists");
        assert!(has_collider);

        destroy_rigid_body(field, body).expect("body destroyed");
        assert_eq!(with_field(field, |f| f.body_count()).expect("field"), 0);
        destroy_field(field).expect("field destroyed");
    }

    #[test]
    fn test_collider_slot_is_exclusive() {
        let field = create_field(FieldParameters::default());
        let body = create_rigid_body(
            field,
            &Transform::identity(),
            RigidBodyParameters {
                collider: ColliderParameters {
                    shape: create_box_shape(Vector3::new(1.0, 1.0, 1.0)),
                    ..Default::default()
                },
                ..Default::default()
            },
        )
        .expect("body created");

        let second = create_collider(
            field,
            body,
            ColliderParameters {
                shape: create_sphere_shape(1.0),
                ..Default::default()
            },
        );
        assert!(matches!(second, Err(EngineError::ColliderAlreadyAttached(_))));
        destroy_field(field).expect("field destroyed");
    }
}
