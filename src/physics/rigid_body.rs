//! Rigid body: a physics body bound to one field
//!
//! Owns at most one collider as an optional value. The body pose is the
//! authority during the physics advance; teleports and velocity setters wake
//! a sleeping body, position corrections from the resolver do not.

use cgmath::{InnerSpace, Quaternion, Vector3, Zero};

use crate::constants::physics as phys;
use crate::math::{normalize_quat_safe, Transform};

use super::collider::{Collider, ColliderParameters};
use super::field::FieldSettings;
use super::BodyId;

/// How a body participates in the simulation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyType {
    /// Never moves; collides with dynamic bodies
    Static,
    /// Moved by velocities only, ignores gravity and forces
    Kinematic,
    /// Fully simulated
    Dynamic,
}

/// Construction parameters for a rigid body
pub struct RigidBodyParameters {
    pub body_type: BodyType,
    pub enable_gravity: bool,
    /// Per-axis angular velocity factor in 0..1; 0 locks the axis
    pub angular_lock_factor: Vector3<f32>,
    pub mass: f32,
    pub collider: ColliderParameters,
}

impl Default for RigidBodyParameters {
    fn default() -> Self {
        Self {
            body_type: BodyType::Dynamic,
            enable_gravity: true,
            angular_lock_factor: Vector3::new(1.0, 1.0, 1.0),
            mass: phys::DEFAULT_MASS,
            collider: ColliderParameters::default(),
        }
    }
}

/// A physics body owned by a field
pub struct RigidBody {
    id: BodyId,
    body_type: BodyType,
    enable_gravity: bool,
    angular_lock_factor: Vector3<f32>,
    position: Vector3<f32>,
    rotation: Quaternion<f32>,
    scale: Vector3<f32>,
    linear_velocity: Vector3<f32>,
    angular_velocity: Vector3<f32>,
    accumulated_force: Vector3<f32>,
    mass: f32,
    collider: Option<Collider>,
    allowed_to_sleep: bool,
    sleeping: bool,
    sleep_timer: f32,
}

impl RigidBody {
    pub(crate) fn new(id: BodyId, transform: &Transform, params: &RigidBodyParameters) -> Self {
        Self {
            id,
            body_type: params.body_type,
            enable_gravity: params.enable_gravity,
            angular_lock_factor: params.angular_lock_factor,
            position: transform.position,
            rotation: normalize_quat_safe(transform.rotation),
            scale: transform.scale,
            linear_velocity: Vector3::zero(),
            angular_velocity: Vector3::zero(),
            accumulated_force: Vector3::zero(),
            mass: params.mass.max(f32::EPSILON),
            collider: None,
            allowed_to_sleep: true,
            sleeping: false,
            sleep_timer: 0.0,
        }
    }

    pub fn id(&self) -> BodyId {
        self.id
    }

    pub fn body_type(&self) -> BodyType {
        self.body_type
    }

    pub fn position(&self) -> Vector3<f32> {
        self.position
    }

    pub fn rotation(&self) -> Quaternion<f32> {
        self.rotation
    }

    pub fn scale(&self) -> Vector3<f32> {
        self.scale
    }

    pub fn linear_velocity(&self) -> Vector3<f32> {
        self.linear_velocity
    }

    pub fn angular_velocity(&self) -> Vector3<f32> {
        self.angular_velocity
    }

    pub fn enable_gravity(&self) -> bool {
        self.enable_gravity
    }

    pub fn angular_lock_factor(&self) -> Vector3<f32> {
        self.angular_lock_factor
    }

    pub fn is_sleeping(&self) -> bool {
        self.sleeping
    }

    pub fn allowed_to_sleep(&self) -> bool {
        self.allowed_to_sleep
    }

    /// Teleport; collider follows, velocities are untouched
    pub fn set_position(&mut self, position: Vector3<f32>) {
        self.position = position;
        self.sync_collider_transform();
        self.wake();
    }

    /// Teleport rotation; collider follows, velocities are untouched
    pub fn set_rotation(&mut self, rotation: Quaternion<f32>) {
        self.rotation = normalize_quat_safe(rotation);
        self.sync_collider_transform();
        self.wake();
    }

    pub fn set_linear_velocity(&mut self, velocity: Vector3<f32>) {
        self.linear_velocity = velocity;
        self.wake();
    }

    pub fn set_angular_velocity(&mut self, velocity: Vector3<f32>) {
        self.angular_velocity = velocity;
        self.wake();
    }

    pub fn set_enable_gravity(&mut self, enabled: bool) {
        self.enable_gravity = enabled;
    }

    pub fn set_angular_lock_factor(&mut self, factor: Vector3<f32>) {
        self.angular_lock_factor = factor;
    }

    pub fn set_allowed_to_sleep(&mut self, allowed: bool) {
        self.allowed_to_sleep = allowed;
        if !allowed {
            self.wake();
        }
    }

    /// Reshape the collider: the body scale is pushed into the shape
    pub fn set_scale(&mut self, scale: Vector3<f32>) {
        self.scale = scale;
        if let Some(collider) = self.collider.as_mut() {
            collider.set_scale(scale);
        }
    }

    /// Accumulate a body-local force applied at the center of mass
    ///
    /// Consumed by the next substep, then cleared.
    pub fn apply_local_force_at_com(&mut self, force: Vector3<f32>) {
        self.accumulated_force += self.rotation * force;
        self.wake();
    }

    /// Collider accessor, if one is attached
    pub fn collider(&self) -> Option<&Collider> {
        self.collider.as_ref()
    }

    pub fn collider_mut(&mut self) -> Option<&mut Collider> {
        self.collider.as_mut()
    }

    pub(crate) fn attach_collider(&mut self, collider: Collider) {
        debug_assert!(self.collider.is_none(), "body already owns a collider");
        self.collider = Some(collider);
        self.sync_collider_transform();
    }

    pub(crate) fn wake(&mut self) {
        self.sleeping = false;
        self.sleep_timer = 0.0;
    }

    /// Positional correction from the resolver; follows the collider but
    /// does not reset the sleep state
    pub(crate) fn correct_position(&mut self, delta: Vector3<f32>) {
        self.position += delta;
        self.sync_collider_transform();
    }

    /// Remove the velocity component moving into `normal`
    pub(crate) fn cancel_velocity_into(&mut self, normal: Vector3<f32>) {
        let vn = self.linear_velocity.dot(normal);
        if vn > 0.0 {
            self.linear_velocity -= normal * vn;
        }
    }

    /// One substep of semi-implicit Euler: velocities first, then positions
    pub(crate) fn integrate(&mut self, gravity: Vector3<f32>, dt: f32, settings: &FieldSettings) {
        match self.body_type {
            BodyType::Static => return,
            BodyType::Kinematic => {
                self.accumulated_force = Vector3::zero();
                self.position += self.linear_velocity * dt;
                self.integrate_rotation(self.angular_velocity, dt);
            }
            BodyType::Dynamic => {
                if self.sleeping {
                    self.accumulated_force = Vector3::zero();
                    return;
                }
                if self.enable_gravity {
                    self.linear_velocity += gravity * dt;
                }
                self.linear_velocity += self.accumulated_force * (dt / self.mass);
                self.accumulated_force = Vector3::zero();
                self.position += self.linear_velocity * dt;

                let lock = self.angular_lock_factor;
                let omega = Vector3::new(
                    self.angular_velocity.x * lock.x,
                    self.angular_velocity.y * lock.y,
                    self.angular_velocity.z * lock.z,
                );
                self.integrate_rotation(omega, dt);
                self.update_sleep_state(dt, settings);
            }
        }
        self.sync_collider_transform();
    }

    fn integrate_rotation(&mut self, omega: Vector3<f32>, dt: f32) {
        if omega.magnitude2() == 0.0 {
            return;
        }
        let dq = Quaternion::new(0.0, omega.x, omega.y, omega.z) * self.rotation * (0.5 * dt);
        self.rotation = (self.rotation + dq).normalize();
    }

    fn update_sleep_state(&mut self, dt: f32, settings: &FieldSettings) {
        if !self.allowed_to_sleep {
            return;
        }
        let idle = self.linear_velocity.magnitude() <= settings.sleep_linear_velocity
            && self.angular_velocity.magnitude() <= settings.sleep_angular_velocity;
        if idle {
            self.sleep_timer += dt;
            if self.sleep_timer >= settings.time_before_sleep {
                self.sleeping = true;
                log::debug!("[RigidBody] Body {:?} put to sleep", self.id);
            }
        } else {
            self.sleep_timer = 0.0;
        }
    }

    fn sync_collider_transform(&mut self) {
        if let Some(collider) = self.collider.as_mut() {
            collider.set_world_transform(self.position, self.rotation);
        }
    }
}

impl std::fmt::Debug for RigidBody {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RigidBody")
            .field("id", &self.id)
            .field("body_type", &self.body_type)
            .field("position", &self.position)
            .field("sleeping", &self.sleeping)
            .field("has_collider", &self.collider.is_some())
            .finish()
    }
}
