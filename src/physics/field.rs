//! Field: the physics world
//!
//! Owns a set of rigid bodies exclusively and advances them by a fixed
//! timestep with accumulator-based catch-up. Each substep integrates,
//! detects overlaps in body-id order, resolves non-trigger contacts, then
//! hands the classified pairs to the event dispatcher. Listener callbacks
//! for a substep therefore fire after the solver converges for that substep
//! and before the next one begins.

use std::collections::BTreeMap;

use cgmath::{InnerSpace, Vector3};

use crate::constants::physics as phys;
use crate::error::{EngineError, EngineResult};
use crate::math::{normalize_safe, Transform, UP};

use super::aabb::Aabb;
use super::collider::{Collider, ColliderParameters};
use super::contact::{ContactPair, ContactPoint};
use super::events::EventDispatcher;
use super::rigid_body::{BodyType, RigidBody, RigidBodyParameters};
use super::shape::Shape;
use super::{BodyId, FieldId};

/// Solver iteration counts and sleep thresholds
#[derive(Debug, Clone, Copy)]
pub struct FieldSettings {
    pub velocity_iterations: u32,
    pub position_iterations: u32,
    pub sleep_linear_velocity: f32,
    pub sleep_angular_velocity: f32,
    pub time_before_sleep: f32,
}

impl Default for FieldSettings {
    fn default() -> Self {
        Self {
            velocity_iterations: phys::VELOCITY_SOLVER_ITERATIONS,
            position_iterations: phys::POSITION_SOLVER_ITERATIONS,
            sleep_linear_velocity: phys::SLEEP_LINEAR_VELOCITY,
            sleep_angular_velocity: phys::SLEEP_ANGULAR_VELOCITY,
            time_before_sleep: phys::TIME_BEFORE_SLEEP,
        }
    }
}

/// Construction parameters for a field
#[derive(Debug, Clone, Copy)]
pub struct FieldParameters {
    pub gravity: Vector3<f32>,
    pub fixed_step: f64,
}

impl Default for FieldParameters {
    fn default() -> Self {
        Self {
            gravity: Vector3::new(0.0, phys::DEFAULT_GRAVITY_Y, 0.0),
            fixed_step: phys::DEFAULT_FIXED_STEP,
        }
    }
}

/// The physics world: bodies, dispatcher, fixed-step accumulator
pub struct Field {
    id: FieldId,
    gravity: Vector3<f32>,
    settings: FieldSettings,
    bodies: BTreeMap<BodyId, RigidBody>,
    next_body: u32,
    dispatcher: EventDispatcher,
    accumulator: f64,
    fixed_step: f64,
    substeps: u64,
}

impl Field {
    pub(crate) fn new(id: FieldId, params: FieldParameters) -> Self {
        debug_assert!(params.fixed_step > 0.0, "fixed step must be positive");
        Self {
            id,
            gravity: params.gravity,
            settings: FieldSettings::default(),
            bodies: BTreeMap::new(),
            next_body: 0,
            dispatcher: EventDispatcher::new(),
            accumulator: 0.0,
            fixed_step: params.fixed_step,
            substeps: 0,
        }
    }

    pub fn id(&self) -> FieldId {
        self.id
    }

    pub fn gravity(&self) -> Vector3<f32> {
        self.gravity
    }

    pub fn set_gravity(&mut self, gravity: Vector3<f32>) {
        self.gravity = gravity;
    }

    pub fn settings(&self) -> &FieldSettings {
        &self.settings
    }

    pub fn fixed_step(&self) -> f64 {
        self.fixed_step
    }

    /// Number of substeps advanced since creation
    pub fn substeps(&self) -> u64 {
        self.substeps
    }

    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    pub fn body(&self, id: BodyId) -> EngineResult<&RigidBody> {
        self.bodies.get(&id).ok_or(EngineError::BodyNotFound {
            field: self.id,
            body: id,
        })
    }

    pub fn body_mut(&mut self, id: BodyId) -> EngineResult<&mut RigidBody> {
        let field = self.id;
        self.bodies
            .get_mut(&id)
            .ok_or(EngineError::BodyNotFound { field, body: id })
    }

    /// Bodies in id order
    pub fn bodies(&self) -> impl Iterator<Item = &RigidBody> {
        self.bodies.values()
    }

    pub(crate) fn create_body(
        &mut self,
        transform: &Transform,
        params: RigidBodyParameters,
    ) -> EngineResult<BodyId> {
        let id = BodyId(self.next_body);
        self.next_body += 1;

        let mut body = RigidBody::new(id, transform, &params);
        if !params.collider.shape.is_empty() {
            let collider = Collider::from_parameters(
                params.collider,
                body.position(),
                body.rotation(),
                body.scale(),
            )?;
            body.attach_collider(collider);
        }
        // The transform's scale is authoritative for the collider shape.
        body.set_scale(transform.scale);

        log::debug!(
            "[Field {:?}] Created body {:?} ({:?})",
            self.id,
            id,
            body.body_type()
        );
        self.bodies.insert(id, body);
        Ok(id)
    }

    pub(crate) fn destroy_body(&mut self, id: BodyId) -> EngineResult<()> {
        if self.bodies.remove(&id).is_none() {
            return Err(EngineError::BodyNotFound {
                field: self.id,
                body: id,
            });
        }
        self.dispatcher.forget_body(id);
        log::debug!("[Field {:?}] Destroyed body {:?}", self.id, id);
        Ok(())
    }

    pub(crate) fn attach_collider(
        &mut self,
        id: BodyId,
        params: ColliderParameters,
    ) -> EngineResult<()> {
        let body = self.body_mut(id)?;
        if body.collider().is_some() {
            return Err(EngineError::ColliderAlreadyAttached(id));
        }
        let collider =
            Collider::from_parameters(params, body.position(), body.rotation(), body.scale())?;
        body.attach_collider(collider);
        Ok(())
    }

    pub(crate) fn clear_bodies(&mut self) {
        let ids: Vec<BodyId> = self.bodies.keys().copied().collect();
        for id in ids {
            let _ = self.destroy_body(id);
        }
    }

    /// Accumulate `dt` and advance in fixed substeps; returns the
    /// interpolation factor for visual smoothing
    pub fn fixed_update(&mut self, dt: f64) -> f32 {
        self.accumulator += dt;
        while self.accumulator >= self.fixed_step {
            self.step_once();
            self.accumulator -= self.fixed_step;
        }
        (self.accumulator / self.fixed_step) as f32
    }

    /// Advance exactly one fixed substep: integrate, detect, resolve,
    /// dispatch
    pub fn step_once(&mut self) {
        let dt = self.fixed_step as f32;
        let gravity = self.gravity;
        let settings = self.settings;

        for body in self.bodies.values_mut() {
            body.integrate(gravity, dt, &settings);
        }

        let overlaps = self.detect_overlaps();
        self.resolve(&overlaps);
        self.dispatcher.dispatch(&mut self.bodies, &overlaps);

        self.substeps += 1;
    }

    /// Candidate pairs in body-id order, filtered by category bits
    fn detect_overlaps(&self) -> Vec<(ContactPair, Vec<ContactPoint>)> {
        let ids: Vec<BodyId> = self
            .bodies
            .iter()
            .filter(|(_, body)| body.collider().map_or(false, |c| !c.shape().is_empty()))
            .map(|(id, _)| *id)
            .collect();

        let mut overlaps = Vec::new();
        for i in 0..ids.len() {
            for j in (i + 1)..ids.len() {
                let (a, b) = match (self.bodies.get(&ids[i]), self.bodies.get(&ids[j])) {
                    (Some(a), Some(b)) => (a, b),
                    _ => continue,
                };
                if a.body_type() == BodyType::Static && b.body_type() == BodyType::Static {
                    continue;
                }
                let (ca, cb) = match (a.collider(), b.collider()) {
                    (Some(ca), Some(cb)) => (ca, cb),
                    _ => continue,
                };
                if !ca.can_collide_with(cb) {
                    continue;
                }
                if let Some(contact) = narrowphase(a, b) {
                    overlaps.push((ContactPair::new(a.id(), b.id()), vec![contact]));
                }
            }
        }
        overlaps
    }

    /// Push dynamic bodies out of penetration and kill approach velocity
    ///
    /// Trigger pairs are skipped entirely; the solver never corrects them.
    fn resolve(&mut self, overlaps: &[(ContactPair, Vec<ContactPoint>)]) {
        for (pair, points) in overlaps {
            let contact = match points.first() {
                Some(c) => c,
                None => continue,
            };
            let (trigger, a_dynamic, b_dynamic) = {
                let (a, b) = match (self.bodies.get(&pair.body_a), self.bodies.get(&pair.body_b)) {
                    (Some(a), Some(b)) => (a, b),
                    _ => continue,
                };
                let trigger = a.collider().map_or(false, Collider::is_trigger)
                    || b.collider().map_or(false, Collider::is_trigger);
                (
                    trigger,
                    a.body_type() == BodyType::Dynamic,
                    b.body_type() == BodyType::Dynamic,
                )
            };
            if trigger || contact.penetration_depth <= 0.0 {
                continue;
            }

            // Normal points a -> b; depth is split when both sides move.
            let normal = contact.normal;
            let depth = contact.penetration_depth;
            match (a_dynamic, b_dynamic) {
                (true, true) => {
                    if let Ok(a) = self.body_mut(pair.body_a) {
                        a.correct_position(-normal * (depth * 0.5));
                        a.cancel_velocity_into(normal);
                    }
                    if let Ok(b) = self.body_mut(pair.body_b) {
                        b.correct_position(normal * (depth * 0.5));
                        b.cancel_velocity_into(-normal);
                    }
                }
                (true, false) => {
                    if let Ok(a) = self.body_mut(pair.body_a) {
                        a.correct_position(-normal * depth);
                        a.cancel_velocity_into(normal);
                    }
                }
                (false, true) => {
                    if let Ok(b) = self.body_mut(pair.body_b) {
                        b.correct_position(normal * depth);
                        b.cancel_velocity_into(-normal);
                    }
                }
                (false, false) => {}
            }
        }
    }
}

/// Overlap test between two bodies' scaled shapes
///
/// The contact normal points from `a` to `b`.
fn narrowphase(a: &RigidBody, b: &RigidBody) -> Option<ContactPoint> {
    let ca = a.collider()?;
    let cb = b.collider()?;
    let sa = ca.scaled_shape();
    let sb = cb.scaled_shape();
    match (sa, sb) {
        (Shape::Sphere { radius: ra }, Shape::Sphere { radius: rb }) => {
            sphere_sphere(a.position(), ra, b.position(), rb)
        }
        (Shape::Sphere { radius }, Shape::Box { .. }) => {
            let box_aabb = Aabb::from_shape(&sb, b.position(), b.rotation())?;
            sphere_box(a.position(), radius, &box_aabb)
        }
        (Shape::Box { .. }, Shape::Sphere { radius }) => {
            let box_aabb = Aabb::from_shape(&sa, a.position(), a.rotation())?;
            sphere_box(b.position(), radius, &box_aabb).map(|c| c.flipped())
        }
        (Shape::Box { .. }, Shape::Box { .. }) => {
            let aabb_a = Aabb::from_shape(&sa, a.position(), a.rotation())?;
            let aabb_b = Aabb::from_shape(&sb, b.position(), b.rotation())?;
            box_box(&aabb_a, &aabb_b)
        }
        _ => None,
    }
}

fn sphere_sphere(
    pa: Vector3<f32>,
    ra: f32,
    pb: Vector3<f32>,
    rb: f32,
) -> Option<ContactPoint> {
    let delta = pb - pa;
    let dist2 = delta.magnitude2();
    let reach = ra + rb;
    if dist2 > reach * reach {
        return None;
    }
    let dist = dist2.sqrt();
    let normal = if dist > 0.0 { delta / dist } else { UP };
    let depth = reach - dist;
    let position = pa + normal * (ra - depth * 0.5);
    Some(ContactPoint::new(position, normal, depth))
}

/// Sphere against a box's world AABB; normal points sphere -> box
fn sphere_box(center: Vector3<f32>, radius: f32, box_aabb: &Aabb) -> Option<ContactPoint> {
    let closest = box_aabb.closest_point(center);
    let delta = closest - center;
    let dist2 = delta.magnitude2();
    if dist2 > radius * radius {
        return None;
    }
    if dist2 > 0.0 {
        let dist = dist2.sqrt();
        let normal = delta / dist;
        let depth = radius - dist;
        return Some(ContactPoint::new(closest, normal, depth));
    }
    // Sphere center inside the box: fall back to the least-overlap axis of
    // the two AABBs.
    let sphere_aabb =
        Aabb::from_center_half_extents(center, Vector3::new(radius, radius, radius));
    let mtv = sphere_aabb.penetration_vector(box_aabb)?;
    let depth = mtv.magnitude();
    let normal = normalize_safe(-mtv);
    Some(ContactPoint::new(center, normal, depth))
}

fn box_box(a: &Aabb, b: &Aabb) -> Option<ContactPoint> {
    let mtv = a.penetration_vector(b)?;
    let depth = mtv.magnitude();
    let normal = normalize_safe(-mtv);
    // Center of the intersection volume.
    let overlap_min = Vector3::new(
        a.min.x.max(b.min.x),
        a.min.y.max(b.min.y),
        a.min.z.max(b.min.z),
    );
    let overlap_max = Vector3::new(
        a.max.x.min(b.max.x),
        a.max.y.min(b.max.y),
        a.max.z.min(b.max.z),
    );
    let position = (overlap_min + overlap_max) * 0.5;
    Some(ContactPoint::new(position, normal, depth))
}
