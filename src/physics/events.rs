//! Contact/trigger event classification and callback routing
//!
//! Per ordered collider pair the dispatcher runs the regular language
//! `(Start Stay* End)*`: a pair entering contact emits Start, a persisting
//! pair emits Stay, a vanished pair emits End. A pair whose side was
//! destroyed is dropped without emission. Each pair is visited at most once
//! per substep and dispatch happens after the solver has finished the
//! substep.

use std::collections::{BTreeMap, BTreeSet};

use cgmath::{Quaternion, Vector3};

use super::collider::ContactCallback;
use super::contact::{ContactPair, ContactPoint};
use super::rigid_body::RigidBody;
use super::shape::Shape;
use super::BodyId;

/// Phase of a contact pair's lifetime
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactEventKind {
    Start,
    Stay,
    End,
}

/// Value snapshot of one collider side at dispatch time
#[derive(Debug, Clone)]
pub struct ContactSide {
    pub body: BodyId,
    /// Shape under the owning body's scale
    pub shape: Shape,
    pub is_trigger: bool,
    pub category_bits: u16,
    pub world_position: Vector3<f32>,
    pub world_rotation: Quaternion<f32>,
}

/// Event delivered to a contact callback
#[derive(Debug)]
pub struct ContactEvent {
    pub kind: ContactEventKind,
    /// The collider whose callback is being invoked
    pub this: ContactSide,
    /// The other side of the pair
    pub other: ContactSide,
    /// Contact points for Start/Stay; empty for End
    pub contacts: Vec<ContactPoint>,
}

/// Tracks in-contact pairs across substeps and routes callbacks
#[derive(Default)]
pub(crate) struct EventDispatcher {
    active: BTreeSet<ContactPair>,
}

impl EventDispatcher {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Classify this substep's overlaps against the previous set and invoke
    /// callbacks
    ///
    /// `overlaps` must be sorted by pair (the detection pass produces it in
    /// body-id order), which keeps emission order deterministic.
    pub(crate) fn dispatch(
        &mut self,
        bodies: &mut BTreeMap<BodyId, RigidBody>,
        overlaps: &[(ContactPair, Vec<ContactPoint>)],
    ) {
        for (pair, points) in overlaps {
            let kind = if self.active.contains(pair) {
                ContactEventKind::Stay
            } else {
                ContactEventKind::Start
            };
            emit(bodies, *pair, kind, points);
        }

        let current: BTreeSet<ContactPair> = overlaps.iter().map(|(pair, _)| *pair).collect();
        let ended: Vec<ContactPair> = self
            .active
            .iter()
            .filter(|pair| !current.contains(pair))
            .copied()
            .collect();
        for pair in ended {
            emit(bodies, pair, ContactEventKind::End, &[]);
        }

        self.active = current;
    }

    /// Forget every pair involving a destroyed body, suppressing emission
    pub(crate) fn forget_body(&mut self, body: BodyId) {
        self.active.retain(|pair| !pair.contains(body));
    }

    #[cfg(test)]
    pub(crate) fn active_pair_count(&self) -> usize {
        self.active.len()
    }
}

/// Invoke the matching callback on each side that has one set
fn emit(
    bodies: &mut BTreeMap<BodyId, RigidBody>,
    pair: ContactPair,
    kind: ContactEventKind,
    points: &[ContactPoint],
) {
    // Either side gone means the pair dies silently.
    let (side_a, side_b) = match (snapshot(bodies, pair.body_a), snapshot(bodies, pair.body_b)) {
        (Some(a), Some(b)) => (a, b),
        _ => return,
    };

    invoke_side(bodies, pair.body_a, kind, &side_a, &side_b, points, false);
    invoke_side(bodies, pair.body_b, kind, &side_b, &side_a, points, true);
}

fn invoke_side(
    bodies: &mut BTreeMap<BodyId, RigidBody>,
    body: BodyId,
    kind: ContactEventKind,
    this: &ContactSide,
    other: &ContactSide,
    points: &[ContactPoint],
    flip_normals: bool,
) {
    // The callback is lifted out of the collider for the duration of the
    // call so the body map stays borrowable by the next dispatch.
    let callback = take_callback(bodies, body, kind);
    let Some(mut callback) = callback else {
        return;
    };

    let contacts = if flip_normals {
        points.iter().map(ContactPoint::flipped).collect()
    } else {
        points.to_vec()
    };
    let event = ContactEvent {
        kind,
        this: this.clone(),
        other: other.clone(),
        contacts,
    };
    callback(&event);

    restore_callback(bodies, body, kind, callback);
}

fn snapshot(bodies: &BTreeMap<BodyId, RigidBody>, id: BodyId) -> Option<ContactSide> {
    let body = bodies.get(&id)?;
    let collider = match body.collider() {
        Some(c) => c,
        None => {
            debug_assert!(false, "body {:?} in a contact pair has no collider", id);
            log::error!("[EventDispatcher] Body {:?} lost its collider mid-pair", id);
            return None;
        }
    };
    Some(ContactSide {
        body: id,
        shape: collider.scaled_shape(),
        is_trigger: collider.is_trigger(),
        category_bits: collider.category_bits(),
        world_position: collider.world_position(),
        world_rotation: collider.world_rotation(),
    })
}

fn take_callback(
    bodies: &mut BTreeMap<BodyId, RigidBody>,
    id: BodyId,
    kind: ContactEventKind,
) -> Option<ContactCallback> {
    let collider = bodies.get_mut(&id)?.collider_mut()?;
    match kind {
        ContactEventKind::Start => collider.on_start.take(),
        ContactEventKind::Stay => collider.on_stay.take(),
        ContactEventKind::End => collider.on_end.take(),
    }
}

fn restore_callback(
    bodies: &mut BTreeMap<BodyId, RigidBody>,
    id: BodyId,
    kind: ContactEventKind,
    callback: ContactCallback,
) {
    if let Some(collider) = bodies.get_mut(&id).and_then(|b| b.collider_mut()) {
        let slot = match kind {
            ContactEventKind::Start => &mut collider.on_start,
            ContactEventKind::Stay => &mut collider.on_stay,
            ContactEventKind::End => &mut collider.on_end,
        };
        *slot = Some(callback);
    }
}
