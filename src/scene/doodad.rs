//! Doodad: the scene entity
//!
//! A doodad bundles an optional visual model, a transform, an optional rigid
//! body handle and the four user callbacks. The transform's position and
//! rotation mirror the physics body; its scale belongs to the doodad and is
//! pushed into the collider shape, never the other way around.

use crate::input::InputState;
use crate::math::Transform;
use crate::physics::{BodyId, Field, RigidBodyParameters};

use super::render::ModelHandle;

/// Handle to a doodad within its scene
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DoodadId(pub(crate) u32);

/// Narrow scene facade handed to doodad callbacks
///
/// Carries everything a callback may touch during a tick. Callbacks must not
/// re-enter the physics service; body access goes through `field`.
pub struct TickContext<'a> {
    pub input: &'a InputState,
    pub field: &'a mut Field,
    /// Simulated seconds since the scene started ticking
    pub total_elapsed: f64,
}

/// Called once before the scene's first tick
pub type AwakenCallback = Box<dyn FnMut(&mut Doodad, &mut TickContext<'_>) + Send>;
/// Called every frame with `(frame_dt, interpolation alpha)`
pub type UpdateCallback = Box<dyn FnMut(&mut Doodad, &mut TickContext<'_>, f32, f32) + Send>;
/// Called once per fixed substep with the fixed step duration
pub type FixedUpdateCallback = Box<dyn FnMut(&mut Doodad, &mut TickContext<'_>, f32) + Send>;
/// Called when the doodad is removed or the scene is dropped
pub type DestroyCallback = Box<dyn FnMut(&mut Doodad) + Send>;

/// Construction parameters for a doodad
#[derive(Default)]
pub struct DoodadParameters {
    pub model: Option<ModelHandle>,
    pub transform: Transform,
    /// When present, a rigid body is created in the scene's field at the
    /// doodad transform; the collider shape picks up the transform's scale
    pub rigid_body: Option<RigidBodyParameters>,
    pub awaken: Option<AwakenCallback>,
    pub update: Option<UpdateCallback>,
    pub fixed_update: Option<FixedUpdateCallback>,
    pub destroy: Option<DestroyCallback>,
}

/// A scene entity
pub struct Doodad {
    id: DoodadId,
    pub transform: Transform,
    model: Option<ModelHandle>,
    body: Option<BodyId>,
    awaken_cb: Option<AwakenCallback>,
    update_cb: Option<UpdateCallback>,
    fixed_update_cb: Option<FixedUpdateCallback>,
    destroy_cb: Option<DestroyCallback>,
    awakened: bool,
}

impl Doodad {
    pub(crate) fn new(id: DoodadId, params: DoodadParameters, body: Option<BodyId>) -> Self {
        Self {
            id,
            transform: params.transform,
            model: params.model,
            body,
            awaken_cb: params.awaken,
            update_cb: params.update,
            fixed_update_cb: params.fixed_update,
            destroy_cb: params.destroy,
            awakened: false,
        }
    }

    pub fn id(&self) -> DoodadId {
        self.id
    }

    pub fn model(&self) -> Option<ModelHandle> {
        self.model
    }

    /// Handle of the rigid body, if the doodad owns one
    pub fn rigid_body(&self) -> Option<BodyId> {
        self.body
    }

    /// Copy the body pose into the visible transform; scale is untouched
    pub fn snap_to_rigid_body(&mut self, field: &Field) {
        if let Some(id) = self.body {
            if let Ok(body) = field.body(id) {
                self.transform.position = body.position();
                self.transform.rotation = body.rotation();
            }
        }
    }

    /// Run the awaken callback exactly once
    pub(crate) fn run_awaken(&mut self, ctx: &mut TickContext<'_>) {
        if self.awakened {
            return;
        }
        self.awakened = true;
        if let Some(mut cb) = self.awaken_cb.take() {
            cb(self, ctx);
            self.awaken_cb = Some(cb);
        }
    }

    /// Fixed-update callback only; the scene snaps after the physics advance
    pub(crate) fn run_fixed_update(&mut self, ctx: &mut TickContext<'_>, fixed_dt: f32) {
        if let Some(mut cb) = self.fixed_update_cb.take() {
            cb(self, ctx, fixed_dt);
            self.fixed_update_cb = Some(cb);
        }
    }

    /// Frame update: callback, then mirror the body pose while the doodad
    /// scale stays authoritative and is re-applied to the collider shape
    pub(crate) fn run_update(&mut self, ctx: &mut TickContext<'_>, frame_dt: f32, alpha: f32) {
        if let Some(mut cb) = self.update_cb.take() {
            cb(self, ctx, frame_dt, alpha);
            self.update_cb = Some(cb);
        }
        if let Some(id) = self.body {
            if let Ok(body) = ctx.field.body_mut(id) {
                self.transform.position = body.position();
                self.transform.rotation = body.rotation();
                body.set_scale(self.transform.scale);
            }
        }
    }

    pub(crate) fn run_destroy(&mut self) {
        if let Some(mut cb) = self.destroy_cb.take() {
            cb(self);
        }
    }
}

impl std::fmt::Debug for Doodad {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Doodad")
            .field("id", &self.id)
            .field("transform", &self.transform)
            .field("model", &self.model)
            .field("body", &self.body)
            .field("awakened", &self.awakened)
            .finish()
    }
}
