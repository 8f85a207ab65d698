//! Scene: doodad ownership and the tick orchestration
//!
//! One scene owns its doodads in insertion order plus one physics field.
//! `tick` runs the canonical loop: awaken once, catch up fixed substeps
//! (fixed-update callbacks, one field substep, snap-to-body), then the
//! variable-rate frame update and the render hand-off.

pub mod doodad;
pub mod render;

pub use doodad::{
    AwakenCallback, DestroyCallback, Doodad, DoodadId, DoodadParameters, FixedUpdateCallback,
    TickContext, UpdateCallback,
};
pub use render::{ModelHandle, RenderCommand};

use cgmath::Vector3;

use crate::constants::physics as phys;
use crate::error::{EngineError, EngineResult};
use crate::input::InputState;
use crate::physics::{system, FieldId, FieldParameters};

/// Construction parameters for a scene
#[derive(Debug, Clone, Copy)]
pub struct SceneParameters {
    pub gravity: Vector3<f32>,
    pub fixed_step: f64,
}

impl Default for SceneParameters {
    fn default() -> Self {
        Self {
            gravity: Vector3::new(0.0, phys::DEFAULT_GRAVITY_Y, 0.0),
            fixed_step: phys::DEFAULT_FIXED_STEP,
        }
    }
}

/// A scene: doodads, one field, and the tick accumulator
pub struct Scene {
    doodads: Vec<Doodad>,
    next_doodad: u32,
    field: FieldId,
    accumulator: f64,
    fixed_step: f64,
    total_elapsed: f64,
    render_queue: Vec<RenderCommand>,
}

impl Scene {
    pub fn new(params: SceneParameters) -> Self {
        let field = system::create_field(FieldParameters {
            gravity: params.gravity,
            fixed_step: params.fixed_step,
        });
        log::debug!("[Scene] Created with field {:?}", field);
        Self {
            doodads: Vec::new(),
            next_doodad: 0,
            field,
            accumulator: 0.0,
            fixed_step: params.fixed_step,
            total_elapsed: 0.0,
            render_queue: Vec::new(),
        }
    }

    /// Handle of the scene's physics field
    pub fn field_id(&self) -> FieldId {
        self.field
    }

    pub fn doodad_count(&self) -> usize {
        self.doodads.len()
    }

    /// Simulated seconds accumulated by completed fixed substeps
    pub fn total_elapsed(&self) -> f64 {
        self.total_elapsed
    }

    pub fn doodad(&self, id: DoodadId) -> EngineResult<&Doodad> {
        self.doodads
            .iter()
            .find(|d| d.id() == id)
            .ok_or(EngineError::DoodadNotFound(id))
    }

    pub fn doodad_mut(&mut self, id: DoodadId) -> EngineResult<&mut Doodad> {
        self.doodads
            .iter_mut()
            .find(|d| d.id() == id)
            .ok_or(EngineError::DoodadNotFound(id))
    }

    /// Add a doodad; a rigid body is created when body parameters are given
    pub fn add_doodad(&mut self, mut params: DoodadParameters) -> EngineResult<DoodadId> {
        params.transform.fix();
        let body = match params.rigid_body.take() {
            Some(rb_params) => Some(system::create_rigid_body(
                self.field,
                &params.transform,
                rb_params,
            )?),
            None => None,
        };

        let id = DoodadId(self.next_doodad);
        self.next_doodad += 1;
        self.doodads.push(Doodad::new(id, params, body));
        log::debug!("[Scene] Added doodad {:?} (body {:?})", id, body);
        Ok(id)
    }

    /// Remove a doodad: destroy callback first, then its rigid body
    pub fn remove_doodad(&mut self, id: DoodadId) -> EngineResult<()> {
        let index = self
            .doodads
            .iter()
            .position(|d| d.id() == id)
            .ok_or(EngineError::DoodadNotFound(id))?;
        let mut doodad = self.doodads.remove(index);
        doodad.run_destroy();
        if let Some(body) = doodad.rigid_body() {
            system::destroy_rigid_body(self.field, body)?;
        }
        log::debug!("[Scene] Removed doodad {:?}", id);
        Ok(())
    }

    /// One outer tick with a variable frame dt
    ///
    /// Ordering per substep: all fixed-update callbacks, then the field
    /// advance (solver + listener dispatch), then snap-to-body. After the
    /// catch-up loop every doodad gets its frame update with the
    /// interpolation factor, and the render queue is rebuilt.
    pub fn tick(&mut self, input: &InputState, dt: f32) -> EngineResult<()> {
        let field = self.field;
        system::with_field_mut(field, |field| {
            let mut ctx = TickContext {
                input,
                field,
                total_elapsed: self.total_elapsed,
            };

            // Doodads awaken at most once each; late joiners get theirs here.
            for i in 0..self.doodads.len() {
                self.doodads[i].run_awaken(&mut ctx);
            }

            self.accumulator += f64::from(dt);
            while self.accumulator >= self.fixed_step {
                let fixed_dt = self.fixed_step as f32;
                ctx.total_elapsed = self.total_elapsed;
                for i in 0..self.doodads.len() {
                    self.doodads[i].run_fixed_update(&mut ctx, fixed_dt);
                }
                ctx.field.step_once();
                for doodad in &mut self.doodads {
                    doodad.snap_to_rigid_body(ctx.field);
                }
                self.accumulator -= self.fixed_step;
                self.total_elapsed += self.fixed_step;
            }

            let alpha = (self.accumulator / self.fixed_step) as f32;
            ctx.total_elapsed = self.total_elapsed;
            for i in 0..self.doodads.len() {
                self.doodads[i].run_update(&mut ctx, dt, alpha);
            }

            self.render_queue.clear();
            for doodad in &self.doodads {
                if let Some(model) = doodad.model() {
                    self.render_queue.push(RenderCommand {
                        model,
                        world_matrix: doodad.transform.matrix(),
                    });
                }
            }
        })
    }

    /// Take this tick's render commands, leaving the queue empty
    pub fn drain_render_commands(&mut self) -> Vec<RenderCommand> {
        std::mem::take(&mut self.render_queue)
    }
}

impl Drop for Scene {
    fn drop(&mut self) {
        for doodad in &mut self.doodads {
            doodad.run_destroy();
        }
        self.doodads.clear();
        if let Err(e) = system::destroy_field(self.field) {
            log::warn!("[Scene] Failed to destroy field {:?}: {}", self.field, e);
        }
    }
}
