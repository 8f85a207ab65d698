//! Kiln Engine - physics/scene coupling core
//!
//! A small game-engine core: scenes own doodads (entities with transforms,
//! optional models, optional rigid bodies and lifecycle callbacks), a global
//! physics service owns fields (isolated simulation worlds), and the scene
//! tick drives the fixed-timestep physics advance plus the variable-rate
//! frame update.
//!
//! Typical usage:
//! - `Scene::new` creates a scene and its backing physics field
//! - `Scene::add_doodad` spawns entities, optionally with rigid bodies
//! - `Scene::tick` once per frame with the frame's delta time
//! - `Scene::drain_render_commands` hands the frame's draw list to a renderer

pub mod constants;
pub mod error;
pub mod input;
pub mod math;
pub mod physics;
pub mod scene;

pub use error::{EngineError, EngineResult};
pub use input::{InputState, KeyCode, PointerButton};
pub use math::{Transform, BACK, DOWN, FORWARD, LEFT, RIGHT, UP};
pub use physics::{
    BodyId, BodyType, CategoryProperties, Collider, ColliderParameters, ContactEvent,
    ContactEventKind, ContactPoint, ContactSide, Field, FieldId, FieldParameters, RigidBody,
    RigidBodyParameters, Shape,
};
pub use scene::{
    Doodad, DoodadId, DoodadParameters, ModelHandle, RenderCommand, Scene, SceneParameters,
    TickContext,
};
