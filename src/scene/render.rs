//! Render hand-off
//!
//! The renderer is an external collaborator: per tick the scene produces one
//! command per visible doodad and the renderer drains them.

use cgmath::Matrix4;

/// Opaque handle to a visual model owned by the asset layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ModelHandle(pub u32);

/// One draw request: a model and its world matrix (T * R * S)
#[derive(Debug, Clone, Copy)]
pub struct RenderCommand {
    pub model: ModelHandle,
    pub world_matrix: Matrix4<f32>,
}
