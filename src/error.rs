//! Unified error handling for Kiln Engine
//!
//! Factory and lookup functions return `EngineResult`; the tick loop itself
//! never propagates an error to its caller (contact events are normal
//! control flow, programmer errors are debug assertions).

use crate::physics::{BodyId, FieldId};
use crate::scene::DoodadId;

/// Main error type for Kiln Engine
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("Field not found: {0:?}")]
    FieldNotFound(FieldId),

    #[error("Rigid body {body:?} not found in field {field:?}")]
    BodyNotFound { field: FieldId, body: BodyId },

    #[error("Rigid body {0:?} has no collider")]
    ColliderMissing(BodyId),

    #[error("Rigid body {0:?} already owns a collider")]
    ColliderAlreadyAttached(BodyId),

    #[error("Empty shape cannot be used for {context}")]
    EmptyShape { context: &'static str },

    #[error("Doodad not found: {0:?}")]
    DoodadNotFound(DoodadId),

    #[error("Invalid parameter {name}: {reason}")]
    InvalidParameter { name: &'static str, reason: String },

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Type alias for Results in Kiln Engine
pub type EngineResult<T> = Result<T, EngineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = EngineError::EmptyShape { context: "collider" };
        assert_eq!(err.to_string(), "Empty shape cannot be used for collider");
    }

    #[test]
    fn test_body_not_found_display() {
        let err = EngineError::BodyNotFound {
            field: FieldId(3),
            body: BodyId(7),
        };
        assert!(err.to_string().contains("BodyId(7)"));
        assert!(err.to_string().contains("FieldId(3)"));
    }
}
