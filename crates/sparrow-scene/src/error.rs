//! Error types for scene traversal.

use std::fmt;

use sparrow_render::BatchError;

use crate::batch_node::ChildId;

/// Errors that can occur while building or visiting a scene.
#[derive(Debug, Clone, PartialEq)]
pub enum SceneError {
    /// Setting up or flushing a batch failed.
    Batch(BatchError),

    /// The child handle is stale or belongs to another container.
    UnknownChild {
        /// The handle that was looked up.
        child: ChildId,
    },

    /// A node failed to draw itself.
    Child {
        /// Description of the failure.
        message: String,
    },
}

impl fmt::Display for SceneError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SceneError::Batch(err) => write!(f, "Batch error: {}", err),
            SceneError::UnknownChild { child } => {
                write!(f, "Unknown child: {:?}", child)
            }
            SceneError::Child { message } => write!(f, "Child failed to draw: {}", message),
        }
    }
}

impl std::error::Error for SceneError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SceneError::Batch(err) => Some(err),
            _ => None,
        }
    }
}

impl From<BatchError> for SceneError {
    fn from(err: BatchError) -> Self {
        SceneError::Batch(err)
    }
}

/// Result type alias for scene operations.
pub type SceneResult<T> = Result<T, SceneError>;
