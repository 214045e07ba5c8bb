//! Error types for batching and flushing.

use std::fmt;

/// Errors raised while setting up a batch or flushing it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchError {
    /// No shader program is registered under this name.
    ShaderNotFound {
        /// The program name that was looked up.
        name: String,
    },

    /// The batch configuration cannot produce non-empty chunks.
    InvalidConfig {
        /// Description of the problem.
        reason: String,
    },

    /// Quads were appended but no drawable ever reported a texture.
    ///
    /// This means a batchable drawable broke its contract; the quads are
    /// dropped for the frame.
    MissingTexture {
        /// Number of quads that could not be drawn.
        quads: usize,
    },
}

impl fmt::Display for BatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BatchError::ShaderNotFound { name } => {
                write!(f, "Shader program not found: {}", name)
            }
            BatchError::InvalidConfig { reason } => {
                write!(f, "Invalid batch configuration: {}", reason)
            }
            BatchError::MissingTexture { quads } => {
                write!(f, "Flushing {} quads without a texture", quads)
            }
        }
    }
}

impl std::error::Error for BatchError {}

/// Result type alias for batching operations.
pub type BatchResult<T> = Result<T, BatchError>;
