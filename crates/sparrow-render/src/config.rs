//! Batch configuration.

use crate::blend::BlendMode;
use crate::error::{BatchError, BatchResult};
use crate::shader;

/// Quads that fit one vertex buffer when every quad uses six indices into a
/// 16-bit index range.
pub const VBO_SIZE: usize = 65536 / 6;

/// Settings for a batch container and the commands it emits.
///
/// ```
/// use sparrow_render::BatchConfig;
///
/// let config = BatchConfig::default().with_slot_budget(257);
/// assert_eq!(config.policy().unwrap().max_quads(), 256);
/// ```
#[derive(Debug, Clone)]
pub struct BatchConfig {
    /// Quad slots in one draw submission's vertex buffer.
    pub slot_budget: usize,
    /// Slots per submission kept free for the primitive joining two chunks.
    pub reserved_tail: usize,
    /// Quads the shared buffer is allocated for up front.
    pub initial_capacity: usize,
    pub blend: BlendMode,
    /// Shader program looked up in the [`ShaderCache`](crate::ShaderCache).
    pub shader: String,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            slot_budget: VBO_SIZE,
            reserved_tail: 1,
            initial_capacity: 8,
            blend: BlendMode::AlphaNonPremultiplied,
            shader: shader::POSITION_TEXTURE_COLOR_NO_MVP.to_string(),
        }
    }
}

impl BatchConfig {
    pub fn with_slot_budget(mut self, slot_budget: usize) -> Self {
        self.slot_budget = slot_budget;
        self
    }

    pub fn with_reserved_tail(mut self, reserved_tail: usize) -> Self {
        self.reserved_tail = reserved_tail;
        self
    }

    pub fn with_initial_capacity(mut self, initial_capacity: usize) -> Self {
        self.initial_capacity = initial_capacity;
        self
    }

    pub fn with_blend(mut self, blend: BlendMode) -> Self {
        self.blend = blend;
        self
    }

    pub fn with_shader(mut self, shader: impl Into<String>) -> Self {
        self.shader = shader.into();
        self
    }

    /// Validate the chunk sizes and derive the chunking policy.
    pub fn policy(&self) -> BatchResult<ChunkPolicy> {
        ChunkPolicy::new(self.slot_budget, self.reserved_tail)
    }
}

/// Maximum quads per draw submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkPolicy {
    max_quads: usize,
}

impl ChunkPolicy {
    /// `slot_budget - reserved_tail` quads per chunk; must be at least one.
    pub fn new(slot_budget: usize, reserved_tail: usize) -> BatchResult<Self> {
        match slot_budget.checked_sub(reserved_tail) {
            Some(max_quads) if max_quads > 0 => Ok(Self { max_quads }),
            _ => Err(BatchError::InvalidConfig {
                reason: format!(
                    "slot budget {} leaves no room after reserving {} slots",
                    slot_budget, reserved_tail
                ),
            }),
        }
    }

    /// A policy with an exact chunk size and no reserved tail.
    pub fn with_max_quads(max_quads: usize) -> BatchResult<Self> {
        Self::new(max_quads, 0)
    }

    pub fn max_quads(&self) -> usize {
        self.max_quads
    }
}

impl Default for ChunkPolicy {
    fn default() -> Self {
        Self {
            max_quads: VBO_SIZE - 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_policy_reserves_one_slot() {
        let policy = BatchConfig::default().policy().unwrap();
        assert_eq!(policy.max_quads(), VBO_SIZE - 1);
        assert_eq!(policy, ChunkPolicy::default());
    }

    #[test]
    fn test_reserved_tail_consuming_budget_is_rejected() {
        let err = BatchConfig::default()
            .with_slot_budget(4)
            .with_reserved_tail(4)
            .policy()
            .unwrap_err();
        assert!(matches!(err, BatchError::InvalidConfig { .. }));

        assert!(ChunkPolicy::new(1, 2).is_err());
        assert!(ChunkPolicy::with_max_quads(0).is_err());
    }
}
