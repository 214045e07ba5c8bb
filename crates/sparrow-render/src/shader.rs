//! Lookup of shader programs by well-known name.
//!
//! The cache is an ordinary value passed to whoever needs it; there is no
//! process-wide instance.
//!
//! ```
//! use sparrow_render::shader::{self, ShaderCache};
//!
//! let cache = ShaderCache::with_builtin_programs();
//! let program = cache.require(shader::POSITION_TEXTURE_COLOR_NO_MVP).unwrap();
//! assert_eq!(cache.get(shader::POSITION_TEXTURE_COLOR_NO_MVP), Some(program));
//! ```

use sparrow_core::alloc::HashMap;

use crate::error::{BatchError, BatchResult};
use crate::handle::ShaderId;

/// Textured, vertex-colored program whose vertices are already in view space.
///
/// Batched quads are pre-transformed on the CPU, so this is the default program
/// for batch containers.
pub const POSITION_TEXTURE_COLOR_NO_MVP: &str = "ShaderPositionTextureColor_noMVP";

/// Textured, vertex-colored program that applies the model-view-projection matrix.
pub const POSITION_TEXTURE_COLOR: &str = "ShaderPositionTextureColor";

/// Untextured, vertex-colored program.
pub const POSITION_COLOR: &str = "ShaderPositionColor";

const BUILTIN_PROGRAMS: &[&str] = &[
    POSITION_TEXTURE_COLOR_NO_MVP,
    POSITION_TEXTURE_COLOR,
    POSITION_COLOR,
];

#[derive(Debug, Default)]
pub struct ShaderCache {
    programs: HashMap<String, ShaderId>,
    next_id: u32,
}

impl ShaderCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// A cache with every built-in program name registered.
    pub fn with_builtin_programs() -> Self {
        let mut cache = Self::new();
        for name in BUILTIN_PROGRAMS {
            cache.register(name);
        }
        cache
    }

    /// Register `name`, returning the existing id if it is already known.
    pub fn register(&mut self, name: &str) -> ShaderId {
        if let Some(id) = self.programs.get(name) {
            return *id;
        }
        self.next_id += 1;
        let id = ShaderId(self.next_id);
        tracing::debug!(%id, program = name, "registered shader program");
        self.programs.insert(name.to_string(), id);
        id
    }

    pub fn get(&self, name: &str) -> Option<ShaderId> {
        self.programs.get(name).copied()
    }

    /// Like [`get`](Self::get), but reports a missing program as an error.
    pub fn require(&self, name: &str) -> BatchResult<ShaderId> {
        self.get(name).ok_or_else(|| BatchError::ShaderNotFound {
            name: name.to_string(),
        })
    }

    pub fn len(&self) -> usize {
        self.programs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.programs.is_empty()
    }
}
