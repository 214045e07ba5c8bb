//! Sparrow - quad batching for 2D scene graphs
//!
//! Sparrow collects the quads of many small drawables into one buffer and
//! submits them as a handful of bounded draw commands:
//!
//! - **Core**: logging, profiling and collection helpers
//! - **Render**: quads, buffers, draw commands and the flush emitter
//! - **Scene**: nodes, the batch container and the drawables it hosts
//!
//! # Quick Start
//!
//! ```
//! use sparrow::prelude::*;
//!
//! let shaders = ShaderCache::with_builtin_programs();
//! let mut batch = BatchNode::create(&shaders, &BatchConfig::default()).unwrap();
//!
//! let mut hero = Armature::create("hero", &shaders).unwrap();
//! hero.set_texture(Some(TextureId::new(1)));
//! hero.add_skin(Skin::new(Quad::default()));
//! batch.add_child(hero);
//!
//! let mut transforms = TransformStack::new();
//! let mut queue = CommandQueue::new();
//! batch
//!     .visit(&mut VisitContext::new(&mut transforms, &mut queue))
//!     .unwrap();
//!
//! let mut drawn = 0;
//! queue.consume(|command| drawn += command.quad_count());
//! assert_eq!(drawn, 1);
//! ```

// Re-export core types
pub use sparrow_core as core;
pub use sparrow_core::{Config, init, math};

pub use sparrow_render as render;

#[cfg(feature = "scene")]
pub use sparrow_scene as scene;

/// Prelude module for convenient imports
pub mod prelude {
    pub use sparrow_core::Config;
    pub use sparrow_core::math::{Mat4, Vec2, Vec3, Vec4};

    pub use sparrow_render::{
        BatchConfig, BatchError, BlendMode, Color, CommandQueue, DrawCommand, Quad, QuadBuffer,
        Renderer, ShaderCache, TextureId,
    };

    #[cfg(feature = "scene")]
    pub use sparrow_scene::{
        Armature, BatchNode, Node, SceneError, Skin, Sprite, TransformStack, VisitContext,
    };
}
