//! Sparrow render primitives for quad batching.
//!
//! Drawables append [`Quad`]s to a shared [`QuadBuffer`]; a
//! [`CommandEmitter`] later splits the buffer into bounded [`DrawCommand`]s
//! and hands them to a [`Renderer`].
//!
//! ```
//! use sparrow_render::*;
//!
//! let shaders = ShaderCache::with_builtin_programs();
//! let shader = shaders.require(shader::POSITION_TEXTURE_COLOR_NO_MVP).unwrap();
//!
//! let mut buffer = QuadBuffer::new();
//! buffer.append_slice(&[Quad::default(); 300]);
//!
//! let mut emitter = CommandEmitter::new(ChunkPolicy::with_max_quads(256).unwrap());
//! let mut queue = CommandQueue::new();
//! let state = FlushState {
//!     texture: Some(TextureId::new(1)),
//!     ..FlushState::new(shader)
//! };
//!
//! let stats = emitter.flush(&mut buffer, &state, &mut queue).unwrap();
//! assert_eq!(stats.commands, 2);
//! assert_eq!(buffer.total_count(), 0);
//! ```

pub mod blend;
pub mod color;
pub mod command;
pub mod config;
pub mod emitter;
pub mod error;
pub mod handle;
pub mod quad_buffer;
pub mod renderer;
pub mod shader;
pub mod vertex;

pub use blend::BlendMode;
pub use color::Color;
pub use command::{CommandPool, DrawCommand};
pub use config::{BatchConfig, ChunkPolicy, VBO_SIZE};
pub use emitter::{CommandEmitter, FlushState, FlushStats, QuadChunks, chunk_ranges};
pub use error::{BatchError, BatchResult};
pub use handle::{ShaderId, TextureId};
pub use quad_buffer::{BufferId, QuadBuffer, QuadRange};
pub use renderer::{CommandQueue, Renderer};
pub use shader::ShaderCache;
pub use vertex::{Quad, QuadVertex, UvRect};
