//! Test utilities for Sparrow.
//!
//! - [`MockRenderer`] - a [`Renderer`](sparrow_render::Renderer) that records
//!   every call for later assertions
//! - [`fixtures`] - quad builders and partition checks
//!
//! ```rust
//! use sparrow_render::{Renderer, TextureId};
//! use sparrow_test_utils::MockRenderer;
//!
//! let mut renderer = MockRenderer::new();
//! let mut command = renderer.generate_command();
//! command.texture = TextureId::new(3);
//! renderer.add_command(command);
//!
//! assert_eq!(renderer.count_generated(), 1);
//! assert_eq!(renderer.commands()[0].texture, TextureId::new(3));
//! ```

pub mod fixtures;
pub mod mock_renderer;

pub use fixtures::*;
pub use mock_renderer::*;
