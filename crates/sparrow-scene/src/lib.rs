//! Scene nodes for Sparrow.
//!
//! - [`Node`] / [`Batchable`] - what a drawable can do, queried at runtime
//! - [`BatchNode`] - the container drawing batchable children in one buffer
//! - [`Armature`] - skinned, batchable drawable
//! - [`Sprite`] - single quad that always draws itself
//! - [`TransformStack`] - model-view stack with scoped pushes

pub mod armature;
pub mod batch_node;
pub mod error;
pub mod node;
pub mod sprite;
mod standalone;
pub mod transform_stack;

pub use armature::{Armature, Skin};
pub use batch_node::{BatchNode, ChildId};
pub use error::{SceneError, SceneResult};
pub use node::{Batchable, ContainerId, Node, VisitContext};
pub use sprite::Sprite;
pub use transform_stack::{TransformScope, TransformStack};
