//! Scene node traits and the traversal context.
//!
//! A [`Node`] draws itself during [`Node::visit`]. Nodes that can share a
//! batch container's vertex buffer additionally expose the [`Batchable`]
//! capability through [`Node::as_batchable_mut`]; containers query for it
//! rather than knowing concrete node types.

use std::sync::atomic::{AtomicU64, Ordering};

use glam::Mat4;
use sparrow_render::{QuadBuffer, Renderer, TextureId};

use crate::error::SceneResult;
use crate::transform_stack::TransformStack;

/// Identifies a batch container.
///
/// Batchable children hold this as a non-owning back-reference to the
/// container drawing them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ContainerId(u64);

impl ContainerId {
    pub(crate) fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }

    pub fn raw(self) -> u64 {
        self.0
    }
}

/// What a node can reach while it is being visited.
pub struct VisitContext<'a> {
    pub transforms: &'a mut TransformStack,
    pub renderer: &'a mut dyn Renderer,
}

impl<'a> VisitContext<'a> {
    pub fn new(transforms: &'a mut TransformStack, renderer: &'a mut dyn Renderer) -> Self {
        Self {
            transforms,
            renderer,
        }
    }

    /// Run `f` with `local` pushed onto the transform stack.
    ///
    /// The push is undone when `f` returns, whether it succeeded or not.
    pub fn with_transform<R>(
        &mut self,
        local: Mat4,
        f: impl FnOnce(&mut VisitContext<'_>) -> R,
    ) -> R {
        let mut scope = self.transforms.push(local);
        let mut inner = VisitContext {
            transforms: &mut *scope,
            renderer: &mut *self.renderer,
        };
        f(&mut inner)
    }
}

/// A drawable scene node.
pub trait Node {
    /// Issue this node's own draw commands. The node's transform has already
    /// been pushed.
    fn draw(&mut self, ctx: &mut VisitContext<'_>) -> SceneResult<()>;

    /// Traverse this node: skip when invisible, otherwise push the local
    /// transform and [`draw`](Node::draw).
    fn visit(&mut self, ctx: &mut VisitContext<'_>) -> SceneResult<()> {
        if !self.is_visible() {
            return Ok(());
        }
        let local = self.transform();
        ctx.with_transform(local, |ctx| self.draw(ctx))
    }

    fn is_visible(&self) -> bool {
        true
    }

    /// Ordering key among siblings; lower draws first.
    fn z_order(&self) -> i32 {
        0
    }

    fn set_z_order(&mut self, _z_order: i32) {}

    /// Transform relative to the parent.
    fn transform(&self) -> Mat4 {
        Mat4::IDENTITY
    }

    /// Capability query for batching. `None` means the node always draws itself.
    fn as_batchable(&self) -> Option<&dyn Batchable> {
        None
    }

    fn as_batchable_mut(&mut self) -> Option<&mut dyn Batchable> {
        None
    }
}

/// A node that can append its quads to a batch container's shared buffer.
pub trait Batchable {
    /// The container currently drawing this node, if any.
    fn batch_container(&self) -> Option<ContainerId>;

    /// Set or clear the back-reference. Called by containers on attach/detach.
    fn set_batch_container(&mut self, container: Option<ContainerId>);

    /// Append this node's quads to `buffer` instead of emitting commands.
    ///
    /// Quads are written in the container's local space; the container's
    /// transform is on top of `ctx.transforms`.
    fn visit_batched(
        &mut self,
        ctx: &mut VisitContext<'_>,
        buffer: &mut QuadBuffer,
    ) -> SceneResult<()>;

    /// Texture the appended quads sample from.
    fn texture(&self) -> Option<TextureId>;
}
