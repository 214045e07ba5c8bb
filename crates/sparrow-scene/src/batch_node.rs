//! The batch container.
//!
//! A [`BatchNode`] owns its children and one shared [`QuadBuffer`]. During a
//! visit, batchable children append their quads to that buffer instead of
//! drawing, and the container turns the whole buffer into as few
//! [`DrawCommand`](sparrow_render::DrawCommand)s as the chunk policy allows.
//! Non-batchable children are visited normally and draw themselves.
//!
//! ```
//! use sparrow_render::{BatchConfig, CommandQueue, Quad, ShaderCache, TextureId};
//! use sparrow_scene::{Armature, BatchNode, Node, Skin, TransformStack, VisitContext};
//!
//! let shaders = ShaderCache::with_builtin_programs();
//! let mut batch = BatchNode::create(&shaders, &BatchConfig::default()).unwrap();
//!
//! let mut hero = Armature::create("hero", &shaders).unwrap();
//! hero.set_texture(Some(TextureId::new(1)));
//! hero.add_skin(Skin::new(Quad::default()));
//! hero.add_skin(Skin::new(Quad::default()));
//! batch.add_child(hero);
//!
//! let mut transforms = TransformStack::new();
//! let mut queue = CommandQueue::new();
//! batch.visit(&mut VisitContext::new(&mut transforms, &mut queue)).unwrap();
//!
//! assert_eq!(queue.len(), 1);
//! assert_eq!(batch.last_flush_stats().quads, 2);
//! ```

use bitflags::bitflags;
use glam::Mat4;
use sparrow_core::alloc::sparse_set::{IndexSlot, SparseSet};
use sparrow_core::profiling::{profile_function, profile_scope};
use sparrow_render::{
    BatchConfig, BatchResult, BlendMode, CommandEmitter, FlushState, FlushStats, QuadBuffer,
    ShaderCache, ShaderId, TextureId,
};

use crate::error::{SceneError, SceneResult};
use crate::node::{ContainerId, Node, VisitContext};

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    struct BatchNodeFlags: u8 {
        const VISIBLE = 1 << 0;
        /// Children must be re-sorted before the next visit.
        const REORDER_DIRTY = 1 << 1;
    }
}

/// Handle to a child owned by a [`BatchNode`].
///
/// Handles go stale when the child is removed; using a stale handle yields
/// [`SceneError::UnknownChild`] instead of reaching another child.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ChildId(IndexSlot);

struct ChildEntry {
    node: Box<dyn Node>,
    tag: Option<i32>,
    /// Monotonic insertion stamp; breaks ties between equal z-orders.
    arrival: u64,
}

/// Container that draws its batchable children through one shared buffer.
pub struct BatchNode {
    id: ContainerId,
    transform: Mat4,
    z_order: i32,
    flags: BatchNodeFlags,

    children: SparseSet<ChildEntry>,
    draw_order: Vec<ChildId>,
    /// This container's own tie-break stamp, cleared after every visit.
    order_of_arrival: u32,
    next_arrival: u64,

    buffer: QuadBuffer,
    emitter: CommandEmitter,
    texture: Option<TextureId>,
    shader: ShaderId,
    blend: BlendMode,
    vertex_z: f32,
}

impl BatchNode {
    /// Build a container from `config`, resolving its shader in `shaders`.
    ///
    /// Fails without building anything if the chunk policy is invalid or the
    /// shader is not registered.
    pub fn create(shaders: &ShaderCache, config: &BatchConfig) -> BatchResult<Self> {
        let policy = config.policy()?;
        let shader = shaders.require(&config.shader)?;
        let buffer = QuadBuffer::with_capacity(config.initial_capacity);

        let id = ContainerId::next();
        tracing::debug!(
            container = id.raw(),
            max_quads = policy.max_quads(),
            capacity = buffer.capacity(),
            program = %config.shader,
            "created batch node"
        );

        Ok(Self {
            id,
            transform: Mat4::IDENTITY,
            z_order: 0,
            flags: BatchNodeFlags::VISIBLE,
            children: SparseSet::new(),
            draw_order: Vec::new(),
            order_of_arrival: 0,
            next_arrival: 0,
            buffer,
            emitter: CommandEmitter::new(policy),
            texture: None,
            shader,
            blend: config.blend,
            vertex_z: 0.0,
        })
    }

    pub fn id(&self) -> ContainerId {
        self.id
    }

    /// Add a child at its own z-order.
    pub fn add_child(&mut self, node: impl Node + 'static) -> ChildId {
        self.attach(Box::new(node), None)
    }

    /// Add a child at `z_order`.
    pub fn add_child_with_z(&mut self, node: impl Node + 'static, z_order: i32) -> ChildId {
        let mut node: Box<dyn Node> = Box::new(node);
        node.set_z_order(z_order);
        self.attach(node, None)
    }

    /// Add a child at `z_order`, findable later through `tag`.
    pub fn add_child_with_tag(
        &mut self,
        node: impl Node + 'static,
        z_order: i32,
        tag: i32,
    ) -> ChildId {
        let mut node: Box<dyn Node> = Box::new(node);
        node.set_z_order(z_order);
        self.attach(node, Some(tag))
    }

    /// Add an already boxed child at its own z-order.
    pub fn add_boxed_child(&mut self, node: Box<dyn Node>) -> ChildId {
        self.attach(node, None)
    }

    fn attach(&mut self, mut node: Box<dyn Node>, tag: Option<i32>) -> ChildId {
        if let Some(batchable) = node.as_batchable_mut() {
            if let Some(previous) = batchable.batch_container() {
                tracing::warn!(
                    container = self.id.raw(),
                    previous = previous.raw(),
                    "child still referenced another batch node"
                );
            }
            batchable.set_batch_container(Some(self.id));
        }

        let arrival = self.stamp_arrival();
        let id = ChildId(self.children.push(ChildEntry { node, tag, arrival }));
        self.draw_order.push(id);
        self.flags.insert(BatchNodeFlags::REORDER_DIRTY);
        id
    }

    fn stamp_arrival(&mut self) -> u64 {
        let arrival = self.next_arrival;
        self.next_arrival += 1;
        arrival
    }

    /// Detach and return a child. Its back-reference is cleared before it
    /// leaves the container.
    pub fn remove_child(&mut self, id: ChildId) -> SceneResult<Box<dyn Node>> {
        let entry = self
            .children
            .try_get_mut(id.0)
            .ok_or(SceneError::UnknownChild { child: id })?;
        if let Some(batchable) = entry.node.as_batchable_mut() {
            batchable.set_batch_container(None);
        }

        let entry = self
            .children
            .remove(id.0)
            .ok_or(SceneError::UnknownChild { child: id })?;
        self.draw_order.retain(|child| *child != id);
        Ok(entry.node)
    }

    /// Detach the first child carrying `tag`, if any.
    pub fn remove_child_by_tag(&mut self, tag: i32) -> Option<Box<dyn Node>> {
        let id = self.child_by_tag(tag)?;
        self.remove_child(id).ok()
    }

    /// Detach every child, returning them in draw order.
    pub fn remove_all_children(&mut self) -> Vec<Box<dyn Node>> {
        for (_, entry) in self.children.iter_slots_mut() {
            if let Some(batchable) = entry.node.as_batchable_mut() {
                batchable.set_batch_container(None);
            }
        }

        self.sort_all_children();
        std::mem::take(&mut self.draw_order)
            .into_iter()
            .filter_map(|id| self.children.remove(id.0))
            .map(|entry| entry.node)
            .collect()
    }

    pub fn child(&self, id: ChildId) -> Option<&dyn Node> {
        self.children.try_get(id.0).map(|entry| &*entry.node)
    }

    /// Mutable access to a child. The draw order is re-sorted on the next
    /// visit in case its z-order changed.
    pub fn child_mut(&mut self, id: ChildId) -> Option<&mut dyn Node> {
        let entry = self.children.try_get_mut(id.0)?;
        self.flags.insert(BatchNodeFlags::REORDER_DIRTY);
        Some(&mut *entry.node)
    }

    /// A child carrying `tag`. The earliest in the current order wins.
    pub fn child_by_tag(&self, tag: i32) -> Option<ChildId> {
        self.draw_order
            .iter()
            .copied()
            .find(|id| self.children.get(id.0).tag == Some(tag))
    }

    /// Move a child to `z_order`. It sorts after every child that already
    /// shares that z-order.
    pub fn reorder_child(&mut self, id: ChildId, z_order: i32) -> SceneResult<()> {
        if !self.children.contains(id.0) {
            return Err(SceneError::UnknownChild { child: id });
        }
        let arrival = self.stamp_arrival();
        let entry = self.children.get_mut(id.0);
        entry.node.set_z_order(z_order);
        entry.arrival = arrival;
        self.flags.insert(BatchNodeFlags::REORDER_DIRTY);
        Ok(())
    }

    pub fn children_count(&self) -> usize {
        self.children.len()
    }

    /// Children in the order the next visit will dispatch them.
    pub fn draw_order(&mut self) -> &[ChildId] {
        self.sort_all_children();
        &self.draw_order
    }

    /// Sort by z-order, then arrival. No-op unless dirty.
    pub fn sort_all_children(&mut self) {
        if !self.flags.contains(BatchNodeFlags::REORDER_DIRTY) {
            return;
        }
        let children = &self.children;
        self.draw_order.sort_by_key(|id| {
            let entry = children.get(id.0);
            (entry.node.z_order(), entry.arrival)
        });
        self.flags.remove(BatchNodeFlags::REORDER_DIRTY);
    }

    /// Texture of the batchable child that drew most recently.
    pub fn texture(&self) -> Option<TextureId> {
        self.texture
    }

    pub fn shader(&self) -> ShaderId {
        self.shader
    }

    pub fn set_shader(&mut self, shader: ShaderId) {
        self.shader = shader;
    }

    pub fn blend_mode(&self) -> BlendMode {
        self.blend
    }

    pub fn set_blend_mode(&mut self, blend: BlendMode) {
        self.blend = blend;
    }

    /// Depth hint stamped on emitted commands.
    pub fn vertex_z(&self) -> f32 {
        self.vertex_z
    }

    pub fn set_vertex_z(&mut self, vertex_z: f32) {
        self.vertex_z = vertex_z;
    }

    /// Tie-break stamp an enclosing scene graph assigned to this container.
    /// Reset to zero at the end of every visit.
    pub fn order_of_arrival(&self) -> u32 {
        self.order_of_arrival
    }

    pub fn set_order_of_arrival(&mut self, order_of_arrival: u32) {
        self.order_of_arrival = order_of_arrival;
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.flags.set(BatchNodeFlags::VISIBLE, visible);
    }

    pub fn set_transform(&mut self, transform: Mat4) {
        self.transform = transform;
    }

    /// The shared buffer children append to.
    pub fn quad_buffer(&self) -> &QuadBuffer {
        &self.buffer
    }

    pub fn last_flush_stats(&self) -> FlushStats {
        self.emitter.last_stats()
    }

    /// Turn the shared buffer into draw commands under the current transform.
    fn flush(&mut self, ctx: &mut VisitContext<'_>) -> SceneResult<FlushStats> {
        let state = FlushState {
            texture: self.texture,
            shader: self.shader,
            blend: self.blend,
            depth: self.vertex_z,
            transform: ctx.transforms.current(),
        };
        Ok(self
            .emitter
            .flush(&mut self.buffer, &state, &mut *ctx.renderer)?)
    }
}

impl Node for BatchNode {
    /// Dispatch every child in draw order, then flush the shared buffer.
    ///
    /// If a child fails, whatever was appended this frame is discarded so it
    /// cannot leak into the next flush.
    fn draw(&mut self, ctx: &mut VisitContext<'_>) -> SceneResult<()> {
        profile_scope!("dispatch_children");
        for i in 0..self.draw_order.len() {
            let entry = self.children.get_mut(self.draw_order[i].0);
            let result = match entry.node.as_batchable_mut() {
                Some(batchable) => {
                    let result = batchable.visit_batched(ctx, &mut self.buffer);
                    if let Some(texture) = batchable.texture() {
                        self.texture = Some(texture);
                    }
                    result
                }
                None => entry.node.visit(ctx),
            };
            if let Err(err) = result {
                self.buffer.clear();
                return Err(err);
            }
        }

        self.flush(ctx)?;
        Ok(())
    }

    fn visit(&mut self, ctx: &mut VisitContext<'_>) -> SceneResult<()> {
        profile_function!();

        if !self.is_visible() {
            return Ok(());
        }

        let local = self.transform;
        ctx.with_transform(local, |ctx| {
            self.sort_all_children();
            let result = self.draw(ctx);
            self.order_of_arrival = 0;
            result
        })
    }

    fn is_visible(&self) -> bool {
        self.flags.contains(BatchNodeFlags::VISIBLE)
    }

    fn z_order(&self) -> i32 {
        self.z_order
    }

    fn set_z_order(&mut self, z_order: i32) {
        self.z_order = z_order;
    }

    fn transform(&self) -> Mat4 {
        self.transform
    }
}
