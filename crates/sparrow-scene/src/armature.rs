//! Skinned armatures, the batchable drawable.
//!
//! An armature is a set of skins, each a textured quad placed by its bone.
//! Inside a [`BatchNode`](crate::BatchNode) the skins are written to the
//! container's shared buffer; on its own the armature flushes them through a
//! private buffer.

use glam::Mat4;
use sparrow_render::{
    BatchConfig, BatchResult, BlendMode, FlushStats, Quad, QuadBuffer, ShaderCache, TextureId,
};

use crate::error::SceneResult;
use crate::node::{Batchable, ContainerId, Node, VisitContext};
use crate::standalone::StandaloneBatch;

/// One textured quad attached to a bone.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Skin {
    /// The quad in bone space.
    pub quad: Quad,
    /// Bone space to armature space.
    pub bone_transform: Mat4,
    pub visible: bool,
}

impl Skin {
    pub fn new(quad: Quad) -> Self {
        Self {
            quad,
            bone_transform: Mat4::IDENTITY,
            visible: true,
        }
    }

    pub fn with_bone_transform(mut self, bone_transform: Mat4) -> Self {
        self.bone_transform = bone_transform;
        self
    }
}

/// Quads of every visible skin, placed by `model * bone`.
fn skin_quads<'a>(skins: &'a [Skin], model: &'a Mat4) -> impl Iterator<Item = Quad> + 'a {
    skins
        .iter()
        .filter(|skin| skin.visible)
        .map(move |skin| skin.quad.transformed(&(*model * skin.bone_transform)))
}

#[derive(Debug)]
pub struct Armature {
    name: String,
    transform: Mat4,
    z_order: i32,
    visible: bool,
    texture: Option<TextureId>,
    skins: Vec<Skin>,
    batch_container: Option<ContainerId>,
    standalone: StandaloneBatch,
}

impl Armature {
    /// An armature with the default batch settings for its standalone path.
    pub fn create(name: impl Into<String>, shaders: &ShaderCache) -> BatchResult<Self> {
        Self::with_config(name, shaders, &BatchConfig::default())
    }

    pub fn with_config(
        name: impl Into<String>,
        shaders: &ShaderCache,
        config: &BatchConfig,
    ) -> BatchResult<Self> {
        Ok(Self {
            name: name.into(),
            transform: Mat4::IDENTITY,
            z_order: 0,
            visible: true,
            texture: None,
            skins: Vec::new(),
            batch_container: None,
            standalone: StandaloneBatch::create(shaders, config)?,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Add a skin and return its index.
    pub fn add_skin(&mut self, skin: Skin) -> usize {
        self.skins.push(skin);
        self.skins.len() - 1
    }

    pub fn skins(&self) -> &[Skin] {
        &self.skins
    }

    pub fn skins_mut(&mut self) -> &mut [Skin] {
        &mut self.skins
    }

    pub fn set_texture(&mut self, texture: Option<TextureId>) {
        self.texture = texture;
    }

    pub fn set_transform(&mut self, transform: Mat4) {
        self.transform = transform;
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    /// Blend mode used when drawing standalone. Hosted armatures use the
    /// container's.
    pub fn blend_mode(&self) -> BlendMode {
        self.standalone.blend()
    }

    pub fn set_blend_mode(&mut self, blend: BlendMode) {
        self.standalone.set_blend(blend);
    }

    /// The private buffer used when drawing standalone.
    pub fn standalone_buffer(&self) -> &QuadBuffer {
        self.standalone.buffer()
    }

    /// Draw through the private buffer.
    fn draw_standalone(&mut self, ctx: &mut VisitContext<'_>) -> SceneResult<FlushStats> {
        // The armature's transform is already on the stack
        let quads = skin_quads(&self.skins, &Mat4::IDENTITY);
        self.standalone.draw(quads, self.texture, ctx)
    }
}

impl Node for Armature {
    fn draw(&mut self, ctx: &mut VisitContext<'_>) -> SceneResult<()> {
        if let Some(container) = self.batch_container {
            tracing::trace!(
                armature = %self.name,
                container = container.raw(),
                "armature is drawn by its batch node"
            );
            return Ok(());
        }
        self.draw_standalone(ctx)?;
        Ok(())
    }

    fn is_visible(&self) -> bool {
        self.visible
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

    fn as_batchable(&self) -> Option<&dyn Batchable> {
        Some(self)
    }

    fn as_batchable_mut(&mut self) -> Option<&mut dyn Batchable> {
        Some(self)
    }
}

impl Batchable for Armature {
    fn batch_container(&self) -> Option<ContainerId> {
        self.batch_container
    }

    fn set_batch_container(&mut self, container: Option<ContainerId>) {
        self.batch_container = container;
    }

    /// Write skins into the container's space. The container's transform is
    /// applied by the command, so only the armature's own transform is baked.
    fn visit_batched(
        &mut self,
        _ctx: &mut VisitContext<'_>,
        buffer: &mut QuadBuffer,
    ) -> SceneResult<()> {
        if !self.visible {
            return Ok(());
        }
        for quad in skin_quads(&self.skins, &self.transform) {
            buffer.append(quad);
        }
        Ok(())
    }

    fn texture(&self) -> Option<TextureId> {
        self.texture
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transform_stack::TransformStack;
    use glam::{Vec2, Vec3};
    use sparrow_render::{Color, CommandQueue, UvRect};

    fn unit_quad() -> Quad {
        Quad::from_rect(Vec2::ZERO, Vec2::ONE, 0.0, UvRect::FULL, Color::WHITE)
    }

    fn armature() -> Armature {
        let shaders = ShaderCache::with_builtin_programs();
        let mut armature = Armature::create("test", &shaders).unwrap();
        armature.set_texture(Some(TextureId::new(2)));
        armature
    }

    #[test]
    fn test_visit_batched_applies_bone_and_armature_transforms() {
        let mut armature = armature();
        armature.set_transform(Mat4::from_translation(Vec3::new(10.0, 0.0, 0.0)));
        armature.add_skin(
            Skin::new(unit_quad())
                .with_bone_transform(Mat4::from_translation(Vec3::new(0.0, 5.0, 0.0))),
        );

        let mut transforms = TransformStack::new();
        let mut queue = CommandQueue::new();
        let mut ctx = VisitContext::new(&mut transforms, &mut queue);
        let mut buffer = QuadBuffer::new();
        armature.visit_batched(&mut ctx, &mut buffer).unwrap();

        assert_eq!(buffer.total_count(), 1);
        assert_eq!(buffer.quads()[0].bl.position, [10.0, 5.0, 0.0]);
    }

    #[test]
    fn test_hidden_skins_are_skipped() {
        let mut armature = armature();
        armature.add_skin(Skin::new(unit_quad()));
        let hidden = armature.add_skin(Skin::new(unit_quad()));
        armature.skins_mut()[hidden].visible = false;

        let mut transforms = TransformStack::new();
        let mut queue = CommandQueue::new();
        let mut ctx = VisitContext::new(&mut transforms, &mut queue);
        let mut buffer = QuadBuffer::new();
        armature.visit_batched(&mut ctx, &mut buffer).unwrap();

        assert_eq!(buffer.total_count(), 1);
    }

    #[test]
    fn test_standalone_draw_flushes_own_buffer() {
        let mut armature = armature();
        armature.add_skin(Skin::new(unit_quad()));
        armature.add_skin(Skin::new(unit_quad()));

        let mut transforms = TransformStack::new();
        let mut queue = CommandQueue::new();
        armature
            .visit(&mut VisitContext::new(&mut transforms, &mut queue))
            .unwrap();

        let commands: Vec<_> = queue.pending().collect();
        assert_eq!(commands.len(), 1);
        assert_eq!(commands[0].quads.len, 2);
        assert_eq!(commands[0].source, armature.standalone_buffer().id());
        assert!(armature.standalone_buffer().is_empty());
    }

    #[test]
    fn test_hosted_armature_suppresses_own_commands() {
        let mut armature = armature();
        armature.add_skin(Skin::new(unit_quad()));
        armature.set_batch_container(Some(ContainerId::next()));

        let mut transforms = TransformStack::new();
        let mut queue = CommandQueue::new();
        armature
            .visit(&mut VisitContext::new(&mut transforms, &mut queue))
            .unwrap();

        assert!(queue.is_empty());
    }
}
