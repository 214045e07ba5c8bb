//! A single textured quad that always draws itself.

use glam::{Mat4, Vec2};
use sparrow_render::{BatchConfig, BatchResult, Color, Quad, ShaderCache, TextureId, UvRect};

use crate::error::SceneResult;
use crate::node::{Node, VisitContext};
use crate::standalone::StandaloneBatch;

/// Non-batchable drawable. Inside a [`BatchNode`](crate::BatchNode) it is
/// visited like any other node and emits its own command.
#[derive(Debug)]
pub struct Sprite {
    quad: Quad,
    texture: TextureId,
    transform: Mat4,
    z_order: i32,
    visible: bool,
    batch: StandaloneBatch,
}

impl Sprite {
    /// A `size`-sized sprite anchored at its bottom-left corner.
    pub fn create(texture: TextureId, size: Vec2, shaders: &ShaderCache) -> BatchResult<Self> {
        let config = BatchConfig::default().with_initial_capacity(1);
        Ok(Self {
            quad: Quad::from_rect(Vec2::ZERO, size, 0.0, UvRect::FULL, Color::WHITE),
            texture,
            transform: Mat4::IDENTITY,
            z_order: 0,
            visible: true,
            batch: StandaloneBatch::create(shaders, &config)?,
        })
    }

    pub fn texture(&self) -> TextureId {
        self.texture
    }

    pub fn set_color(&mut self, color: Color) {
        self.quad.set_color(color);
    }

    pub fn set_transform(&mut self, transform: Mat4) {
        self.transform = transform;
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }
}

impl Node for Sprite {
    fn draw(&mut self, ctx: &mut VisitContext<'_>) -> SceneResult<()> {
        self.batch.draw([self.quad], Some(self.texture), ctx)?;
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
}
