//! Private draw path for nodes that are not hosted by a batch container.

use sparrow_render::{
    BatchConfig, BatchResult, BlendMode, CommandEmitter, FlushState, FlushStats, Quad, QuadBuffer,
    ShaderCache, ShaderId, TextureId,
};

use crate::error::SceneResult;
use crate::node::VisitContext;

/// A buffer and emitter owned by a single node.
#[derive(Debug)]
pub(crate) struct StandaloneBatch {
    buffer: QuadBuffer,
    emitter: CommandEmitter,
    shader: ShaderId,
    blend: BlendMode,
}

impl StandaloneBatch {
    pub(crate) fn create(shaders: &ShaderCache, config: &BatchConfig) -> BatchResult<Self> {
        Ok(Self {
            buffer: QuadBuffer::with_capacity(config.initial_capacity),
            emitter: CommandEmitter::new(config.policy()?),
            shader: shaders.require(&config.shader)?,
            blend: config.blend,
        })
    }

    pub(crate) fn blend(&self) -> BlendMode {
        self.blend
    }

    pub(crate) fn set_blend(&mut self, blend: BlendMode) {
        self.blend = blend;
    }

    pub(crate) fn buffer(&self) -> &QuadBuffer {
        &self.buffer
    }

    /// Append `quads` and flush them under the current transform.
    pub(crate) fn draw(
        &mut self,
        quads: impl IntoIterator<Item = Quad>,
        texture: Option<TextureId>,
        ctx: &mut VisitContext<'_>,
    ) -> SceneResult<FlushStats> {
        for quad in quads {
            self.buffer.append(quad);
        }
        let state = FlushState {
            texture,
            shader: self.shader,
            blend: self.blend,
            depth: 0.0,
            transform: ctx.transforms.current(),
        };
        Ok(self
            .emitter
            .flush(&mut self.buffer, &state, &mut *ctx.renderer)?)
    }
}
