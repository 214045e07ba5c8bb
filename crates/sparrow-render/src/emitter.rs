//! Turning a filled [`QuadBuffer`] into draw commands.
//!
//! A flush partitions `[0, count)` into consecutive chunks of at most
//! [`ChunkPolicy::max_quads`] quads, emits one [`DrawCommand`] per chunk in
//! order, and clears the buffer. The chunks of one flush are one logical draw:
//! the renderer must not reorder them.

use glam::Mat4;
use sparrow_core::profiling::profile_function;

use crate::blend::BlendMode;
use crate::command::DrawCommand;
use crate::config::ChunkPolicy;
use crate::error::{BatchError, BatchResult};
use crate::handle::{ShaderId, TextureId};
use crate::quad_buffer::{QuadBuffer, QuadRange};
use crate::renderer::Renderer;

/// Iterator over the chunk ranges of a flush. See [`chunk_ranges`].
#[derive(Debug, Clone)]
pub struct QuadChunks {
    next: usize,
    count: usize,
    max_quads: usize,
}

impl Iterator for QuadChunks {
    type Item = QuadRange;

    fn next(&mut self) -> Option<QuadRange> {
        if self.next >= self.count {
            return None;
        }
        let len = self.max_quads.min(self.count - self.next);
        let range = QuadRange::new(self.next, len);
        self.next += len;
        Some(range)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = (self.count - self.next.min(self.count)).div_ceil(self.max_quads);
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for QuadChunks {}

/// Split `count` quads into ranges of at most `max_quads`.
///
/// Yields `ceil(count / max_quads)` ranges; only the last may be shorter, and
/// none is empty.
///
/// ```
/// use sparrow_render::{QuadRange, chunk_ranges};
///
/// let chunks: Vec<_> = chunk_ranges(257, 256).collect();
/// assert_eq!(chunks, vec![QuadRange::new(0, 256), QuadRange::new(256, 1)]);
/// assert_eq!(chunk_ranges(0, 256).count(), 0);
/// ```
///
/// # Panics
///
/// Panics if `max_quads` is zero.
pub fn chunk_ranges(count: usize, max_quads: usize) -> QuadChunks {
    assert!(max_quads > 0, "chunk size must be at least one quad");
    QuadChunks {
        next: 0,
        count,
        max_quads,
    }
}

/// Everything a flush stamps onto its commands besides the quad ranges.
#[derive(Debug, Clone, PartialEq)]
pub struct FlushState {
    /// Texture of the drawable that appended most recently, if any ever did.
    pub texture: Option<TextureId>,
    pub shader: ShaderId,
    pub blend: BlendMode,
    pub depth: f32,
    pub transform: Mat4,
}

impl FlushState {
    pub fn new(shader: ShaderId) -> Self {
        Self {
            texture: None,
            shader,
            blend: BlendMode::default(),
            depth: 0.0,
            transform: Mat4::IDENTITY,
        }
    }
}

/// What a flush emitted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FlushStats {
    pub commands: usize,
    pub quads: usize,
}

/// Chunks buffers into draw commands.
#[derive(Debug, Clone, Default)]
pub struct CommandEmitter {
    policy: ChunkPolicy,
    last: FlushStats,
}

impl CommandEmitter {
    pub fn new(policy: ChunkPolicy) -> Self {
        Self {
            policy,
            last: FlushStats::default(),
        }
    }

    pub fn policy(&self) -> ChunkPolicy {
        self.policy
    }

    /// Stats of the most recent flush.
    pub fn last_stats(&self) -> FlushStats {
        self.last
    }

    /// Emit the buffer's quads to `renderer` and clear the buffer.
    ///
    /// An empty buffer emits nothing. A non-empty buffer without a texture is a
    /// broken producer: the quads are discarded and
    /// [`BatchError::MissingTexture`] is returned. The buffer is cleared in
    /// every case.
    pub fn flush<R>(
        &mut self,
        buffer: &mut QuadBuffer,
        state: &FlushState,
        renderer: &mut R,
    ) -> BatchResult<FlushStats>
    where
        R: Renderer + ?Sized,
    {
        profile_function!();

        let count = buffer.total_count();
        self.last = FlushStats::default();

        if count == 0 {
            buffer.clear();
            return Ok(self.last);
        }

        let Some(texture) = state.texture else {
            tracing::error!(
                quads = count,
                buffer = buffer.id().raw(),
                "quads appended without a texture, dropping batch"
            );
            buffer.clear();
            return Err(BatchError::MissingTexture { quads: count });
        };

        for range in chunk_ranges(count, self.policy.max_quads()) {
            let mut command = renderer.generate_command();
            *command = DrawCommand {
                global_order: 0,
                depth: state.depth,
                texture,
                shader: state.shader,
                blend: state.blend,
                source: buffer.id(),
                quads: range,
                transform: state.transform,
            };
            renderer.add_command(command);
            self.last.commands += 1;
        }
        self.last.quads = count;

        tracing::trace!(
            commands = self.last.commands,
            quads = count,
            %texture,
            "flushed quad batch"
        );

        buffer.clear();
        Ok(self.last)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::CommandQueue;
    use crate::vertex::Quad;

    fn filled(count: usize) -> QuadBuffer {
        let mut buffer = QuadBuffer::new();
        buffer.append_slice(&vec![Quad::default(); count]);
        buffer
    }

    fn state() -> FlushState {
        FlushState {
            texture: Some(TextureId::new(7)),
            ..FlushState::new(ShaderId(1))
        }
    }

    fn emitter(max_quads: usize) -> CommandEmitter {
        CommandEmitter::new(ChunkPolicy::with_max_quads(max_quads).unwrap())
    }

    #[test]
    fn test_chunk_ranges_partition() {
        for (count, max) in [(0, 4), (1, 4), (4, 4), (5, 4), (9, 4), (1000, 7)] {
            let chunks: Vec<_> = chunk_ranges(count, max).collect();
            assert_eq!(chunks.len(), count.div_ceil(max));
            assert_eq!(chunk_ranges(count, max).len(), chunks.len());

            let mut expected_start = 0;
            for chunk in &chunks {
                assert_eq!(chunk.start, expected_start);
                assert!(chunk.len > 0 && chunk.len <= max);
                expected_start = chunk.end();
            }
            assert_eq!(expected_start, count);
        }
    }

    #[test]
    #[should_panic(expected = "at least one quad")]
    fn test_zero_chunk_size_panics() {
        let _ = chunk_ranges(10, 0);
    }

    #[test]
    fn test_three_quads_single_command() {
        let mut buffer = filled(3);
        let mut queue = CommandQueue::new();

        let stats = emitter(256).flush(&mut buffer, &state(), &mut queue).unwrap();

        assert_eq!(stats, FlushStats { commands: 1, quads: 3 });
        let commands: Vec<_> = queue.pending().cloned().collect();
        assert_eq!(commands[0].quads, QuadRange::new(0, 3));
        assert_eq!(commands[0].texture, TextureId::new(7));
        assert_eq!(commands[0].source, buffer.id());
        assert!(buffer.is_empty());
    }

    #[test]
    fn test_missing_texture_is_an_error() {
        let mut buffer = filled(2);
        let mut queue = CommandQueue::new();
        let state = FlushState::new(ShaderId(1));

        let err = emitter(256).flush(&mut buffer, &state, &mut queue).unwrap_err();

        assert_eq!(err, BatchError::MissingTexture { quads: 2 });
        assert!(queue.is_empty());
        assert!(buffer.is_empty());
    }

    #[test]
    fn test_empty_buffer_without_texture_is_fine() {
        let mut buffer = QuadBuffer::new();
        let mut queue = CommandQueue::new();
        let state = FlushState::new(ShaderId(1));

        let stats = emitter(256).flush(&mut buffer, &state, &mut queue).unwrap();
        assert_eq!(stats, FlushStats::default());
        assert!(queue.is_empty());
    }
}
