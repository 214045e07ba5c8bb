//! Draw commands and the pool they are recycled through.
//!
//! Commands are boxed so they can move between the emitter, the renderer queue
//! and the pool without copying; the pool keeps the boxes alive across frames
//! so steady-state frames allocate nothing.

use glam::Mat4;

use crate::blend::BlendMode;
use crate::handle::{ShaderId, TextureId};
use crate::quad_buffer::{BufferId, QuadRange};

/// One bounded draw submission over a range of a [`QuadBuffer`](crate::QuadBuffer).
///
/// The command references quads by buffer id and range; the quad data itself
/// stays in the buffer.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawCommand {
    /// Coarse ordering across the whole frame. Batches use `0`.
    pub global_order: i32,
    /// Depth hint used when the renderer orders commands with equal global order.
    pub depth: f32,
    pub texture: TextureId,
    pub shader: ShaderId,
    pub blend: BlendMode,
    pub source: BufferId,
    pub quads: QuadRange,
    /// Model-view transform active when the command was emitted.
    pub transform: Mat4,
}

impl Default for DrawCommand {
    fn default() -> Self {
        Self {
            global_order: 0,
            depth: 0.0,
            texture: TextureId::default(),
            shader: ShaderId::default(),
            blend: BlendMode::default(),
            source: BufferId::default(),
            quads: QuadRange::default(),
            transform: Mat4::IDENTITY,
        }
    }
}

impl DrawCommand {
    pub fn quad_count(&self) -> usize {
        self.quads.len
    }

    pub fn vertex_count(&self) -> usize {
        self.quads.len * 4
    }

    pub fn index_count(&self) -> usize {
        self.quads.len * 6
    }
}

/// Free list of boxed commands.
///
/// ```
/// use sparrow_render::CommandPool;
///
/// let mut pool = CommandPool::with_capacity(4);
/// let command = pool.generate_command();
/// assert_eq!(pool.available(), 3);
///
/// pool.recycle(command);
/// assert_eq!(pool.available(), 4);
/// assert_eq!(pool.allocated(), 4);
/// ```
#[derive(Debug, Default)]
pub struct CommandPool {
    free: Vec<Box<DrawCommand>>,
    allocated: usize,
}

impl CommandPool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-allocate `capacity` commands.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            free: (0..capacity).map(|_| Box::default()).collect(),
            allocated: capacity,
        }
    }

    /// Take a command from the pool, allocating if the pool is empty.
    ///
    /// The returned command holds whatever its previous user wrote; callers
    /// overwrite every field.
    pub fn generate_command(&mut self) -> Box<DrawCommand> {
        match self.free.pop() {
            Some(command) => command,
            None => {
                self.allocated += 1;
                tracing::trace!(allocated = self.allocated, "command pool grew");
                Box::default()
            }
        }
    }

    /// Return a command once the renderer has consumed it.
    pub fn recycle(&mut self, command: Box<DrawCommand>) {
        self.free.push(command);
    }

    /// Commands ready to be handed out.
    pub fn available(&self) -> usize {
        self.free.len()
    }

    /// Commands ever allocated by this pool.
    pub fn allocated(&self) -> usize {
        self.allocated
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pool_reuses_boxes() {
        let mut pool = CommandPool::new();
        let command = pool.generate_command();
        let ptr = &*command as *const DrawCommand;
        pool.recycle(command);

        let again = pool.generate_command();
        assert_eq!(&*again as *const DrawCommand, ptr);
        assert_eq!(pool.allocated(), 1);
    }

    #[test]
    fn test_counts() {
        let command = DrawCommand {
            quads: QuadRange::new(10, 3),
            ..Default::default()
        };
        assert_eq!(command.quad_count(), 3);
        assert_eq!(command.vertex_count(), 12);
        assert_eq!(command.index_count(), 18);
    }
}
