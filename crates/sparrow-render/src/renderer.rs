//! The renderer side of the flush protocol.
//!
//! During a frame, producers call [`Renderer::generate_command`] and
//! [`Renderer::add_command`]; afterwards the renderer drains its queue in
//! enqueue order and returns every command to its pool.

use crate::command::{CommandPool, DrawCommand};

/// Receives draw commands emitted during traversal.
pub trait Renderer {
    /// Borrow a command from the renderer's pool.
    fn generate_command(&mut self) -> Box<DrawCommand>;

    /// Enqueue a command. Commands are consumed in the order they are added.
    fn add_command(&mut self, command: Box<DrawCommand>);
}

impl<R: Renderer + ?Sized> Renderer for &mut R {
    fn generate_command(&mut self) -> Box<DrawCommand> {
        (**self).generate_command()
    }

    fn add_command(&mut self, command: Box<DrawCommand>) {
        (**self).add_command(command)
    }
}

/// An ordered command queue backed by a [`CommandPool`].
///
/// ```
/// use sparrow_render::{CommandQueue, Renderer};
///
/// let mut queue = CommandQueue::new();
/// let command = queue.generate_command();
/// queue.add_command(command);
/// assert_eq!(queue.len(), 1);
///
/// let mut seen = 0;
/// queue.consume(|_command| seen += 1);
/// assert_eq!(seen, 1);
/// assert!(queue.is_empty());
/// assert_eq!(queue.pool().available(), 1);
/// ```
#[derive(Debug, Default)]
pub struct CommandQueue {
    pool: CommandPool,
    pending: Vec<Box<DrawCommand>>,
}

impl CommandQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_pool(pool: CommandPool) -> Self {
        Self {
            pool,
            pending: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Commands queued this frame, in enqueue order.
    pub fn pending(&self) -> impl Iterator<Item = &DrawCommand> {
        self.pending.iter().map(|command| &**command)
    }

    pub fn pool(&self) -> &CommandPool {
        &self.pool
    }

    /// Hand every queued command to `f` in enqueue order, then recycle it.
    pub fn consume(&mut self, mut f: impl FnMut(&DrawCommand)) {
        for command in self.pending.drain(..) {
            f(&command);
            self.pool.recycle(command);
        }
    }
}

impl Renderer for CommandQueue {
    fn generate_command(&mut self) -> Box<DrawCommand> {
        self.pool.generate_command()
    }

    fn add_command(&mut self, command: Box<DrawCommand>) {
        self.pending.push(command);
    }
}
