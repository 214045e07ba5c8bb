//! Recording implementation of [`Renderer`].

use sparrow_render::{CommandPool, DrawCommand, Renderer};

/// A renderer call, in the order it happened.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderCall {
    GenerateCommand,
    AddCommand(DrawCommand),
}

/// Records calls instead of drawing.
///
/// Enqueued commands are snapshotted into the call log and their boxes go
/// straight back to the pool, so [`pool_allocated`](Self::pool_allocated)
/// shows whether a frame reused commands.
#[derive(Debug, Default)]
pub struct MockRenderer {
    calls: Vec<RenderCall>,
    pool: CommandPool,
}

impl MockRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> &[RenderCall] {
        &self.calls
    }

    /// Enqueued commands in order.
    pub fn commands(&self) -> Vec<&DrawCommand> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                RenderCall::AddCommand(command) => Some(command),
                RenderCall::GenerateCommand => None,
            })
            .collect()
    }

    pub fn count_commands(&self) -> usize {
        self.commands().len()
    }

    pub fn count_generated(&self) -> usize {
        self.calls
            .iter()
            .filter(|call| matches!(call, RenderCall::GenerateCommand))
            .count()
    }

    /// Quad counts of the enqueued commands, in order.
    pub fn chunk_lengths(&self) -> Vec<usize> {
        self.commands().iter().map(|c| c.quads.len).collect()
    }

    pub fn pool_allocated(&self) -> usize {
        self.pool.allocated()
    }

    /// Forget recorded calls, keeping the pool.
    pub fn reset(&mut self) {
        self.calls.clear();
    }
}

impl Renderer for MockRenderer {
    fn generate_command(&mut self) -> Box<DrawCommand> {
        self.calls.push(RenderCall::GenerateCommand);
        self.pool.generate_command()
    }

    fn add_command(&mut self, command: Box<DrawCommand>) {
        self.calls.push(RenderCall::AddCommand((*command).clone()));
        self.pool.recycle(command);
    }
}
