//! Quad builders and range checks shared by integration tests.

use glam::Vec2;
use sparrow_render::{Color, DrawCommand, Quad, UvRect};

/// A unit quad whose bottom-left corner sits at `(x, y)`.
pub fn quad_at(x: f32, y: f32) -> Quad {
    Quad::from_rect(
        Vec2::new(x, y),
        Vec2::new(x + 1.0, y + 1.0),
        0.0,
        UvRect::FULL,
        Color::WHITE,
    )
}

/// `count` distinct unit quads laid out along the x axis.
pub fn quads(count: usize) -> Vec<Quad> {
    (0..count).map(|i| quad_at(i as f32, 0.0)).collect()
}

/// Panics unless `commands` cover `[0, count)` in order with no gap or overlap.
pub fn assert_partitions(commands: &[&DrawCommand], count: usize) {
    let mut next = 0;
    for (i, command) in commands.iter().enumerate() {
        assert_eq!(
            command.quads.start, next,
            "command {i} starts at {} but previous chunk ended at {next}",
            command.quads.start
        );
        assert!(command.quads.len > 0, "command {i} is empty");
        next = command.quads.end();
    }
    assert_eq!(next, count, "chunks cover {next} of {count} quads");
}
