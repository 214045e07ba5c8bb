//! Append-only quad storage reused across frames.
//!
//! Producers (batchable drawables) append during traversal; the
//! [`CommandEmitter`](crate::CommandEmitter) consumes the buffer at flush time
//! and resets the logical count. The backing storage is kept, so a flushed
//! range stays readable through [`QuadBuffer::resolve`] until the next frame
//! overwrites it.
//!
//! ```
//! use sparrow_render::{Quad, QuadBuffer};
//!
//! let mut buffer = QuadBuffer::new();
//! let first = buffer.append(Quad::default());
//! let rest = buffer.append_slice(&[Quad::default(); 3]);
//!
//! assert_eq!(first, 0);
//! assert_eq!(rest.start, 1);
//! assert_eq!(buffer.total_count(), 4);
//!
//! let capacity = buffer.capacity();
//! buffer.clear();
//! assert_eq!(buffer.total_count(), 0);
//! assert_eq!(buffer.capacity(), capacity);
//! ```

use std::ops::Range;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::Quad;

/// Identifies the [`QuadBuffer`] a [`DrawCommand`](crate::DrawCommand) points into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct BufferId(u64);

impl BufferId {
    fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }

    pub fn raw(self) -> u64 {
        self.0
    }
}

/// A contiguous run of quads inside a [`QuadBuffer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct QuadRange {
    pub start: usize,
    pub len: usize,
}

impl QuadRange {
    pub const fn new(start: usize, len: usize) -> Self {
        Self { start, len }
    }

    pub const fn end(&self) -> usize {
        self.start + self.len
    }

    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn as_range(&self) -> Range<usize> {
        self.start..self.end()
    }
}

/// Growable quad store with a resettable logical count.
///
/// `total_count() <= capacity()` always holds. Capacity grows to the next power
/// of two that fits a request and never shrinks.
#[derive(Debug)]
pub struct QuadBuffer {
    id: BufferId,
    /// Backing storage. `quads.len()` is the high-water mark, not the count.
    quads: Vec<Quad>,
    count: usize,
}

impl Default for QuadBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl QuadBuffer {
    /// Minimum capacity after the first growth.
    pub const INITIAL_CAPACITY: usize = 8;

    /// Largest number of quads whose vertex indices still fit in a `u32`.
    pub const MAX_QUADS: usize = (u32::MAX / 4) as usize;

    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            id: BufferId::next(),
            quads: Vec::with_capacity(capacity),
            count: 0,
        }
    }

    pub fn id(&self) -> BufferId {
        self.id
    }

    /// Number of valid quads appended since the last [`clear`](Self::clear).
    pub fn total_count(&self) -> usize {
        self.count
    }

    pub fn capacity(&self) -> usize {
        self.quads.capacity()
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Append one quad and return its index.
    ///
    /// # Panics
    ///
    /// Panics if the buffer would exceed [`QuadBuffer::MAX_QUADS`].
    pub fn append(&mut self, quad: Quad) -> usize {
        let index = self.count;
        self.reserve_for(1);
        self.write_at(index, quad);
        self.count += 1;
        index
    }

    /// Append a run of quads and return the range they occupy.
    ///
    /// # Panics
    ///
    /// Panics if the buffer would exceed [`QuadBuffer::MAX_QUADS`].
    pub fn append_slice(&mut self, quads: &[Quad]) -> QuadRange {
        let start = self.count;
        self.reserve_for(quads.len());

        // Overwrite stale slots below the high-water mark, push the rest
        let overwrite = quads.len().min(self.quads.len() - start);
        self.quads[start..start + overwrite].copy_from_slice(&quads[..overwrite]);
        self.quads.extend_from_slice(&quads[overwrite..]);

        self.count += quads.len();
        QuadRange::new(start, quads.len())
    }

    /// Reset the count to zero, keeping the allocation.
    pub fn clear(&mut self) {
        self.count = 0;
    }

    /// The quads appended since the last clear.
    pub fn quads(&self) -> &[Quad] {
        &self.quads[..self.count]
    }

    /// Read a range of the backing store.
    ///
    /// Unlike [`quads`](Self::quads) this also accepts ranges that were flushed
    /// (and therefore cleared) earlier in the frame. Returns `None` if the range
    /// was never written.
    pub fn resolve(&self, range: QuadRange) -> Option<&[Quad]> {
        self.quads.get(range.as_range())
    }

    fn write_at(&mut self, index: usize, quad: Quad) {
        if index < self.quads.len() {
            self.quads[index] = quad;
        } else {
            self.quads.push(quad);
        }
    }

    fn reserve_for(&mut self, additional: usize) {
        let required = required_quads(self.count, additional);

        if required > self.quads.capacity() {
            let new_capacity = required
                .next_power_of_two()
                .max(Self::INITIAL_CAPACITY)
                .min(Self::MAX_QUADS);
            tracing::debug!(
                buffer = self.id.raw(),
                from = self.quads.capacity(),
                to = new_capacity,
                "growing quad buffer"
            );
            self.quads.reserve_exact(new_capacity - self.quads.len());
        }
    }
}

/// Quads needed to hold `count + additional`.
///
/// # Panics
///
/// Panics if the total exceeds [`QuadBuffer::MAX_QUADS`]; chunk accounting has
/// gone wrong long before a frame gets this large.
fn required_quads(count: usize, additional: usize) -> usize {
    match count.checked_add(additional) {
        Some(required) if required <= QuadBuffer::MAX_QUADS => required,
        _ => panic!(
            "quad buffer overflow: {} + {} exceeds {} quads",
            count,
            additional,
            QuadBuffer::MAX_QUADS
        ),
    }
}
