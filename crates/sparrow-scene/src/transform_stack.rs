//! Model-view matrix stack with scoped pushes.

use std::ops::{Deref, DerefMut};

use glam::Mat4;

/// Stack of accumulated model-view matrices.
///
/// The only way to push is [`TransformStack::push`], which returns a guard
/// that pops on drop, so an early return or `?` can never leave the stack
/// deeper than it found it.
///
/// ```
/// use glam::{Mat4, Vec3};
/// use sparrow_scene::TransformStack;
///
/// let mut stack = TransformStack::new();
/// {
///     let scope = stack.push(Mat4::from_translation(Vec3::X));
///     assert_eq!(scope.depth(), 2);
/// }
/// assert_eq!(stack.depth(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct TransformStack {
    stack: Vec<Mat4>,
}

impl Default for TransformStack {
    fn default() -> Self {
        Self::new()
    }
}

impl TransformStack {
    pub fn new() -> Self {
        Self::with_root(Mat4::IDENTITY)
    }

    /// A stack whose bottom entry is `root` (e.g. the camera's view matrix).
    pub fn with_root(root: Mat4) -> Self {
        Self { stack: vec![root] }
    }

    /// The accumulated transform at the top of the stack.
    pub fn current(&self) -> Mat4 {
        // The root entry is never popped
        self.stack.last().copied().unwrap_or(Mat4::IDENTITY)
    }

    /// Number of entries, including the root.
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// Push `current() * local` until the returned scope is dropped.
    pub fn push(&mut self, local: Mat4) -> TransformScope<'_> {
        let top = self.current() * local;
        self.stack.push(top);
        TransformScope { stack: self }
    }
}

/// Guard returned by [`TransformStack::push`]. Dereferences to the stack.
#[derive(Debug)]
pub struct TransformScope<'a> {
    stack: &'a mut TransformStack,
}

impl Deref for TransformScope<'_> {
    type Target = TransformStack;

    fn deref(&self) -> &TransformStack {
        self.stack
    }
}

impl DerefMut for TransformScope<'_> {
    fn deref_mut(&mut self) -> &mut TransformStack {
        self.stack
    }
}

impl Drop for TransformScope<'_> {
    fn drop(&mut self) {
        debug_assert!(self.stack.stack.len() > 1, "popped the root transform");
        if self.stack.stack.len() > 1 {
            self.stack.stack.pop();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    #[test]
    fn test_push_composes_with_parent() {
        let mut stack = TransformStack::new();
        let mut outer = stack.push(Mat4::from_translation(Vec3::new(1.0, 0.0, 0.0)));
        let inner = outer.push(Mat4::from_scale(Vec3::splat(2.0)));

        let p = inner.current().transform_point3(Vec3::new(1.0, 1.0, 0.0));
        assert_eq!(p, Vec3::new(3.0, 2.0, 0.0));
        assert_eq!(inner.depth(), 3);
    }

    #[test]
    fn test_scope_pops_on_early_return() {
        fn bail(stack: &mut TransformStack) -> Result<(), ()> {
            let _scope = stack.push(Mat4::from_translation(Vec3::Y));
            Err(())?;
            Ok(())
        }

        let mut stack = TransformStack::new();
        assert!(bail(&mut stack).is_err());
        assert_eq!(stack.depth(), 1);
        assert_eq!(stack.current(), Mat4::IDENTITY);
    }

    #[test]
    fn test_root_is_kept() {
        let root = Mat4::from_translation(Vec3::Z);
        let stack = TransformStack::with_root(root);
        assert_eq!(stack.current(), root);
    }
}
