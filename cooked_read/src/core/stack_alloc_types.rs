// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Be careful when adjusting these sizes. Smaller static allocations are better than
//! larger ones: a container that outgrows its inline capacity is
//! [`smallvec::SmallVec::spilled`] on the heap, but huge stack allocations can overflow
//! the stack.

use smallstr::SmallString;
use smallvec::SmallVec;

pub const DEFAULT_STRING_STORAGE_SIZE: usize = 16;

/// Stack allocated string storage for small strings, like executable names and popup
/// labels. When this gets larger than [`DEFAULT_STRING_STORAGE_SIZE`], it will be
/// [`smallvec::SmallVec::spilled`] on the heap.
pub type InlineString = SmallString<[u8; DEFAULT_STRING_STORAGE_SIZE]>;

/// Stack allocated list, that can [`smallvec::SmallVec::spilled`] into the heap if it
/// gets larger than [`INLINE_VEC_SIZE`].
pub type InlineVec<T> = SmallVec<[T; INLINE_VEC_SIZE]>;
pub const INLINE_VEC_SIZE: usize = 8;

/// Fixed capacity buffer that never spills. Pushing past `N` is rejected rather than
/// silently truncated or moved to the heap.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BoundedBuffer<T: Copy + Default, const N: usize> {
    inner: SmallVec<[T; N]>,
}

impl<T: Copy + Default, const N: usize> BoundedBuffer<T, N> {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            inner: SmallVec::new_const(),
        }
    }

    /// Returns `false` (and leaves the buffer unchanged) when the buffer is full.
    pub fn try_push(&mut self, item: T) -> bool {
        if self.is_full() {
            return false;
        }
        self.inner.push(item);
        true
    }

    pub fn pop(&mut self) -> Option<T> { self.inner.pop() }

    pub fn clear(&mut self) { self.inner.clear(); }

    #[must_use]
    pub fn len(&self) -> usize { self.inner.len() }

    #[must_use]
    pub fn is_empty(&self) -> bool { self.inner.is_empty() }

    #[must_use]
    pub fn is_full(&self) -> bool { self.inner.len() >= N }

    #[must_use]
    pub const fn capacity() -> usize { N }

    #[must_use]
    pub fn as_slice(&self) -> &[T] { self.inner.as_slice() }
}
