//! Reference-counted immutable arrays shared between blocks.
//!
//! Offsets, null masks and column values are never mutated after a block is
//! built. A sliced or gathered block either holds a clone of the same handle
//! (structural sharing) or a freshly allocated array; nothing writes through
//! a shared handle.

use std::fmt;
use std::mem::size_of_val;
use std::ops::Deref;
use std::sync::Arc;

/// Immutable array handle with identity comparison.
pub struct SharedArray<T> {
    inner: Arc<[T]>,
}

impl<T> SharedArray<T> {
    /// Returns the array contents.
    pub fn as_slice(&self) -> &[T] {
        &self.inner
    }

    /// Returns the number of elements.
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Returns `true` if the array holds no elements.
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Returns `true` if both handles point at the same allocation.
    ///
    /// This is identity, not value equality: two arrays with equal contents
    /// built separately are not the same.
    pub fn ptr_eq(a: &Self, b: &Self) -> bool {
        Arc::ptr_eq(&a.inner, &b.inner)
    }

    /// Bytes held by the backing allocation.
    pub fn retained_size_in_bytes(&self) -> u64 {
        size_of_val(&*self.inner) as u64
    }
}

impl<T> Clone for SharedArray<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T> Deref for SharedArray<T> {
    type Target = [T];

    fn deref(&self) -> &[T] {
        &self.inner
    }
}

impl<T> From<Vec<T>> for SharedArray<T> {
    fn from(values: Vec<T>) -> Self {
        Self {
            inner: values.into(),
        }
    }
}

impl<T: Clone> From<&[T]> for SharedArray<T> {
    fn from(values: &[T]) -> Self {
        Self {
            inner: values.into(),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for SharedArray<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.inner.iter()).finish()
    }
}

/// Identity comparison of two optional arrays; two absent arrays are the same.
pub fn same_optional<T>(a: Option<&SharedArray<T>>, b: Option<&SharedArray<T>>) -> bool {
    match (a, b) {
        (None, None) => true,
        (Some(a), Some(b)) => SharedArray::ptr_eq(a, b),
        _ => false,
    }
}

/// Narrows `array` to `[index, index + length)`.
///
/// Returns the same handle when the window already covers the whole array.
/// The caller validates the window.
pub fn compact_array<T: Copy>(array: &SharedArray<T>, index: usize, length: usize) -> SharedArray<T> {
    if index == 0 && length == array.len() {
        return array.clone();
    }
    SharedArray::from(&array[index..index + length])
}

/// Narrows an offsets array to the `length + 1` entries starting at `index`,
/// rebasing them so the first entry is zero.
///
/// Returns the same handle when the window is the whole array and it already
/// starts at zero. The caller validates the window.
pub fn compact_offsets(offsets: &SharedArray<usize>, index: usize, length: usize) -> SharedArray<usize> {
    if index == 0 && offsets.len() == length + 1 && offsets[0] == 0 {
        return offsets.clone();
    }
    let base = offsets[index];
    offsets[index..=index + length]
        .iter()
        .map(|offset| offset - base)
        .collect::<Vec<_>>()
        .into()
}
