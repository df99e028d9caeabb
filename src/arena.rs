use std::{
  alloc::{self, Layout},
  ptr::NonNull,
};

use crate::region::Region;

/// Alignment of the first byte of every arena.
pub const ARENA_ALIGN: usize = 16;

/// `N` bytes of backing storage owned by one allocator.
///
/// The bytes are obtained once at construction and released on drop. They are
/// held through a pointer, so the allocator owning the arena can be moved
/// without invalidating blocks it has already handed out.
pub struct Arena<const N: usize> {
  base: NonNull<u8>,
}

impl<const N: usize> Arena<N> {
  /// # Panics
  ///
  /// Panics if `N` is zero or doesn't fit in a [`Layout`]. Aborts through
  /// [`alloc::handle_alloc_error`] if the storage can't be obtained.
  pub fn new() -> Self {
    assert!(N > 0, "arena capacity must be greater than zero");

    let layout = Self::layout();
    let address = unsafe { alloc::alloc(layout) };

    match NonNull::new(address) {
      Some(base) => Self { base },
      None => alloc::handle_alloc_error(layout),
    }
  }

  fn layout() -> Layout {
    Layout::from_size_align(N, ARENA_ALIGN)
      .unwrap_or_else(|_| panic!("arena of {} bytes exceeds the address space", N))
  }
}

impl<const N: usize> Default for Arena<N> {
  fn default() -> Self {
    Self::new()
  }
}

impl<const N: usize> Region for Arena<N> {
  fn base(&self) -> *mut u8 {
    self.base.as_ptr()
  }

  fn capacity(&self) -> usize {
    N
  }
}

impl<const N: usize> Drop for Arena<N> {
  fn drop(&mut self) {
    unsafe { alloc::dealloc(self.base.as_ptr(), Self::layout()) }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_arena_bounds() {
    let arena = Arena::<64>::new();
    let base = arena.base() as usize;

    assert_eq!(base % ARENA_ALIGN, 0);
    assert!(arena.contains(base));
    assert!(arena.contains(base + 63));
    assert!(!arena.contains(base + 64));
    assert!(!arena.contains(base - 1));
    assert_eq!(arena.span().len, 64);
  }

  #[test]
  fn test_arena_is_writable() {
    let arena = Arena::<32>::new();

    unsafe {
      arena.base().write_bytes(0xAB, 32);
      assert_eq!(*arena.base().add(31), 0xAB);
    }
  }

  #[test]
  #[should_panic(expected = "greater than zero")]
  fn test_empty_arena_panics() {
    let _arena = Arena::<0>::new();
  }
}
