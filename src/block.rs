use std::{fmt, ptr};

/// A memory extent handed out by an allocator: a start address and a length
/// measured in `T` units (bytes for the raw allocators, elements for the typed
/// adapters).
///
/// A block is a capability, not an owner. Dropping it does nothing, and it
/// doesn't remember which allocator produced it. Callers route it back to its
/// allocator themselves.
///
/// ```text
///   ptr                       ptr + len
///    │                            │
///    ▼                            ▼
///    ┌────────────────────────────┐
///    │        len units           │
///    └────────────────────────────┘
/// ```
pub struct Block<T = u8> {
  pub ptr: *mut T,
  pub len: usize,
}

impl<T> Block<T> {
  pub const fn new(
    ptr: *mut T,
    len: usize,
  ) -> Self {
    Self { ptr, len }
  }

  /// The `{null, 0}` block returned when an allocation can't be satisfied.
  pub const fn null() -> Self {
    Self {
      ptr: ptr::null_mut(),
      len: 0,
    }
  }

  pub fn is_null(&self) -> bool {
    self.ptr.is_null()
  }

  pub fn addr(&self) -> usize {
    self.ptr as usize
  }

  /// Address one past the last unit of the block.
  pub fn end(&self) -> usize {
    self.addr() + self.len * std::mem::size_of::<T>()
  }

  /// Reinterprets the block as another unit type, with `len` given in units of
  /// `U`.
  pub(crate) fn cast<U>(
    self,
    len: usize,
  ) -> Block<U> {
    Block {
      ptr: self.ptr.cast(),
      len,
    }
  }
}

impl<T> Clone for Block<T> {
  fn clone(&self) -> Self {
    *self
  }
}

impl<T> Copy for Block<T> {}

impl<T> PartialEq for Block<T> {
  fn eq(
    &self,
    other: &Self,
  ) -> bool {
    self.ptr == other.ptr && self.len == other.len
  }
}

impl<T> Eq for Block<T> {}

impl<T> Default for Block<T> {
  fn default() -> Self {
    Self::null()
  }
}

impl<T> fmt::Debug for Block<T> {
  fn fmt(
    &self,
    f: &mut fmt::Formatter<'_>,
  ) -> fmt::Result {
    f.debug_struct("Block")
      .field("ptr", &self.ptr)
      .field("len", &self.len)
      .finish()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_null_block() {
    let block = Block::<u8>::null();

    assert!(block.is_null());
    assert_eq!(block.len, 0);
    assert_eq!(block, Block::default());
  }

  #[test]
  fn test_equality_needs_both_fields() {
    let mut storage = [0u8; 8];
    let ptr = storage.as_mut_ptr();

    assert_eq!(Block::new(ptr, 4), Block::new(ptr, 4));
    assert_ne!(Block::new(ptr, 4), Block::new(ptr, 5));
    assert_ne!(Block::new(ptr, 4), Block::new(ptr.wrapping_add(1), 4));
  }

  #[test]
  fn test_end_counts_units() {
    let mut storage = [0u32; 4];
    let block = Block::new(storage.as_mut_ptr(), 3);

    assert_eq!(block.end() - block.addr(), 12);
  }
}
