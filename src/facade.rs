//! Named selectors for the two default backing strategies.
//!
//! Code that only needs "an allocator for `T`" picks one of these instead of
//! spelling out the adapter stack:
//!
//! ```text
//!   StaticAllocator<T, N>  ──►  Typed<FreeListAllocator<N>, T>   fixed N-byte arena
//!   DynamicAllocator<T>    ──►  Typed<PageAllocator, T>          OS page, size picked at runtime
//! ```

use crate::{
  allocator::Allocator,
  block::Block,
  error::Result,
  freelist::FreeListAllocator,
  page::PageAllocator,
  typed::Typed,
};

/// Implements [`Allocator`] for a newtype by forwarding every call to its
/// `.0` field.
macro_rules! forward_allocator {
  ($ty:ty, [$($generics:tt)*]) => {
    impl<$($generics)*> Allocator for $ty {
      type Value = T;

      fn total_mem(&self) -> usize {
        self.0.total_mem()
      }

      fn free_mem(&self) -> usize {
        self.0.free_mem()
      }

      fn max_size(&self) -> usize {
        self.0.max_size()
      }

      fn owns(
        &self,
        block: Block<T>,
      ) -> bool {
        self.0.owns(block)
      }

      fn allocate(
        &mut self,
        n: usize,
      ) -> Block<T> {
        self.0.allocate(n)
      }

      fn allocate_all(&mut self) -> Block<T> {
        self.0.allocate_all()
      }

      unsafe fn reallocate(
        &mut self,
        block: Block<T>,
        n: usize,
      ) -> Block<T> {
        unsafe { self.0.reallocate(block, n) }
      }

      fn aligned_allocate(
        &mut self,
        n: usize,
        alignment: usize,
      ) -> Block<T> {
        self.0.aligned_allocate(n, alignment)
      }

      unsafe fn aligned_reallocate(
        &mut self,
        block: Block<T>,
        n: usize,
        alignment: usize,
      ) -> Block<T> {
        unsafe { self.0.aligned_reallocate(block, n, alignment) }
      }

      unsafe fn deallocate(
        &mut self,
        block: Block<T>,
      ) {
        unsafe { self.0.deallocate(block) }
      }

      fn deallocate_all(&mut self) {
        self.0.deallocate_all()
      }
    }
  };
}

/// Allocator for `T` backed by a fixed arena of `N` bytes. It never grows.
pub struct StaticAllocator<T, const N: usize>(Typed<FreeListAllocator<N>, T>);

impl<T, const N: usize> StaticAllocator<T, N> {
  /// # Panics
  ///
  /// Panics if `N` is zero or `T` is zero-sized.
  pub fn new() -> Self {
    Self(Typed::default())
  }
}

impl<T, const N: usize> Default for StaticAllocator<T, N> {
  fn default() -> Self {
    Self::new()
  }
}

forward_allocator!(StaticAllocator<T, N>, [T, const N: usize]);

/// Allocator for `T` backed by an OS-mapped page whose size is chosen at
/// construction.
pub struct DynamicAllocator<T>(Typed<PageAllocator, T>);

impl<T> DynamicAllocator<T> {
  /// Maps a page of the default size.
  pub fn new() -> Result<Self> {
    Typed::new().map(Self)
  }

  /// Maps a page of at least `bytes` bytes.
  pub fn with_page_size(bytes: usize) -> Result<Self> {
    Typed::with_page_size(bytes).map(Self)
  }
}

forward_allocator!(DynamicAllocator<T>, [T]);

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_static_allocator_is_fixed() {
    let mut allocator = StaticAllocator::<u32, 32>::new();

    assert_eq!(allocator.total_mem(), 8);

    let block = allocator.allocate(8);
    assert_eq!(block.len, 8);
    assert!(allocator.allocate(1).is_null());

    unsafe { allocator.deallocate(block) };
    assert_eq!(allocator.free_mem(), 8);
  }

  #[test]
  fn test_dynamic_allocator_uses_requested_page() {
    let mut allocator = DynamicAllocator::<u64>::with_page_size(3 * 4096).unwrap();

    assert!(allocator.total_mem() >= 3 * 512);

    let block = allocator.allocate(1024);
    assert_eq!(block.len, 1024);
    assert!(allocator.owns(block));

    allocator.deallocate_all();
    assert_eq!(allocator.free_mem(), allocator.total_mem());
  }

  #[test]
  fn test_dynamic_allocator_default_page() {
    let allocator = DynamicAllocator::<u8>::new().unwrap();

    assert!(allocator.total_mem() >= crate::DEFAULT_PAGE_SIZE);
  }
}
