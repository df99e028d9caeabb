use log::{debug, trace};

use crate::{allocator::Allocator, block::Block};

/// What [`HeapAllocator`] reports for `total_mem`, `free_mem` and `max_size`.
///
/// A stand-in value, not a measurement: the system heap is never queried.
pub const HEAP_PLACEHOLDER_MEM: usize = isize::MAX as usize;

/// Byte allocator backed by the process heap (`malloc`, `realloc`, `free`).
///
/// There is no way to tell whether a pointer came from the system heap, so
/// [`Allocator::owns`] accepts every block. When used inside a
/// [`FallbackAllocator`](crate::FallbackAllocator) it belongs in the
/// secondary position.
#[derive(Debug, Default, Clone, Copy)]
pub struct HeapAllocator;

impl HeapAllocator {
  pub const fn new() -> Self {
    Self
  }
}

impl Allocator for HeapAllocator {
  type Value = u8;

  fn total_mem(&self) -> usize {
    HEAP_PLACEHOLDER_MEM
  }

  fn free_mem(&self) -> usize {
    HEAP_PLACEHOLDER_MEM
  }

  fn max_size(&self) -> usize {
    HEAP_PLACEHOLDER_MEM
  }

  fn owns(
    &self,
    _block: Block,
  ) -> bool {
    true
  }

  fn allocate(
    &mut self,
    n: usize,
  ) -> Block {
    if n == 0 || n > self.max_size() {
      return Block::null();
    }

    let address = unsafe { libc::malloc(n) } as *mut u8;

    if address.is_null() {
      debug!("malloc({n}) failed");
      return Block::null();
    }

    trace!("allocate({n}) -> {address:?}");

    Block::new(address, n)
  }

  unsafe fn reallocate(
    &mut self,
    block: Block,
    n: usize,
  ) -> Block {
    if block.is_null() {
      return self.allocate(n);
    }

    if n == 0 {
      unsafe { self.deallocate(block) };
      return Block::null();
    }

    if n <= block.len {
      return Block::new(block.ptr, n);
    }

    let address = unsafe { libc::realloc(block.ptr.cast(), n) } as *mut u8;

    if address.is_null() {
      debug!("realloc({block:?}, {n}) failed, keeping the original block");
      return block;
    }

    Block::new(address, n)
  }

  unsafe fn deallocate(
    &mut self,
    block: Block,
  ) {
    if block.is_null() {
      return;
    }

    trace!("deallocate({block:?})");
    unsafe { libc::free(block.ptr.cast()) }
  }

  /// The system heap keeps no record of outstanding blocks, so there is
  /// nothing to reclaim here.
  fn deallocate_all(&mut self) {}
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_allocate_write_deallocate() {
    let mut heap = HeapAllocator::new();

    let block = heap.allocate(32);
    assert_eq!(block.len, 32);

    unsafe {
      block.ptr.write_bytes(0xCD, block.len);
      assert_eq!(*block.ptr.add(31), 0xCD);
      heap.deallocate(block);
    }
  }

  #[test]
  fn test_reallocate_keeps_contents() {
    let mut heap = HeapAllocator::new();

    let block = heap.allocate(4);

    unsafe {
      for i in 0..4 {
        *block.ptr.add(i) = i as u8;
      }

      let shrunk = heap.reallocate(block, 2);
      assert_eq!(shrunk, Block::new(block.ptr, 2));

      let grown = heap.reallocate(shrunk, 4096);
      assert_eq!(grown.len, 4096);
      assert_eq!(*grown.ptr.add(1), 1);

      heap.deallocate(grown);
    }
  }

  #[test]
  fn test_placeholders_and_ownership() {
    let heap = HeapAllocator::new();
    let mut byte = 0u8;

    assert_eq!(heap.total_mem(), HEAP_PLACEHOLDER_MEM);
    assert_eq!(heap.free_mem(), HEAP_PLACEHOLDER_MEM);
    assert!(heap.owns(Block::new(&mut byte, 1)));
  }

  #[test]
  fn test_zero_and_oversized_requests() {
    let mut heap = HeapAllocator::new();

    assert!(heap.allocate(0).is_null());
    assert!(heap.allocate(usize::MAX).is_null());
  }

  #[test]
  fn test_reallocate_null_and_zero() {
    let mut heap = HeapAllocator::new();

    unsafe {
      let block = heap.reallocate(Block::null(), 16);
      assert_eq!(block.len, 16);
      assert!(!block.is_null());

      block.ptr.write_bytes(0x11, block.len);

      assert!(heap.reallocate(block, 0).is_null());
    }
  }

  #[test]
  #[should_panic(expected = "`allocate_all` is not implemented")]
  fn test_allocate_all_is_fatal() {
    HeapAllocator::new().allocate_all();
  }
}
