use std::{marker::PhantomData, mem};

use crate::{
  allocator::Allocator,
  block::Block,
  bump::BumpAllocator,
  error::Result,
  freelist::FreeListAllocator,
  heap::HeapAllocator,
  page::{DEFAULT_PAGE_SIZE, PageAllocator},
};

/// Element-counting view of a byte allocator.
///
/// Requests for `n` elements become requests for `n * size_of::<T>()` bytes,
/// and byte lengths coming back are divided by `size_of::<T>()`. A count whose
/// byte size overflows `usize` is treated like any other request that can't be
/// satisfied and yields the null block.
pub struct Typed<A, T> {
  inner: A,
  _marker: PhantomData<fn() -> T>,
}

pub type TypedHeap<T> = Typed<HeapAllocator, T>;
pub type TypedBump<T, const N: usize> = Typed<BumpAllocator<N>, T>;
pub type TypedFreeList<T, const N: usize> = Typed<FreeListAllocator<N>, T>;
pub type TypedPage<T> = Typed<PageAllocator, T>;

impl<A, T> Typed<A, T>
where
  A: Allocator<Value = u8>,
{
  /// # Panics
  ///
  /// Panics if `T` is zero-sized.
  pub fn from_allocator(inner: A) -> Self {
    assert!(mem::size_of::<T>() != 0, "typed allocators need a sized element type");

    Self {
      inner,
      _marker: PhantomData,
    }
  }

  pub fn get_ref(&self) -> &A {
    &self.inner
  }

  pub fn into_inner(self) -> A {
    self.inner
  }

  const fn unit() -> usize {
    mem::size_of::<T>()
  }

  fn to_bytes(block: Block<T>) -> Block {
    block.cast(block.len * Self::unit())
  }

  fn to_elements(block: Block) -> Block<T> {
    block.cast(block.len / Self::unit())
  }
}

impl<T> Typed<PageAllocator, T> {
  /// Backs the adapter with a page of at least `bytes` bytes.
  pub fn with_page_size(bytes: usize) -> Result<Self> {
    Ok(Self::from_allocator(PageAllocator::with_page_size(bytes)?))
  }

  /// Backs the adapter with a page of [`DEFAULT_PAGE_SIZE`] bytes.
  pub fn new() -> Result<Self> {
    Self::with_page_size(DEFAULT_PAGE_SIZE)
  }
}

impl<A, T> Default for Typed<A, T>
where
  A: Allocator<Value = u8> + Default,
{
  fn default() -> Self {
    Self::from_allocator(A::default())
  }
}

impl<A, T> Allocator for Typed<A, T>
where
  A: Allocator<Value = u8>,
{
  type Value = T;

  fn total_mem(&self) -> usize {
    self.inner.total_mem() / Self::unit()
  }

  fn free_mem(&self) -> usize {
    self.inner.free_mem() / Self::unit()
  }

  fn max_size(&self) -> usize {
    self.inner.max_size() / Self::unit()
  }

  fn owns(
    &self,
    block: Block<T>,
  ) -> bool {
    self.inner.owns(Self::to_bytes(block))
  }

  fn allocate(
    &mut self,
    n: usize,
  ) -> Block<T> {
    match n.checked_mul(Self::unit()) {
      Some(bytes) => Self::to_elements(self.inner.allocate(bytes)),
      None => Block::null(),
    }
  }

  /// Takes everything the inner allocator has left, in whole elements. Bytes
  /// past the last whole element are handed back to the inner allocator, so
  /// the returned block can still be released through this adapter.
  fn allocate_all(&mut self) -> Block<T> {
    let block = self.inner.allocate_all();
    let whole = block.len - block.len % Self::unit();

    if whole == block.len {
      return Self::to_elements(block);
    }

    Self::to_elements(unsafe { self.inner.reallocate(block, whole) })
  }

  unsafe fn reallocate(
    &mut self,
    block: Block<T>,
    n: usize,
  ) -> Block<T> {
    match n.checked_mul(Self::unit()) {
      Some(bytes) => Self::to_elements(unsafe { self.inner.reallocate(Self::to_bytes(block), bytes) }),
      None => block,
    }
  }

  fn aligned_allocate(
    &mut self,
    n: usize,
    alignment: usize,
  ) -> Block<T> {
    match n.checked_mul(Self::unit()) {
      Some(bytes) => Self::to_elements(self.inner.aligned_allocate(bytes, alignment)),
      None => Block::null(),
    }
  }

  unsafe fn aligned_reallocate(
    &mut self,
    block: Block<T>,
    n: usize,
    alignment: usize,
  ) -> Block<T> {
    match n.checked_mul(Self::unit()) {
      Some(bytes) => Self::to_elements(unsafe {
        self
          .inner
          .aligned_reallocate(Self::to_bytes(block), bytes, alignment)
      }),
      None => block,
    }
  }

  unsafe fn deallocate(
    &mut self,
    block: Block<T>,
  ) {
    unsafe { self.inner.deallocate(Self::to_bytes(block)) }
  }

  fn deallocate_all(&mut self) {
    self.inner.deallocate_all();
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_counts_in_elements() {
    let mut allocator = TypedFreeList::<u32, 64>::default();

    assert_eq!(allocator.total_mem(), 16);

    let block = allocator.allocate(4);

    assert_eq!(block.len, 4);
    assert_eq!(allocator.get_ref().free_mem(), 48);
    assert_eq!(allocator.free_mem(), 12);

    unsafe {
      for i in 0..4 {
        block.ptr.add(i).write(i as u32 * 10);
      }
      assert_eq!(block.ptr.add(3).read(), 30);
    }
  }

  #[test]
  fn test_reallocate_translates_lengths() {
    let mut allocator = TypedFreeList::<u64, 128>::default();

    let block = allocator.allocate(2);
    let _fence = allocator.allocate(1);

    unsafe {
      block.ptr.write(7);
      block.ptr.add(1).write(8);

      let moved = allocator.reallocate(block, 4);

      assert_eq!(moved.len, 4);
      assert_ne!(moved.ptr, block.ptr);
      assert_eq!(moved.ptr.read(), 7);
      assert_eq!(moved.ptr.add(1).read(), 8);

      allocator.deallocate(moved);
    }

    assert_eq!(allocator.free_mem(), 15);
  }

  #[test]
  fn test_overflowing_count_is_null() {
    let mut allocator = TypedHeap::<u64>::default();

    assert!(allocator.allocate(usize::MAX).is_null());
  }

  #[test]
  fn test_bump_allocate_all_rounds_down() {
    let mut allocator = TypedBump::<[u8; 3], 10>::default();

    let all = allocator.allocate_all();

    assert_eq!(all.len, 3);
    assert_eq!(allocator.free_mem(), 0);
    assert_eq!(allocator.get_ref().free_mem(), 1);
  }

  #[test]
  fn test_bump_allocate_all_can_be_released() {
    let mut allocator = TypedBump::<[u8; 3], 10>::default();

    let all = allocator.allocate_all();
    unsafe { allocator.deallocate(all) };

    assert_eq!(allocator.get_ref().free_mem(), 10);
    assert_eq!(allocator.allocate(1).ptr, all.ptr);
  }

  #[test]
  fn test_allocate_all_smaller_than_one_element() {
    let mut allocator = TypedBump::<u64, 4>::default();

    assert!(allocator.allocate_all().is_null());
    assert_eq!(allocator.get_ref().free_mem(), 4);
  }

  #[test]
  fn test_page_adapter() {
    let mut allocator = TypedPage::<u16>::with_page_size(8192).unwrap();

    assert!(allocator.total_mem() >= 4096);

    let block = allocator.allocate(100);
    assert_eq!(block.len, 100);
    assert!(allocator.owns(block));

    unsafe { allocator.deallocate(block) };
    assert_eq!(allocator.free_mem(), allocator.total_mem());

    assert!(TypedPage::<u16>::new().is_ok());
  }

  #[test]
  #[should_panic(expected = "sized element type")]
  fn test_zero_sized_element_panics() {
    let _allocator = TypedHeap::<()>::default();
  }
}
