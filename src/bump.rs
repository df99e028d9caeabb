use log::{debug, trace};

use crate::{
  allocator::Allocator,
  arena::Arena,
  block::Block,
  error::check_ownership,
  region::Region,
};

/// Stack-like allocator over an [`Arena`] of `N` bytes.
///
/// ```text
///   ┌─────┬─────┬─────┬───────────────────────────────┐
///   │ A1  │ A2  │ A3  │          Free Space           │
///   └─────┴─────┴─────┴───────────────────────────────┘
///   ▲                 ▲                               ▲
///   base            cursor                        base + N
/// ```
///
/// Every allocation bumps the cursor forward. Only the most recent block can
/// be released or resized; anything else is left where it is until
/// [`Allocator::deallocate_all`] rewinds the cursor.
pub struct BumpAllocator<const N: usize> {
  arena: Arena<N>,
  cursor: usize,
}

impl<const N: usize> BumpAllocator<N> {
  /// # Panics
  ///
  /// Panics if `N` is zero.
  pub fn new() -> Self {
    Self {
      arena: Arena::new(),
      cursor: 0,
    }
  }

  /// Address the next allocation will start at.
  fn top(&self) -> usize {
    self.arena.base() as usize + self.cursor
  }

  /// Whether `block` is the last one handed out.
  fn is_last(
    &self,
    block: Block,
  ) -> bool {
    block.end() == self.top()
  }
}

impl<const N: usize> Default for BumpAllocator<N> {
  fn default() -> Self {
    Self::new()
  }
}

impl<const N: usize> Allocator for BumpAllocator<N> {
  type Value = u8;

  fn total_mem(&self) -> usize {
    N
  }

  fn free_mem(&self) -> usize {
    N - self.cursor
  }

  fn max_size(&self) -> usize {
    N
  }

  fn owns(
    &self,
    block: Block,
  ) -> bool {
    self.arena.contains(block.addr())
  }

  fn allocate(
    &mut self,
    n: usize,
  ) -> Block {
    if n == 0 || n > self.free_mem() {
      debug!("allocate({n}) failed, {} bytes free", self.free_mem());
      return Block::null();
    }

    let block = Block::new(self.arena.base().wrapping_add(self.cursor), n);
    self.cursor += n;

    trace!("allocate({n}) -> {block:?}");

    block
  }

  fn allocate_all(&mut self) -> Block {
    let remaining = self.free_mem();

    if remaining == 0 {
      return Block::null();
    }

    let block = Block::new(self.arena.base().wrapping_add(self.cursor), remaining);
    self.cursor = N;

    block
  }

  /// Resizes `block` in place if it is the most recent allocation and the
  /// arena has room for the growth. Otherwise `block` is returned unchanged.
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

    if !check_ownership!(self.owns(block), block.addr()) || !self.is_last(block) {
      return block;
    }

    if n <= block.len {
      self.cursor -= block.len - n;
      return Block::new(block.ptr, n);
    }

    let extra = n - block.len;
    if extra > self.free_mem() {
      debug!("reallocate({block:?}, {n}) failed, {} bytes free", self.free_mem());
      return block;
    }

    self.cursor += extra;

    Block::new(block.ptr, n)
  }

  /// Rewinds the cursor if `block` is the most recent allocation, does
  /// nothing otherwise.
  unsafe fn deallocate(
    &mut self,
    block: Block,
  ) {
    if block.is_null() || !check_ownership!(self.owns(block), block.addr()) {
      return;
    }

    if !self.is_last(block) {
      trace!("deallocate({block:?}) ignored, not the last block");
      return;
    }

    self.cursor -= block.len;
    trace!("deallocate({block:?})");
  }

  fn deallocate_all(&mut self) {
    self.cursor = 0;
  }
}
