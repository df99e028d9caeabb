use std::ptr;

use log::{debug, trace};

use crate::{
  allocator::Allocator,
  arena::Arena,
  block::Block,
  error::{Violation, check_ownership, violation},
  region::Region,
};

/// Maximum number of free extents a free-list allocator keeps track of.
pub const FREE_LIST_CAPACITY: usize = 1024;

/// Bookkeeping of the unallocated extents of one region.
///
/// Entries are kept in a bounded vector and never overlap. Whenever an entry
/// is added, it is merged with every address-adjacent entry so that
/// neighbouring free space ends up as one extent:
///
/// ```text
///   Before releasing B:
///   ┌───────┬───────┬───────┬───────────────┐
///   │ Free  │   B   │ Used  │     Free      │    entries: [A, D]
///   │  (A)  │       │       │      (D)      │
///   └───────┴───────┴───────┴───────────────┘
///
///   After releasing B:
///   ┌───────────────┬───────┬───────────────┐
///   │   Free (A+B)  │ Used  │     Free      │    entries: [D, A+B]
///   └───────────────┴───────┴───────────────┘
/// ```
///
/// Merged entries are pushed to the back, so the list order is the history of
/// releases rather than address order.
pub(crate) struct FreeList {
  span: Block,
  entries: Vec<Block>,
}

impl FreeList {
  /// A list with a single entry covering `span`.
  pub fn new(span: Block) -> Self {
    let mut entries = Vec::with_capacity(FREE_LIST_CAPACITY);
    entries.push(span);

    Self { span, entries }
  }

  pub fn entries(&self) -> &[Block] {
    &self.entries
  }

  /// Sum of all free extents.
  pub fn free_bytes(&self) -> usize {
    self.entries.iter().map(|entry| entry.len).sum()
  }

  /// Forgets every entry and goes back to one extent covering the region.
  pub fn reset(&mut self) {
    self.entries.clear();
    self.entries.push(self.span);
  }

  /// Index of the entry chosen for a request of `size` bytes.
  ///
  /// Despite the name this is a first-fit search in list order: the first
  /// entry that is large enough wins, even when a tighter one follows it.
  /// Allocation order depends on this, so keep it.
  fn find_best_block(
    &self,
    size: usize,
  ) -> Option<usize> {
    self.entries.iter().position(|entry| entry.len >= size)
  }

  /// Index of the free entry that starts right where `block` ends and has at
  /// least `extra` bytes.
  fn find_extension(
    &self,
    block: Block,
    extra: usize,
  ) -> Option<usize> {
    self
      .entries
      .iter()
      .position(|entry| entry.addr() == block.end() && entry.len >= extra)
  }

  /// Carves `size` bytes out of the first entry that fits.
  pub fn take(
    &mut self,
    size: usize,
  ) -> Option<Block> {
    let index = self.find_best_block(size)?;
    let entry = self.entries.remove(index);

    if entry.len > size {
      let remainder = Block::new(entry.ptr.wrapping_add(size), entry.len - size);
      debug!("split {entry:?} at {size}, remainder {remainder:?}");
      self.entries.push(remainder);
      self.merge_surrounding(self.entries.len() - 1);
    }

    Some(Block::new(entry.ptr, size))
  }

  /// Grows `block` in place to `new_len` by consuming the free extent right
  /// after it. Returns `None` if there is no such extent or it's too short.
  pub fn extend(
    &mut self,
    block: Block,
    new_len: usize,
  ) -> Option<Block> {
    let extra = new_len - block.len;
    let index = self.find_extension(block, extra)?;
    let entry = self.entries.remove(index);

    if entry.len > extra {
      self
        .entries
        .push(Block::new(entry.ptr.wrapping_add(extra), entry.len - extra));
      self.merge_surrounding(self.entries.len() - 1);
    }

    debug!("extended {block:?} in place to {new_len} bytes");

    Some(Block::new(block.ptr, new_len))
  }

  /// Adds `block` back to the list and coalesces it with its neighbours.
  ///
  /// When the list already holds [`FREE_LIST_CAPACITY`] entries the block can
  /// only be accepted by merging it straight into an adjacent entry. Without
  /// such a neighbour the release panics with [`Violation::FreeListFull`],
  /// even though the caller handed back a valid block: the list never grows
  /// past its bound.
  pub fn release(
    &mut self,
    block: Block,
  ) {
    if self.entries.len() < FREE_LIST_CAPACITY {
      self.entries.push(block);
      self.merge_surrounding(self.entries.len() - 1);
      return;
    }

    let Some(neighbour) = self.find_neighbour(block, None) else {
      violation(Violation::FreeListFull {
        capacity: FREE_LIST_CAPACITY,
        addr: block.addr(),
      });
    };

    let entry = self.entries.remove(neighbour);
    self.entries.push(union(entry, block));
    self.merge_surrounding(self.entries.len() - 1);
  }

  /// Index of an entry, other than `skip`, that touches `block` on either
  /// side.
  fn find_neighbour(
    &self,
    block: Block,
    skip: Option<usize>,
  ) -> Option<usize> {
    self.entries.iter().enumerate().position(|(index, entry)| {
      Some(index) != skip && (entry.end() == block.addr() || block.end() == entry.addr())
    })
  }

  /// Repeatedly merges the entry at `index` with any adjacent entry until
  /// none is left. Each merge removes both entries and pushes their union.
  fn merge_surrounding(
    &mut self,
    mut index: usize,
  ) {
    while let Some(neighbour) = self.find_neighbour(self.entries[index], Some(index)) {
      let merged = union(self.entries[index], self.entries[neighbour]);

      trace!(
        "merge {:?} with {:?} into {merged:?}",
        self.entries[index], self.entries[neighbour]
      );

      self.entries.remove(index.max(neighbour));
      self.entries.remove(index.min(neighbour));
      self.entries.push(merged);

      index = self.entries.len() - 1;
    }
  }
}

/// The block covering two adjacent blocks.
fn union(
  a: Block,
  b: Block,
) -> Block {
  let first = if a.addr() <= b.addr() { a } else { b };
  Block::new(first.ptr, a.len + b.len)
}

/// Free-list allocator over an [`Arena`] of `N` bytes.
///
/// Allocation carves the requested size out of the first free extent large
/// enough. Releases coalesce with adjacent free extents. Growth first tries
/// to absorb the free extent right after the block and otherwise moves the
/// data to a fresh block.
pub struct FreeListAllocator<const N: usize> {
  arena: Arena<N>,
  free: FreeList,
}

impl<const N: usize> FreeListAllocator<N> {
  /// # Panics
  ///
  /// Panics if `N` is zero.
  pub fn new() -> Self {
    let arena = Arena::new();
    let free = FreeList::new(arena.span());

    Self { arena, free }
  }

  /// Currently free extents, in list order.
  pub fn free_blocks(&self) -> &[Block] {
    self.free.entries()
  }
}

impl<const N: usize> Default for FreeListAllocator<N> {
  fn default() -> Self {
    Self::new()
  }
}

impl<const N: usize> Allocator for FreeListAllocator<N> {
  type Value = u8;

  fn total_mem(&self) -> usize {
    N
  }

  fn free_mem(&self) -> usize {
    self.free.free_bytes()
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
    if n == 0 {
      return Block::null();
    }

    match self.free.take(n) {
      Some(block) => {
        trace!("allocate({n}) -> {block:?}");
        block
      }
      None => {
        debug!("allocate({n}) failed, {} bytes free", self.free_mem());
        Block::null()
      }
    }
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

    if !check_ownership!(self.owns(block), block.addr()) {
      return block;
    }

    if n == block.len {
      return block;
    }

    if n < block.len {
      self
        .free
        .release(Block::new(block.ptr.wrapping_add(n), block.len - n));
      return Block::new(block.ptr, n);
    }

    if let Some(extended) = self.free.extend(block, n) {
      return extended;
    }

    let moved = self.allocate(n);
    if moved.is_null() {
      debug!("reallocate({block:?}, {n}) failed, keeping the original block");
      return block;
    }

    unsafe { ptr::copy_nonoverlapping(block.ptr, moved.ptr, block.len) };
    self.free.release(block);

    trace!("reallocate moved {block:?} to {moved:?}");

    moved
  }

  unsafe fn deallocate(
    &mut self,
    block: Block,
  ) {
    if block.is_null() || !check_ownership!(self.owns(block), block.addr()) {
      return;
    }

    trace!("deallocate({block:?})");
    self.free.release(block);
  }

  fn deallocate_all(&mut self) {
    self.free.reset();
  }
}
