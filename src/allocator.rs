use crate::{
  block::Block,
  error::{Violation, violation},
};

/// The capability set every allocation strategy in this crate provides.
///
/// Sizes are measured in [`Allocator::Value`] units: bytes for the raw
/// allocators and elements for [`Typed`](crate::Typed) adapters.
///
/// Running out of memory never panics. It is reported by returning
/// [`Block::null`]. Calling an operation a strategy doesn't implement is a
/// contract violation and panics. The defaults below do exactly that.
pub trait Allocator {
  type Value;

  /// Total capacity managed by this allocator.
  fn total_mem(&self) -> usize;

  /// Capacity currently available. Best effort, see the implementors.
  fn free_mem(&self) -> usize;

  /// Upper bound on a single allocation.
  fn max_size(&self) -> usize;

  /// Whether `block` lies in memory managed by this instance.
  fn owns(
    &self,
    block: Block<Self::Value>,
  ) -> bool;

  /// Returns a block of exactly `n` units, or the null block.
  fn allocate(
    &mut self,
    n: usize,
  ) -> Block<Self::Value>;

  /// Returns one block spanning all the free capacity.
  fn allocate_all(&mut self) -> Block<Self::Value> {
    violation(Violation::Unimplemented("allocate_all"))
  }

  /// Resizes `block` to `n` units, preserving its contents up to the smaller
  /// of both sizes. Whether this can move or grow the block depends on the
  /// strategy. Callers must check the length of the returned block.
  ///
  /// # Safety
  ///
  /// `block` must be null or a live block previously returned by this same
  /// instance. After a call the old block must not be used unless it was
  /// returned unchanged.
  unsafe fn reallocate(
    &mut self,
    block: Block<Self::Value>,
    n: usize,
  ) -> Block<Self::Value>;

  fn aligned_allocate(
    &mut self,
    _n: usize,
    _alignment: usize,
  ) -> Block<Self::Value> {
    violation(Violation::Unimplemented("aligned_allocate"))
  }

  /// # Safety
  ///
  /// Same contract as [`Allocator::reallocate`].
  unsafe fn aligned_reallocate(
    &mut self,
    _block: Block<Self::Value>,
    _n: usize,
    _alignment: usize,
  ) -> Block<Self::Value> {
    violation(Violation::Unimplemented("aligned_reallocate"))
  }

  /// Returns `block` to the allocator.
  ///
  /// # Safety
  ///
  /// `block` must be a live block previously returned by this same instance,
  /// and it must not be used afterwards.
  unsafe fn deallocate(
    &mut self,
    block: Block<Self::Value>,
  );

  /// Reclaims every outstanding block at once. Existing blocks become dangling.
  fn deallocate_all(&mut self);
}
