use log::trace;

use crate::{
  allocator::Allocator,
  block::Block,
  error::{Violation, violation},
};

/// Composite allocator: every request goes to `P` first and falls back to `S`
/// when `P` can't satisfy it.
///
/// ```text
///   allocate(n) ──► primary ──► null? ──► secondary
///   deallocate(b) ──► primary.owns(b)? primary : secondary
/// ```
///
/// Both sides must hand out the same kind of block, which the
/// `S: Allocator<Value = P::Value>` bound checks at compile time.
pub struct FallbackAllocator<P, S> {
  primary: P,
  secondary: S,
}

impl<P, S> FallbackAllocator<P, S>
where
  P: Allocator,
  S: Allocator<Value = P::Value>,
{
  pub fn new(
    primary: P,
    secondary: S,
  ) -> Self {
    Self { primary, secondary }
  }

  pub fn primary(&self) -> &P {
    &self.primary
  }

  pub fn secondary(&self) -> &S {
    &self.secondary
  }

  pub fn into_parts(self) -> (P, S) {
    (self.primary, self.secondary)
  }
}

impl<P, S> Default for FallbackAllocator<P, S>
where
  P: Allocator + Default,
  S: Allocator<Value = P::Value> + Default,
{
  fn default() -> Self {
    Self::new(P::default(), S::default())
  }
}

impl<P, S> Allocator for FallbackAllocator<P, S>
where
  P: Allocator,
  S: Allocator<Value = P::Value>,
{
  type Value = P::Value;

  fn total_mem(&self) -> usize {
    self.primary.total_mem().saturating_add(self.secondary.total_mem())
  }

  fn free_mem(&self) -> usize {
    self.primary.free_mem().saturating_add(self.secondary.free_mem())
  }

  fn max_size(&self) -> usize {
    self.primary.max_size().saturating_add(self.secondary.max_size())
  }

  fn owns(
    &self,
    block: Block<Self::Value>,
  ) -> bool {
    self.primary.owns(block) || self.secondary.owns(block)
  }

  fn allocate(
    &mut self,
    n: usize,
  ) -> Block<Self::Value> {
    let block = self.primary.allocate(n);

    if !block.is_null() {
      return block;
    }

    trace!("allocate({n}) falling back to the secondary allocator");
    self.secondary.allocate(n)
  }

  fn allocate_all(&mut self) -> Block<Self::Value> {
    let block = self.primary.allocate_all();

    if !block.is_null() {
      return block;
    }

    self.secondary.allocate_all()
  }

  unsafe fn reallocate(
    &mut self,
    block: Block<Self::Value>,
    n: usize,
  ) -> Block<Self::Value> {
    if block.is_null() {
      return self.allocate(n);
    }

    if self.primary.owns(block) {
      return unsafe { self.primary.reallocate(block, n) };
    }

    if self.secondary.owns(block) {
      return unsafe { self.secondary.reallocate(block, n) };
    }

    violation(Violation::Foreign { addr: block.addr() })
  }

  unsafe fn deallocate(
    &mut self,
    block: Block<Self::Value>,
  ) {
    if block.is_null() {
      return;
    }

    if self.primary.owns(block) {
      unsafe { self.primary.deallocate(block) }
    } else {
      unsafe { self.secondary.deallocate(block) }
    }
  }

  fn deallocate_all(&mut self) {
    self.primary.deallocate_all();
    self.secondary.deallocate_all();
  }
}
