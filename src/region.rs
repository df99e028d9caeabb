use crate::block::Block;

/// Fixed, contiguous backing memory owned by a single allocator.
///
/// Implemented by [`Arena`](crate::Arena) and [`Page`](crate::Page). The
/// address range never changes for the lifetime of the value.
pub trait Region {
  /// First byte of the region.
  fn base(&self) -> *mut u8;

  /// Size of the region in bytes.
  fn capacity(&self) -> usize;

  /// Whether `addr` lies in `[base, base + capacity)`.
  fn contains(
    &self,
    addr: usize,
  ) -> bool {
    let base = self.base() as usize;
    addr >= base && addr < base + self.capacity()
  }

  /// The whole region as one block.
  fn span(&self) -> Block {
    Block::new(self.base(), self.capacity())
  }
}
