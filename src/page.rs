use std::{io, ptr::NonNull};

use log::{debug, error, trace};

use crate::{
  align_to,
  allocator::Allocator,
  block::Block,
  error::{Error, Result, check_ownership},
  freelist::FreeList,
  mmap,
  region::Region,
};

/// Page size used when the caller doesn't pick one.
pub const DEFAULT_PAGE_SIZE: usize = 4096;

/// A range of anonymous memory mapped from the OS.
///
/// The requested size is rounded up to the OS page granularity and the whole
/// rounded range is usable. The mapping is released when the value is dropped.
pub struct Page {
  base: NonNull<u8>,
  len: usize,
}

impl Page {
  pub fn map(size: usize) -> Result<Self> {
    if size == 0 {
      return Err(Error::ZeroSize);
    }

    if size > isize::MAX as usize - mmap::os_page_size() {
      return Err(Error::Map {
        size,
        source: io::ErrorKind::OutOfMemory.into(),
      });
    }

    let len = align_to!(size, mmap::os_page_size());
    let base = unsafe { mmap::map(len) }.map_err(|source| Error::Map { size: len, source })?;

    debug!("mapped {len} bytes at {base:?}");

    Ok(Self { base, len })
  }
}

impl Region for Page {
  fn base(&self) -> *mut u8 {
    self.base.as_ptr()
  }

  fn capacity(&self) -> usize {
    self.len
  }
}

impl Drop for Page {
  fn drop(&mut self) {
    match unsafe { mmap::unmap(self.base, self.len) } {
      Ok(()) => debug!("unmapped {} bytes at {:?}", self.len, self.base),
      Err(err) => error!("failed to unmap {} bytes at {:?}: {err}", self.len, self.base),
    }
  }
}

/// Free-list allocator over a single OS-mapped [`Page`].
///
/// Allocation and release behave exactly like
/// [`FreeListAllocator`](crate::FreeListAllocator): first-fit carving and
/// coalescing of adjacent extents.
///
/// Reallocation is not implemented: [`Allocator::reallocate`] hands back the
/// block it was given, whatever size was requested. Callers must compare the
/// returned length with the one they asked for.
pub struct PageAllocator {
  page: Page,
  free: FreeList,
}

impl PageAllocator {
  /// Maps a page of [`DEFAULT_PAGE_SIZE`] bytes.
  pub fn new() -> Result<Self> {
    Self::with_page_size(DEFAULT_PAGE_SIZE)
  }

  /// Maps a page of at least `size` bytes.
  pub fn with_page_size(size: usize) -> Result<Self> {
    let page = Page::map(size)?;
    let free = FreeList::new(page.span());

    Ok(Self { page, free })
  }

  /// Currently free extents, in list order.
  pub fn free_blocks(&self) -> &[Block] {
    self.free.entries()
  }
}

impl Allocator for PageAllocator {
  type Value = u8;

  fn total_mem(&self) -> usize {
    self.page.capacity()
  }

  fn free_mem(&self) -> usize {
    self.free.free_bytes()
  }

  fn max_size(&self) -> usize {
    self.page.capacity()
  }

  fn owns(
    &self,
    block: Block,
  ) -> bool {
    self.page.contains(block.addr())
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

  /// Returns `block` unchanged. Growing or shrinking page-backed blocks is not
  /// supported, and neither a null `block` nor `n == 0` is special-cased.
  unsafe fn reallocate(
    &mut self,
    block: Block,
    n: usize,
  ) -> Block {
    debug!("reallocate({block:?}, {n}) is not supported on pages, block unchanged");
    block
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
