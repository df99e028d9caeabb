//! Thin `libc` wrappers for obtaining and releasing anonymous pages.

use std::{
  io,
  ptr::{self, NonNull},
  sync::OnceLock,
};

/// OS virtual memory page size. Only known at runtime, so it's queried once
/// and cached.
pub fn os_page_size() -> usize {
  static PAGE_SIZE: OnceLock<usize> = OnceLock::new();

  *PAGE_SIZE.get_or_init(|| match unsafe { libc::sysconf(libc::_SC_PAGESIZE) } {
    size if size > 0 => size as usize,
    _ => 4096,
  })
}

/// Maps `length` bytes of private, anonymous, read-write memory.
///
/// `length` should be a multiple of [`os_page_size`].
pub unsafe fn map(length: usize) -> io::Result<NonNull<u8>> {
  let protection = libc::PROT_READ | libc::PROT_WRITE;
  let flags = libc::MAP_PRIVATE | libc::MAP_ANONYMOUS;

  let address = unsafe { libc::mmap(ptr::null_mut(), length, protection, flags, -1, 0) };

  if address == libc::MAP_FAILED {
    return Err(io::Error::last_os_error());
  }

  NonNull::new(address.cast()).ok_or_else(|| io::Error::from(io::ErrorKind::OutOfMemory))
}

/// Unmaps a range previously returned by [`map`] with the same `length`.
pub unsafe fn unmap(
  address: NonNull<u8>,
  length: usize,
) -> io::Result<()> {
  match unsafe { libc::munmap(address.as_ptr().cast(), length) } {
    0 => Ok(()),
    _ => Err(io::Error::last_os_error()),
  }
}
