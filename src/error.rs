//! Error types.
//!
//! Running out of memory is not an error here: allocators report it by
//! returning [`Block::null`](crate::Block::null). What remains are
//! construction failures ([`Error`]) and contract violations ([`Violation`]),
//! which abort the current thread with a panic.

use std::io;

use thiserror::Error;

/// Failure while building an allocator.
#[derive(Debug, Error)]
pub enum Error {
  #[error("page size must be greater than zero")]
  ZeroSize,

  #[error("failed to map a page of {size} bytes")]
  Map {
    size: usize,
    #[source]
    source: io::Error,
  },
}

pub type Result<T> = std::result::Result<T, Error>;

/// A request the allocator refuses to carry on from. These are never
/// returned, only reported through [`violation`].
///
/// Most variants mean the caller broke the allocator's contract.
/// [`Violation::FreeListFull`] is the exception: it is a capacity limit of the
/// free-list allocators and can be hit by a perfectly legal `deallocate`.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum Violation {
  #[error("`{0}` is not implemented by this allocator")]
  Unimplemented(&'static str),

  #[error("block at {addr:#x} is not owned by this allocator")]
  Foreign { addr: usize },

  /// The free list already holds `capacity` extents and the released block
  /// touches none of them.
  #[error("free list is full ({capacity} entries), cannot release block at {addr:#x}")]
  FreeListFull { capacity: usize, addr: usize },
}

/// Logs and panics with `violation`.
#[cold]
#[track_caller]
pub(crate) fn violation(violation: Violation) -> ! {
  log::error!("{violation}");
  panic!("{violation}")
}

/// Checks that a block handed to `deallocate`/`reallocate` belongs to the
/// allocator. Evaluates to `true` when it does.
///
/// The assertion only fires with `debug_assertions` or the `strict-ownership`
/// feature. Otherwise a foreign block evaluates to `false` and the caller skips
/// the operation.
macro_rules! check_ownership {
  ($owns:expr, $addr:expr) => {{
    let owned: bool = $owns;
    if !owned && cfg!(any(debug_assertions, feature = "strict-ownership")) {
      $crate::error::violation($crate::error::Violation::Foreign { addr: $addr });
    }
    owned
  }};
}

pub(crate) use check_ownership;
