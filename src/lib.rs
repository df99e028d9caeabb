//! # blockalloc - Block-Based Memory Allocators
//!
//! This crate provides a family of small, single-threaded allocators that
//! hand out raw memory extents ([`Block`]s) and keep track of free space with
//! different strategies. All of them implement the same [`Allocator`] trait,
//! so they can be stacked and swapped freely.
//!
//! ## Overview
//!
//! ```text
//!   Allocator family:
//!
//!   ┌──────────────────────────────────────────────────────────────────────┐
//!   │                                                                      │
//!   │   HeapAllocator          malloc / realloc / free                     │
//!   │   BumpAllocator<N>       one cursor over an N-byte arena, LIFO only  │
//!   │   FreeListAllocator<N>   free list over an N-byte arena              │
//!   │   PageAllocator          free list over an mmap'ed page              │
//!   │                                                                      │
//!   │   FallbackAllocator<P, S>   try P, then S                            │
//!   │   Typed<A, T>               counts in elements of T instead of bytes │
//!   │   StaticAllocator<T, N>     Typed<FreeListAllocator<N>, T>           │
//!   │   DynamicAllocator<T>       Typed<PageAllocator, T>                  │
//!   │                                                                      │
//!   └──────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Crate Structure
//!
//! ```text
//!   blockalloc
//!   ├── align      - Alignment macro (align_to!)
//!   ├── allocator  - The Allocator trait
//!   ├── arena      - Fixed N-byte backing storage
//!   ├── block      - Block descriptor {ptr, len}
//!   ├── bump       - BumpAllocator
//!   ├── error      - Construction errors and contract violations
//!   ├── facade     - StaticAllocator / DynamicAllocator
//!   ├── fallback   - FallbackAllocator
//!   ├── freelist   - Free list bookkeeping and FreeListAllocator
//!   ├── heap       - HeapAllocator
//!   ├── mmap       - mmap / munmap wrappers
//!   ├── page       - Page and PageAllocator
//!   ├── region     - Region trait shared by arenas and pages
//!   └── typed      - Typed element adapter
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use blockalloc::{Allocator, BumpAllocator, FallbackAllocator, HeapAllocator};
//!
//! let mut allocator = FallbackAllocator::new(BumpAllocator::<64>::new(), HeapAllocator::new());
//!
//! // Served by the arena.
//! let small = allocator.allocate(16);
//! assert!(allocator.primary().owns(small));
//!
//! // Too big for the arena, served by malloc.
//! let large = allocator.allocate(1024);
//! assert!(!large.is_null());
//!
//! unsafe {
//!   small.ptr.write_bytes(0, small.len);
//!   allocator.deallocate(large);
//!   allocator.deallocate(small);
//! }
//! ```
//!
//! ## How It Works
//!
//! The free-list allocators keep a bounded list of free extents. Allocation
//! takes the first extent that is large enough and splits off the rest:
//!
//! ```text
//!   allocate(16) on an empty 64-byte arena:
//!
//!   ┌────────────────────────────────────────────────┐
//!   │                  Free (64)                     │   free list: [0..64]
//!   └────────────────────────────────────────────────┘
//!                           │
//!                           ▼
//!   ┌──────────┬─────────────────────────────────────┐
//!   │ Used(16) │              Free (48)              │   free list: [16..64]
//!   └──────────┴─────────────────────────────────────┘
//!   ▲
//!   └── Block returned to the caller
//! ```
//!
//! Deallocation puts the extent back and merges it with any free extent that
//! touches it, so releasing everything always ends with a single entry.
//!
//! ## Errors
//!
//! - **Out of memory** is not an error: allocators return [`Block::null`] and
//!   the caller checks for it.
//! - **Contract violations** (calling an unimplemented operation, releasing a
//!   block the allocator doesn't own) panic. The ownership check is only
//!   compiled in with `debug_assertions` or the `strict-ownership` feature.
//! - **Construction failures** (mapping a page) return [`Error`].
//!
//! ## Limitations
//!
//! - **Single-threaded only**: No synchronization primitives
//! - **No aligned allocation**: `aligned_allocate` and `aligned_reallocate`
//!   are not implemented by any strategy
//! - **Page reallocation**: [`PageAllocator`] returns blocks unchanged from
//!   `reallocate`
//! - **Placeholder heap figures**: [`HeapAllocator`] reports
//!   [`HEAP_PLACEHOLDER_MEM`] rather than real system memory
//! - **Unix-only**: Requires `libc` and `mmap` (POSIX systems)
//!
//! ## Safety
//!
//! Blocks are plain descriptors. Reading or writing through them, and handing
//! them back through `deallocate` or `reallocate`, is `unsafe`. The caller must
//! return every block exactly once, to the allocator that produced it.

pub mod align;
mod allocator;
mod arena;
mod block;
mod bump;
pub mod error;
mod facade;
mod fallback;
mod freelist;
mod heap;
mod mmap;
mod page;
mod region;
mod typed;

pub use allocator::Allocator;
pub use arena::{ARENA_ALIGN, Arena};
pub use block::Block;
pub use bump::BumpAllocator;
pub use error::{Error, Result, Violation};
pub use facade::{DynamicAllocator, StaticAllocator};
pub use fallback::FallbackAllocator;
pub use freelist::{FREE_LIST_CAPACITY, FreeListAllocator};
pub use heap::{HEAP_PLACEHOLDER_MEM, HeapAllocator};
pub use mmap::os_page_size;
pub use page::{DEFAULT_PAGE_SIZE, Page, PageAllocator};
pub use region::Region;
pub use typed::{Typed, TypedBump, TypedFreeList, TypedHeap, TypedPage};
