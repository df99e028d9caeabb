use blockalloc::{
  Allocator, Block, BumpAllocator, FallbackAllocator, FreeListAllocator, PageAllocator, Region,
};

use test_log::test;

#[test]
fn bump_allocations_within_capacity_never_overlap() {
  let mut allocator = BumpAllocator::<256>::new();
  let sizes = [1, 7, 32, 64, 100, 52];
  assert_eq!(sizes.iter().sum::<usize>(), 256);

  let blocks: Vec<Block> = sizes.iter().map(|&size| allocator.allocate(size)).collect();

  for pair in blocks.windows(2) {
    assert!(!pair[0].is_null());
    assert!(pair[0].addr() < pair[1].addr());
    assert_eq!(pair[0].end(), pair[1].addr());
  }

  assert!(allocator.allocate(1).is_null());
}

#[test]
fn bump_allocator_sixty_four_byte_scenario() {
  let mut allocator = BumpAllocator::<64>::new();

  let blocks: Vec<Block> = (0..4).map(|_| allocator.allocate(16)).collect();
  let base = blocks[0].addr();

  let offsets: Vec<usize> = blocks.iter().map(|block| block.addr() - base).collect();
  assert_eq!(offsets, vec![0, 16, 32, 48]);
  assert!(allocator.allocate(1).is_null());
}

#[test]
fn bump_allocator_releases_in_lifo_order_only() {
  let mut allocator = BumpAllocator::<64>::new();
  let initial = allocator.free_mem();

  let a = allocator.allocate(8);
  let b = allocator.allocate(24);
  let after_both = allocator.free_mem();

  unsafe {
    allocator.deallocate(a);
    assert_eq!(allocator.free_mem(), after_both);

    allocator.deallocate(b);
    allocator.deallocate(a);
  }

  assert_eq!(allocator.free_mem(), initial);
  assert_eq!(allocator.allocate(4).ptr, a.ptr);
}

#[test]
fn free_list_round_trip_restores_single_entry() {
  let mut allocator = FreeListAllocator::<128>::new();
  let initial = allocator.free_blocks().to_vec();

  let block = allocator.allocate(128);
  assert_eq!(block.len, 128);
  assert!(allocator.free_blocks().is_empty());

  unsafe { allocator.deallocate(block) };

  assert_eq!(allocator.free_blocks(), initial.as_slice());
}

#[test]
fn free_list_coalesces_in_either_order() {
  for reverse in [false, true] {
    let mut allocator = FreeListAllocator::<96>::new();

    let first = allocator.allocate(24);
    let second = allocator.allocate(40);

    unsafe {
      if reverse {
        allocator.deallocate(second);
        allocator.deallocate(first);
      } else {
        allocator.deallocate(first);
        allocator.deallocate(second);
      }
    }

    assert_eq!(allocator.free_blocks().len(), 1);
    assert_eq!(allocator.free_blocks()[0].len, 96);
    assert_eq!(allocator.free_blocks()[0].addr(), first.addr());
  }
}

#[test]
fn ownership_is_partitioned_by_address_range() {
  let mut first = FreeListAllocator::<64>::new();
  let mut second = FreeListAllocator::<64>::new();

  let mine = first.allocate(64);
  let theirs = second.allocate(64);

  assert!(first.owns(mine));
  assert!(first.owns(Block::new(mine.ptr.wrapping_add(63), 1)));
  assert!(!first.owns(Block::new(mine.ptr.wrapping_add(64), 1)));
  assert!(!first.owns(Block::new(mine.ptr.wrapping_sub(1), 1)));
  assert!(!first.owns(theirs));
  assert!(second.owns(theirs));
}

#[test]
fn fallback_serves_from_secondary_when_primary_is_exhausted() {
  let mut primary = BumpAllocator::<32>::new();
  primary.allocate_all();

  let mut allocator = FallbackAllocator::new(primary, FreeListAllocator::<64>::new());

  let block = allocator.allocate(16);

  assert!(!block.is_null());
  assert!(allocator.secondary().owns(block));
  assert!(!allocator.primary().owns(block));
  assert!(allocator.owns(block));
}

#[test]
fn page_allocator_frees_back_to_one_extent() {
  let mut allocator = PageAllocator::with_page_size(4096).unwrap();

  let blocks: Vec<Block> = (1..=16).map(|i| allocator.allocate(i * 8)).collect();
  assert!(blocks.iter().all(|block| !block.is_null()));

  unsafe {
    for block in blocks.iter().step_by(2) {
      allocator.deallocate(*block);
    }
    for block in blocks.iter().skip(1).step_by(2) {
      allocator.deallocate(*block);
    }
  }

  assert_eq!(allocator.free_blocks().len(), 1);
  assert_eq!(allocator.free_mem(), allocator.total_mem());
}

#[test]
fn moved_allocator_keeps_blocks_valid() {
  let mut allocator = FreeListAllocator::<64>::new();
  let block = allocator.allocate(8);

  unsafe { block.ptr.write_bytes(0xEE, 8) };

  let mut moved = Box::new(allocator);

  assert!(moved.owns(block));
  unsafe {
    assert_eq!(*block.ptr.add(7), 0xEE);
    moved.deallocate(block);
  }
  assert_eq!(moved.free_mem(), 64);
}

#[test]
fn arena_span_matches_capacity() {
  let arena = blockalloc::Arena::<48>::new();

  assert_eq!(arena.span().len, 48);
  assert_eq!(arena.capacity(), 48);
}
