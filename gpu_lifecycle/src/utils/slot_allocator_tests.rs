use super::*;

// ============================================================================
// Basic allocation tests
// ============================================================================

#[test]
fn test_sequential_alloc() {
    let mut alloc = SlotAllocator::new(8);
    assert_eq!(alloc.alloc(), Some(0));
    assert_eq!(alloc.alloc(), Some(1));
    assert_eq!(alloc.alloc(), Some(2));
}

#[test]
fn test_new_is_empty() {
    let alloc = SlotAllocator::new(4);
    assert!(alloc.is_empty());
    assert_eq!(alloc.len(), 0);
    assert_eq!(alloc.capacity(), 4);
    assert_eq!(alloc.num_free(), 4);
}

#[test]
fn test_exhaustion_returns_none() {
    let mut alloc = SlotAllocator::new(2);
    assert!(alloc.alloc().is_some());
    assert!(alloc.alloc().is_some());
    assert_eq!(alloc.alloc(), None);
    assert_eq!(alloc.num_free(), 0);
}

#[test]
fn test_zero_capacity_never_allocates() {
    let mut alloc = SlotAllocator::new(0);
    assert_eq!(alloc.alloc(), None);
}

// ============================================================================
// Free and recycle tests
// ============================================================================

#[test]
fn test_free_and_recycle() {
    let mut alloc = SlotAllocator::new(8);
    let a = alloc.alloc().unwrap(); // 0
    let b = alloc.alloc().unwrap(); // 1
    alloc.free(a);
    assert_eq!(alloc.alloc(), Some(0));
    assert_eq!(b, 1);
}

#[test]
fn test_free_multiple_recycle_lifo() {
    let mut alloc = SlotAllocator::new(8);
    let a = alloc.alloc().unwrap(); // 0
    let _b = alloc.alloc().unwrap(); // 1
    let c = alloc.alloc().unwrap(); // 2
    alloc.free(a);
    alloc.free(c);

    // Next alloc pops from the end → 2 first, then 0
    assert_eq!(alloc.alloc(), Some(2));
    assert_eq!(alloc.alloc(), Some(0));
    assert_eq!(alloc.alloc(), Some(3));
}

#[test]
fn test_free_after_exhaustion_makes_room() {
    let mut alloc = SlotAllocator::new(1);
    let a = alloc.alloc().unwrap();
    assert_eq!(alloc.alloc(), None);
    alloc.free(a);
    assert_eq!(alloc.alloc(), Some(a));
}

// ============================================================================
// len() tests
// ============================================================================

#[test]
fn test_len_tracks_active_slots() {
    let mut alloc = SlotAllocator::new(4);
    alloc.alloc();
    alloc.alloc();
    assert_eq!(alloc.len(), 2);
    assert_eq!(alloc.num_free(), 2);

    alloc.free(0);
    alloc.free(1);
    assert!(alloc.is_empty());
    assert_eq!(alloc.num_free(), 4);
}

#[test]
fn test_recycled_slots_are_used_before_fresh_ones() {
    let mut alloc = SlotAllocator::new(4);
    alloc.alloc();
    alloc.alloc();
    alloc.free(0);
    alloc.free(1);

    let mut reused = [alloc.alloc().unwrap(), alloc.alloc().unwrap()];
    reused.sort();
    assert_eq!(reused, [0, 1]);
    assert_eq!(alloc.alloc(), Some(2));
}

#[test]
fn test_indices_are_unique_and_bounded() {
    let mut alloc = SlotAllocator::new(50);
    let mut seen = std::collections::HashSet::new();

    while let Some(id) = alloc.alloc() {
        assert!(id < 50);
        assert!(seen.insert(id), "duplicate slot id: {}", id);
    }
    assert_eq!(seen.len(), 50);
}
