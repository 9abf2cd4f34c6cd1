/// Allocates and recycles `u32` slot indices within a fixed capacity.
///
/// Backs each descriptor heap region: indices are heap slots, the capacity
/// is the region size chosen at setup time. Freed indices are recycled LIFO
/// on subsequent allocations.
///
/// # Example
///
/// ```ignore
/// let mut alloc = SlotAllocator::new(2);
/// let a = alloc.alloc();  // Some(0)
/// let b = alloc.alloc();  // Some(1)
/// alloc.alloc();          // None (exhausted)
/// alloc.free(0);          // 0 is now available
/// let c = alloc.alloc();  // Some(0) (recycled)
/// ```
#[derive(Debug)]
pub struct SlotAllocator {
    free_list: Vec<u32>,
    next_id: u32,
    len: u32,
    capacity: u32,
}

impl SlotAllocator {
    /// Create an empty allocator holding at most `capacity` slots
    pub fn new(capacity: u32) -> Self {
        Self {
            free_list: Vec::new(),
            next_id: 0,
            len: 0,
            capacity,
        }
    }

    /// Allocate the next available slot index, or None when exhausted
    pub fn alloc(&mut self) -> Option<u32> {
        let id = match self.free_list.pop() {
            Some(id) => id,
            None if self.next_id < self.capacity => {
                let id = self.next_id;
                self.next_id += 1;
                id
            }
            None => return None,
        };
        self.len += 1;
        Some(id)
    }

    /// Return a slot index to the pool for reuse
    pub fn free(&mut self, id: u32) {
        debug_assert!(id < self.next_id, "freeing an unallocated slot: {}", id);
        debug_assert!(!self.free_list.contains(&id), "freeing slot {} twice", id);
        self.len -= 1;
        self.free_list.push(id);
    }

    /// Number of currently allocated slots
    pub fn len(&self) -> u32 {
        self.len
    }

    /// Whether no slots are currently allocated
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Maximum number of slots
    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    /// Number of slots `alloc` can still hand out
    pub fn num_free(&self) -> u32 {
        self.capacity - self.len
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[path = "slot_allocator_tests.rs"]
mod tests;
