//! Small data structures shared by the allocators

mod slot_allocator;

pub use slot_allocator::SlotAllocator;
