//! GPU object ownership and deferred destruction

mod resource_allocator;

pub use resource_allocator::{ResourceAllocator, ResourceRef};
