//! Descriptor heap management

mod descriptor_allocator;
mod descriptor_handle;

pub use descriptor_allocator::DescriptorAllocator;
pub use descriptor_handle::{DescriptorHandle, DescriptorLocation, DescriptorRegion};
