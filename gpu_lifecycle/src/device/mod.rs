//! Backend device seam and the shared GPU object descriptors

mod format;
mod gpu_device;

#[cfg(test)]
pub mod mock_device;

pub use format::{
    max_mip_levels, BufferDesc, BufferUsage, ImageDesc, ImageSubresourceData, ImageUsage,
    PixelFormat, TextureType,
};
pub use gpu_device::GpuDevice;
