/// GpuDevice trait - backend seam for GPU object creation and view writes

use crate::descriptor::DescriptorLocation;
use crate::device::{BufferDesc, ImageDesc, ImageSubresourceData, ImageUsage, PixelFormat};
use crate::error::{Error, Result};

/// Backend device interface
///
/// Implemented by backend-specific devices (e.g., `VulkanDevice`). The
/// allocators own every `Image` and `Buffer` a device creates and hand them
/// back through `destroy_image` / `destroy_buffer` once the frames that could
/// reference them have retired. Views live in descriptor heap slots
/// identified by a `DescriptorLocation`; `release_view` is called when the
/// slot is reclaimed.
pub trait GpuDevice {
    /// Backend image object (texture, render target, depth buffer)
    type Image;
    /// Backend buffer object (vertex or index data)
    type Buffer;

    /// Backend name, used in log messages
    fn name(&self) -> &str;

    /// Whether `format` can be used for every flag in `usage`
    fn supports_format(&self, format: PixelFormat, usage: ImageUsage) -> bool;

    /// Create an image
    fn create_image(&mut self, desc: &ImageDesc) -> Result<Self::Image>;

    /// Destroy an image immediately (the GPU must no longer reference it)
    fn destroy_image(&mut self, image: Self::Image);

    /// Create a buffer
    fn create_buffer(&mut self, desc: &BufferDesc) -> Result<Self::Buffer>;

    /// Destroy a buffer immediately (the GPU must no longer reference it)
    fn destroy_buffer(&mut self, buffer: Self::Buffer);

    /// Write a render-target view of `image` into the heap slot at `location`
    fn write_render_target_view(&mut self, location: DescriptorLocation, image: &Self::Image) -> Result<()>;

    /// Write a depth-stencil view of `image` into the heap slot at `location`
    fn write_depth_stencil_view(&mut self, location: DescriptorLocation, image: &Self::Image) -> Result<()>;

    /// Write a shader-resource view of `image` into the heap slot at `location`
    fn write_shader_resource_view(&mut self, location: DescriptorLocation, image: &Self::Image) -> Result<()>;

    /// The heap slot at `location` is being returned to its free list
    fn release_view(&mut self, location: DescriptorLocation);

    /// Copy pixel data into `image`, one entry of `subresources` per layer/mip.
    ///
    /// The copy must be complete when this returns. Backends without upload
    /// support keep the default, which reports `Error::Unsupported`.
    fn upload_image(
        &mut self,
        _image: &Self::Image,
        _data: &[u8],
        _subresources: &[ImageSubresourceData],
    ) -> Result<()> {
        Err(Error::Unsupported(format!("{}: pixel data upload", self.name())))
    }

    /// Write `data` into `buffer` at byte `offset`
    fn upload_buffer(&mut self, buffer: &Self::Buffer, offset: u64, data: &[u8]) -> Result<()>;
}
