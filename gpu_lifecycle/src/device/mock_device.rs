/// Mock device for unit tests (no GPU required)
///
/// Records every object and view it creates so tests can check what the
/// allocators and factories did, and exposes switches to simulate
/// unsupported formats, missing upload support and allocation failure.

use rustc_hash::FxHashMap;
use std::cell::Cell;
use std::rc::Rc;
use crate::descriptor::{DescriptorLocation, DescriptorRegion};
use crate::device::{
    BufferDesc, GpuDevice, ImageDesc, ImageSubresourceData, ImageUsage, PixelFormat,
};
use crate::error::{Error, Result};
use crate::engine_bail;

// ============================================================================
// Mock objects
// ============================================================================

#[derive(Debug)]
pub struct MockImage {
    pub id: u64,
    pub desc: ImageDesc,
    _owner: Rc<()>,
}

#[derive(Debug)]
pub struct MockBuffer {
    pub id: u64,
    pub desc: BufferDesc,
    _owner: Rc<()>,
}

/// Kind of view written into a heap slot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MockViewKind {
    RenderTarget,
    DepthStencil,
    ShaderResource,
}

/// A view currently occupying a heap slot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MockView {
    pub kind: MockViewKind,
    pub image_id: u64,
}

/// One recorded `upload_image` call
#[derive(Debug, Clone)]
pub struct MockImageUpload {
    pub image_id: u64,
    pub byte_len: usize,
    pub subresources: Vec<ImageSubresourceData>,
}

/// One recorded `upload_buffer` call
#[derive(Debug, Clone)]
pub struct MockBufferUpload {
    pub buffer_id: u64,
    pub offset: u64,
    pub data: Vec<u8>,
}

// ============================================================================
// Mock Device
// ============================================================================

#[derive(Debug)]
pub struct MockDevice {
    next_id: u64,
    pub live_images: FxHashMap<u64, ImageDesc>,
    pub destroyed_images: Vec<u64>,
    pub live_buffers: FxHashMap<u64, BufferDesc>,
    pub destroyed_buffers: Vec<u64>,
    pub views: FxHashMap<DescriptorLocation, MockView>,
    pub released_views: Vec<DescriptorLocation>,
    pub image_uploads: Vec<MockImageUpload>,
    pub buffer_uploads: Vec<MockBufferUpload>,

    /// Formats `supports_format` rejects
    pub unsupported_formats: Vec<PixelFormat>,
    /// When false, `upload_image` keeps the trait default (Unsupported)
    pub supports_pixel_upload: bool,
    /// Next `create_image` fails with OutOfMemory
    pub fail_next_image: bool,
    /// `create_image` fails with OutOfMemory once this many images are live
    pub max_live_images: Option<usize>,
    /// Next `create_buffer` fails with OutOfMemory
    pub fail_next_buffer: bool,

    /// Cloned into every image and buffer handed out
    owner: Rc<()>,
    /// Set on drop to the number of images and buffers still held elsewhere
    pub outstanding_on_drop: Rc<Cell<Option<usize>>>,
}

impl MockDevice {
    pub fn new() -> Self {
        Self {
            next_id: 1,
            live_images: FxHashMap::default(),
            destroyed_images: Vec::new(),
            live_buffers: FxHashMap::default(),
            destroyed_buffers: Vec::new(),
            views: FxHashMap::default(),
            released_views: Vec::new(),
            image_uploads: Vec::new(),
            buffer_uploads: Vec::new(),
            unsupported_formats: Vec::new(),
            supports_pixel_upload: true,
            fail_next_image: false,
            max_live_images: None,
            fail_next_buffer: false,
            owner: Rc::new(()),
            outstanding_on_drop: Rc::new(Cell::new(None)),
        }
    }

    /// Device whose `upload_image` reports Unsupported
    pub fn without_pixel_upload() -> Self {
        let mut device = Self::new();
        device.supports_pixel_upload = false;
        device
    }

    pub fn live_image_count(&self) -> usize {
        self.live_images.len()
    }

    pub fn live_buffer_count(&self) -> usize {
        self.live_buffers.len()
    }

    pub fn view_count(&self) -> usize {
        self.views.len()
    }

    /// Number of occupied view slots in one region
    pub fn view_count_in(&self, region: DescriptorRegion) -> usize {
        self.views.keys().filter(|loc| loc.region == region).count()
    }

    pub fn view_at(&self, location: DescriptorLocation) -> Option<MockView> {
        self.views.get(&location).copied()
    }

    fn next_id(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    fn write_view(&mut self, location: DescriptorLocation, kind: MockViewKind, image: &MockImage) -> Result<()> {
        assert!(self.live_images.contains_key(&image.id),
            "view written for destroyed image {}", image.id);
        let previous = self.views.insert(location, MockView { kind, image_id: image.id });
        assert!(previous.is_none(), "slot {:?} written while still occupied", location);
        Ok(())
    }
}

impl Drop for MockDevice {
    fn drop(&mut self) {
        self.outstanding_on_drop.set(Some(Rc::strong_count(&self.owner) - 1));
    }
}

impl Default for MockDevice {
    fn default() -> Self {
        Self::new()
    }
}

impl GpuDevice for MockDevice {
    type Image = MockImage;
    type Buffer = MockBuffer;

    fn name(&self) -> &str {
        "mock"
    }

    fn supports_format(&self, format: PixelFormat, _usage: ImageUsage) -> bool {
        !self.unsupported_formats.contains(&format)
    }

    fn create_image(&mut self, desc: &ImageDesc) -> Result<MockImage> {
        if self.fail_next_image {
            self.fail_next_image = false;
            return Err(Error::OutOfMemory);
        }
        if self.max_live_images.is_some_and(|max| self.live_images.len() >= max) {
            return Err(Error::OutOfMemory);
        }
        let id = self.next_id();
        self.live_images.insert(id, desc.clone());
        Ok(MockImage { id, desc: desc.clone(), _owner: self.owner.clone() })
    }

    fn destroy_image(&mut self, image: MockImage) {
        let removed = self.live_images.remove(&image.id);
        assert!(removed.is_some(), "image {} destroyed twice", image.id);
        self.destroyed_images.push(image.id);
    }

    fn create_buffer(&mut self, desc: &BufferDesc) -> Result<MockBuffer> {
        if self.fail_next_buffer {
            self.fail_next_buffer = false;
            return Err(Error::OutOfMemory);
        }
        let id = self.next_id();
        self.live_buffers.insert(id, desc.clone());
        Ok(MockBuffer { id, desc: desc.clone(), _owner: self.owner.clone() })
    }

    fn destroy_buffer(&mut self, buffer: MockBuffer) {
        let removed = self.live_buffers.remove(&buffer.id);
        assert!(removed.is_some(), "buffer {} destroyed twice", buffer.id);
        self.destroyed_buffers.push(buffer.id);
    }

    fn write_render_target_view(&mut self, location: DescriptorLocation, image: &MockImage) -> Result<()> {
        self.write_view(location, MockViewKind::RenderTarget, image)
    }

    fn write_depth_stencil_view(&mut self, location: DescriptorLocation, image: &MockImage) -> Result<()> {
        self.write_view(location, MockViewKind::DepthStencil, image)
    }

    fn write_shader_resource_view(&mut self, location: DescriptorLocation, image: &MockImage) -> Result<()> {
        self.write_view(location, MockViewKind::ShaderResource, image)
    }

    fn release_view(&mut self, location: DescriptorLocation) {
        // Slots that never received a view (e.g. samplers) are released too
        self.views.remove(&location);
        self.released_views.push(location);
    }

    fn upload_image(
        &mut self,
        image: &MockImage,
        data: &[u8],
        subresources: &[ImageSubresourceData],
    ) -> Result<()> {
        if !self.supports_pixel_upload {
            return Err(Error::Unsupported(format!("{}: pixel data upload", self.name())));
        }
        self.image_uploads.push(MockImageUpload {
            image_id: image.id,
            byte_len: data.len(),
            subresources: subresources.to_vec(),
        });
        Ok(())
    }

    fn upload_buffer(&mut self, buffer: &MockBuffer, offset: u64, data: &[u8]) -> Result<()> {
        if offset + data.len() as u64 > buffer.desc.size {
            engine_bail!("gfx::mock",
                "upload of {} bytes at offset {} overflows buffer {} ({} bytes)",
                data.len(), offset, buffer.id, buffer.desc.size);
        }
        self.buffer_uploads.push(MockBufferUpload {
            buffer_id: buffer.id,
            offset,
            data: data.to_vec(),
        });
        Ok(())
    }
}

#[cfg(test)]
#[path = "mock_device_tests.rs"]
mod tests;
