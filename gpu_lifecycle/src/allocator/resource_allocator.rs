/// ResourceAllocator - owns backend GPU objects, reference counts them and
/// destroys them once the frames that could reference them have retired

use std::collections::VecDeque;
use slotmap::{new_key_type, SlotMap};
use crate::config::GfxConfig;
use crate::device::{BufferDesc, GpuDevice, ImageDesc, PixelFormat};
use crate::error::Result;
use crate::{engine_assert, engine_debug, engine_trace, engine_warn};

const SOURCE: &str = "gfx::ResourceAllocator";

new_key_type! {
    /// Key of a GPU object owned by a `ResourceAllocator`
    pub struct ResourceRef;
}

enum GpuObject<D: GpuDevice> {
    Image(D::Image),
    Buffer(D::Buffer),
}

struct AllocatorEntry<D: GpuDevice> {
    object: GpuObject<D>,
    ref_count: u32,
}

#[derive(Debug, Clone, Copy)]
struct PendingRelease {
    frame: u64,
    resource: ResourceRef,
}

/// Backend-parameterized owner of every GPU image and buffer.
///
/// Objects start with a reference count of 1. `add_ref` shares an object
/// (shared depth buffers), `release_deferred` drops a reference and queues
/// the object once the count reaches zero. Queued objects stay valid until
/// `garbage_collect` observes `frame + num_inflight_frames <= frame_index`.
pub struct ResourceAllocator<D: GpuDevice> {
    objects: SlotMap<ResourceRef, AllocatorEntry<D>>,
    /// FIFO, non-decreasing frame order
    pending: VecDeque<PendingRelease>,
    num_inflight_frames: u64,
}

impl<D: GpuDevice> ResourceAllocator<D> {
    pub fn new(config: &GfxConfig) -> Self {
        Self {
            objects: SlotMap::with_key(),
            pending: VecDeque::new(),
            num_inflight_frames: config.num_inflight_frames as u64,
        }
    }

    // ===== ALLOCATION =====

    /// Create a single-mip 2D image usable as a color render target or as a
    /// depth buffer, depending on `format`.
    ///
    /// Panics on a zero size, a zero sample count or a format the device
    /// cannot attach. Backend failures are returned.
    pub fn alloc_render_target(
        &mut self,
        device: &mut D,
        width: u32,
        height: u32,
        format: PixelFormat,
        sample_count: u32,
    ) -> Result<ResourceRef> {
        engine_assert!(width > 0 && height > 0, SOURCE,
            "render target size must be positive, got {}x{}", width, height);
        engine_assert!(sample_count >= 1, SOURCE,
            "render target sample count must be at least 1, got {}", sample_count);

        let desc = ImageDesc::attachment(width, height, format, sample_count);
        engine_assert!(device.supports_format(format, desc.usage), SOURCE,
            "{} cannot use {:?} as {:?}", device.name(), format, desc.usage);

        let image = device.create_image(&desc)?;
        let resource = self.insert(GpuObject::Image(image));
        engine_debug!(SOURCE, "Render target {:?} created: {}x{} {:?} x{}",
            resource, width, height, format, sample_count);
        Ok(resource)
    }

    /// Create a sampled image (pixel-data textures)
    pub fn alloc_texture(&mut self, device: &mut D, desc: &ImageDesc) -> Result<ResourceRef> {
        engine_assert!(desc.width > 0 && desc.height > 0, SOURCE,
            "texture size must be positive, got {}x{}", desc.width, desc.height);
        engine_assert!(desc.mip_levels >= 1 && desc.layers >= 1, SOURCE,
            "texture needs at least one mip and one layer, got {} mips {} layers",
            desc.mip_levels, desc.layers);
        engine_assert!(device.supports_format(desc.format, desc.usage), SOURCE,
            "{} cannot use {:?} as {:?}", device.name(), desc.format, desc.usage);

        let image = device.create_image(desc)?;
        let resource = self.insert(GpuObject::Image(image));
        engine_debug!(SOURCE, "Texture {:?} created: {:?} {}x{} {:?} ({} mips, {} layers)",
            resource, desc.texture_type, desc.width, desc.height, desc.format,
            desc.mip_levels, desc.layers);
        Ok(resource)
    }

    /// Create a vertex or index buffer
    pub fn alloc_buffer(&mut self, device: &mut D, desc: &BufferDesc) -> Result<ResourceRef> {
        engine_assert!(desc.size > 0, SOURCE, "{:?} buffer size must be positive", desc.usage);

        let buffer = device.create_buffer(desc)?;
        let resource = self.insert(GpuObject::Buffer(buffer));
        engine_debug!(SOURCE, "{:?} buffer {:?} created: {} bytes", desc.usage, resource, desc.size);
        Ok(resource)
    }

    fn insert(&mut self, object: GpuObject<D>) -> ResourceRef {
        self.objects.insert(AllocatorEntry { object, ref_count: 1 })
    }

    // ===== REFERENCE COUNTING =====

    /// Share a live object; balanced by one more `release_deferred`
    pub fn add_ref(&mut self, resource: ResourceRef) {
        let entry = self.objects.get_mut(resource);
        engine_assert!(matches!(&entry, Some(e) if e.ref_count > 0), SOURCE,
            "add_ref on {:?} which is not live", resource);
        if let Some(entry) = entry {
            entry.ref_count += 1;
        }
    }

    /// Drop one reference. At zero the object is queued for destruction no
    /// earlier than frame `frame_index + num_inflight_frames`.
    pub fn release_deferred(&mut self, frame_index: u64, resource: ResourceRef) {
        let entry = self.objects.get_mut(resource);
        engine_assert!(matches!(&entry, Some(e) if e.ref_count > 0), SOURCE,
            "release of {:?} which is not live", resource);
        let Some(entry) = entry else { return };

        entry.ref_count -= 1;
        if entry.ref_count > 0 {
            engine_trace!(SOURCE, "{:?} released at frame {}, {} reference(s) left",
                resource, frame_index, entry.ref_count);
            return;
        }

        if let Some(last) = self.pending.back() {
            engine_assert!(last.frame <= frame_index, SOURCE,
                "release at frame {} after a release at frame {}", frame_index, last.frame);
        }
        self.pending.push_back(PendingRelease { frame: frame_index, resource });
        engine_trace!(SOURCE, "{:?} queued for release at frame {}", resource, frame_index);
    }

    // ===== RECLAMATION =====

    /// Destroy every queued object whose release frame has retired.
    /// Returns the number of objects destroyed.
    pub fn garbage_collect(&mut self, device: &mut D, frame_index: u64) -> usize {
        let mut destroyed = 0;
        while let Some(entry) = self.pending.front() {
            if entry.frame + self.num_inflight_frames > frame_index {
                break;
            }
            let Some(entry) = self.pending.pop_front() else { break };
            self.destroy(device, entry.resource);
            destroyed += 1;
        }
        if destroyed > 0 {
            engine_trace!(SOURCE, "Destroyed {} GPU object(s) at frame {}", destroyed, frame_index);
        }
        destroyed
    }

    /// Destroy every queued object immediately (device must be idle)
    pub fn flush(&mut self, device: &mut D) -> usize {
        let mut destroyed = 0;
        while let Some(entry) = self.pending.pop_front() {
            self.destroy(device, entry.resource);
            destroyed += 1;
        }
        destroyed
    }

    fn destroy(&mut self, device: &mut D, resource: ResourceRef) {
        match self.objects.remove(resource).map(|entry| entry.object) {
            Some(GpuObject::Image(image)) => device.destroy_image(image),
            Some(GpuObject::Buffer(buffer)) => device.destroy_buffer(buffer),
            None => engine_warn!(SOURCE, "{:?} queued for release but already gone", resource),
        }
    }

    // ===== QUERIES =====

    /// Current reference count (0 once queued or destroyed)
    pub fn ref_count(&self, resource: ResourceRef) -> u32 {
        self.objects.get(resource).map_or(0, |entry| entry.ref_count)
    }

    pub fn is_live(&self, resource: ResourceRef) -> bool {
        self.ref_count(resource) > 0
    }

    /// True while the object waits in the release queue
    pub fn is_pending(&self, resource: ResourceRef) -> bool {
        matches!(self.objects.get(resource), Some(entry) if entry.ref_count == 0)
    }

    /// Objects with at least one reference
    pub fn live_count(&self) -> usize {
        self.objects.len() - self.pending.len()
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Backend image behind `resource` (live or pending), None for buffers
    pub fn image(&self, resource: ResourceRef) -> Option<&D::Image> {
        match self.objects.get(resource).map(|entry| &entry.object) {
            Some(GpuObject::Image(image)) => Some(image),
            _ => None,
        }
    }

    /// Backend buffer behind `resource` (live or pending), None for images
    pub fn buffer(&self, resource: ResourceRef) -> Option<&D::Buffer> {
        match self.objects.get(resource).map(|entry| &entry.object) {
            Some(GpuObject::Buffer(buffer)) => Some(buffer),
            _ => None,
        }
    }
}

impl<D: GpuDevice> Drop for ResourceAllocator<D> {
    fn drop(&mut self) {
        if !self.objects.is_empty() {
            engine_warn!(SOURCE, "Dropped with {} live and {} pending GPU object(s); call flush() on shutdown",
                self.live_count(), self.pending_count());
        }
    }
}

#[cfg(test)]
#[path = "resource_allocator_tests.rs"]
mod tests;
