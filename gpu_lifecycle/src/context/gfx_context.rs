/// GfxContext - the explicitly passed bundle of device, allocators and
/// per-frame state every factory operation works against

use std::rc::Rc;
use crate::allocator::ResourceAllocator;
use crate::config::GfxConfig;
use crate::context::{FrameClock, RenderState};
use crate::descriptor::DescriptorAllocator;
use crate::device::GpuDevice;
use crate::display::{DisplayAttrs, DisplayProvider};
use crate::{engine_assert, engine_debug, engine_info};

const SOURCE: &str = "gfx::GfxContext";

pub struct GfxContext<D: GpuDevice> {
    pub resource_allocator: ResourceAllocator<D>,
    pub descriptor_allocator: DescriptorAllocator,
    pub frame_clock: FrameClock,
    pub display: Rc<dyn DisplayProvider>,
    pub render_state: RenderState,
    config: GfxConfig,
    /// Last field: fields drop in order, so the device outlives every
    /// object the allocator still holds
    pub device: D,
}

impl<D: GpuDevice> GfxContext<D> {
    /// Build a context around `device`. Panics if `num_inflight_frames` is 0.
    pub fn new(device: D, display: Rc<dyn DisplayProvider>, config: GfxConfig) -> Self {
        engine_assert!(config.num_inflight_frames >= 1, SOURCE,
            "num_inflight_frames must be at least 1, got {}", config.num_inflight_frames);

        engine_info!(SOURCE, "Context created on '{}' ({} frame(s) in flight)",
            device.name(), config.num_inflight_frames);

        Self {
            resource_allocator: ResourceAllocator::new(&config),
            descriptor_allocator: DescriptorAllocator::new(&config),
            device,
            frame_clock: FrameClock::new(),
            display,
            render_state: RenderState::new(),
            config,
        }
    }

    pub fn config(&self) -> &GfxConfig {
        &self.config
    }

    pub fn frame_index(&self) -> u64 {
        self.frame_clock.frame_index()
    }

    pub fn display_attrs(&self) -> DisplayAttrs {
        self.display.display_attrs()
    }

    /// Frame-retirement signal: advance the clock, then reclaim everything
    /// whose release frame has retired. Returns (objects, slots) reclaimed.
    pub fn advance_frame(&mut self) -> (usize, usize) {
        let frame_index = self.frame_clock.advance();
        // Views go before the objects they point at
        let slots = self.descriptor_allocator.garbage_collect(&mut self.device, frame_index);
        let objects = self.resource_allocator.garbage_collect(&mut self.device, frame_index);
        (objects, slots)
    }

    /// Reclaim everything pending right away. The device must be idle.
    pub fn flush(&mut self) -> (usize, usize) {
        let slots = self.descriptor_allocator.flush(&mut self.device);
        let objects = self.resource_allocator.flush(&mut self.device);
        engine_debug!(SOURCE, "Flushed {} GPU object(s) and {} descriptor slot(s)", objects, slots);
        (objects, slots)
    }

    /// Flush and hand back the device
    pub fn into_device(mut self) -> D {
        self.flush();
        let GfxContext { device, .. } = self;
        device
    }
}

#[cfg(test)]
#[path = "gfx_context_tests.rs"]
mod tests;
