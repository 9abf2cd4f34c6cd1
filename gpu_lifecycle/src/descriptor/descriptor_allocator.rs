/// DescriptorAllocator - fixed-capacity descriptor heap regions with
/// deferred slot reclamation

use std::collections::VecDeque;
use crate::config::GfxConfig;
use crate::descriptor::{DescriptorHandle, DescriptorLocation, DescriptorRegion};
use crate::device::GpuDevice;
use crate::utils::SlotAllocator;
use crate::{engine_assert, engine_fatal, engine_trace};

const SOURCE: &str = "gfx::DescriptorAllocator";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SlotState {
    Free,
    Live,
    PendingRelease,
}

/// One heap region: slot indices plus per-slot lifecycle state
#[derive(Debug)]
struct DescriptorHeap {
    slots: SlotAllocator,
    states: Vec<SlotState>,
}

impl DescriptorHeap {
    fn new(capacity: u32) -> Self {
        Self {
            slots: SlotAllocator::new(capacity),
            states: vec![SlotState::Free; capacity as usize],
        }
    }

    fn state(&self, slot: u32) -> SlotState {
        self.states.get(slot as usize).copied().unwrap_or(SlotState::Free)
    }
}

/// A slot waiting for the frame that released it to retire
#[derive(Debug, Clone, Copy)]
struct PendingSlot {
    frame: u64,
    handle: DescriptorHandle,
}

/// Allocator for the four descriptor heap regions.
///
/// A slot moves free → live on `allocate`, live → pending on
/// `release_deferred`, and pending → free in the `garbage_collect` that
/// observes `frame + num_inflight_frames <= frame_index`.
pub struct DescriptorAllocator {
    heaps: [DescriptorHeap; 4],
    /// FIFO, non-decreasing frame order
    pending: VecDeque<PendingSlot>,
    num_inflight_frames: u64,
}

impl DescriptorAllocator {
    /// Size every region from `config`
    pub fn new(config: &GfxConfig) -> Self {
        let heaps = DescriptorRegion::ALL
            .map(|region| DescriptorHeap::new(config.descriptor_capacity(region)));
        Self {
            heaps,
            pending: VecDeque::new(),
            num_inflight_frames: config.num_inflight_frames as u64,
        }
    }

    fn heap(&self, region: DescriptorRegion) -> &DescriptorHeap {
        &self.heaps[region.index()]
    }

    fn heap_mut(&mut self, region: DescriptorRegion) -> &mut DescriptorHeap {
        &mut self.heaps[region.index()]
    }

    /// Take a free slot from `region`. Panics if the region is exhausted.
    pub fn allocate(&mut self, region: DescriptorRegion) -> DescriptorHandle {
        let heap = self.heap_mut(region);
        let slot = match heap.slots.alloc() {
            Some(slot) => slot,
            None => engine_fatal!(SOURCE,
                "{} heap exhausted ({} slots, {} pending release)",
                region.name(), heap.slots.capacity(),
                heap.states.iter().filter(|s| **s == SlotState::PendingRelease).count()),
        };
        heap.states[slot as usize] = SlotState::Live;
        DescriptorHandle::new(region, slot)
    }

    /// Resolve a live handle to the backend location its view lives at
    pub fn cpu_handle(&self, handle: DescriptorHandle) -> DescriptorLocation {
        self.assert_live(handle, "cpu_handle");
        DescriptorLocation {
            region: handle.region(),
            index: handle.slot(),
        }
    }

    /// Queue a live slot for reuse once `frame_index` has retired
    pub fn release_deferred(&mut self, frame_index: u64, handle: DescriptorHandle) {
        self.assert_live(handle, "release_deferred");
        if let Some(last) = self.pending.back() {
            engine_assert!(last.frame <= frame_index, SOURCE,
                "release at frame {} after a release at frame {}", frame_index, last.frame);
        }
        self.heap_mut(handle.region()).states[handle.slot() as usize] = SlotState::PendingRelease;
        self.pending.push_back(PendingSlot { frame: frame_index, handle });
    }

    /// Return every slot whose release frame has retired to its free list.
    /// Returns the number of slots reclaimed.
    pub fn garbage_collect<D: GpuDevice>(&mut self, device: &mut D, frame_index: u64) -> usize {
        let mut reclaimed = 0;
        while let Some(entry) = self.pending.front() {
            if entry.frame + self.num_inflight_frames > frame_index {
                break;
            }
            let Some(entry) = self.pending.pop_front() else { break };
            self.reclaim(device, entry.handle);
            reclaimed += 1;
        }
        if reclaimed > 0 {
            engine_trace!(SOURCE, "Reclaimed {} descriptor slot(s) at frame {}", reclaimed, frame_index);
        }
        reclaimed
    }

    /// Reclaim every pending slot immediately (device must be idle)
    pub fn flush<D: GpuDevice>(&mut self, device: &mut D) -> usize {
        let mut reclaimed = 0;
        while let Some(entry) = self.pending.pop_front() {
            self.reclaim(device, entry.handle);
            reclaimed += 1;
        }
        reclaimed
    }

    fn reclaim<D: GpuDevice>(&mut self, device: &mut D, handle: DescriptorHandle) {
        device.release_view(DescriptorLocation {
            region: handle.region(),
            index: handle.slot(),
        });
        let heap = self.heap_mut(handle.region());
        heap.states[handle.slot() as usize] = SlotState::Free;
        heap.slots.free(handle.slot());
    }

    fn assert_live(&self, handle: DescriptorHandle, op: &str) {
        engine_assert!(handle.is_valid(), SOURCE, "{}: invalid descriptor handle", op);
        let state = self.heap(handle.region()).state(handle.slot());
        engine_assert!(state == SlotState::Live, SOURCE,
            "{}: {} slot {} is not live ({:?})", op, handle.region().name(), handle.slot(), state);
    }

    // ===== QUERIES =====

    pub fn is_live(&self, handle: DescriptorHandle) -> bool {
        handle.is_valid() && self.heap(handle.region()).state(handle.slot()) == SlotState::Live
    }

    /// Slots `allocate` can still hand out
    pub fn num_free(&self, region: DescriptorRegion) -> u32 {
        self.heap(region).slots.num_free()
    }

    pub fn num_live(&self, region: DescriptorRegion) -> u32 {
        self.heap(region).states.iter().filter(|s| **s == SlotState::Live).count() as u32
    }

    /// Slots waiting for their release frame to retire, across all regions
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    pub fn capacity(&self, region: DescriptorRegion) -> u32 {
        self.heap(region).slots.capacity()
    }
}

#[cfg(test)]
#[path = "descriptor_allocator_tests.rs"]
mod tests;
