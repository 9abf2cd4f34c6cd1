/// Mesh setup descriptions and live mesh records

use slotmap::new_key_type;
use crate::allocator::ResourceRef;
use crate::resource::ResourceState;

/// Upper bound on the buffers behind one stream mesh role, and so on the
/// frames in flight a stream mesh can be used with
pub const MAX_MESH_SLOTS: usize = 4;

new_key_type! {
    /// Stable id of a mesh in the resource pool
    pub struct MeshId;
}

/// Index element type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IndexType {
    /// Non-indexed mesh
    None,
    U16,
    U32,
}

impl IndexType {
    pub fn byte_size(&self) -> u32 {
        match self {
            IndexType::None => 0,
            IndexType::U16 => 2,
            IndexType::U32 => 4,
        }
    }
}

/// How often the CPU rewrites the mesh data
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Usage {
    /// Written once at creation
    Immutable,
    /// Rewritten every frame; one buffer per frame in flight
    Stream,
}

/// Whether the mesh is created with initial data
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MeshSource {
    Data,
    Empty,
}

/// Immutable description of a mesh to create
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MeshSetup {
    pub num_vertices: u32,
    /// Bytes per vertex
    pub vertex_stride: u32,
    pub num_indices: u32,
    pub index_type: IndexType,
    pub usage: Usage,
    pub source: MeshSource,
}

impl MeshSetup {
    /// Immutable mesh created from vertex data followed by index data
    pub fn from_data(num_vertices: u32, vertex_stride: u32, num_indices: u32, index_type: IndexType) -> Self {
        Self {
            num_vertices,
            vertex_stride,
            num_indices,
            index_type,
            usage: Usage::Immutable,
            source: MeshSource::Data,
        }
    }

    /// Stream mesh with no initial data; filled through `update_vertices`
    pub fn empty_stream(num_vertices: u32, vertex_stride: u32, num_indices: u32, index_type: IndexType) -> Self {
        Self {
            num_vertices,
            vertex_stride,
            num_indices,
            index_type,
            usage: Usage::Stream,
            source: MeshSource::Empty,
        }
    }

    pub fn with_usage(mut self, usage: Usage) -> Self {
        self.usage = usage;
        self
    }

    pub fn vertex_data_size(&self) -> u64 {
        self.num_vertices as u64 * self.vertex_stride as u64
    }

    pub fn index_data_size(&self) -> u64 {
        self.num_indices as u64 * self.index_type.byte_size() as u64
    }

    pub fn has_indices(&self) -> bool {
        self.index_type != IndexType::None && self.num_indices > 0
    }

    /// Buffers per role: one per frame in flight for stream meshes, so a
    /// slot is only rewritten once the frame that last read it has retired
    pub fn num_slots(&self, num_inflight_frames: u32) -> u8 {
        match self.usage {
            Usage::Immutable => 1,
            Usage::Stream => num_inflight_frames.clamp(1, MAX_MESH_SLOTS as u32) as u8,
        }
    }
}

/// One vertex or index buffer, possibly multi-buffered
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MeshBuffer {
    pub num_slots: u8,
    /// Slot the renderer binds this frame
    pub active_slot: u8,
    /// Frame of the last `update_vertices`, None until the first one
    pub update_frame_index: Option<u64>,
    pub slots: [Option<ResourceRef>; MAX_MESH_SLOTS],
}

impl MeshBuffer {
    /// Buffer bound this frame
    pub fn active(&self) -> Option<ResourceRef> {
        self.slots[self.active_slot as usize]
    }

    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(Option::is_none)
    }
}

/// Live mesh record, filled in by the `MeshFactory`
#[derive(Debug, Clone)]
pub struct Mesh {
    pub setup: MeshSetup,
    pub state: ResourceState,
    pub vertex_buffer: MeshBuffer,
    pub index_buffer: MeshBuffer,
}

impl Mesh {
    pub fn new(setup: MeshSetup) -> Self {
        Self {
            setup,
            state: ResourceState::Initial,
            vertex_buffer: MeshBuffer::default(),
            index_buffer: MeshBuffer::default(),
        }
    }

    pub fn clear(&mut self) {
        self.state = ResourceState::Initial;
        self.vertex_buffer = MeshBuffer::default();
        self.index_buffer = MeshBuffer::default();
    }

    pub fn is_cleared(&self) -> bool {
        self.vertex_buffer.is_empty() && self.index_buffer.is_empty()
    }
}

#[cfg(test)]
#[path = "mesh_tests.rs"]
mod tests;
