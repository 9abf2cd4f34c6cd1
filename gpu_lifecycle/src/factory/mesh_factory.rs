/// MeshFactory - vertex/index buffer records with one buffer per frame in
/// flight for stream meshes

use crate::context::GfxContext;
use crate::device::{BufferDesc, BufferUsage, GpuDevice};
use crate::error::Result;
use crate::resource::{Mesh, MeshBuffer, MeshSource, ResourceState, Usage, MAX_MESH_SLOTS};
use crate::{engine_assert, engine_debug, engine_err, engine_fatal};

const SOURCE: &str = "gfx::MeshFactory";

#[derive(Debug, Default)]
pub struct MeshFactory;

impl MeshFactory {
    pub fn new() -> Self {
        Self
    }

    /// Allocate the buffers of an empty stream mesh; contents arrive through
    /// `update_vertices`
    pub fn setup_resource<D: GpuDevice>(&self, ctx: &mut GfxContext<D>, mesh: &mut Mesh) -> Result<ResourceState> {
        let setup = &mesh.setup;
        engine_assert!(setup.source == MeshSource::Empty && setup.usage == Usage::Stream, SOURCE,
            "setup_resource: expects an empty stream mesh, got {:?} {:?}", setup.usage, setup.source);
        Self::validate(ctx, mesh);

        if let Err(err) = Self::create_buffers(ctx, mesh, None) {
            Self::release_resources(ctx, mesh);
            mesh.clear();
            return Err(engine_err!(SOURCE, err));
        }
        mesh.state = ResourceState::Valid;

        engine_debug!(SOURCE, "Stream mesh created: {} vertices x {} bytes, {} indices",
            mesh.setup.num_vertices, mesh.setup.vertex_stride, mesh.setup.num_indices);
        Ok(ResourceState::Valid)
    }

    /// Create a mesh from vertex data immediately followed by index data.
    /// Every slot of a double-buffered mesh receives the same contents.
    pub fn setup_resource_with_data<D: GpuDevice>(
        &self,
        ctx: &mut GfxContext<D>,
        mesh: &mut Mesh,
        data: &[u8],
    ) -> Result<ResourceState> {
        let setup = &mesh.setup;
        engine_assert!(setup.source == MeshSource::Data, SOURCE,
            "setup_resource_with_data: mesh setup has no initial data");
        Self::validate(ctx, mesh);
        let expected = mesh.setup.vertex_data_size() + mesh.setup.index_data_size();
        engine_assert!(data.len() as u64 == expected, SOURCE,
            "setup_resource_with_data: got {} bytes, vertices and indices need {}", data.len(), expected);

        if let Err(err) = Self::create_buffers(ctx, mesh, Some(data)) {
            Self::release_resources(ctx, mesh);
            mesh.clear();
            return Err(engine_err!(SOURCE, err));
        }
        mesh.state = ResourceState::Valid;

        engine_debug!(SOURCE, "{:?} mesh created: {} vertices, {} indices",
            mesh.setup.usage, mesh.setup.num_vertices, mesh.setup.num_indices);
        Ok(ResourceState::Valid)
    }

    fn validate<D: GpuDevice>(ctx: &GfxContext<D>, mesh: &Mesh) {
        let setup = &mesh.setup;
        engine_assert!(mesh.is_cleared(), SOURCE, "mesh already holds GPU buffers");
        let inflight = ctx.config().num_inflight_frames;
        engine_assert!(setup.usage != Usage::Stream || inflight as usize <= MAX_MESH_SLOTS, SOURCE,
            "stream meshes support at most {} frames in flight, got {}", MAX_MESH_SLOTS, inflight);
        engine_assert!(setup.num_vertices > 0 && setup.vertex_stride > 0, SOURCE,
            "mesh needs vertices, got {} x {} bytes", setup.num_vertices, setup.vertex_stride);
        engine_assert!(setup.num_indices == 0 || setup.has_indices(), SOURCE,
            "{} indices without an index type", setup.num_indices);
    }

    fn create_buffers<D: GpuDevice>(ctx: &mut GfxContext<D>, mesh: &mut Mesh, data: Option<&[u8]>) -> Result<()> {
        let setup = mesh.setup.clone();
        let num_slots = setup.num_slots(ctx.config().num_inflight_frames);
        let vertex_size = setup.vertex_data_size();
        let (vertices, indices) = match data {
            Some(data) => {
                let (vertices, indices) = data.split_at(vertex_size as usize);
                (Some(vertices), Some(indices))
            }
            None => (None, None),
        };

        let vertex_desc = BufferDesc { size: vertex_size, usage: BufferUsage::Vertex, stream: setup.usage == Usage::Stream };
        Self::create_buffer(ctx, &mut mesh.vertex_buffer, &vertex_desc, num_slots, vertices)?;

        if setup.has_indices() {
            let index_desc = BufferDesc {
                size: setup.index_data_size(),
                usage: BufferUsage::Index,
                stream: setup.usage == Usage::Stream,
            };
            Self::create_buffer(ctx, &mut mesh.index_buffer, &index_desc, num_slots, indices)?;
        }
        Ok(())
    }

    fn create_buffer<D: GpuDevice>(
        ctx: &mut GfxContext<D>,
        buffer: &mut MeshBuffer,
        desc: &BufferDesc,
        num_slots: u8,
        data: Option<&[u8]>,
    ) -> Result<()> {
        buffer.num_slots = num_slots;
        buffer.active_slot = 0;
        for slot in 0..num_slots as usize {
            let resource = ctx.resource_allocator.alloc_buffer(&mut ctx.device, desc)?;
            buffer.slots[slot] = Some(resource);
            if let Some(data) = data {
                let Some(backend_buffer) = ctx.resource_allocator.buffer(resource) else {
                    engine_fatal!(SOURCE, "{:?} was just allocated but is not a buffer", resource);
                };
                ctx.device.upload_buffer(backend_buffer, 0, data)?;
            }
        }
        Ok(())
    }

    /// Write new vertex data for this frame into the next slot of a stream mesh
    pub fn update_vertices<D: GpuDevice>(&self, ctx: &mut GfxContext<D>, mesh: &mut Mesh, data: &[u8]) -> Result<()> {
        engine_assert!(mesh.setup.usage == Usage::Stream, SOURCE,
            "update_vertices: only stream meshes can be updated");
        engine_assert!(mesh.state == ResourceState::Valid, SOURCE,
            "update_vertices: mesh is not set up ({:?})", mesh.state);
        engine_assert!(data.len() as u64 <= mesh.setup.vertex_data_size(), SOURCE,
            "update_vertices: {} bytes exceed the {} byte vertex buffer",
            data.len(), mesh.setup.vertex_data_size());

        let frame_index = ctx.frame_index();
        let buffer = &mut mesh.vertex_buffer;
        engine_assert!(buffer.update_frame_index != Some(frame_index), SOURCE,
            "update_vertices: vertex buffer already updated in frame {}", frame_index);

        buffer.active_slot = (buffer.active_slot + 1) % buffer.num_slots;
        buffer.update_frame_index = Some(frame_index);
        ctx.render_state.invalidate_mesh_binding();

        let Some(resource) = buffer.active() else {
            engine_fatal!(SOURCE, "update_vertices: slot {} has no buffer", buffer.active_slot);
        };
        let Some(backend_buffer) = ctx.resource_allocator.buffer(resource) else {
            engine_fatal!(SOURCE, "update_vertices: {:?} is not a buffer", resource);
        };
        ctx.device.upload_buffer(backend_buffer, 0, data)
    }

    /// Release every buffer slot at the current frame and clear the record.
    /// Panics if the record is already cleared.
    pub fn destroy_resource<D: GpuDevice>(&self, ctx: &mut GfxContext<D>, mesh: &mut Mesh) {
        engine_assert!(!mesh.is_cleared(), SOURCE, "destroy_resource: mesh is already cleared");

        ctx.render_state.invalidate_mesh_binding();
        Self::release_resources(ctx, mesh);
        mesh.clear();
    }

    fn release_resources<D: GpuDevice>(ctx: &mut GfxContext<D>, mesh: &Mesh) {
        let frame_index = ctx.frame_clock.frame_index();
        let slots = mesh.vertex_buffer.slots.iter().chain(mesh.index_buffer.slots.iter());
        for resource in slots.flatten() {
            ctx.resource_allocator.release_deferred(frame_index, *resource);
        }
    }
}

#[cfg(test)]
#[path = "mesh_factory_tests.rs"]
mod tests;
