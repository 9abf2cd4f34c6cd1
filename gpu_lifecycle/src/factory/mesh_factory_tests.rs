use super::*;
use std::rc::Rc;
use crate::config::GfxConfig;
use crate::device::mock_device::MockDevice;
use crate::display::HeadlessDisplay;
use crate::error::Error;
use crate::resource::{IndexType, MeshSetup};

fn context() -> GfxContext<MockDevice> {
    GfxContext::new(MockDevice::new(), Rc::new(HeadlessDisplay::new(640, 480)), GfxConfig::default())
}

fn context_with_inflight(num_inflight_frames: u32) -> GfxContext<MockDevice> {
    let config = GfxConfig { num_inflight_frames, ..GfxConfig::default() };
    GfxContext::new(MockDevice::new(), Rc::new(HeadlessDisplay::new(640, 480)), config)
}

/// Three 12-byte vertices followed by three u16 indices
fn triangle_bytes() -> Vec<u8> {
    let mut data: Vec<u8> = (0..36).collect();
    data.extend_from_slice(&[0, 0, 1, 0, 2, 0]);
    data
}

#[test]
fn test_immutable_mesh_from_data() {
    let mut ctx = context();
    let factory = MeshFactory::new();
    let mut mesh = Mesh::new(MeshSetup::from_data(3, 12, 3, IndexType::U16));

    let state = factory.setup_resource_with_data(&mut ctx, &mut mesh, &triangle_bytes()).unwrap();
    assert_eq!(state, ResourceState::Valid);
    assert_eq!(mesh.state, ResourceState::Valid);
    assert_eq!(mesh.vertex_buffer.num_slots, 1);
    assert!(mesh.vertex_buffer.active().is_some());
    assert!(mesh.index_buffer.active().is_some());
    assert!(mesh.vertex_buffer.slots[1].is_none());

    assert_eq!(ctx.device.live_buffer_count(), 2);
    let uploads = &ctx.device.buffer_uploads;
    assert_eq!(uploads.len(), 2);
    assert_eq!(uploads[0].data.len(), 36);
    assert_eq!(uploads[1].data, vec![0, 0, 1, 0, 2, 0]);
}

#[test]
fn test_non_indexed_mesh_has_no_index_buffer() {
    let mut ctx = context();
    let mut mesh = Mesh::new(MeshSetup::from_data(3, 12, 0, IndexType::None));

    MeshFactory::new().setup_resource_with_data(&mut ctx, &mut mesh, &[0u8; 36]).unwrap();
    assert!(mesh.index_buffer.is_empty());
    assert_eq!(ctx.device.live_buffer_count(), 1);
}

#[test]
#[should_panic(expected = "got 35 bytes, vertices and indices need 42")]
fn test_wrong_data_length_is_fatal() {
    let mut ctx = context();
    let mut mesh = Mesh::new(MeshSetup::from_data(3, 12, 3, IndexType::U16));
    let _ = MeshFactory::new().setup_resource_with_data(&mut ctx, &mut mesh, &[0u8; 35]);
}

#[test]
#[should_panic(expected = "expects an empty stream mesh")]
fn test_data_mesh_rejected_by_empty_path() {
    let mut ctx = context();
    let mut mesh = Mesh::new(MeshSetup::from_data(3, 12, 0, IndexType::None));
    let _ = MeshFactory::new().setup_resource(&mut ctx, &mut mesh);
}

#[test]
fn test_stream_mesh_rotates_once_per_frame() {
    let mut ctx = context();
    let factory = MeshFactory::new();
    let mut mesh = Mesh::new(MeshSetup::empty_stream(4, 8, 0, IndexType::None));
    factory.setup_resource(&mut ctx, &mut mesh).unwrap();

    assert_eq!(mesh.vertex_buffer.num_slots, 2);
    assert_eq!(ctx.device.live_buffer_count(), 2);
    assert!(ctx.device.buffer_uploads.is_empty());
    let first_slot = mesh.vertex_buffer.active_slot;

    factory.update_vertices(&mut ctx, &mut mesh, &[1u8; 32]).unwrap();
    let slot_frame_0 = mesh.vertex_buffer.active_slot;
    assert_ne!(slot_frame_0, first_slot);
    assert_eq!(mesh.vertex_buffer.update_frame_index, Some(0));

    ctx.advance_frame();
    factory.update_vertices(&mut ctx, &mut mesh, &[2u8; 16]).unwrap();
    assert_ne!(mesh.vertex_buffer.active_slot, slot_frame_0);
    assert_eq!(mesh.vertex_buffer.update_frame_index, Some(1));

    let uploads = &ctx.device.buffer_uploads;
    assert_eq!(uploads.len(), 2);
    assert_ne!(uploads[0].buffer_id, uploads[1].buffer_id);
    assert_eq!(ctx.render_state.mesh_invalidations(), 2);
}

#[test]
fn test_stream_slot_not_rewritten_while_frame_in_flight() {
    let mut ctx = context_with_inflight(3);
    let factory = MeshFactory::new();
    let mut mesh = Mesh::new(MeshSetup::empty_stream(4, 8, 0, IndexType::None));
    factory.setup_resource(&mut ctx, &mut mesh).unwrap();
    assert_eq!(mesh.vertex_buffer.num_slots, 3);
    assert_eq!(ctx.device.live_buffer_count(), 3);

    for frame in 0..4u8 {
        factory.update_vertices(&mut ctx, &mut mesh, &[frame; 32]).unwrap();
        ctx.advance_frame();
    }

    // Frames 0..2 may all still be on the GPU: three distinct buffers
    let ids: Vec<_> = ctx.device.buffer_uploads.iter().map(|upload| upload.buffer_id).collect();
    assert_ne!(ids[0], ids[1]);
    assert_ne!(ids[1], ids[2]);
    assert_ne!(ids[0], ids[2]);
    // Frame 3 reuses frame 0's buffer, which retired at frame 0 + 3
    assert_eq!(ids[3], ids[0]);
}

#[test]
fn test_single_inflight_frame_needs_one_stream_slot() {
    let mut ctx = context_with_inflight(1);
    let factory = MeshFactory::new();
    let mut mesh = Mesh::new(MeshSetup::empty_stream(4, 8, 0, IndexType::None));
    factory.setup_resource(&mut ctx, &mut mesh).unwrap();
    assert_eq!(mesh.vertex_buffer.num_slots, 1);

    factory.update_vertices(&mut ctx, &mut mesh, &[0u8; 32]).unwrap();
    ctx.advance_frame();
    factory.update_vertices(&mut ctx, &mut mesh, &[1u8; 32]).unwrap();
    assert_eq!(ctx.device.live_buffer_count(), 1);
}

#[test]
#[should_panic(expected = "stream meshes support at most 4 frames in flight, got 5")]
fn test_stream_mesh_beyond_slot_bound_is_fatal() {
    let mut ctx = context_with_inflight(5);
    let mut mesh = Mesh::new(MeshSetup::empty_stream(4, 8, 0, IndexType::None));
    let _ = MeshFactory::new().setup_resource(&mut ctx, &mut mesh);
}

#[test]
#[should_panic(expected = "already updated in frame 0")]
fn test_double_update_in_one_frame_is_fatal() {
    let mut ctx = context();
    let factory = MeshFactory::new();
    let mut mesh = Mesh::new(MeshSetup::empty_stream(4, 8, 0, IndexType::None));
    factory.setup_resource(&mut ctx, &mut mesh).unwrap();

    factory.update_vertices(&mut ctx, &mut mesh, &[0u8; 32]).unwrap();
    let _ = factory.update_vertices(&mut ctx, &mut mesh, &[0u8; 32]);
}

#[test]
#[should_panic(expected = "only stream meshes can be updated")]
fn test_update_immutable_mesh_is_fatal() {
    let mut ctx = context();
    let factory = MeshFactory::new();
    let mut mesh = Mesh::new(MeshSetup::from_data(3, 12, 0, IndexType::None));
    factory.setup_resource_with_data(&mut ctx, &mut mesh, &[0u8; 36]).unwrap();
    let _ = factory.update_vertices(&mut ctx, &mut mesh, &[0u8; 36]);
}

#[test]
fn test_stream_mesh_from_data_fills_every_slot() {
    let mut ctx = context();
    let mut mesh = Mesh::new(MeshSetup::from_data(3, 12, 3, IndexType::U16).with_usage(Usage::Stream));
    MeshFactory::new().setup_resource_with_data(&mut ctx, &mut mesh, &triangle_bytes()).unwrap();

    // Two vertex slots and two index slots, each uploaded
    assert_eq!(ctx.device.live_buffer_count(), 4);
    assert_eq!(ctx.device.buffer_uploads.len(), 4);
}

#[test]
fn test_destroy_releases_every_slot_deferred() {
    let mut ctx = context();
    let factory = MeshFactory::new();
    let mut mesh = Mesh::new(MeshSetup::from_data(3, 12, 3, IndexType::U16).with_usage(Usage::Stream));
    factory.setup_resource_with_data(&mut ctx, &mut mesh, &triangle_bytes()).unwrap();
    ctx.render_state.bind_mesh();

    factory.destroy_resource(&mut ctx, &mut mesh);
    assert!(mesh.is_cleared());
    assert!(!ctx.render_state.is_mesh_bound());
    assert_eq!(ctx.resource_allocator.pending_count(), 4);
    assert_eq!(ctx.device.live_buffer_count(), 4);

    ctx.advance_frame();
    ctx.advance_frame();
    assert_eq!(ctx.device.live_buffer_count(), 0);
}

#[test]
#[should_panic(expected = "mesh is already cleared")]
fn test_destroy_twice_is_fatal() {
    let mut ctx = context();
    let factory = MeshFactory::new();
    let mut mesh = Mesh::new(MeshSetup::from_data(3, 12, 0, IndexType::None));
    factory.setup_resource_with_data(&mut ctx, &mut mesh, &[0u8; 36]).unwrap();
    factory.destroy_resource(&mut ctx, &mut mesh);
    factory.destroy_resource(&mut ctx, &mut mesh);
}

#[test]
fn test_buffer_failure_rolls_back() {
    let mut ctx = context();
    let factory = MeshFactory::new();
    let mut mesh = Mesh::new(MeshSetup::empty_stream(4, 8, 6, IndexType::U32));
    ctx.device.fail_next_buffer = true;

    let result = factory.setup_resource(&mut ctx, &mut mesh);
    assert_eq!(result.unwrap_err(), Error::OutOfMemory);
    assert!(mesh.is_cleared());
    assert_eq!(mesh.state, ResourceState::Initial);
    assert_eq!(ctx.resource_allocator.live_count(), 0);
}
