use super::*;
use crate::device::mock_device::MockDevice;
use crate::device::{BufferUsage, ImageUsage, TextureType};

fn setup() -> (MockDevice, ResourceAllocator<MockDevice>) {
    (MockDevice::new(), ResourceAllocator::new(&GfxConfig::default()))
}

// ============================================================================
// Allocation
// ============================================================================

#[test]
fn test_alloc_render_target_starts_with_one_reference() {
    let (mut device, mut alloc) = setup();
    let rt = alloc
        .alloc_render_target(&mut device, 640, 480, PixelFormat::R8G8B8A8_UNORM, 1)
        .unwrap();

    assert!(alloc.is_live(rt));
    assert_eq!(alloc.ref_count(rt), 1);
    assert_eq!(alloc.live_count(), 1);
    assert_eq!(device.live_image_count(), 1);

    let image = alloc.image(rt).unwrap();
    assert_eq!(image.desc.width, 640);
    assert_eq!(image.desc.height, 480);
    assert_eq!(image.desc.mip_levels, 1);
    assert!(image.desc.usage.contains(ImageUsage::COLOR_ATTACHMENT));
    assert!(alloc.buffer(rt).is_none());
}

#[test]
fn test_alloc_depth_render_target_uses_depth_usage() {
    let (mut device, mut alloc) = setup();
    let depth = alloc
        .alloc_render_target(&mut device, 64, 64, PixelFormat::D24_UNORM_S8_UINT, 4)
        .unwrap();

    let image = alloc.image(depth).unwrap();
    assert_eq!(image.desc.usage, ImageUsage::DEPTH_STENCIL_ATTACHMENT);
    assert_eq!(image.desc.sample_count, 4);
}

#[test]
#[should_panic(expected = "render target size must be positive")]
fn test_alloc_render_target_zero_width_is_fatal() {
    let (mut device, mut alloc) = setup();
    let _ = alloc.alloc_render_target(&mut device, 0, 16, PixelFormat::R8G8B8A8_UNORM, 1);
}

#[test]
#[should_panic(expected = "sample count must be at least 1")]
fn test_alloc_render_target_zero_samples_is_fatal() {
    let (mut device, mut alloc) = setup();
    let _ = alloc.alloc_render_target(&mut device, 16, 16, PixelFormat::R8G8B8A8_UNORM, 0);
}

#[test]
#[should_panic(expected = "mock cannot use D32_SFLOAT")]
fn test_alloc_render_target_unsupported_format_is_fatal() {
    let (mut device, mut alloc) = setup();
    device.unsupported_formats.push(PixelFormat::D32_SFLOAT);
    let _ = alloc.alloc_render_target(&mut device, 16, 16, PixelFormat::D32_SFLOAT, 1);
}

#[test]
fn test_backend_failure_propagates() {
    let (mut device, mut alloc) = setup();
    device.fail_next_image = true;
    let result = alloc.alloc_render_target(&mut device, 16, 16, PixelFormat::R8G8B8A8_UNORM, 1);
    assert_eq!(result.unwrap_err(), crate::error::Error::OutOfMemory);
    assert_eq!(alloc.live_count(), 0);
}

#[test]
fn test_alloc_texture_and_buffer() {
    let (mut device, mut alloc) = setup();
    let desc = ImageDesc {
        texture_type: TextureType::TextureCube,
        width: 32,
        height: 32,
        layers: 6,
        mip_levels: 6,
        format: PixelFormat::R8G8B8A8_SRGB,
        sample_count: 1,
        usage: ImageUsage::SAMPLED | ImageUsage::TRANSFER_DST,
    };
    let tex = alloc.alloc_texture(&mut device, &desc).unwrap();
    let buf = alloc
        .alloc_buffer(&mut device, &BufferDesc { size: 256, usage: BufferUsage::Index, stream: false })
        .unwrap();

    assert_eq!(alloc.image(tex).unwrap().desc, desc);
    assert_eq!(alloc.buffer(buf).unwrap().desc.size, 256);
    assert!(alloc.image(buf).is_none());
    assert_eq!(alloc.live_count(), 2);
}

// ============================================================================
// Deferred release
// ============================================================================

#[test]
fn test_release_is_deferred_by_inflight_depth() {
    let (mut device, mut alloc) = setup();
    let rt = alloc
        .alloc_render_target(&mut device, 8, 8, PixelFormat::R8G8B8A8_UNORM, 1)
        .unwrap();

    alloc.release_deferred(10, rt);
    assert!(!alloc.is_live(rt));
    assert!(alloc.is_pending(rt));
    assert_eq!(alloc.pending_count(), 1);
    // Still reachable until the frame retires
    assert!(alloc.image(rt).is_some());

    assert_eq!(alloc.garbage_collect(&mut device, 11), 0);
    assert_eq!(device.live_image_count(), 1);

    assert_eq!(alloc.garbage_collect(&mut device, 12), 1);
    assert_eq!(device.live_image_count(), 0);
    assert!(!alloc.is_pending(rt));
    assert!(alloc.image(rt).is_none());
}

#[test]
fn test_shared_object_destroyed_after_last_release() {
    let (mut device, mut alloc) = setup();
    let depth = alloc
        .alloc_render_target(&mut device, 8, 8, PixelFormat::D32_SFLOAT, 1)
        .unwrap();
    alloc.add_ref(depth);
    alloc.add_ref(depth);
    assert_eq!(alloc.ref_count(depth), 3);

    alloc.release_deferred(0, depth);
    alloc.release_deferred(0, depth);
    assert_eq!(alloc.ref_count(depth), 1);
    assert_eq!(alloc.pending_count(), 0);

    alloc.release_deferred(1, depth);
    assert_eq!(alloc.pending_count(), 1);
    alloc.garbage_collect(&mut device, 3);
    assert_eq!(device.destroyed_images.len(), 1);
}

#[test]
fn test_garbage_collect_stops_at_first_unretired_entry() {
    let (mut device, mut alloc) = setup();
    let a = alloc.alloc_render_target(&mut device, 8, 8, PixelFormat::R8G8B8A8_UNORM, 1).unwrap();
    let b = alloc.alloc_render_target(&mut device, 8, 8, PixelFormat::R8G8B8A8_UNORM, 1).unwrap();
    let c = alloc.alloc_render_target(&mut device, 8, 8, PixelFormat::R8G8B8A8_UNORM, 1).unwrap();

    alloc.release_deferred(0, a);
    alloc.release_deferred(1, b);
    alloc.release_deferred(2, c);

    assert_eq!(alloc.garbage_collect(&mut device, 3), 2);
    assert!(alloc.is_pending(c));
    assert_eq!(alloc.garbage_collect(&mut device, 4), 1);
    assert_eq!(alloc.pending_count(), 0);
}

#[test]
fn test_flush_destroys_all_pending() {
    let (mut device, mut alloc) = setup();
    let rt = alloc.alloc_render_target(&mut device, 8, 8, PixelFormat::R8G8B8A8_UNORM, 1).unwrap();
    let buf = alloc
        .alloc_buffer(&mut device, &BufferDesc { size: 64, usage: BufferUsage::Vertex, stream: true })
        .unwrap();
    alloc.release_deferred(100, rt);
    alloc.release_deferred(100, buf);

    assert_eq!(alloc.flush(&mut device), 2);
    assert_eq!(alloc.pending_count(), 0);
    assert_eq!(device.live_image_count(), 0);
    assert_eq!(device.live_buffer_count(), 0);
}

#[test]
#[should_panic(expected = "which is not live")]
fn test_release_at_zero_is_fatal() {
    let (mut device, mut alloc) = setup();
    let rt = alloc.alloc_render_target(&mut device, 8, 8, PixelFormat::R8G8B8A8_UNORM, 1).unwrap();
    alloc.release_deferred(0, rt);
    alloc.release_deferred(0, rt);
}

#[test]
#[should_panic(expected = "add_ref on")]
fn test_add_ref_on_destroyed_object_is_fatal() {
    let (mut device, mut alloc) = setup();
    let rt = alloc.alloc_render_target(&mut device, 8, 8, PixelFormat::R8G8B8A8_UNORM, 1).unwrap();
    alloc.release_deferred(0, rt);
    alloc.garbage_collect(&mut device, 2);
    alloc.add_ref(rt);
}

#[test]
fn test_custom_inflight_depth() {
    let config = GfxConfig { num_inflight_frames: 3, ..GfxConfig::default() };
    let mut device = MockDevice::new();
    let mut alloc = ResourceAllocator::new(&config);
    let rt = alloc.alloc_render_target(&mut device, 8, 8, PixelFormat::R8G8B8A8_UNORM, 1).unwrap();

    alloc.release_deferred(4, rt);
    assert_eq!(alloc.garbage_collect(&mut device, 6), 0);
    assert_eq!(alloc.garbage_collect(&mut device, 7), 1);
}
