//! Unit tests for Vulkan format conversion functions
//!
//! Tests pure conversion functions without requiring a GPU.

use super::*;

// ============================================================================
// PIXEL FORMAT CONVERSION TESTS
// ============================================================================

#[test]
fn test_format_to_vk_color_formats() {
    assert_eq!(format_to_vk(PixelFormat::R8G8B8A8_UNORM), vk::Format::R8G8B8A8_UNORM);
    assert_eq!(format_to_vk(PixelFormat::R8G8B8A8_SRGB), vk::Format::R8G8B8A8_SRGB);
    assert_eq!(format_to_vk(PixelFormat::B8G8R8A8_UNORM), vk::Format::B8G8R8A8_UNORM);
    assert_eq!(format_to_vk(PixelFormat::R16G16B16A16_SFLOAT), vk::Format::R16G16B16A16_SFLOAT);
    assert_eq!(format_to_vk(PixelFormat::R8_UNORM), vk::Format::R8_UNORM);
}

#[test]
fn test_format_to_vk_packed_and_compressed() {
    // Vulkan names packed formats from the most significant bit
    assert_eq!(format_to_vk(PixelFormat::R10G10B10A2_UNORM), vk::Format::A2B10G10R10_UNORM_PACK32);
    assert_eq!(format_to_vk(PixelFormat::BC1_RGBA_UNORM), vk::Format::BC1_RGBA_UNORM_BLOCK);
}

#[test]
fn test_format_to_vk_depth_formats() {
    assert_eq!(format_to_vk(PixelFormat::D16_UNORM), vk::Format::D16_UNORM);
    assert_eq!(format_to_vk(PixelFormat::D32_SFLOAT), vk::Format::D32_SFLOAT);
    assert_eq!(format_to_vk(PixelFormat::D24_UNORM_S8_UINT), vk::Format::D24_UNORM_S8_UINT);
}

// ============================================================================
// ASPECT TESTS
// ============================================================================

#[test]
fn test_aspect_for_color_format() {
    assert_eq!(aspect_for_format(PixelFormat::R8G8B8A8_UNORM), vk::ImageAspectFlags::COLOR);
    assert_eq!(sampled_aspect_for_format(PixelFormat::R32_SFLOAT), vk::ImageAspectFlags::COLOR);
}

#[test]
fn test_aspect_for_depth_stencil_format() {
    assert_eq!(
        aspect_for_format(PixelFormat::D24_UNORM_S8_UINT),
        vk::ImageAspectFlags::DEPTH | vk::ImageAspectFlags::STENCIL
    );
    assert_eq!(aspect_for_format(PixelFormat::D32_SFLOAT), vk::ImageAspectFlags::DEPTH);
}

#[test]
fn test_sampled_aspect_drops_stencil() {
    assert_eq!(
        sampled_aspect_for_format(PixelFormat::D24_UNORM_S8_UINT),
        vk::ImageAspectFlags::DEPTH
    );
}

// ============================================================================
// SAMPLE COUNT / USAGE TESTS
// ============================================================================

#[test]
fn test_sample_count_to_vk() {
    assert_eq!(sample_count_to_vk(1), Some(vk::SampleCountFlags::TYPE_1));
    assert_eq!(sample_count_to_vk(4), Some(vk::SampleCountFlags::TYPE_4));
    assert_eq!(sample_count_to_vk(64), Some(vk::SampleCountFlags::TYPE_64));
    assert_eq!(sample_count_to_vk(3), None);
    assert_eq!(sample_count_to_vk(0), None);
}

#[test]
fn test_image_usage_to_vk_render_target() {
    let flags = image_usage_to_vk(ImageUsage::COLOR_ATTACHMENT | ImageUsage::SAMPLED);
    assert_eq!(flags, vk::ImageUsageFlags::COLOR_ATTACHMENT | vk::ImageUsageFlags::SAMPLED);
}

#[test]
fn test_image_usage_to_vk_uploaded_texture() {
    let flags = image_usage_to_vk(ImageUsage::SAMPLED | ImageUsage::TRANSFER_DST);
    assert!(flags.contains(vk::ImageUsageFlags::TRANSFER_DST));
    assert!(!flags.contains(vk::ImageUsageFlags::COLOR_ATTACHMENT));
}

#[test]
fn test_format_features_for_depth_usage() {
    let features = format_features_for_usage(ImageUsage::DEPTH_STENCIL_ATTACHMENT);
    assert_eq!(features, vk::FormatFeatureFlags::DEPTH_STENCIL_ATTACHMENT);
}

#[test]
fn test_view_type_for_texture_types() {
    assert_eq!(view_type_for(TextureType::Texture2D), vk::ImageViewType::TYPE_2D);
    assert_eq!(view_type_for(TextureType::TextureCube), vk::ImageViewType::CUBE);
    assert_eq!(view_type_for(TextureType::TextureArray), vk::ImageViewType::TYPE_2D_ARRAY);
}

#[test]
fn test_buffer_usage_always_transfer_dst() {
    assert_eq!(
        buffer_usage_to_vk(BufferUsage::Vertex),
        vk::BufferUsageFlags::VERTEX_BUFFER | vk::BufferUsageFlags::TRANSFER_DST
    );
    assert_eq!(
        buffer_usage_to_vk(BufferUsage::Index),
        vk::BufferUsageFlags::INDEX_BUFFER | vk::BufferUsageFlags::TRANSFER_DST
    );
}
