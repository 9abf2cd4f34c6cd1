/// Conversions between the core descriptors and Vulkan enums

use ash::vk;
use gpu_lifecycle::gfx::device::{BufferUsage, ImageUsage, PixelFormat, TextureType};

/// Convert PixelFormat to Vulkan format
pub fn format_to_vk(format: PixelFormat) -> vk::Format {
    match format {
        PixelFormat::R8G8B8A8_UNORM => vk::Format::R8G8B8A8_UNORM,
        PixelFormat::R8G8B8A8_SRGB => vk::Format::R8G8B8A8_SRGB,
        PixelFormat::B8G8R8A8_UNORM => vk::Format::B8G8R8A8_UNORM,
        PixelFormat::B8G8R8A8_SRGB => vk::Format::B8G8R8A8_SRGB,
        PixelFormat::R10G10B10A2_UNORM => vk::Format::A2B10G10R10_UNORM_PACK32,
        PixelFormat::R16G16B16A16_SFLOAT => vk::Format::R16G16B16A16_SFLOAT,
        PixelFormat::R32G32B32A32_SFLOAT => vk::Format::R32G32B32A32_SFLOAT,
        PixelFormat::R32_SFLOAT => vk::Format::R32_SFLOAT,
        PixelFormat::R8_UNORM => vk::Format::R8_UNORM,
        PixelFormat::BC1_RGBA_UNORM => vk::Format::BC1_RGBA_UNORM_BLOCK,
        PixelFormat::D16_UNORM => vk::Format::D16_UNORM,
        PixelFormat::D32_SFLOAT => vk::Format::D32_SFLOAT,
        PixelFormat::D24_UNORM_S8_UINT => vk::Format::D24_UNORM_S8_UINT,
    }
}

/// Aspects an attachment view of `format` covers
pub fn aspect_for_format(format: PixelFormat) -> vk::ImageAspectFlags {
    if format.has_stencil() {
        vk::ImageAspectFlags::DEPTH | vk::ImageAspectFlags::STENCIL
    } else if format.is_depth_format() {
        vk::ImageAspectFlags::DEPTH
    } else {
        vk::ImageAspectFlags::COLOR
    }
}

/// Aspect a shader-resource view of `format` samples (depth only for depth-stencil)
pub fn sampled_aspect_for_format(format: PixelFormat) -> vk::ImageAspectFlags {
    if format.is_depth_format() {
        vk::ImageAspectFlags::DEPTH
    } else {
        vk::ImageAspectFlags::COLOR
    }
}

/// Sample count as a Vulkan flag, None when Vulkan has no such count
pub fn sample_count_to_vk(sample_count: u32) -> Option<vk::SampleCountFlags> {
    match sample_count {
        1 => Some(vk::SampleCountFlags::TYPE_1),
        2 => Some(vk::SampleCountFlags::TYPE_2),
        4 => Some(vk::SampleCountFlags::TYPE_4),
        8 => Some(vk::SampleCountFlags::TYPE_8),
        16 => Some(vk::SampleCountFlags::TYPE_16),
        32 => Some(vk::SampleCountFlags::TYPE_32),
        64 => Some(vk::SampleCountFlags::TYPE_64),
        _ => None,
    }
}

pub fn image_usage_to_vk(usage: ImageUsage) -> vk::ImageUsageFlags {
    let mut flags = vk::ImageUsageFlags::empty();
    if usage.contains(ImageUsage::SAMPLED) {
        flags |= vk::ImageUsageFlags::SAMPLED;
    }
    if usage.contains(ImageUsage::COLOR_ATTACHMENT) {
        flags |= vk::ImageUsageFlags::COLOR_ATTACHMENT;
    }
    if usage.contains(ImageUsage::DEPTH_STENCIL_ATTACHMENT) {
        flags |= vk::ImageUsageFlags::DEPTH_STENCIL_ATTACHMENT;
    }
    if usage.contains(ImageUsage::TRANSFER_DST) {
        flags |= vk::ImageUsageFlags::TRANSFER_DST;
    }
    flags
}

/// Optimal-tiling features a format needs to serve `usage`
pub fn format_features_for_usage(usage: ImageUsage) -> vk::FormatFeatureFlags {
    let mut features = vk::FormatFeatureFlags::empty();
    if usage.contains(ImageUsage::SAMPLED) {
        features |= vk::FormatFeatureFlags::SAMPLED_IMAGE;
    }
    if usage.contains(ImageUsage::COLOR_ATTACHMENT) {
        features |= vk::FormatFeatureFlags::COLOR_ATTACHMENT;
    }
    if usage.contains(ImageUsage::DEPTH_STENCIL_ATTACHMENT) {
        features |= vk::FormatFeatureFlags::DEPTH_STENCIL_ATTACHMENT;
    }
    if usage.contains(ImageUsage::TRANSFER_DST) {
        features |= vk::FormatFeatureFlags::TRANSFER_DST;
    }
    features
}

pub fn view_type_for(texture_type: TextureType) -> vk::ImageViewType {
    match texture_type {
        TextureType::Texture2D => vk::ImageViewType::TYPE_2D,
        TextureType::TextureCube => vk::ImageViewType::CUBE,
        TextureType::TextureArray => vk::ImageViewType::TYPE_2D_ARRAY,
    }
}

/// Buffer usage flags, always including TRANSFER_DST
pub fn buffer_usage_to_vk(usage: BufferUsage) -> vk::BufferUsageFlags {
    let flags = match usage {
        BufferUsage::Vertex => vk::BufferUsageFlags::VERTEX_BUFFER,
        BufferUsage::Index => vk::BufferUsageFlags::INDEX_BUFFER,
    };
    flags | vk::BufferUsageFlags::TRANSFER_DST
}

#[cfg(test)]
#[path = "vulkan_format_tests.rs"]
mod tests;
