/// Pixel formats, texture types and GPU object descriptors shared with backends

use bitflags::bitflags;

/// Texture pixel format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[allow(non_camel_case_types)]
pub enum PixelFormat {
    // Color formats
    R8G8B8A8_UNORM,
    R8G8B8A8_SRGB,
    B8G8R8A8_UNORM,
    B8G8R8A8_SRGB,
    R10G10B10A2_UNORM,
    R16G16B16A16_SFLOAT,
    R32G32B32A32_SFLOAT,
    R32_SFLOAT,
    R8_UNORM,

    // Block-compressed (sampled only)
    BC1_RGBA_UNORM,

    // Depth formats
    D16_UNORM,
    D32_SFLOAT,
    D24_UNORM_S8_UINT,
}

impl PixelFormat {
    /// True for depth and depth-stencil formats
    pub fn is_depth_format(&self) -> bool {
        matches!(
            self,
            PixelFormat::D16_UNORM | PixelFormat::D32_SFLOAT | PixelFormat::D24_UNORM_S8_UINT
        )
    }

    /// True if the format carries a stencil component
    pub fn has_stencil(&self) -> bool {
        matches!(self, PixelFormat::D24_UNORM_S8_UINT)
    }

    /// True for block-compressed formats
    pub fn is_compressed(&self) -> bool {
        matches!(self, PixelFormat::BC1_RGBA_UNORM)
    }

    /// Formats that can back a render-target color buffer
    pub fn is_valid_render_target_color_format(&self) -> bool {
        !self.is_depth_format() && !self.is_compressed()
    }

    /// Formats that can back a render-target depth buffer
    pub fn is_valid_render_target_depth_format(&self) -> bool {
        self.is_depth_format()
    }

    /// Size of one pixel in bytes (None for block-compressed formats)
    pub fn bytes_per_pixel(&self) -> Option<u32> {
        match self {
            PixelFormat::R8_UNORM => Some(1),
            PixelFormat::D16_UNORM => Some(2),
            PixelFormat::R8G8B8A8_UNORM
            | PixelFormat::R8G8B8A8_SRGB
            | PixelFormat::B8G8R8A8_UNORM
            | PixelFormat::B8G8R8A8_SRGB
            | PixelFormat::R10G10B10A2_UNORM
            | PixelFormat::R32_SFLOAT
            | PixelFormat::D32_SFLOAT
            | PixelFormat::D24_UNORM_S8_UINT => Some(4),
            PixelFormat::R16G16B16A16_SFLOAT => Some(8),
            PixelFormat::R32G32B32A32_SFLOAT => Some(16),
            PixelFormat::BC1_RGBA_UNORM => None,
        }
    }

    /// Byte size of a single `width` x `height` image in this format
    pub fn image_size(&self, width: u32, height: u32) -> u64 {
        let (width, height) = (width.max(1) as u64, height.max(1) as u64);
        match self.bytes_per_pixel() {
            Some(bpp) => width * height * bpp as u64,
            // BC1: 8 bytes per 4x4 block
            None => width.div_ceil(4) * height.div_ceil(4) * 8,
        }
    }
}

/// Texture dimensionality
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextureType {
    /// Single 2D image
    Texture2D,
    /// Six 2D faces
    TextureCube,
    /// Array of 2D layers
    TextureArray,
}

bitflags! {
    /// How a GPU image will be used
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ImageUsage: u32 {
        /// Sampled in shaders through a shader-resource view
        const SAMPLED = 1 << 0;
        /// Written as a color attachment through a render-target view
        const COLOR_ATTACHMENT = 1 << 1;
        /// Written as a depth/stencil attachment through a depth-stencil view
        const DEPTH_STENCIL_ATTACHMENT = 1 << 2;
        /// Destination of a copy (pixel data upload)
        const TRANSFER_DST = 1 << 3;
    }
}

/// Everything a backend needs to create an image
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageDesc {
    pub texture_type: TextureType,
    pub width: u32,
    pub height: u32,
    /// Array layers (6 for cube maps)
    pub layers: u32,
    pub mip_levels: u32,
    pub format: PixelFormat,
    pub sample_count: u32,
    pub usage: ImageUsage,
}

impl ImageDesc {
    /// Descriptor for a single-mip 2D attachment (color or depth)
    pub fn attachment(width: u32, height: u32, format: PixelFormat, sample_count: u32) -> Self {
        let usage = if format.is_depth_format() {
            ImageUsage::DEPTH_STENCIL_ATTACHMENT
        } else {
            ImageUsage::COLOR_ATTACHMENT | ImageUsage::SAMPLED
        };
        Self {
            texture_type: TextureType::Texture2D,
            width,
            height,
            layers: 1,
            mip_levels: 1,
            format,
            sample_count,
            usage,
        }
    }
}

/// Location of one mip level of one layer inside a pixel data blob
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageSubresourceData {
    pub layer: u32,
    pub mip_level: u32,
    pub width: u32,
    pub height: u32,
    /// Byte offset into the blob
    pub offset: u64,
    /// Byte size of this subresource
    pub size: u64,
}

/// Buffer role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BufferUsage {
    Vertex,
    Index,
}

/// Everything a backend needs to create a buffer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BufferDesc {
    /// Size in bytes
    pub size: u64,
    pub usage: BufferUsage,
    /// Rewritten by the CPU every frame (stream meshes)
    pub stream: bool,
}

/// Number of mip levels in a full chain for the given size
pub fn max_mip_levels(width: u32, height: u32) -> u32 {
    32 - width.max(height).max(1).leading_zeros()
}

#[cfg(test)]
#[path = "format_tests.rs"]
mod tests;
