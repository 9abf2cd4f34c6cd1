/// Texture setup descriptions and live texture records.
///
/// A `TextureSetup` is the immutable request; a `Texture` is the record the
/// `TextureFactory` fills in. Records only hold allocator keys and
/// descriptor handles, never backend objects.

use slotmap::new_key_type;
use crate::allocator::ResourceRef;
use crate::descriptor::DescriptorHandle;
use crate::device::{PixelFormat, TextureType};
use crate::resource::ResourceState;

new_key_type! {
    /// Stable id of a texture in the resource pool
    pub struct TextureId;
}

// ===== SETUP =====

/// How a texture gets its contents
#[derive(Debug, Clone, PartialEq)]
pub enum TextureSource {
    /// Rendered into at runtime
    RenderTarget,
    /// Uploaded once from caller-provided pixel data
    PixelData,
    /// Loaded from a file by an external loader
    File(String),
}

/// Immutable description of a texture to create
#[derive(Debug, Clone, PartialEq)]
pub struct TextureSetup {
    pub source: TextureSource,
    pub texture_type: TextureType,
    /// Absolute size, ignored when a relative size is set
    pub width: u32,
    pub height: u32,
    /// Fraction of the framebuffer size (render targets), 0 when absolute
    pub rel_width: f64,
    pub rel_height: f64,
    pub num_mip_maps: u32,
    /// Array layers (6 for cube maps)
    pub layers: u32,
    pub color_format: PixelFormat,
    /// Private depth buffer format
    pub depth_format: Option<PixelFormat>,
    /// Render target whose depth buffer this one shares
    pub depth_render_target: Option<TextureId>,
    pub sample_count: u32,
}

impl TextureSetup {
    fn base(source: TextureSource, texture_type: TextureType, color_format: PixelFormat) -> Self {
        Self {
            source,
            texture_type,
            width: 0,
            height: 0,
            rel_width: 0.0,
            rel_height: 0.0,
            num_mip_maps: 1,
            layers: 1,
            color_format,
            depth_format: None,
            depth_render_target: None,
            sample_count: 1,
        }
    }

    /// Render target with an absolute size and an optional private depth buffer
    pub fn render_target(
        width: u32,
        height: u32,
        color_format: PixelFormat,
        depth_format: Option<PixelFormat>,
    ) -> Self {
        Self {
            width,
            height,
            depth_format,
            ..Self::base(TextureSource::RenderTarget, TextureType::Texture2D, color_format)
        }
    }

    /// Render target sized as a fraction of the framebuffer at creation time
    pub fn rel_size_render_target(
        rel_width: f64,
        rel_height: f64,
        color_format: PixelFormat,
        depth_format: Option<PixelFormat>,
    ) -> Self {
        Self {
            rel_width,
            rel_height,
            depth_format,
            ..Self::base(TextureSource::RenderTarget, TextureType::Texture2D, color_format)
        }
    }

    /// Render target that reuses the depth buffer of `depth_provider` and
    /// takes its size unless a relative size is set afterwards
    pub fn shared_depth_render_target(color_format: PixelFormat, depth_provider: TextureId) -> Self {
        Self {
            depth_render_target: Some(depth_provider),
            ..Self::base(TextureSource::RenderTarget, TextureType::Texture2D, color_format)
        }
    }

    pub fn from_pixel_data_2d(width: u32, height: u32, num_mip_maps: u32, format: PixelFormat) -> Self {
        Self {
            width,
            height,
            num_mip_maps,
            ..Self::base(TextureSource::PixelData, TextureType::Texture2D, format)
        }
    }

    /// Cube map; pixel data holds the six faces one after another
    pub fn from_pixel_data_cube(size: u32, num_mip_maps: u32, format: PixelFormat) -> Self {
        Self {
            width: size,
            height: size,
            num_mip_maps,
            layers: 6,
            ..Self::base(TextureSource::PixelData, TextureType::TextureCube, format)
        }
    }

    pub fn from_pixel_data_array(
        width: u32,
        height: u32,
        layers: u32,
        num_mip_maps: u32,
        format: PixelFormat,
    ) -> Self {
        Self {
            width,
            height,
            num_mip_maps,
            layers,
            ..Self::base(TextureSource::PixelData, TextureType::TextureArray, format)
        }
    }

    pub fn from_file(path: impl Into<String>) -> Self {
        Self::base(TextureSource::File(path.into()), TextureType::Texture2D, PixelFormat::R8G8B8A8_UNORM)
    }

    pub fn with_sample_count(mut self, sample_count: u32) -> Self {
        self.sample_count = sample_count;
        self
    }

    pub fn with_rel_size(mut self, rel_width: f64, rel_height: f64) -> Self {
        self.rel_width = rel_width;
        self.rel_height = rel_height;
        self
    }

    // ===== PREDICATES =====

    pub fn should_setup_as_render_target(&self) -> bool {
        self.source == TextureSource::RenderTarget
    }

    pub fn should_setup_from_pixel_data(&self) -> bool {
        self.source == TextureSource::PixelData
    }

    pub fn should_setup_from_file(&self) -> bool {
        matches!(self.source, TextureSource::File(_))
    }

    pub fn is_rel_size_render_target(&self) -> bool {
        self.rel_width > 0.0 && self.rel_height > 0.0
    }

    pub fn has_shared_depth(&self) -> bool {
        self.depth_render_target.is_some()
    }

    /// Private or shared depth requested
    pub fn has_depth(&self) -> bool {
        self.depth_format.is_some() || self.has_shared_depth()
    }
}

// ===== LIVE RECORD =====

/// Resolved attributes of a set-up texture
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextureAttrs {
    pub texture_type: TextureType,
    pub width: u32,
    pub height: u32,
    pub num_mip_maps: u32,
    pub layers: u32,
    pub color_format: PixelFormat,
    pub depth_format: Option<PixelFormat>,
    pub sample_count: u32,
    pub is_render_target: bool,
    pub has_shared_depth: bool,
}

impl Default for TextureAttrs {
    fn default() -> Self {
        Self {
            texture_type: TextureType::Texture2D,
            width: 0,
            height: 0,
            num_mip_maps: 0,
            layers: 0,
            color_format: PixelFormat::R8G8B8A8_UNORM,
            depth_format: None,
            sample_count: 0,
            is_render_target: false,
            has_shared_depth: false,
        }
    }
}

/// Live texture record, filled in by the `TextureFactory`.
///
/// Either everything below `state` is unset (new or cleared record) or it is
/// fully populated for the requested shape.
#[derive(Debug, Clone)]
pub struct Texture {
    pub setup: TextureSetup,
    pub attrs: TextureAttrs,
    pub state: ResourceState,
    pub color_buffer: Option<ResourceRef>,
    /// Owned, or an alias of a shared depth buffer
    pub depth_buffer: Option<ResourceRef>,
    pub render_target_view: DescriptorHandle,
    pub depth_stencil_view: DescriptorHandle,
    pub shader_resource_view: DescriptorHandle,
}

impl Texture {
    pub fn new(setup: TextureSetup) -> Self {
        Self {
            setup,
            attrs: TextureAttrs::default(),
            state: ResourceState::Initial,
            color_buffer: None,
            depth_buffer: None,
            render_target_view: DescriptorHandle::INVALID,
            depth_stencil_view: DescriptorHandle::INVALID,
            shader_resource_view: DescriptorHandle::INVALID,
        }
    }

    /// Forget every object and handle; the setup is kept
    pub fn clear(&mut self) {
        self.attrs = TextureAttrs::default();
        self.state = ResourceState::Initial;
        self.color_buffer = None;
        self.depth_buffer = None;
        self.render_target_view = DescriptorHandle::INVALID;
        self.depth_stencil_view = DescriptorHandle::INVALID;
        self.shader_resource_view = DescriptorHandle::INVALID;
    }

    /// True when no object or handle is set
    pub fn is_cleared(&self) -> bool {
        self.color_buffer.is_none()
            && self.depth_buffer.is_none()
            && !self.render_target_view.is_valid()
            && !self.depth_stencil_view.is_valid()
            && !self.shader_resource_view.is_valid()
    }
}

#[cfg(test)]
#[path = "texture_tests.rs"]
mod tests;
