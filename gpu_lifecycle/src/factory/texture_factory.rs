/// TextureFactory - builds and tears down texture records against a
/// `GfxContext`
///
/// Render targets get a color buffer with a render-target view and, when
/// requested, a private or shared depth buffer with a depth-stencil view.
/// Pixel-data textures get a sampled image with a shader-resource view.
/// Destruction never frees anything synchronously: every object and slot
/// goes through the deferred-release path.

use crate::allocator::ResourceRef;
use crate::context::GfxContext;
use crate::descriptor::{DescriptorHandle, DescriptorRegion};
use crate::device::{
    max_mip_levels, GpuDevice, ImageDesc, ImageSubresourceData, ImageUsage, TextureType,
};
use crate::error::{Error, Result};
use crate::resource::{ResourceState, Texture, TextureAttrs, TextureLookup};
use crate::{engine_assert, engine_debug, engine_err, engine_error, engine_fatal, engine_warn};

const SOURCE: &str = "gfx::TextureFactory";

#[derive(Debug, Default)]
pub struct TextureFactory;

/// Depth buffer of a shared-depth provider, resolved before allocation
struct SharedDepth {
    buffer: ResourceRef,
    attrs: TextureAttrs,
}

impl TextureFactory {
    pub fn new() -> Self {
        Self
    }

    // ===== RENDER TARGETS =====

    /// Set up a render-target texture.
    ///
    /// `lookup` resolves the shared-depth provider, if the setup names one.
    /// Contract violations panic; backend failures release whatever was
    /// already allocated, clear the record and are returned.
    pub fn setup_resource<D: GpuDevice>(
        &self,
        ctx: &mut GfxContext<D>,
        lookup: &dyn TextureLookup,
        tex: &mut Texture,
    ) -> Result<ResourceState> {
        let setup = &tex.setup;
        engine_assert!(setup.should_setup_as_render_target(), SOURCE,
            "setup_resource: {:?} setup is not a render target", setup.source);
        engine_assert!(tex.state == ResourceState::Initial, SOURCE,
            "setup_resource: texture is {:?}, destroy it first", tex.state);
        engine_assert!(tex.is_cleared(), SOURCE,
            "setup_resource: texture already holds GPU objects");

        let shared_depth = match setup.depth_render_target {
            Some(provider_id) => {
                let Some(provider) = lookup.lookup(provider_id) else {
                    engine_fatal!(SOURCE, "setup_resource: depth provider {:?} does not exist", provider_id);
                };
                let Some(buffer) = provider.depth_buffer else {
                    engine_fatal!(SOURCE, "setup_resource: depth provider {:?} has no depth buffer", provider_id);
                };
                Some(SharedDepth { buffer, attrs: provider.attrs })
            }
            None => None,
        };

        let (width, height) = if setup.is_rel_size_render_target() {
            let display = ctx.display_attrs();
            (
                (display.framebuffer_width as f64 * setup.rel_width).floor() as u32,
                (display.framebuffer_height as f64 * setup.rel_height).floor() as u32,
            )
        } else if let Some(shared) = &shared_depth {
            (shared.attrs.width, shared.attrs.height)
        } else {
            (setup.width, setup.height)
        };

        engine_assert!(width > 0 && height > 0, SOURCE,
            "setup_resource: resolved render target size must be positive, got {}x{}", width, height);
        engine_assert!(setup.num_mip_maps == 1, SOURCE,
            "setup_resource: render targets have exactly one mip, got {}", setup.num_mip_maps);
        engine_assert!(setup.texture_type == TextureType::Texture2D, SOURCE,
            "setup_resource: render targets must be 2D, got {:?}", setup.texture_type);
        engine_assert!(setup.color_format.is_valid_render_target_color_format(), SOURCE,
            "setup_resource: {:?} is not a render target color format", setup.color_format);
        if let Some(depth_format) = setup.depth_format {
            engine_assert!(depth_format.is_valid_render_target_depth_format(), SOURCE,
                "setup_resource: {:?} is not a depth format", depth_format);
        }
        if let Some(shared) = &shared_depth {
            engine_assert!(shared.attrs.width == width && shared.attrs.height == height
                && shared.attrs.sample_count == setup.sample_count, SOURCE,
                "setup_resource: shared depth buffer is {}x{} x{}, render target is {}x{} x{}",
                shared.attrs.width, shared.attrs.height, shared.attrs.sample_count,
                width, height, setup.sample_count);
        }

        if let Err(err) = Self::create_render_target(ctx, tex, width, height, shared_depth.as_ref()) {
            Self::release_resources(ctx, tex);
            tex.clear();
            return Err(engine_err!(SOURCE, err));
        }

        let setup = &tex.setup;
        tex.attrs = TextureAttrs {
            texture_type: TextureType::Texture2D,
            width,
            height,
            num_mip_maps: 1,
            layers: 1,
            color_format: setup.color_format,
            depth_format: match &shared_depth {
                Some(shared) => shared.attrs.depth_format,
                None => setup.depth_format,
            },
            sample_count: setup.sample_count,
            is_render_target: true,
            has_shared_depth: shared_depth.is_some(),
        };
        tex.state = ResourceState::Valid;

        engine_debug!(SOURCE, "Render target created: {}x{} {:?} depth={:?}{}",
            width, height, tex.attrs.color_format, tex.attrs.depth_format,
            if tex.attrs.has_shared_depth { " (shared)" } else { "" });
        Ok(ResourceState::Valid)
    }

    fn create_render_target<D: GpuDevice>(
        ctx: &mut GfxContext<D>,
        tex: &mut Texture,
        width: u32,
        height: u32,
        shared_depth: Option<&SharedDepth>,
    ) -> Result<()> {
        let setup = &tex.setup;
        let (color_format, depth_format, sample_count) =
            (setup.color_format, setup.depth_format, setup.sample_count);

        let color = ctx.resource_allocator
            .alloc_render_target(&mut ctx.device, width, height, color_format, sample_count)?;
        tex.color_buffer = Some(color);
        tex.render_target_view = ctx.descriptor_allocator.allocate(DescriptorRegion::RenderTargetView);
        write_view(ctx, tex.render_target_view, color)?;

        let depth = match (shared_depth, depth_format) {
            (Some(shared), _) => {
                ctx.resource_allocator.add_ref(shared.buffer);
                Some(shared.buffer)
            }
            (None, Some(depth_format)) => Some(ctx.resource_allocator
                .alloc_render_target(&mut ctx.device, width, height, depth_format, sample_count)?),
            (None, None) => None,
        };
        if let Some(depth) = depth {
            tex.depth_buffer = Some(depth);
            tex.depth_stencil_view = ctx.descriptor_allocator.allocate(DescriptorRegion::DepthStencilView);
            write_view(ctx, tex.depth_stencil_view, depth)?;
        }
        Ok(())
    }

    // ===== PIXEL DATA =====

    /// Set up a texture from pixel data laid out layer by layer, each layer
    /// holding its full mip chain from largest to smallest.
    ///
    /// Returns `Failed` if `data` has the wrong length and `InvalidState` if
    /// the device cannot upload pixel data.
    pub fn setup_resource_with_data<D: GpuDevice>(
        &self,
        ctx: &mut GfxContext<D>,
        tex: &mut Texture,
        data: &[u8],
    ) -> Result<ResourceState> {
        let setup = &tex.setup;
        engine_assert!(setup.should_setup_from_pixel_data(), SOURCE,
            "setup_resource_with_data: {:?} setup is not a pixel-data setup", setup.source);
        engine_assert!(tex.state == ResourceState::Initial, SOURCE,
            "setup_resource_with_data: texture is {:?}, destroy it first", tex.state);
        engine_assert!(tex.is_cleared(), SOURCE,
            "setup_resource_with_data: texture already holds GPU objects");
        engine_assert!(setup.width > 0 && setup.height > 0, SOURCE,
            "setup_resource_with_data: size must be positive, got {}x{}", setup.width, setup.height);
        let max_mips = max_mip_levels(setup.width, setup.height);
        engine_assert!(setup.num_mip_maps >= 1 && setup.num_mip_maps <= max_mips, SOURCE,
            "setup_resource_with_data: {} mips requested, {}x{} allows 1..={}",
            setup.num_mip_maps, setup.width, setup.height, max_mips);
        let expected_layers = match setup.texture_type {
            TextureType::Texture2D => setup.layers == 1,
            TextureType::TextureCube => setup.layers == 6,
            TextureType::TextureArray => setup.layers >= 1,
        };
        engine_assert!(expected_layers, SOURCE,
            "setup_resource_with_data: {:?} cannot have {} layers", setup.texture_type, setup.layers);
        engine_assert!(setup.color_format.bytes_per_pixel().is_some(), SOURCE,
            "setup_resource_with_data: {:?} has no defined pixel size", setup.color_format);

        let subresources = subresource_layout(setup.width, setup.height, setup.layers, setup.num_mip_maps, |w, h| {
            setup.color_format.image_size(w, h)
        });
        let expected_size = subresources.last().map_or(0, |s| s.offset + s.size);
        if data.len() as u64 != expected_size {
            engine_error!(SOURCE, "Pixel data is {} bytes, {:?} {}x{} ({} layers, {} mips) needs {}",
                data.len(), setup.color_format, setup.width, setup.height,
                setup.layers, setup.num_mip_maps, expected_size);
            tex.clear();
            tex.state = ResourceState::Failed;
            return Ok(ResourceState::Failed);
        }

        let desc = ImageDesc {
            texture_type: setup.texture_type,
            width: setup.width,
            height: setup.height,
            layers: setup.layers,
            mip_levels: setup.num_mip_maps,
            format: setup.color_format,
            sample_count: 1,
            usage: ImageUsage::SAMPLED | ImageUsage::TRANSFER_DST,
        };

        match Self::create_sampled_texture(ctx, tex, &desc, data, &subresources) {
            Ok(()) => {}
            Err(Error::Unsupported(what)) => {
                engine_warn!(SOURCE, "Pixel data textures unavailable: {}", what);
                Self::release_resources(ctx, tex);
                tex.clear();
                tex.state = ResourceState::InvalidState;
                return Ok(ResourceState::InvalidState);
            }
            Err(err) => {
                Self::release_resources(ctx, tex);
                tex.clear();
                return Err(engine_err!(SOURCE, err));
            }
        }

        tex.attrs = TextureAttrs {
            texture_type: desc.texture_type,
            width: desc.width,
            height: desc.height,
            num_mip_maps: desc.mip_levels,
            layers: desc.layers,
            color_format: desc.format,
            depth_format: None,
            sample_count: 1,
            is_render_target: false,
            has_shared_depth: false,
        };
        tex.state = ResourceState::Valid;

        engine_debug!(SOURCE, "{:?} texture created from {} bytes: {}x{} {:?}",
            desc.texture_type, data.len(), desc.width, desc.height, desc.format);
        Ok(ResourceState::Valid)
    }

    fn create_sampled_texture<D: GpuDevice>(
        ctx: &mut GfxContext<D>,
        tex: &mut Texture,
        desc: &ImageDesc,
        data: &[u8],
        subresources: &[ImageSubresourceData],
    ) -> Result<()> {
        let image = ctx.resource_allocator.alloc_texture(&mut ctx.device, desc)?;
        tex.color_buffer = Some(image);

        let Some(backend_image) = ctx.resource_allocator.image(image) else {
            engine_fatal!(SOURCE, "{:?} was just allocated but is not an image", image);
        };
        ctx.device.upload_image(backend_image, data, subresources)?;

        tex.shader_resource_view = ctx.descriptor_allocator.allocate(DescriptorRegion::ShaderResourceView);
        write_view(ctx, tex.shader_resource_view, image)
    }

    // ===== DESTRUCTION =====

    /// Release every object and slot of `tex` at the current frame and clear
    /// the record, returning it to `Initial`. `Failed` and `InvalidState`
    /// records hold nothing, so only the state is reset. Panics if the
    /// record is already `Initial`.
    pub fn destroy_resource<D: GpuDevice>(&self, ctx: &mut GfxContext<D>, tex: &mut Texture) {
        engine_assert!(tex.state != ResourceState::Initial, SOURCE,
            "destroy_resource: texture is already cleared");

        ctx.render_state.invalidate_bound_render_target_cache();
        Self::release_resources(ctx, tex);
        tex.clear();
    }

    /// Deferred release of whatever `tex` currently holds
    fn release_resources<D: GpuDevice>(ctx: &mut GfxContext<D>, tex: &Texture) {
        let frame_index = ctx.frame_clock.frame_index();
        for resource in [tex.color_buffer, tex.depth_buffer].into_iter().flatten() {
            ctx.resource_allocator.release_deferred(frame_index, resource);
        }
        for handle in [tex.render_target_view, tex.depth_stencil_view, tex.shader_resource_view] {
            if handle.is_valid() {
                ctx.descriptor_allocator.release_deferred(frame_index, handle);
            }
        }
    }
}

/// Write the view matching `handle`'s region for the image behind `resource`
fn write_view<D: GpuDevice>(
    ctx: &mut GfxContext<D>,
    handle: DescriptorHandle,
    resource: ResourceRef,
) -> Result<()> {
    let location = ctx.descriptor_allocator.cpu_handle(handle);
    let Some(image) = ctx.resource_allocator.image(resource) else {
        engine_fatal!(SOURCE, "{:?} is not an image", resource);
    };
    match location.region {
        DescriptorRegion::RenderTargetView => ctx.device.write_render_target_view(location, image),
        DescriptorRegion::DepthStencilView => ctx.device.write_depth_stencil_view(location, image),
        DescriptorRegion::ShaderResourceView => ctx.device.write_shader_resource_view(location, image),
        DescriptorRegion::Sampler => engine_fatal!(SOURCE, "image view written into a sampler slot"),
    }
}

/// Byte layout of every (layer, mip) in a tightly packed pixel blob
fn subresource_layout(
    width: u32,
    height: u32,
    layers: u32,
    mip_levels: u32,
    image_size: impl Fn(u32, u32) -> u64,
) -> Vec<ImageSubresourceData> {
    let mut subresources = Vec::with_capacity((layers * mip_levels) as usize);
    let mut offset = 0;
    for layer in 0..layers {
        for mip_level in 0..mip_levels {
            let mip_width = (width >> mip_level).max(1);
            let mip_height = (height >> mip_level).max(1);
            let size = image_size(mip_width, mip_height);
            subresources.push(ImageSubresourceData {
                layer,
                mip_level,
                width: mip_width,
                height: mip_height,
                offset,
                size,
            });
            offset += size;
        }
    }
    subresources
}

#[cfg(test)]
#[path = "texture_factory_tests.rs"]
mod tests;
