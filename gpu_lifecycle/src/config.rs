/// Process-setup configuration for the GPU lifecycle core

use crate::descriptor::DescriptorRegion;

/// Configuration consumed once when a `GfxContext` is created
#[derive(Debug, Clone)]
pub struct GfxConfig {
    /// Number of frames the GPU may still be executing while the CPU prepares
    /// the next one. A release requested at frame F is finalized once the
    /// frame clock reaches `F + num_inflight_frames`.
    pub num_inflight_frames: u32,
    /// Capacity of the render-target-view heap region
    pub max_render_target_views: u32,
    /// Capacity of the depth-stencil-view heap region
    pub max_depth_stencil_views: u32,
    /// Capacity of the shader-resource-view heap region
    pub max_shader_resource_views: u32,
    /// Capacity of the sampler heap region
    pub max_samplers: u32,
    /// Enable backend validation/debug layers
    pub enable_validation: bool,
}

impl GfxConfig {
    /// Fixed capacity of a descriptor heap region
    pub fn descriptor_capacity(&self, region: DescriptorRegion) -> u32 {
        match region {
            DescriptorRegion::RenderTargetView => self.max_render_target_views,
            DescriptorRegion::DepthStencilView => self.max_depth_stencil_views,
            DescriptorRegion::ShaderResourceView => self.max_shader_resource_views,
            DescriptorRegion::Sampler => self.max_samplers,
        }
    }
}

impl Default for GfxConfig {
    fn default() -> Self {
        Self {
            num_inflight_frames: 2,
            max_render_target_views: 128,
            max_depth_stencil_views: 64,
            max_shader_resource_views: 1024,
            max_samplers: 64,
            enable_validation: cfg!(debug_assertions),
        }
    }
}
