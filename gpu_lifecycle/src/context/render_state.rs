/// Renderer-side binding cache that resource destruction must invalidate

use crate::engine_trace;

const SOURCE: &str = "gfx::RenderState";

/// Cached bindings of the renderer.
///
/// Destroying a texture or mesh invalidates the matching cache so the next
/// frame never rebinds a handle that is about to be released.
#[derive(Debug, Default)]
pub struct RenderState {
    render_target_bound: bool,
    mesh_bound: bool,
    render_target_invalidations: u64,
    mesh_invalidations: u64,
}

impl RenderState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that a render target is bound
    pub fn bind_render_target(&mut self) {
        self.render_target_bound = true;
    }

    /// Record that a mesh is bound
    pub fn bind_mesh(&mut self) {
        self.mesh_bound = true;
    }

    pub fn invalidate_bound_render_target_cache(&mut self) {
        if self.render_target_bound {
            engine_trace!(SOURCE, "Bound render target cache invalidated");
        }
        self.render_target_bound = false;
        self.render_target_invalidations += 1;
    }

    pub fn invalidate_mesh_binding(&mut self) {
        self.mesh_bound = false;
        self.mesh_invalidations += 1;
    }

    pub fn is_render_target_bound(&self) -> bool {
        self.render_target_bound
    }

    pub fn is_mesh_bound(&self) -> bool {
        self.mesh_bound
    }

    /// Times the render target cache has been invalidated
    pub fn render_target_invalidations(&self) -> u64 {
        self.render_target_invalidations
    }

    /// Times the mesh binding has been invalidated
    pub fn mesh_invalidations(&self) -> u64 {
        self.mesh_invalidations
    }
}
