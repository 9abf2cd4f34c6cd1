/// Central resource manager.
///
/// Owns the `GfxContext`, the texture and mesh pools and both factories,
/// and pairs every create with a pool insert and every destroy with a pool
/// remove. Only records that reached `ResourceState::Valid` get an id; the
/// other outcomes come back with `TextureId::null()` / `MeshId::null()`.

use slotmap::Key;
use crate::context::GfxContext;
use crate::device::GpuDevice;
use crate::error::Result;
use crate::factory::{MeshFactory, TextureFactory};
use crate::resource::{
    Mesh, MeshId, MeshSetup, ResourcePool, ResourceState, Texture, TextureId, TextureSetup,
};
use crate::{engine_fatal, engine_info, engine_warn};

const SOURCE: &str = "gfx::ResourceManager";

pub struct ResourceManager<D: GpuDevice> {
    ctx: GfxContext<D>,
    textures: ResourcePool<TextureId, Texture>,
    meshes: ResourcePool<MeshId, Mesh>,
    texture_factory: TextureFactory,
    mesh_factory: MeshFactory,
}

impl<D: GpuDevice> ResourceManager<D> {
    pub fn new(ctx: GfxContext<D>) -> Self {
        Self {
            ctx,
            textures: ResourcePool::new(),
            meshes: ResourcePool::new(),
            texture_factory: TextureFactory::new(),
            mesh_factory: MeshFactory::new(),
        }
    }

    // ===== TEXTURES =====

    /// Create a render target
    pub fn create_texture(&mut self, setup: TextureSetup) -> Result<(TextureId, ResourceState)> {
        let mut tex = Texture::new(setup);
        let state = self.texture_factory.setup_resource(&mut self.ctx, &self.textures, &mut tex)?;
        Ok(self.insert_texture(tex, state))
    }

    /// Create a texture from pixel data
    pub fn create_texture_with_data(&mut self, setup: TextureSetup, data: &[u8]) -> Result<(TextureId, ResourceState)> {
        let mut tex = Texture::new(setup);
        let state = self.texture_factory.setup_resource_with_data(&mut self.ctx, &mut tex, data)?;
        Ok(self.insert_texture(tex, state))
    }

    fn insert_texture(&mut self, tex: Texture, state: ResourceState) -> (TextureId, ResourceState) {
        if state.is_valid() {
            (self.textures.insert(tex), state)
        } else {
            engine_warn!(SOURCE, "Texture setup ended in {:?}, no id issued", state);
            (TextureId::null(), state)
        }
    }

    /// Destroy a texture. Panics on an unknown id.
    pub fn destroy_texture(&mut self, id: TextureId) {
        let Some(mut tex) = self.textures.remove(id) else {
            engine_fatal!(SOURCE, "destroy_texture: unknown texture {:?}", id);
        };
        self.texture_factory.destroy_resource(&mut self.ctx, &mut tex);
    }

    pub fn texture(&self, id: TextureId) -> Option<&Texture> {
        self.textures.lookup(id)
    }

    pub fn texture_count(&self) -> usize {
        self.textures.len()
    }

    // ===== MESHES =====

    /// Create an empty stream mesh
    pub fn create_mesh(&mut self, setup: MeshSetup) -> Result<(MeshId, ResourceState)> {
        let mut mesh = Mesh::new(setup);
        let state = self.mesh_factory.setup_resource(&mut self.ctx, &mut mesh)?;
        Ok((self.meshes.insert(mesh), state))
    }

    /// Create a mesh from vertex data followed by index data
    pub fn create_mesh_with_data(&mut self, setup: MeshSetup, data: &[u8]) -> Result<(MeshId, ResourceState)> {
        let mut mesh = Mesh::new(setup);
        let state = self.mesh_factory.setup_resource_with_data(&mut self.ctx, &mut mesh, data)?;
        Ok((self.meshes.insert(mesh), state))
    }

    pub fn update_mesh_vertices(&mut self, id: MeshId, data: &[u8]) -> Result<()> {
        let Some(mesh) = self.meshes.lookup_mut(id) else {
            engine_fatal!(SOURCE, "update_mesh_vertices: unknown mesh {:?}", id);
        };
        self.mesh_factory.update_vertices(&mut self.ctx, mesh, data)
    }

    /// Destroy a mesh. Panics on an unknown id.
    pub fn destroy_mesh(&mut self, id: MeshId) {
        let Some(mut mesh) = self.meshes.remove(id) else {
            engine_fatal!(SOURCE, "destroy_mesh: unknown mesh {:?}", id);
        };
        self.mesh_factory.destroy_resource(&mut self.ctx, &mut mesh);
    }

    pub fn mesh(&self, id: MeshId) -> Option<&Mesh> {
        self.meshes.lookup(id)
    }

    pub fn mesh_count(&self) -> usize {
        self.meshes.len()
    }

    // ===== FRAME / LIFETIME =====

    /// Frame-retirement signal, see `GfxContext::advance_frame`
    pub fn advance_frame(&mut self) -> (usize, usize) {
        self.ctx.advance_frame()
    }

    pub fn context(&self) -> &GfxContext<D> {
        &self.ctx
    }

    pub fn context_mut(&mut self) -> &mut GfxContext<D> {
        &mut self.ctx
    }

    /// Destroy every remaining resource, flush both allocators and return
    /// the device. The device must be idle.
    pub fn shutdown(mut self) -> D {
        let (textures, meshes) = (self.textures.len(), self.meshes.len());
        for id in self.textures.ids() {
            self.destroy_texture(id);
        }
        for id in self.meshes.ids() {
            self.destroy_mesh(id);
        }
        engine_info!(SOURCE, "Shutdown: destroyed {} texture(s) and {} mesh(es)", textures, meshes);
        self.ctx.into_device()
    }
}

#[cfg(test)]
#[path = "resource_manager_tests.rs"]
mod tests;
