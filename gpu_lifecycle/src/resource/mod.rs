//! Resource records, their setup descriptions and the pool that owns them

mod mesh;
mod resource_manager;
mod resource_pool;
mod resource_state;
mod texture;

pub use mesh::{IndexType, Mesh, MeshBuffer, MeshId, MeshSetup, MeshSource, Usage, MAX_MESH_SLOTS};
pub use resource_manager::ResourceManager;
pub use resource_pool::{ResourcePool, TextureLookup};
pub use resource_state::ResourceState;
pub use texture::{Texture, TextureAttrs, TextureId, TextureSetup, TextureSource};
