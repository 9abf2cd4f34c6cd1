//! Factories that turn setup descriptions into live resource records

mod mesh_factory;
mod texture_factory;

pub use mesh_factory::MeshFactory;
pub use texture_factory::TextureFactory;
