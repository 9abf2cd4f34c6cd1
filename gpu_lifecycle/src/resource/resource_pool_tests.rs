use super::*;
use crate::device::PixelFormat;
use crate::resource::TextureSetup;

fn texture(width: u32) -> Texture {
    Texture::new(TextureSetup::render_target(width, width, PixelFormat::R8G8B8A8_UNORM, None))
}

#[test]
fn test_insert_lookup_remove() {
    let mut pool: ResourcePool<TextureId, Texture> = ResourcePool::new();
    assert!(pool.is_empty());

    let id = pool.insert(texture(32));
    assert_eq!(pool.len(), 1);
    assert_eq!(pool.lookup(id).unwrap().setup.width, 32);

    pool.lookup_mut(id).unwrap().attrs.width = 32;
    assert_eq!(pool.lookup(id).unwrap().attrs.width, 32);

    let removed = pool.remove(id).unwrap();
    assert_eq!(removed.setup.width, 32);
    assert!(pool.lookup(id).is_none());
}

#[test]
fn test_stale_id_does_not_alias_new_item() {
    let mut pool: ResourcePool<TextureId, Texture> = ResourcePool::new();
    let old = pool.insert(texture(8));
    pool.remove(old);
    let new = pool.insert(texture(16));

    assert_ne!(old, new);
    assert!(pool.lookup(old).is_none());
    assert_eq!(pool.lookup(new).unwrap().setup.width, 16);
}

#[test]
fn test_texture_lookup_trait() {
    let mut pool: ResourcePool<TextureId, Texture> = ResourcePool::new();
    let id = pool.insert(texture(64));

    let lookup: &dyn TextureLookup = &pool;
    assert_eq!(lookup.lookup(id).unwrap().setup.height, 64);
}

#[test]
fn test_ids_snapshot() {
    let mut pool: ResourcePool<TextureId, Texture> = ResourcePool::new();
    let a = pool.insert(texture(1));
    let b = pool.insert(texture(2));

    let ids = pool.ids();
    assert_eq!(ids.len(), 2);
    assert!(ids.contains(&a));
    assert!(ids.contains(&b));
}
