/// ResourcePool - slotmap-backed storage for live resource records

use slotmap::{Key, SlotMap};
use crate::resource::{Texture, TextureId};

/// Owns resource records and issues stable generational ids for them
pub struct ResourcePool<K: Key, T> {
    items: SlotMap<K, T>,
}

impl<K: Key, T> ResourcePool<K, T> {
    pub fn new() -> Self {
        Self { items: SlotMap::with_key() }
    }

    pub fn insert(&mut self, item: T) -> K {
        self.items.insert(item)
    }

    pub fn lookup(&self, id: K) -> Option<&T> {
        self.items.get(id)
    }

    pub fn lookup_mut(&mut self, id: K) -> Option<&mut T> {
        self.items.get_mut(id)
    }

    pub fn remove(&mut self, id: K) -> Option<T> {
        self.items.remove(id)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Snapshot of every live id
    pub fn ids(&self) -> Vec<K> {
        self.items.keys().collect()
    }
}

impl<K: Key, T> Default for ResourcePool<K, T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Read-only texture access for factories resolving cross-references
/// (shared depth providers)
pub trait TextureLookup {
    fn lookup(&self, id: TextureId) -> Option<&Texture>;
}

impl TextureLookup for ResourcePool<TextureId, Texture> {
    fn lookup(&self, id: TextureId) -> Option<&Texture> {
        self.items.get(id)
    }
}

#[cfg(test)]
#[path = "resource_pool_tests.rs"]
mod tests;
