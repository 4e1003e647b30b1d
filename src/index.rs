//! Key → [`Handle`] index for O(1) lookup of an entry's list position.
//!
//! The index never owns nodes; it maps each cached key to the handle of the
//! list node holding it. The cache keeps `index.len() == list.len()` after
//! every public call.

use crate::list::Handle;
use core::borrow::Borrow;
use core::fmt;
use core::hash::{BuildHasher, Hash};

#[cfg(feature = "hashbrown")]
pub use hashbrown::DefaultHashBuilder;
#[cfg(feature = "hashbrown")]
use hashbrown::HashMap;

#[cfg(not(feature = "hashbrown"))]
pub use std::collections::hash_map::RandomState as DefaultHashBuilder;
#[cfg(not(feature = "hashbrown"))]
use std::collections::HashMap;

/// Mapping from key to the handle of the node currently holding that key.
pub struct Index<K, S = DefaultHashBuilder> {
    map: HashMap<K, Handle, S>,
}

impl<K: Hash + Eq, S: BuildHasher> Index<K, S> {
    /// Creates an empty index sized for `capacity` keys.
    pub fn with_capacity_and_hasher(capacity: usize, hash_builder: S) -> Self {
        Index {
            map: HashMap::with_capacity_and_hasher(capacity, hash_builder),
        }
    }

    /// Returns the current handle for `key`, if registered.
    #[inline]
    pub fn lookup<Q>(&self, key: &Q) -> Option<Handle>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.map.get(key).copied()
    }

    /// Registers `key`, overwriting any previous mapping. Returns the old handle.
    #[inline]
    pub fn insert(&mut self, key: K, handle: Handle) -> Option<Handle> {
        self.map.insert(key, handle)
    }

    /// Removes the mapping for `key`. Removing an absent key is a no-op.
    #[inline]
    pub fn remove<Q>(&mut self, key: &Q) -> Option<Handle>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.map.remove(key)
    }

    /// Returns `true` if `key` is registered.
    #[inline]
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.map.contains_key(key)
    }
}

impl<K, S> Index<K, S> {
    /// Number of registered keys.
    #[inline]
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Returns `true` if no keys are registered.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Drops every mapping.
    pub fn clear(&mut self) {
        self.map.clear();
    }
}

impl<K, S> fmt::Debug for Index<K, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Index").field("len", &self.map.len()).finish()
    }
}
