//! Entry: a proxy for one mapping, looked up by key on every access.

use crate::contract::HEntry;
use crate::map_adapter::MapAdapter;
use core::fmt;
use core::hash::{BuildHasher, Hash, Hasher};
use std::collections::hash_map::RandomState;

/// One mapping of a `MapAdapter`, identified by its key.
///
/// The entry never caches a value. `value()` is the map's current value
/// for the key, so once the mapping is removed elsewhere the entry is
/// detached and reports `None`. `set_value` on a detached entry puts the
/// key back into the map.
pub struct Entry<'a, K, V, S = RandomState> {
    map: &'a MapAdapter<K, V, S>,
    key: K,
}

impl<'a, K, V, S> Entry<'a, K, V, S> {
    pub(crate) fn new(map: &'a MapAdapter<K, V, S>, key: K) -> Self {
        Self { map, key }
    }
}

impl<'a, K, V, S> Entry<'a, K, V, S>
where
    K: Eq + Hash + Clone,
    V: Eq + Hash + Clone,
    S: BuildHasher + Clone + Default,
{
    /// True once the map no longer holds this entry's key.
    pub fn is_detached(&self) -> bool {
        !self.map.contains_key(&self.key)
    }
}

impl<'a, K, V, S> HEntry<K, V> for Entry<'a, K, V, S>
where
    K: Eq + Hash + Clone,
    V: Eq + Hash + Clone,
    S: BuildHasher + Clone + Default,
{
    fn key(&self) -> &K {
        &self.key
    }

    fn value(&self) -> Option<V> {
        self.map.get(&self.key)
    }

    /// Unconditional put: a detached entry reinserts its key and returns `None`.
    fn set_value(&self, value: V) -> Option<V> {
        if self.is_detached() {
            log::debug!("set_value reinserting the key of a detached entry");
        }
        self.map.put(self.key.clone(), value)
    }

    fn equals<E>(&self, other: &E) -> bool
    where
        E: HEntry<K, V> + ?Sized,
    {
        if core::ptr::addr_eq(self, other) {
            return true;
        }
        self.key == *other.key() && self.value() == other.value()
    }
}

impl<'a, K, V, S, E> PartialEq<E> for Entry<'a, K, V, S>
where
    K: Eq + Hash + Clone,
    V: Eq + Hash + Clone,
    S: BuildHasher + Clone + Default,
    E: HEntry<K, V>,
{
    fn eq(&self, other: &E) -> bool {
        self.equals(other)
    }
}

impl<'a, K, V, S> Hash for Entry<'a, K, V, S>
where
    K: Eq + Hash + Clone,
    V: Eq + Hash + Clone,
    S: BuildHasher + Clone + Default,
{
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(self.hash_code());
    }
}

impl<'a, K, V, S> Clone for Entry<'a, K, V, S>
where
    K: Clone,
{
    fn clone(&self) -> Self {
        Self {
            map: self.map,
            key: self.key.clone(),
        }
    }
}

impl<'a, K, V, S> fmt::Display for Entry<'a, K, V, S>
where
    K: Eq + Hash + Clone + fmt::Display,
    V: Eq + Hash + Clone + fmt::Display,
    S: BuildHasher + Clone + Default,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.value() {
            Some(v) => write!(f, "{}: {}", self.key, v),
            None => write!(f, "{}: <detached>", self.key),
        }
    }
}

impl<'a, K, V, S> fmt::Debug for Entry<'a, K, V, S>
where
    K: Eq + Hash + Clone + fmt::Debug,
    V: Eq + Hash + Clone + fmt::Debug,
    S: BuildHasher + Clone + Default,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Entry")
            .field("key", &self.key)
            .field("value", &self.value())
            .finish()
    }
}
