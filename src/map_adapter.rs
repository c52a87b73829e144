//! MapAdapter: the map façade that owns the store and hands out views.

use crate::contract::{HCollection, HIterator, HMap};
use crate::entry::Entry;
use crate::error::{Error, Result};
use crate::store::{Handle, Store};
use crate::view::{EntrySet, KeySet, ValueCollection, View};
use core::borrow::Borrow;
use core::cell::{Ref, RefCell, RefMut};
use core::fmt;
use core::hash::{BuildHasher, Hash, Hasher};
use std::collections::hash_map::RandomState;

/// A hash map whose keys, values and entries can be viewed and mutated
/// through live projections.
///
/// All operations take `&self`: the store sits behind a `RefCell` that
/// is borrowed for the duration of one primitive operation, so views,
/// cursors and entries of the same map can be used side by side.
pub struct MapAdapter<K, V, S = RandomState> {
    store: RefCell<Store<K, V, S>>,
}

impl<K, V> MapAdapter<K, V>
where
    K: Eq + Hash + Clone,
    V: Eq + Hash + Clone,
{
    pub fn new() -> Self {
        Self {
            store: RefCell::new(Store::new()),
        }
    }
}

impl<K, V> Default for MapAdapter<K, V>
where
    K: Eq + Hash + Clone,
    V: Eq + Hash + Clone,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V, S> MapAdapter<K, V, S>
where
    K: Eq + Hash + Clone,
    V: Eq + Hash + Clone,
    S: BuildHasher + Clone + Default,
{
    pub fn with_hasher(hasher: S) -> Self {
        Self {
            store: RefCell::new(Store::with_hasher(hasher)),
        }
    }

    /// Build an independent copy of `source`.
    ///
    /// Fails with `Error::NullArgument` if `source` enumerates a key it
    /// cannot resolve.
    pub fn from_map<M>(source: &M) -> Result<Self>
    where
        M: HMap<K, V> + ?Sized,
    {
        let map = Self::with_hasher(S::default());
        map.put_all(source)?;
        Ok(map)
    }

    pub(crate) fn store(&self) -> Ref<'_, Store<K, V, S>> {
        self.store.borrow()
    }

    fn store_mut(&self) -> RefMut<'_, Store<K, V, S>> {
        self.store.borrow_mut()
    }

    pub fn size(&self) -> usize {
        self.store().len()
    }
    pub fn is_empty(&self) -> bool {
        self.store().is_empty()
    }

    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.store().contains_key(key)
    }

    /// Linear scan over the stored values.
    pub fn contains_value(&self, value: &V) -> bool {
        self.store().iter().any(|(_, v)| v == value)
    }

    pub fn get<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.store().get(key).cloned()
    }

    /// Map `key` to `value`, returning the previous value if any.
    pub fn put(&self, key: K, value: V) -> Option<V> {
        self.store_mut().insert(key, value)
    }

    pub fn remove<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.store_mut().remove_key(key).map(|(_, v)| v)
    }

    /// Remove the mapping at `handle`. A handle whose mapping is gone
    /// resolves to nothing, even if its key was put back since.
    pub(crate) fn remove_handle(&self, handle: Handle) -> Option<V> {
        self.store_mut().remove(handle).map(|(_, v)| v)
    }

    /// Copy every mapping of `source` into this map, overwriting values
    /// on key collision. Copying a map into itself is a no-op.
    ///
    /// Fails with `Error::NullArgument` when `source` enumerates a key it
    /// cannot resolve; mappings copied before that point remain.
    pub fn put_all<M>(&self, source: &M) -> Result<()>
    where
        M: HMap<K, V> + ?Sized,
    {
        if core::ptr::addr_eq(self, source) {
            return Ok(());
        }
        let keys = source.key_set();
        let mut it = keys.iterator();
        let mut copied = 0usize;
        while it.has_next() {
            let key = it.next()?;
            let value = source.get(&key).ok_or(Error::NullArgument)?;
            self.store_mut().insert(key, value);
            copied += 1;
        }
        log::trace!("put_all copied {} mappings", copied);
        Ok(())
    }

    pub fn clear(&self) {
        let mut store = self.store_mut();
        log::trace!("clearing {} mappings", store.len());
        store.clear();
    }

    pub fn key_set(&self) -> KeySet<'_, K, V, S> {
        View::new(self)
    }

    pub fn values(&self) -> ValueCollection<'_, K, V, S> {
        View::new(self)
    }

    pub fn entry_set(&self) -> EntrySet<'_, K, V, S> {
        View::new(self)
    }

    /// Equal iff both entry sets hold the same key/value pairs.
    pub fn equals<M>(&self, other: &M) -> bool
    where
        M: HMap<K, V> + ?Sized,
    {
        self.entry_set().equals_entries(&other.entry_set())
    }

    /// Hash code of the entry set, so equal maps hash equally.
    pub fn hash_code(&self) -> u64 {
        self.entry_set().hash_code()
    }
}

impl<K, V, S> HMap<K, V> for MapAdapter<K, V, S>
where
    K: Eq + Hash + Clone,
    V: Eq + Hash + Clone,
    S: BuildHasher + Clone + Default,
{
    type Entry<'m>
        = Entry<'m, K, V, S>
    where
        Self: 'm;
    type KeySet<'m>
        = KeySet<'m, K, V, S>
    where
        Self: 'm;
    type Values<'m>
        = ValueCollection<'m, K, V, S>
    where
        Self: 'm;
    type EntrySet<'m>
        = EntrySet<'m, K, V, S>
    where
        Self: 'm;

    fn size(&self) -> usize {
        MapAdapter::size(self)
    }
    fn is_empty(&self) -> bool {
        MapAdapter::is_empty(self)
    }
    fn contains_key(&self, key: &K) -> bool {
        MapAdapter::contains_key(self, key)
    }
    fn contains_value(&self, value: &V) -> bool {
        MapAdapter::contains_value(self, value)
    }
    fn get(&self, key: &K) -> Option<V> {
        MapAdapter::get(self, key)
    }
    fn put(&self, key: K, value: V) -> Option<V> {
        MapAdapter::put(self, key, value)
    }
    fn remove(&self, key: &K) -> Option<V> {
        MapAdapter::remove(self, key)
    }
    fn put_all<M>(&self, source: &M) -> Result<()>
    where
        M: HMap<K, V> + ?Sized,
    {
        MapAdapter::put_all(self, source)
    }
    fn clear(&self) {
        MapAdapter::clear(self)
    }
    fn key_set(&self) -> Self::KeySet<'_> {
        MapAdapter::key_set(self)
    }
    fn values(&self) -> Self::Values<'_> {
        MapAdapter::values(self)
    }
    fn entry_set(&self) -> Self::EntrySet<'_> {
        MapAdapter::entry_set(self)
    }
    fn equals<M>(&self, other: &M) -> bool
    where
        M: HMap<K, V> + ?Sized,
    {
        MapAdapter::equals(self, other)
    }
    fn hash_code(&self) -> u64 {
        MapAdapter::hash_code(self)
    }
}

impl<K, V, S> Clone for MapAdapter<K, V, S>
where
    K: Eq + Hash + Clone,
    V: Eq + Hash + Clone,
    S: BuildHasher + Clone + Default,
{
    /// Copy constructor: the clone owns an independent store.
    fn clone(&self) -> Self {
        Self {
            store: RefCell::new(self.store().clone()),
        }
    }
}

impl<K, V, S, S2> PartialEq<MapAdapter<K, V, S2>> for MapAdapter<K, V, S>
where
    K: Eq + Hash + Clone,
    V: Eq + Hash + Clone,
    S: BuildHasher + Clone + Default,
    S2: BuildHasher + Clone + Default,
{
    fn eq(&self, other: &MapAdapter<K, V, S2>) -> bool {
        self.equals(other)
    }
}

impl<K, V, S> Eq for MapAdapter<K, V, S>
where
    K: Eq + Hash + Clone,
    V: Eq + Hash + Clone,
    S: BuildHasher + Clone + Default,
{
}

impl<K, V, S> Hash for MapAdapter<K, V, S>
where
    K: Eq + Hash + Clone,
    V: Eq + Hash + Clone,
    S: BuildHasher + Clone + Default,
{
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(self.hash_code());
    }
}

impl<K, V, S> FromIterator<(K, V)> for MapAdapter<K, V, S>
where
    K: Eq + Hash + Clone,
    V: Eq + Hash + Clone,
    S: BuildHasher + Clone + Default,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let map = Self::with_hasher(S::default());
        for (k, v) in iter {
            map.put(k, v);
        }
        map
    }
}

impl<K, V, S> fmt::Display for MapAdapter<K, V, S>
where
    K: Eq + Hash + Clone + fmt::Display,
    V: Eq + Hash + Clone + fmt::Display,
    S: BuildHasher + Clone + Default,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, (k, v)) in self.store().iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}: {}", k, v)?;
        }
        f.write_str("}")
    }
}

impl<K, V, S> fmt::Debug for MapAdapter<K, V, S>
where
    K: Eq + Hash + Clone + fmt::Debug,
    V: Eq + Hash + Clone + fmt::Debug,
    S: BuildHasher + Clone + Default,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.store().iter()).finish()
    }
}
