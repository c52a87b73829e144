//! Store: the backing associative container behind every `MapAdapter`.
//!
//! Entries live in a generational slot arena; a `HashTable` indexes them
//! by the hash computed once at insertion. Generational handles let
//! cursors remember positions without borrowing the store.

use core::borrow::Borrow;
use core::hash::{BuildHasher, Hash};
use hashbrown::HashTable;
use slotmap::{DefaultKey, SlotMap};
use std::collections::hash_map::RandomState;

/// Stable position of one mapping. A handle stops resolving once its
/// mapping is removed and never aliases a later mapping.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub(crate) struct Handle(DefaultKey);

impl Handle {
    fn raw_handle(&self) -> DefaultKey {
        self.0
    }
}

#[derive(Clone, Debug)]
struct Slot<K, V> {
    key: K,
    value: V,
    hash: u64,
}

#[derive(Clone)]
pub(crate) struct Store<K, V, S = RandomState> {
    hasher: S,
    index: HashTable<DefaultKey>,
    slots: SlotMap<DefaultKey, Slot<K, V>>,
}

impl<K, V> Store<K, V>
where
    K: Eq + Hash,
{
    pub fn new() -> Self {
        Self::with_hasher(Default::default())
    }
}

/// Iterator over live mappings in arena order.
pub(crate) struct Iter<'a, K, V> {
    it: slotmap::basic::Iter<'a, DefaultKey, Slot<K, V>>,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);
    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.it.next().map(|(_, s)| (&s.key, &s.value))
    }
}

impl<K, V, S> Store<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher + Clone + Default,
{
    pub fn with_hasher(hasher: S) -> Self {
        Self {
            index: HashTable::new(),
            hasher,
            slots: SlotMap::with_key(),
        }
    }

    fn make_hash<Q>(&self, q: &Q) -> u64
    where
        Q: ?Sized + Hash,
    {
        self.hasher.hash_one(q)
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn find<Q>(&self, q: &Q) -> Option<Handle>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let hash = self.make_hash(q);
        self.index
            .find(hash, |&k| {
                self.slots
                    .get(k)
                    .map(|s| s.key.borrow() == q)
                    .unwrap_or(false)
            })
            .map(|&k| Handle(k))
    }

    pub fn contains_key<Q>(&self, q: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.find(q).is_some()
    }

    pub fn get<Q>(&self, q: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let h = self.find(q)?;
        self.slots.get(h.raw_handle()).map(|s| &s.value)
    }

    /// Map `key` to `value`. An existing mapping keeps its original key
    /// and handle; only the value is replaced and returned.
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        let hash = self.make_hash(&key);
        match self.index.entry(
            hash,
            |&kk| self.slots.get(kk).map(|s| s.key == key).unwrap_or(false),
            |&kk| self.slots.get(kk).map(|s| s.hash).unwrap_or(0),
        ) {
            hashbrown::hash_table::Entry::Occupied(o) => {
                let k = *o.get();
                self.slots
                    .get_mut(k)
                    .map(|s| core::mem::replace(&mut s.value, value))
            }
            hashbrown::hash_table::Entry::Vacant(v) => {
                let k = self.slots.insert(Slot { key, value, hash });
                let _ = v.insert(k);
                None
            }
        }
    }

    pub fn remove(&mut self, handle: Handle) -> Option<(K, V)> {
        let k = handle.raw_handle();
        let slot = self.slots.remove(k)?;
        if let Ok(occupied) = self.index.find_entry(slot.hash, |&kk| kk == k) {
            let _ = occupied.remove();
        }
        Some((slot.key, slot.value))
    }

    pub fn remove_key<Q>(&mut self, q: &Q) -> Option<(K, V)>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let h = self.find(q)?;
        self.remove(h)
    }

    pub fn clear(&mut self) {
        self.index.clear();
        self.slots.clear();
    }

    pub fn contains_handle(&self, h: Handle) -> bool {
        self.slots.contains_key(h.raw_handle())
    }

    pub fn handle_entry(&self, h: Handle) -> Option<(&K, &V)> {
        self.slots.get(h.raw_handle()).map(|s| (&s.key, &s.value))
    }

    /// Positions of every live mapping, in arena order.
    pub fn handles(&self) -> Vec<Handle> {
        self.slots.keys().map(Handle).collect()
    }

    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            it: self.slots.iter(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    /// Invariant: inserting an existing key replaces the value in place,
    /// returns the previous value and keeps the handle.
    #[test]
    fn insert_overwrites_in_place() {
        let mut m: Store<String, i32> = Store::new();
        assert_eq!(m.insert("dup".to_string(), 1), None);
        let h = m.find("dup").unwrap();
        assert_eq!(m.insert("dup".to_string(), 2), Some(1));
        assert_eq!(m.len(), 1);
        assert_eq!(m.find("dup"), Some(h));
        assert_eq!(m.get("dup"), Some(&2));
    }

    /// Invariant: `find(k).is_some() == contains_key(k)` for present/absent keys.
    #[test]
    fn find_contains_parity() {
        let mut m: Store<String, i32> = Store::new();
        let present = ["a", "b", "c"];
        for (i, k) in present.iter().enumerate() {
            m.insert((*k).to_string(), i as i32);
        }

        for k in present {
            assert!(m.find(k).is_some());
            assert!(m.contains_key(k));
        }
        for k in ["x", "y", "z"] {
            assert!(m.find(k).is_none());
            assert!(!m.contains_key(k));
        }
    }

    /// Invariant: a removed mapping's handle does not resolve, even after the
    /// freed slot is reused by a new mapping.
    #[test]
    fn stale_handle_does_not_alias_new_entry() {
        let mut m: Store<String, i32> = Store::new();
        m.insert("old".to_string(), 1);
        let h1 = m.find("old").unwrap();
        assert_eq!(m.remove(h1), Some(("old".to_string(), 1)));
        m.insert("new".to_string(), 2);
        let h2 = m.find("new").unwrap();
        assert_ne!(h1, h2, "handles must differ across generations");
        assert!(!m.contains_handle(h1));
        assert!(m.handle_entry(h1).is_none());
        assert_eq!(m.remove(h1), None);
    }

    /// Invariant: `remove_key` unlinks both the slot and the index entry.
    #[test]
    fn remove_key_then_reinsert() {
        let mut m: Store<&'static str, i32> = Store::new();
        m.insert("k", 1);
        assert_eq!(m.remove_key("k"), Some(("k", 1)));
        assert_eq!(m.remove_key("k"), None);
        assert!(m.is_empty());
        assert_eq!(m.insert("k", 2), None);
        assert_eq!(m.get("k"), Some(&2));
    }

    /// Invariant: `handles` and `iter` cover each live mapping exactly once.
    #[test]
    fn handles_cover_live_entries() {
        let mut m: Store<String, i32> = Store::new();
        for (i, k) in ["k1", "k2", "k3", "k4"].iter().enumerate() {
            m.insert((*k).to_string(), i as i32);
        }
        let _ = m.remove_key("k2");

        let via_handles: BTreeSet<String> = m
            .handles()
            .into_iter()
            .filter_map(|h| m.handle_entry(h).map(|(k, _)| k.clone()))
            .collect();
        let via_iter: BTreeSet<String> = m.iter().map(|(k, _)| k.clone()).collect();
        assert_eq!(via_handles, via_iter);
        assert_eq!(via_handles.len(), 3);
        assert!(!via_handles.contains("k2"));
    }

    /// Invariant: `clear` drops every mapping and invalidates every handle.
    #[test]
    fn clear_invalidates_handles() {
        let mut m: Store<u32, u32> = Store::new();
        for i in 0..16 {
            m.insert(i, i * 10);
        }
        let hs = m.handles();
        m.clear();
        assert!(m.is_empty());
        assert!(hs.iter().all(|&h| !m.contains_handle(h)));
        assert_eq!(m.get(&3), None);
    }

    /// Invariant: lookups work under heavy hash collisions.
    #[test]
    fn collision_handling_with_const_hasher() {
        #[derive(Clone, Default)]
        struct ConstBuildHasher;
        struct ConstHasher;
        impl BuildHasher for ConstBuildHasher {
            type Hasher = ConstHasher;
            fn build_hasher(&self) -> Self::Hasher {
                ConstHasher
            }
        }
        impl core::hash::Hasher for ConstHasher {
            fn write(&mut self, _bytes: &[u8]) {}
            fn finish(&self) -> u64 {
                0
            }
        }

        let mut m: Store<String, i32, ConstBuildHasher> = Store::with_hasher(ConstBuildHasher);
        m.insert("a".to_string(), 1);
        m.insert("b".to_string(), 2);
        assert_eq!(m.insert("a".to_string(), 3), Some(1));

        assert_eq!(m.get("a"), Some(&3));
        assert_eq!(m.get("b"), Some(&2));
        assert_eq!(m.remove_key("a"), Some(("a".to_string(), 3)));
        assert_eq!(m.get("b"), Some(&2));
        assert_eq!(m.len(), 1);
    }
}
