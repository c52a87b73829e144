//! View: one base type for the key, value and entry projections of a map.
//!
//! A `View` is a borrowed handle onto its `MapAdapter` plus a zero-sized
//! projection strategy. It owns no elements; size, membership and
//! iteration are recomputed from the map on every call, and removals go
//! straight to the map.

use crate::contract::{hash_code, HCollection, HEntry, HIterator, HSet, Kind};
use crate::cursor::Cursor;
use crate::entry::Entry;
use crate::error::{Error, Result};
use crate::map_adapter::MapAdapter;
use core::fmt;
use core::hash::{BuildHasher, Hash};
use core::marker::PhantomData;
use std::collections::hash_map::RandomState;

/// How a cursor turns one stored mapping into a view element.
pub trait Project<'a, K, V, S> {
    type Item;
    fn project(map: &'a MapAdapter<K, V, S>, key: &K, value: &V) -> Self::Item;
}

/// Project each mapping to its key.
#[derive(Copy, Clone, Debug)]
pub struct ByKey;

/// Project each mapping to its value.
#[derive(Copy, Clone, Debug)]
pub struct ByValue;

/// Project each mapping to a live `Entry` proxy.
#[derive(Copy, Clone, Debug)]
pub struct ByEntry;

impl<'a, K: Clone, V, S> Project<'a, K, V, S> for ByKey {
    type Item = K;
    fn project(_map: &'a MapAdapter<K, V, S>, key: &K, _value: &V) -> K {
        key.clone()
    }
}

impl<'a, K, V: Clone, S> Project<'a, K, V, S> for ByValue {
    type Item = V;
    fn project(_map: &'a MapAdapter<K, V, S>, _key: &K, value: &V) -> V {
        value.clone()
    }
}

impl<'a, K, V, S> Project<'a, K, V, S> for ByEntry
where
    K: Clone + 'a,
    V: 'a,
    S: 'a,
{
    type Item = Entry<'a, K, V, S>;
    fn project(map: &'a MapAdapter<K, V, S>, key: &K, _value: &V) -> Entry<'a, K, V, S> {
        Entry::new(map, key.clone())
    }
}

/// Live projection of a `MapAdapter`.
pub struct View<'a, K, V, S, P> {
    map: &'a MapAdapter<K, V, S>,
    _strategy: PhantomData<P>,
}

/// Set of the map's keys.
pub type KeySet<'a, K, V, S = RandomState> = View<'a, K, V, S, ByKey>;
/// Collection of the map's values; duplicates allowed.
pub type ValueCollection<'a, K, V, S = RandomState> = View<'a, K, V, S, ByValue>;
/// Set of the map's mappings as `Entry` proxies.
pub type EntrySet<'a, K, V, S = RandomState> = View<'a, K, V, S, ByEntry>;

impl<'a, K, V, S, P> Clone for View<'a, K, V, S, P> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<'a, K, V, S, P> Copy for View<'a, K, V, S, P> {}

impl<'a, K, V, S, P> View<'a, K, V, S, P>
where
    K: Eq + Hash + Clone,
    V: Eq + Hash + Clone,
    S: BuildHasher + Clone + Default,
    P: Project<'a, K, V, S>,
{
    pub(crate) fn new(map: &'a MapAdapter<K, V, S>) -> Self {
        Self {
            map,
            _strategy: PhantomData,
        }
    }

    /// The map this view projects.
    pub fn map(&self) -> &'a MapAdapter<K, V, S> {
        self.map
    }

    fn cursor(&self) -> Cursor<'a, K, V, S, P> {
        Cursor::new(self.map)
    }
}

impl<'a, K, V, S> HCollection for KeySet<'a, K, V, S>
where
    K: Eq + Hash + Clone,
    V: Eq + Hash + Clone,
    S: BuildHasher + Clone + Default,
{
    type Item = K;
    type Iter<'c>
        = Cursor<'a, K, V, S, ByKey>
    where
        Self: 'c;

    const KIND: Kind = Kind::Set;

    fn size(&self) -> usize {
        self.map.size()
    }

    fn contains(&self, key: &K) -> bool {
        self.map.contains_key(key)
    }

    fn iterator(&self) -> Self::Iter<'_> {
        self.cursor()
    }

    fn add(&self, _key: K) -> Result<bool> {
        Err(Error::Unsupported)
    }

    fn remove(&self, key: &K) -> bool {
        self.map.remove(key).is_some()
    }

    fn add_all<C>(&self, _c: &C) -> Result<bool>
    where
        C: HCollection<Item = K> + ?Sized,
    {
        Err(Error::Unsupported)
    }

    fn remove_all<C>(&self, c: &C) -> bool
    where
        C: HCollection<Item = K> + ?Sized,
    {
        let mut modified = false;
        let mut it = c.iterator();
        while let Ok(key) = it.next() {
            if self.map.remove(&key).is_some() {
                modified = true;
            }
        }
        modified
    }

    fn clear(&self) {
        self.map.clear()
    }

    fn equals<C>(&self, other: &C) -> bool
    where
        C: HCollection<Item = K> + ?Sized,
    {
        C::KIND == Kind::Set && self.map.size() == other.size() && self.contains_all(other)
    }

    fn hash_code(&self) -> u64 {
        self.map
            .store()
            .iter()
            .fold(0u64, |acc, (k, _)| acc.wrapping_add(hash_code(k)))
    }
}

impl<'a, K, V, S> HSet for KeySet<'a, K, V, S>
where
    K: Eq + Hash + Clone,
    V: Eq + Hash + Clone,
    S: BuildHasher + Clone + Default,
{
}

impl<'a, K, V, S> HCollection for ValueCollection<'a, K, V, S>
where
    K: Eq + Hash + Clone,
    V: Eq + Hash + Clone,
    S: BuildHasher + Clone + Default,
{
    type Item = V;
    type Iter<'c>
        = Cursor<'a, K, V, S, ByValue>
    where
        Self: 'c;

    const KIND: Kind = Kind::Bag;

    fn size(&self) -> usize {
        self.map.size()
    }

    fn contains(&self, value: &V) -> bool {
        self.map.contains_value(value)
    }

    fn iterator(&self) -> Self::Iter<'_> {
        self.cursor()
    }

    fn add(&self, _value: V) -> Result<bool> {
        Err(Error::Unsupported)
    }

    /// Remove the first mapping, in key enumeration order, holding `value`.
    /// Other mappings with the same value stay.
    fn remove(&self, value: &V) -> bool {
        let mut keys: Cursor<'a, K, V, S, ByKey> = Cursor::new(self.map);
        while let Ok(key) = keys.next() {
            if self.map.get(&key).as_ref() == Some(value) {
                return keys.remove().is_ok();
            }
        }
        false
    }

    fn add_all<C>(&self, _c: &C) -> Result<bool>
    where
        C: HCollection<Item = V> + ?Sized,
    {
        Err(Error::Unsupported)
    }

    /// Remove every occurrence of every element of `c`.
    fn remove_all<C>(&self, c: &C) -> bool
    where
        C: HCollection<Item = V> + ?Sized,
    {
        let mut modified = false;
        let mut it = c.iterator();
        while let Ok(value) = it.next() {
            while self.remove(&value) {
                modified = true;
            }
        }
        modified
    }

    fn clear(&self) {
        self.map.clear()
    }

    /// Multiset comparison against another non-set collection.
    fn equals<C>(&self, other: &C) -> bool
    where
        C: HCollection<Item = V> + ?Sized,
    {
        if C::KIND != Kind::Bag || self.map.size() != other.size() {
            return false;
        }
        let mut tally: hashbrown::HashMap<V, usize> = hashbrown::HashMap::new();
        for (_, v) in self.map.store().iter() {
            *tally.entry(v.clone()).or_insert(0) += 1;
        }
        let mut it = other.iterator();
        while let Ok(v) = it.next() {
            match tally.get_mut(&v) {
                Some(n) if *n > 0 => *n -= 1,
                _ => return false,
            }
        }
        true
    }

    fn hash_code(&self) -> u64 {
        self.map
            .store()
            .iter()
            .fold(0u64, |acc, (_, v)| acc.wrapping_add(hash_code(v)))
    }
}

impl<'a, K, V, S> EntrySet<'a, K, V, S>
where
    K: Eq + Hash + Clone,
    V: Eq + Hash + Clone,
    S: BuildHasher + Clone + Default,
{
    /// True iff the map holds `e`'s key mapped to a value equal to `e`'s.
    pub fn contains_entry<E>(&self, e: &E) -> bool
    where
        E: HEntry<K, V> + ?Sized,
    {
        match (self.map.get(e.key()), e.value()) {
            (Some(ours), Some(theirs)) => ours == theirs,
            _ => false,
        }
    }

    /// Remove `e`'s mapping if the map holds exactly that pairing.
    pub fn remove_entry<E>(&self, e: &E) -> bool
    where
        E: HEntry<K, V> + ?Sized,
    {
        self.contains_entry(e) && self.map.remove(e.key()).is_some()
    }

    /// Set equality against any collection of entries, whatever map
    /// type they come from.
    pub fn equals_entries<C>(&self, other: &C) -> bool
    where
        C: HCollection + ?Sized,
        C::Item: HEntry<K, V>,
    {
        if C::KIND != Kind::Set || self.map.size() != other.size() {
            return false;
        }
        let mut it = other.iterator();
        while let Ok(e) = it.next() {
            if !self.contains_entry(&e) {
                return false;
            }
        }
        true
    }
}

impl<'a, K, V, S> HCollection for EntrySet<'a, K, V, S>
where
    K: Eq + Hash + Clone,
    V: Eq + Hash + Clone,
    S: BuildHasher + Clone + Default,
{
    type Item = Entry<'a, K, V, S>;
    type Iter<'c>
        = Cursor<'a, K, V, S, ByEntry>
    where
        Self: 'c;

    const KIND: Kind = Kind::Set;

    fn size(&self) -> usize {
        self.map.size()
    }

    fn contains(&self, e: &Entry<'a, K, V, S>) -> bool {
        self.contains_entry(e)
    }

    fn iterator(&self) -> Self::Iter<'_> {
        self.cursor()
    }

    fn add(&self, _e: Entry<'a, K, V, S>) -> Result<bool> {
        Err(Error::Unsupported)
    }

    fn remove(&self, e: &Entry<'a, K, V, S>) -> bool {
        self.remove_entry(e)
    }

    fn add_all<C>(&self, _c: &C) -> Result<bool>
    where
        C: HCollection<Item = Entry<'a, K, V, S>> + ?Sized,
    {
        Err(Error::Unsupported)
    }

    fn remove_all<C>(&self, c: &C) -> bool
    where
        C: HCollection<Item = Entry<'a, K, V, S>> + ?Sized,
    {
        let mut modified = false;
        let mut it = c.iterator();
        while let Ok(e) = it.next() {
            if self.remove_entry(&e) {
                modified = true;
            }
        }
        modified
    }

    fn clear(&self) {
        self.map.clear()
    }

    fn equals<C>(&self, other: &C) -> bool
    where
        C: HCollection<Item = Entry<'a, K, V, S>> + ?Sized,
    {
        self.equals_entries(other)
    }

    fn hash_code(&self) -> u64 {
        self.map.store().iter().fold(0u64, |acc, (k, v)| {
            acc.wrapping_add(hash_code(k) ^ hash_code(v))
        })
    }
}

impl<'a, K, V, S> HSet for EntrySet<'a, K, V, S>
where
    K: Eq + Hash + Clone,
    V: Eq + Hash + Clone,
    S: BuildHasher + Clone + Default,
{
}

impl<'a, K, V, S, P> fmt::Display for View<'a, K, V, S, P>
where
    K: Eq + Hash + Clone,
    V: Eq + Hash + Clone,
    S: BuildHasher + Clone + Default,
    P: Project<'a, K, V, S>,
    P::Item: fmt::Display,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        let mut it = self.cursor();
        let mut first = true;
        while let Ok(item) = it.next() {
            if !first {
                f.write_str(", ")?;
            }
            first = false;
            write!(f, "{}", item)?;
        }
        f.write_str("]")
    }
}

impl<'a, K, V, S, P> fmt::Debug for View<'a, K, V, S, P>
where
    K: Eq + Hash + Clone,
    V: Eq + Hash + Clone,
    S: BuildHasher + Clone + Default,
    P: Project<'a, K, V, S>,
    P::Item: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.cursor().items()).finish()
    }
}
