//! Collection contracts: the map, collection, set, cursor and entry
//! interfaces that `MapAdapter` and its views implement.
//!
//! All mutating methods take `&self`; implementors are handles onto a
//! shared store rather than owners of their elements.

use crate::error::{Error, Result};
use core::hash::{BuildHasher, BuildHasherDefault, Hash};
use std::collections::hash_map::DefaultHasher;

/// Static tag that decides which equality a collection obeys.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Kind {
    /// No duplicates; equal when same size and mutually contained.
    Set,
    /// Duplicates allowed; equal when every element has the same multiplicity.
    Bag,
}

/// Hash code of a single element.
///
/// Uses a fixed-key hasher so that equal collections hash equally even
/// when their maps were built with different `BuildHasher`s.
pub fn hash_code<T>(t: &T) -> u64
where
    T: ?Sized + Hash,
{
    BuildHasherDefault::<DefaultHasher>::default().hash_one(t)
}

/// Cursor over a collection with one removal slot per step.
pub trait HIterator {
    type Item;

    /// True iff `next` would produce an element. Never advances.
    fn has_next(&self) -> bool;

    /// Advance and return the next element, or `Error::Exhausted`.
    fn next(&mut self) -> Result<Self::Item>;

    /// Remove the mapping behind the last element returned by `next`.
    /// Fails with `Error::InvalidState` unless `next` succeeded since
    /// construction or since the previous `remove`.
    fn remove(&mut self) -> Result<()>;

    /// Adapt this cursor into a std `Iterator`.
    fn items(self) -> Items<Self>
    where
        Self: Sized,
    {
        Items { cursor: self }
    }
}

/// `Iterator` adapter returned by [`HIterator::items`].
pub struct Items<C> {
    cursor: C,
}

impl<C> Items<C> {
    /// Recover the cursor, e.g. to `remove` the element just yielded.
    pub fn cursor_mut(&mut self) -> &mut C {
        &mut self.cursor
    }
}

impl<C: HIterator> Iterator for Items<C> {
    type Item = C::Item;
    fn next(&mut self) -> Option<Self::Item> {
        HIterator::next(&mut self.cursor).ok()
    }
}

/// A group of elements projected from a map.
pub trait HCollection {
    type Item;
    type Iter<'c>: HIterator<Item = Self::Item>
    where
        Self: 'c;

    const KIND: Kind;

    fn size(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.size() == 0
    }

    fn contains(&self, item: &Self::Item) -> bool;

    fn iterator(&self) -> Self::Iter<'_>;

    /// Fresh snapshot of the elements; mutating it never touches the map.
    fn to_array(&self) -> Vec<Self::Item> {
        let mut out = Vec::with_capacity(self.size());
        let mut it = self.iterator();
        while let Ok(item) = it.next() {
            out.push(item);
        }
        out
    }

    /// Copy the elements into `dest`, converting each to `U`.
    ///
    /// `dest` is reused when it has room for every element, with the
    /// slots past the last element cleared to `None`. Otherwise a new
    /// vector of exactly `size()` slots is returned. Nothing is written
    /// if any element fails to convert.
    fn to_array_into<U>(&self, mut dest: Vec<Option<U>>) -> Result<Vec<Option<U>>>
    where
        U: TryFrom<Self::Item>,
    {
        let converted = self
            .to_array()
            .into_iter()
            .map(|item| U::try_from(item).map_err(|_| Error::ArrayTypeMismatch))
            .collect::<Result<Vec<U>>>()?;
        if dest.len() < converted.len() {
            return Ok(converted.into_iter().map(Some).collect());
        }
        for slot in dest.iter_mut() {
            *slot = None;
        }
        for (slot, item) in dest.iter_mut().zip(converted) {
            *slot = Some(item);
        }
        Ok(dest)
    }

    /// Views cannot synthesize mappings; implementors return `Error::Unsupported`.
    fn add(&self, item: Self::Item) -> Result<bool>;

    fn remove(&self, item: &Self::Item) -> bool;

    /// True iff every element of `c` is contained here. Stops at the first miss.
    fn contains_all<C>(&self, c: &C) -> bool
    where
        C: HCollection<Item = Self::Item> + ?Sized,
    {
        let mut it = c.iterator();
        while let Ok(item) = it.next() {
            if !self.contains(&item) {
                return false;
            }
        }
        true
    }

    fn add_all<C>(&self, c: &C) -> Result<bool>
    where
        C: HCollection<Item = Self::Item> + ?Sized;

    fn remove_all<C>(&self, c: &C) -> bool
    where
        C: HCollection<Item = Self::Item> + ?Sized;

    /// Remove, through this collection's own cursor, every element that
    /// `c` does not contain.
    fn retain_all<C>(&self, c: &C) -> bool
    where
        C: HCollection<Item = Self::Item> + ?Sized,
    {
        let mut modified = false;
        let mut it = self.iterator();
        while let Ok(item) = it.next() {
            if !c.contains(&item) && it.remove().is_ok() {
                modified = true;
            }
        }
        modified
    }

    fn clear(&self);

    fn equals<C>(&self, other: &C) -> bool
    where
        C: HCollection<Item = Self::Item> + ?Sized;

    /// Sum of the element hash codes, one term per occurrence.
    fn hash_code(&self) -> u64;
}

/// A collection without duplicates. `KIND` must be `Kind::Set`.
pub trait HSet: HCollection {}

/// A single key/value pairing.
pub trait HEntry<K, V> {
    fn key(&self) -> &K;

    /// Current value, or `None` once the pairing no longer exists.
    fn value(&self) -> Option<V>;

    /// Store `value` for this key and return the previous value.
    fn set_value(&self, value: V) -> Option<V>;

    /// Equal when keys match and current values match.
    fn equals<E>(&self, other: &E) -> bool
    where
        E: HEntry<K, V> + ?Sized,
        K: PartialEq,
        V: PartialEq,
    {
        self.key() == other.key() && self.value() == other.value()
    }

    /// `hash(key) ^ hash(value)`, with 0 for an absent value.
    fn hash_code(&self) -> u64
    where
        K: Hash,
        V: Hash,
    {
        hash_code(self.key()) ^ self.value().map_or(0, |v| hash_code(&v))
    }
}

/// A store of unique keys, each mapped to exactly one value.
pub trait HMap<K, V> {
    type Entry<'m>: HEntry<K, V>
    where
        Self: 'm;
    type KeySet<'m>: HSet<Item = K>
    where
        Self: 'm;
    type Values<'m>: HCollection<Item = V>
    where
        Self: 'm;
    type EntrySet<'m>: HSet<Item = Self::Entry<'m>>
    where
        Self: 'm;

    fn size(&self) -> usize;
    fn is_empty(&self) -> bool;
    fn contains_key(&self, key: &K) -> bool;
    fn contains_value(&self, value: &V) -> bool;
    fn get(&self, key: &K) -> Option<V>;

    /// Map `key` to `value`, returning the previous value if any.
    fn put(&self, key: K, value: V) -> Option<V>;
    fn remove(&self, key: &K) -> Option<V>;

    /// Copy every mapping of `source`, overwriting on key collision.
    /// Not transactional: mappings copied before a failure remain.
    fn put_all<M>(&self, source: &M) -> Result<()>
    where
        M: HMap<K, V> + ?Sized;

    fn clear(&self);
    fn key_set(&self) -> Self::KeySet<'_>;
    fn values(&self) -> Self::Values<'_>;
    fn entry_set(&self) -> Self::EntrySet<'_>;

    fn equals<M>(&self, other: &M) -> bool
    where
        M: HMap<K, V> + ?Sized;

    fn hash_code(&self) -> u64;
}
