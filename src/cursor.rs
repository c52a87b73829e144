//! Cursor: the shared iterator behind all three views.
//!
//! A cursor remembers the handles that were live when it was created and
//! resolves them one at a time, so keys, values and entries are always
//! read from the store at the moment `next` runs. Handles whose mapping
//! has since disappeared are skipped; mappings added after creation are
//! not visited.

use crate::contract::HIterator;
use crate::error::{Error, Result};
use crate::map_adapter::MapAdapter;
use crate::store::Handle;
use crate::view::Project;
use core::hash::{BuildHasher, Hash};
use core::marker::PhantomData;

/// Removal slot of a cursor.
#[derive(Debug)]
enum Position {
    /// No `next` yet.
    Fresh,
    /// `next` returned the mapping at this handle; one `remove` allowed.
    Removable(Handle),
    /// The last returned mapping was already removed.
    Consumed,
}

/// Cursor over one view of a `MapAdapter`, yielding `P::Item`.
pub struct Cursor<'a, K, V, S, P> {
    map: &'a MapAdapter<K, V, S>,
    handles: Vec<Handle>,
    next: usize,
    position: Position,
    _strategy: PhantomData<P>,
}

impl<'a, K, V, S, P> Cursor<'a, K, V, S, P>
where
    K: Eq + Hash + Clone,
    V: Eq + Hash + Clone,
    S: BuildHasher + Clone + Default,
{
    pub(crate) fn new(map: &'a MapAdapter<K, V, S>) -> Self {
        Self {
            map,
            handles: map.store().handles(),
            next: 0,
            position: Position::Fresh,
            _strategy: PhantomData,
        }
    }
}

impl<'a, K, V, S, P> HIterator for Cursor<'a, K, V, S, P>
where
    K: Eq + Hash + Clone,
    V: Eq + Hash + Clone,
    S: BuildHasher + Clone + Default,
    P: Project<'a, K, V, S>,
{
    type Item = P::Item;

    fn has_next(&self) -> bool {
        let store = self.map.store();
        self.handles[self.next..]
            .iter()
            .any(|&h| store.contains_handle(h))
    }

    fn next(&mut self) -> Result<Self::Item> {
        let map = self.map;
        let store = map.store();
        while let Some(&h) = self.handles.get(self.next) {
            self.next += 1;
            if let Some((key, value)) = store.handle_entry(h) {
                let item = P::project(map, key, value);
                self.position = Position::Removable(h);
                return Ok(item);
            }
        }
        Err(Error::Exhausted)
    }

    fn remove(&mut self) -> Result<()> {
        match core::mem::replace(&mut self.position, Position::Consumed) {
            Position::Removable(h) => {
                log::trace!("cursor removing its last returned mapping");
                let _ = self.map.remove_handle(h);
                Ok(())
            }
            Position::Fresh => {
                self.position = Position::Fresh;
                Err(Error::InvalidState)
            }
            Position::Consumed => Err(Error::InvalidState),
        }
    }
}
