//! map-adapter: a single-threaded hash map with live key, value and
//! entry views that all read and mutate one shared store.
//!
//! Internal Design:
//!
//! Summary
//! - Goal: let callers manipulate one hash-keyed store through several
//!   interchangeable facades while every facade stays consistent with
//!   the others at all times.
//! - Layers:
//!   - Store<K, V, S>: structural map. A `hashbrown::HashTable` indexes a
//!     `slotmap` arena; generational handles name positions without
//!     borrowing.
//!   - MapAdapter<K, V, S>: the façade. Owns one Store behind a `RefCell`
//!     and exposes the map contract with `&self` methods.
//!   - View<'a, K, V, S, P>: one base type for the key, value and entry
//!     projections. `P` is a zero-sized strategy (`ByKey`, `ByValue`,
//!     `ByEntry`) that decides what an element is.
//!   - Cursor: shared iterator, a three-state machine over a handle
//!     snapshot with one removal slot per step.
//!   - Entry: proxy holding a key and a map reference, never a value.
//!
//! Constraints
//! - Single-threaded: `MapAdapter` is `!Sync` (interior `RefCell`).
//! - No null keys or values: keys and values are owned `K`/`V`; absence
//!   is `Option::None` on return.
//! - Views hold a borrow of the map, never a copy; their size, membership
//!   and contents are recomputed on every call.
//! - All mutation funnels through `MapAdapter::put`/`remove`.
//!
//! Consistency model
//! - Removing through any view or cursor removes exactly one mapping from
//!   the store, visible to every other view immediately.
//! - A cursor snapshots live handles on creation and resolves them on
//!   each `next`. Handles whose mapping vanished are skipped; mappings
//!   inserted later are not visited. Interleaving iteration with
//!   mutation from another channel is otherwise unspecified.
//! - An `Entry` whose key was removed elsewhere is detached: `value()` is
//!   `None`, and `set_value` reinserts the key (the underlying put is
//!   unconditional).
//!
//! Equality and hashing
//! - Collections carry a static `Kind`. Sets compare by size and
//!   containment; the value collection compares as a multiset and is
//!   never equal to a set.
//! - Element hash codes use a fixed-key hasher so equal maps hash equally
//!   regardless of their `BuildHasher`.
//!
//! Notes and non-goals
//! - No ordering guarantee between elements.
//! - No capacity tuning; growth is left to the store.
//! - `put_all` is not transactional.

mod contract;
mod cursor;
mod entry;
mod error;
mod map_adapter;
mod store;
mod store_proptest;
mod view;

// Public surface
pub use contract::{hash_code, HCollection, HEntry, HIterator, HMap, HSet, Items, Kind};
pub use cursor::Cursor;
pub use entry::Entry;
pub use error::{Error, Result};
pub use map_adapter::MapAdapter;
pub use view::{ByEntry, ByKey, ByValue, EntrySet, KeySet, Project, ValueCollection, View};
