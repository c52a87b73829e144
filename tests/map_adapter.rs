// MapAdapter unit test suite.
//
// Core invariants exercised:
// - put/get/contains_key agree; put returns the prior value.
// - The copy constructor and Clone produce independent stores.
// - put_all overwrites on collision, is a no-op on itself and reports an
//   unresolvable source key as NullArgument.
// - Equality and hash codes derive from the entry set, across hashers.
use map_adapter::{Error, HCollection, HMap, MapAdapter};
use std::cell::Cell;
use std::collections::hash_map::DefaultHasher;
use std::hash::{BuildHasherDefault, Hash, Hasher};
use std::rc::Rc;

fn sample() -> MapAdapter<i32, String> {
    let m = MapAdapter::new();
    m.put(5, "noce".to_string());
    m.put(9, "mano".to_string());
    m.put(1, "sasso".to_string());
    m.put(0, "pippo".to_string());
    m
}

#[test]
fn put_then_get_and_contains() {
    let m = sample();
    assert_eq!(m.size(), 4);
    assert!(!m.is_empty());
    assert_eq!(m.get(&0), Some("pippo".to_string()));
    assert!(m.contains_key(&9));
    assert!(!m.contains_key(&42));
    assert_eq!(m.get(&42), None);
}

#[test]
fn put_returns_prior_value_and_overwrites() {
    let m = sample();
    assert_eq!(m.put(67, "pippo".to_string()), None);
    assert_eq!(m.put(0, "devil".to_string()), Some("pippo".to_string()));
    assert_eq!(m.get(&0), Some("devil".to_string()));
    assert_eq!(m.size(), 5);
}

#[test]
fn remove_returns_value_once() {
    let m = sample();
    assert_eq!(m.remove(&5), Some("noce".to_string()));
    assert_eq!(m.remove(&5), None);
    assert_eq!(m.size(), 3);
    assert!(!m.contains_key(&5));
}

#[test]
fn contains_value_scans_all_values() {
    let m = sample();
    assert!(m.contains_value(&"sasso".to_string()));
    assert!(!m.contains_value(&"albero".to_string()));
    m.remove(&1);
    assert!(!m.contains_value(&"sasso".to_string()));
}

#[test]
fn borrowed_lookup_with_str() {
    let m: MapAdapter<String, i32> = MapAdapter::new();
    m.put("hello".to_string(), 1);
    assert!(m.contains_key("hello"));
    assert_eq!(m.get("hello"), Some(1));
    assert_eq!(m.remove("hello"), Some(1));
    assert!(m.is_empty());
}

#[test]
fn clear_empties_map() {
    let m = sample();
    m.clear();
    assert_eq!(m.size(), 0);
    assert!(m.is_empty());
    m.clear();
    assert!(m.is_empty());
}

#[test]
fn copy_constructor_is_equal_and_independent() {
    let m = sample();
    let copy = MapAdapter::<i32, String>::from_map(&m).expect("consistent source");
    assert!(copy.equals(&m));
    assert_eq!(copy, m);

    m.put(100, "nuovo".to_string());
    m.put(5, "cambiato".to_string());
    assert_eq!(copy.size(), 4);
    assert_eq!(copy.get(&5), Some("noce".to_string()));

    copy.remove(&9);
    assert_eq!(m.get(&9), Some("mano".to_string()));
    assert_ne!(copy, m);
}

#[test]
fn clone_is_independent() {
    let m = sample();
    let c = m.clone();
    assert_eq!(c, m);
    c.clear();
    assert_eq!(m.size(), 4);
}

#[test]
fn put_all_overwrites_common_keys() {
    let m: MapAdapter<i32, &str> = MapAdapter::new();
    m.put(1, "uno");
    m.put(2, "due");
    let other: MapAdapter<i32, &str> = MapAdapter::new();
    other.put(1, "I");
    other.put(3, "III");

    m.put_all(&other).unwrap();
    assert_eq!(m.size(), 3);
    assert_eq!(m.get(&1), Some("I"));
    assert_eq!(m.get(&2), Some("due"));
    assert_eq!(m.get(&3), Some("III"));
    assert_eq!(other.size(), 2);
}

#[test]
fn put_all_with_self_is_noop() {
    let m = sample();
    m.put_all(&m).unwrap();
    assert_eq!(m.size(), 4);
    assert_eq!(m, sample());
}

#[test]
fn put_all_from_identical_map_keeps_contents() {
    let m = sample();
    m.put_all(&sample()).unwrap();
    assert_eq!(m, sample());
}

// Key whose equality breaks after insertion, so the source map enumerates
// a key that its own lookup can no longer resolve.
#[derive(Clone, Debug)]
struct Fickle {
    id: u32,
    broken: Rc<Cell<bool>>,
}

impl PartialEq for Fickle {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id && !self.broken.get()
    }
}
impl Eq for Fickle {}
impl Hash for Fickle {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

#[test]
fn put_all_reports_unresolvable_source_key() {
    let broken = Rc::new(Cell::new(false));
    let source: MapAdapter<Fickle, i32> = MapAdapter::new();
    source.put(
        Fickle {
            id: 7,
            broken: broken.clone(),
        },
        70,
    );
    broken.set(true);

    let dest: MapAdapter<Fickle, i32> = MapAdapter::new();
    assert_eq!(dest.put_all(&source), Err(Error::NullArgument));
    assert!(dest.is_empty());
    assert_eq!(
        MapAdapter::<Fickle, i32>::from_map(&source).err(),
        Some(Error::NullArgument)
    );
}

#[test]
fn equality_with_self_and_other_maps() {
    let m = sample();
    assert!(m.equals(&m));
    let other = sample();
    assert!(m.equals(&other));
    other.put(0, "diverso".to_string());
    assert!(!m.equals(&other));
    other.put(0, "pippo".to_string());
    other.put(2, "extra".to_string());
    assert!(!m.equals(&other));
}

#[test]
fn equality_and_hash_across_hashers() {
    type Fixed = BuildHasherDefault<DefaultHasher>;
    let a = sample();
    let b: MapAdapter<i32, String, Fixed> = MapAdapter::with_hasher(Fixed::default());
    for (k, v) in [(0, "pippo"), (1, "sasso"), (9, "mano"), (5, "noce")] {
        b.put(k, v.to_string());
    }
    assert_eq!(a, b);
    assert_eq!(a.hash_code(), b.hash_code());
}

#[test]
fn hash_code_tracks_entry_set() {
    let m = sample();
    let other = sample();
    assert_eq!(m.hash_code(), other.hash_code());
    assert_eq!(m.hash_code(), m.entry_set().hash_code());
    other.put(5, "diverso".to_string());
    assert_ne!(m.hash_code(), other.hash_code());

    let empty: MapAdapter<i32, String> = MapAdapter::new();
    assert_eq!(empty.hash_code(), 0);
}

#[test]
fn view_sizes_track_map_size() {
    let m = sample();
    let (k, v, e) = (m.key_set(), m.values(), m.entry_set());
    assert_eq!(k.size(), 4);
    assert_eq!(v.size(), 4);
    assert_eq!(e.size(), 4);
    m.put(11, "undici".to_string());
    m.remove(&0);
    m.remove(&1);
    assert_eq!(k.size(), m.size());
    assert_eq!(v.size(), m.size());
    assert_eq!(e.size(), m.size());
    assert_eq!(m.size(), 3);
}

#[test]
fn map_contract_through_trait() {
    fn exercise<M: HMap<u8, u8>>(m: &M) {
        assert_eq!(m.put(1, 10), None);
        assert_eq!(m.put(1, 11), Some(10));
        assert!(m.contains_key(&1));
        assert!(m.contains_value(&11));
        assert_eq!(m.get(&1), Some(11));
        assert_eq!(m.key_set().size(), 1);
        assert_eq!(m.values().size(), 1);
        assert_eq!(m.entry_set().size(), 1);
        assert_eq!(m.remove(&1), Some(11));
        assert!(m.is_empty());
    }
    let m: MapAdapter<u8, u8> = MapAdapter::new();
    exercise(&m);
}

#[test]
fn display_formats_mappings() {
    let m: MapAdapter<i32, &str> = MapAdapter::new();
    assert_eq!(m.to_string(), "{}");
    m.put(1, "uno");
    assert_eq!(m.to_string(), "{1: uno}");
    m.put(2, "due");
    let s = m.to_string();
    assert!(s == "{1: uno, 2: due}" || s == "{2: due, 1: uno}", "{}", s);
}

#[test]
fn from_iterator_collects_pairs() {
    let m: MapAdapter<&str, i32> = [("a", 1), ("b", 2), ("a", 3)].into_iter().collect();
    assert_eq!(m.size(), 2);
    assert_eq!(m.get("a"), Some(3));
}
