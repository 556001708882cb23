use std::hash::Hash;

pub use fnv::{FnvHashMap, FnvHashSet};

/// Hash set with the FNV hasher, which is much faster than the default on short keys such as
/// coordinates.
pub fn fnv_hashset<T: Hash + Eq>(capacity: usize) -> FnvHashSet<T> {
    FnvHashSet::with_capacity_and_hasher(capacity, Default::default())
}

pub fn fnv_hashmap<K: Hash + Eq, V>(capacity: usize) -> FnvHashMap<K, V> {
    FnvHashMap::with_capacity_and_hasher(capacity, Default::default())
}
