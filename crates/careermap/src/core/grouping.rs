//! Pure grouping helper
//!
//! Stages group rows by path or position in several places; they all go
//! through `group_by`, which builds its association once and hands it back
//! read-only.

use std::collections::HashMap;
use std::hash::Hash;

/// Items grouped by key, keys kept in first-seen order
#[derive(Debug, Clone)]
pub struct Groups<K, T> {
    order: Vec<K>,
    members: HashMap<K, Vec<T>>,
}

impl<K: Eq + Hash + Clone, T> Groups<K, T> {
    pub fn get(&self, key: &K) -> &[T] {
        self.members.get(key).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn contains_key(&self, key: &K) -> bool {
        self.members.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.order.iter()
    }

    /// Groups in first-seen key order
    pub fn iter(&self) -> impl Iterator<Item = (&K, &[T])> {
        self.order
            .iter()
            .map(move |key| (key, self.members[key].as_slice()))
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

/// Group `items` by `key`, keeping item order inside each group
pub fn group_by<I, K, T, F>(items: I, key: F) -> Groups<K, T>
where
    I: IntoIterator<Item = T>,
    K: Eq + Hash + Clone,
    F: Fn(&T) -> K,
{
    let mut order = Vec::new();
    let mut members: HashMap<K, Vec<T>> = HashMap::new();
    for item in items {
        let k = key(&item);
        members
            .entry(k.clone())
            .or_insert_with(|| {
                order.push(k);
                Vec::new()
            })
            .push(item);
    }
    Groups { order, members }
}
