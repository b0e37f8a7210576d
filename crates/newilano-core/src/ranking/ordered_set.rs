use std::collections::HashSet;
use std::hash::Hash;

/// Insertion-ordered collection that admits each key at most once.
///
/// Values keep the order of their first successful insert; later inserts of
/// a key already present are ignored.
#[derive(Debug, Clone)]
pub struct OrderedSet<K, V> {
    entries: Vec<(K, V)>,
    seen: HashSet<K>,
}

impl<K, V> Default for OrderedSet<K, V> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            seen: HashSet::new(),
        }
    }
}

impl<K, V> OrderedSet<K, V>
where
    K: Eq + Hash + Clone,
{
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `value` under `key`. Returns `false` if the key was already present.
    pub fn insert(&mut self, key: K, value: V) -> bool {
        if !self.seen.insert(key.clone()) {
            return false;
        }
        self.entries.push((key, value));
        true
    }

    #[must_use]
    pub fn contains(&self, key: &K) -> bool {
        self.seen.contains(key)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Keys in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.entries.iter().map(|(k, _)| k)
    }

    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.entries.iter().map(|(_, v)| v)
    }

    /// Inserts from `items` until the set holds `limit` entries or `items` runs out.
    pub fn fill<I, F>(&mut self, items: I, limit: usize, key_of: F)
    where
        I: IntoIterator<Item = V>,
        F: Fn(&V) -> K,
    {
        for item in items {
            if self.len() >= limit {
                break;
            }
            let key = key_of(&item);
            self.insert(key, item);
        }
    }

    #[must_use]
    pub fn into_values(self) -> Vec<V> {
        self.entries.into_iter().map(|(_, v)| v).collect()
    }
}
