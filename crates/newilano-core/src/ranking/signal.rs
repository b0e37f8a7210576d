//! Counting passes over favorite signals.

use std::collections::HashMap;
use std::hash::Hash;

use crate::products::Product;

/// Occurrence count per key.
pub fn count_signals<K, I>(keys: I) -> HashMap<K, u64>
where
    K: Eq + Hash,
    I: IntoIterator<Item = K>,
{
    let mut counts = HashMap::new();
    for key in keys {
        *counts.entry(key).or_insert(0_u64) += 1;
    }
    counts
}

/// The `n` highest counts, descending. Equal counts are ordered by ascending key
/// so the cut-off at `n` does not depend on hash iteration order.
pub fn top_candidates<K: Ord>(counts: HashMap<K, u64>, n: usize) -> Vec<(K, u64)> {
    let mut ranked: Vec<(K, u64)> = counts.into_iter().collect();
    ranked.sort_by(|(key_a, count_a), (key_b, count_b)| {
        count_b.cmp(count_a).then_with(|| key_a.cmp(key_b))
    });
    ranked.truncate(n);
    ranked
}

/// Orders resolved products by candidate count (descending), then newest first.
///
/// Products whose key is not a candidate are dropped. Remaining ties keep
/// candidate order.
pub fn order_resolved<K, F>(candidates: &[(K, u64)], products: Vec<Product>, key_of: F) -> Vec<Product>
where
    K: Eq + Hash,
    F: Fn(&Product) -> K,
{
    let positions: HashMap<&K, (usize, u64)> = candidates
        .iter()
        .enumerate()
        .map(|(index, (key, count))| (key, (index, *count)))
        .collect();

    let mut resolved: Vec<(usize, u64, Product)> = products
        .into_iter()
        .filter_map(|product| {
            let key = key_of(&product);
            positions
                .get(&key)
                .map(|&(index, count)| (index, count, product))
        })
        .collect();

    resolved.sort_by(|(index_a, count_a, a), (index_b, count_b, b)| {
        count_b
            .cmp(count_a)
            .then_with(|| b.created_at.cmp(&a.created_at))
            .then_with(|| index_a.cmp(index_b))
    });

    resolved.into_iter().map(|(_, _, product)| product).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_every_occurrence() {
        let counts = count_signals(["a", "b", "a", "c", "a", "b"]);
        assert_eq!(counts.get("a"), Some(&3));
        assert_eq!(counts.get("b"), Some(&2));
        assert_eq!(counts.get("c"), Some(&1));
    }

    #[test]
    fn top_candidates_breaks_ties_by_key() {
        let counts = count_signals(["zeta", "alpha", "mid", "mid", "beta"]);
        let top = top_candidates(counts, 3);
        assert_eq!(
            top,
            vec![("mid", 2), ("alpha", 1), ("beta", 1)],
            "ties below the leader must be cut in key order"
        );
    }

    #[test]
    fn top_candidates_of_empty_counts_is_empty() {
        let counts: HashMap<String, u64> = HashMap::new();
        assert!(top_candidates(counts, 4).is_empty());
    }
}
