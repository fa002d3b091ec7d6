//! Order-preserving grouping of records by a derived key.
//!
//! One grouping implementation is shared by calorie imputation, the user
//! statistics and the daily rankings so that the "first in current row
//! order" tie-break semantics live in exactly one place.

use std::collections::HashMap;
use std::hash::Hash;

use aggregator_core::models::Record;

/// Group record indices by a derived key.
///
/// Keys appear in first-appearance order and each group keeps the original
/// record order. Records for which `key_fn` returns `None` are skipped
/// silently.
pub fn group_records_by<K, F>(records: &[Record], key_fn: F) -> Vec<(K, Vec<usize>)>
where
    K: Eq + Hash + Clone,
    F: FnMut(&Record) -> Option<K>,
{
    let all: Vec<usize> = (0..records.len()).collect();
    group_subset_by(records, &all, key_fn)
}

/// Group a subset of record indices by a derived key, with the same
/// ordering guarantees as [`group_records_by`].
pub fn group_subset_by<K, F>(
    records: &[Record],
    indices: &[usize],
    mut key_fn: F,
) -> Vec<(K, Vec<usize>)>
where
    K: Eq + Hash + Clone,
    F: FnMut(&Record) -> Option<K>,
{
    let mut groups: Vec<(K, Vec<usize>)> = Vec::new();
    let mut slots: HashMap<K, usize> = HashMap::new();

    for &i in indices {
        let Some(key) = key_fn(&records[i]) else {
            continue;
        };
        match slots.get(&key) {
            Some(&slot) => groups[slot].1.push(i),
            None => {
                slots.insert(key.clone(), groups.len());
                groups.push((key, vec![i]));
            }
        }
    }

    groups
}

// ── Tests ─────────────────────────────────────────────────────────────────────
