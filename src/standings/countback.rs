use std::collections::{BTreeMap, BTreeSet};

use super::types::{RankedRow, RankedSession};

/// Count how many times each identity took each recomputed position across
/// `sessions`. Returns the per-identity count maps plus the sorted union of
/// observed positions (these become the table columns). Only rows
/// classified as finishers are counted; DNFs hold a rank but no position.
pub fn position_counts<K: Ord>(
    sessions: &[RankedSession],
    key: impl Fn(&RankedRow) -> K,
) -> (BTreeMap<K, BTreeMap<u32, u32>>, Vec<u32>) {
    let mut counts: BTreeMap<K, BTreeMap<u32, u32>> = BTreeMap::new();
    let mut observed = BTreeSet::new();

    for session in sessions {
        for row in &session.rows {
            let Some(position) = row.scoring_position() else {
                continue;
            };
            observed.insert(position);
            *counts
                .entry(key(row))
                .or_default()
                .entry(position)
                .or_insert(0) += 1;
        }
    }

    (counts, observed.into_iter().collect())
}

/// One countback cell. Positions the identity never took count zero.
pub fn count_for(countback: &BTreeMap<u32, u32>, position: u32) -> u32 {
    countback.get(&position).copied().unwrap_or(0)
}
