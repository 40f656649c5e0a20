use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Points awarded per recomputed finishing position for one session type.
/// Positions beyond the table score zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PointsTable(BTreeMap<u32, f64>);

impl PointsTable {
    pub fn new(table: BTreeMap<u32, f64>) -> Self {
        PointsTable(table)
    }

    /// Standard race points: top ten score, 25 for the win.
    pub fn race_default() -> Self {
        let table = [
            (1, 25.0),
            (2, 18.0),
            (3, 15.0),
            (4, 12.0),
            (5, 10.0),
            (6, 8.0),
            (7, 6.0),
            (8, 4.0),
            (9, 2.0),
            (10, 1.0),
        ];
        PointsTable(table.into_iter().collect())
    }

    /// Standard sprint points: top eight score, 8 for the win.
    pub fn sprint_default() -> Self {
        let table = [
            (1, 8.0),
            (2, 7.0),
            (3, 6.0),
            (4, 5.0),
            (5, 4.0),
            (6, 3.0),
            (7, 2.0),
            (8, 1.0),
        ];
        PointsTable(table.into_iter().collect())
    }

    /// Points for a recomputed position, zero outside the table.
    pub fn points_for(&self, position: u32) -> f64 {
        self.0.get(&position).copied().unwrap_or(0.0)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Entries in ascending position order
    pub fn iter(&self) -> impl Iterator<Item = (u32, f64)> + '_ {
        self.0.iter().map(|(position, points)| (*position, *points))
    }
}
