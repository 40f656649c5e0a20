use std::cmp::Ordering;

use super::countback::count_for;
use super::types::{DriverStanding, TeamStanding};

/// Sort-key access shared by the driver and team tables. The comparator
/// never reads sprint counts: ties are broken on race results alone, the
/// sprint columns are informational.
pub trait TableRank {
    fn season_points(&self) -> f64;
    fn race_count(&self, position: u32) -> u32;
    fn display_name(&self) -> &str;
}

impl TableRank for DriverStanding {
    fn season_points(&self) -> f64 {
        self.points
    }

    fn race_count(&self, position: u32) -> u32 {
        count_for(&self.race_countback, position)
    }

    fn display_name(&self) -> &str {
        &self.name
    }
}

impl TableRank for TeamStanding {
    fn season_points(&self) -> f64 {
        self.points
    }

    fn race_count(&self, position: u32) -> u32 {
        count_for(&self.race_countback, position)
    }

    fn display_name(&self) -> &str {
        &self.team
    }
}

/// Order two standings rows: points descending, then countback (more of the
/// better race position wins, walking `race_positions` best-first), then
/// display name ascending as the final, total tiebreak.
pub fn compare<T: TableRank>(a: &T, b: &T, race_positions: &[u32]) -> Ordering {
    let by_points = b
        .season_points()
        .partial_cmp(&a.season_points())
        .unwrap_or(Ordering::Equal);
    if by_points != Ordering::Equal {
        return by_points;
    }

    for &position in race_positions {
        let by_count = b.race_count(position).cmp(&a.race_count(position));
        if by_count != Ordering::Equal {
            return by_count;
        }
    }

    a.display_name().cmp(b.display_name())
}

pub fn sort_table<T: TableRank>(rows: &mut [T], race_positions: &[u32]) {
    rows.sort_by(|a, b| compare(a, b, race_positions));
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn standing(name: &str, points: f64, race_counts: &[(u32, u32)]) -> DriverStanding {
        DriverStanding {
            code: name[..3.min(name.len())].to_uppercase(),
            name: name.to_string(),
            number: "0".to_string(),
            team: "Sauber".to_string(),
            points,
            race_countback: race_counts.iter().copied().collect(),
            sprint_countback: BTreeMap::new(),
        }
    }

    fn names(rows: &[DriverStanding]) -> Vec<&str> {
        rows.iter().map(|r| r.name.as_str()).collect()
    }

    #[test]
    fn test_points_descending_wins_first() {
        let mut rows = vec![
            standing("Gasly", 10.0, &[(1, 5)]),
            standing("Hulkenberg", 30.0, &[]),
        ];
        sort_table(&mut rows, &[1]);
        assert_eq!(names(&rows), vec!["Hulkenberg", "Gasly"]);
    }

    #[test]
    fn test_countback_breaks_points_tie() {
        // Equal points; Albon has two wins to Gasly's one
        let mut rows = vec![
            standing("Gasly", 40.0, &[(1, 1), (2, 3)]),
            standing("Albon", 40.0, &[(1, 2), (2, 1)]),
        ];
        sort_table(&mut rows, &[1, 2]);
        assert_eq!(names(&rows), vec!["Albon", "Gasly"]);
    }

    #[test]
    fn test_countback_walks_columns_best_position_first() {
        // Wins equal, so seconds decide
        let mut rows = vec![
            standing("Gasly", 40.0, &[(1, 1), (2, 1)]),
            standing("Albon", 40.0, &[(1, 1), (2, 2)]),
        ];
        sort_table(&mut rows, &[1, 2]);
        assert_eq!(names(&rows), vec!["Albon", "Gasly"]);
    }

    #[test]
    fn test_name_ascending_is_final_tiebreak() {
        let mut rows = vec![
            standing("Stroll", 0.0, &[]),
            standing("Albon", 0.0, &[]),
            standing("Gasly", 0.0, &[]),
        ];
        sort_table(&mut rows, &[]);
        assert_eq!(names(&rows), vec!["Albon", "Gasly", "Stroll"]);
    }

    #[test]
    fn test_missing_countback_cells_count_zero() {
        let mut rows = vec![
            standing("Gasly", 40.0, &[]),
            standing("Albon", 40.0, &[(3, 1)]),
        ];
        sort_table(&mut rows, &[1, 2, 3]);
        assert_eq!(names(&rows), vec!["Albon", "Gasly"]);
    }

    #[test]
    fn test_fractional_points_compare_cleanly() {
        let mut rows = vec![
            standing("Gasly", 20.0, &[]),
            standing("Albon", 20.5, &[]),
        ];
        sort_table(&mut rows, &[]);
        assert_eq!(names(&rows), vec!["Albon", "Gasly"]);
    }
}
