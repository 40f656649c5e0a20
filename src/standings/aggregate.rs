use std::collections::BTreeMap;

use super::countback::position_counts;
use super::sort::sort_table;
use super::types::{DriverStanding, RankedRow, RankedSession, SeasonStandings, TeamStanding};

/// Grouping key for driver standings rows. The team is part of the key, so
/// a mid-season team switch yields one row per team.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
struct DriverKey {
    code: String,
    name: String,
    number: String,
    team: String,
}

fn driver_key(row: &RankedRow) -> DriverKey {
    DriverKey {
        code: row.result.driver_code.clone(),
        name: row.result.driver_name.clone(),
        number: row.result.driver_number.clone(),
        team: row.result.team.clone(),
    }
}

/// Build the season standings from ranked sessions.
///
/// Only rows with a recomputed outcome contribute; everything an excluded
/// team did is invisible here. Returns None when not a single eligible
/// record exists, so the caller can tell "nothing to score" apart from
/// "everyone scored zero" and fall back to another season.
pub fn build_season(
    season: u32,
    races: &[RankedSession],
    sprints: &[RankedSession],
) -> Option<SeasonStandings> {
    let mut driver_points: BTreeMap<DriverKey, f64> = BTreeMap::new();
    let mut team_points: BTreeMap<String, f64> = BTreeMap::new();
    let mut team_colors: BTreeMap<String, String> = BTreeMap::new();

    for session in races.iter().chain(sprints) {
        for row in &session.rows {
            let Some(p5) = row.p5.as_ref() else {
                continue;
            };
            *driver_points.entry(driver_key(row)).or_insert(0.0) += p5.points;
            *team_points.entry(row.result.team.clone()).or_insert(0.0) += p5.points;
            team_colors
                .entry(row.result.team.clone())
                .or_insert_with(|| row.result.team_color.clone());
        }
    }

    if driver_points.is_empty() {
        return None;
    }

    let (mut driver_race, race_positions) = position_counts(races, driver_key);
    let (mut driver_sprint, sprint_positions) = position_counts(sprints, driver_key);
    let (mut team_race, _) = position_counts(races, |row| row.result.team.clone());
    let (mut team_sprint, _) = position_counts(sprints, |row| row.result.team.clone());

    let mut drivers: Vec<DriverStanding> = driver_points
        .into_iter()
        .map(|(key, points)| DriverStanding {
            race_countback: driver_race.remove(&key).unwrap_or_default(),
            sprint_countback: driver_sprint.remove(&key).unwrap_or_default(),
            code: key.code,
            name: key.name,
            number: key.number,
            team: key.team,
            points,
        })
        .collect();

    let mut teams: Vec<TeamStanding> = team_points
        .into_iter()
        .map(|(team, points)| TeamStanding {
            color: team_colors.remove(&team).unwrap_or_default(),
            race_countback: team_race.remove(&team).unwrap_or_default(),
            sprint_countback: team_sprint.remove(&team).unwrap_or_default(),
            team,
            points,
        })
        .collect();

    sort_table(&mut drivers, &race_positions);
    sort_table(&mut teams, &race_positions);

    Some(SeasonStandings {
        season,
        drivers,
        teams,
        race_positions,
        sprint_positions,
    })
}
