use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::standings::PointsTable;

/// Main configuration.
///
/// Every field has a default, so f1p5 runs without a config file at all.
/// A file only needs the fields it wants to change.
///
/// Example YAML:
/// ```yaml
/// excluded_teams:
///   - Mercedes
///   - Red Bull
///   - Ferrari
///   - McLaren
/// race_points:
///   1: 25.0
///   2: 18.0
///   3: 15.0
/// output_dir: Data
/// log_file: Logs/F1P5_Automation_Log.txt
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Teams removed before re-ranking. Matched exactly, case-sensitively,
    /// against the team names the API reports
    #[serde(default = "default_excluded_teams")]
    pub excluded_teams: Vec<String>,

    /// Points per recomputed position in races
    #[serde(default = "PointsTable::race_default")]
    pub race_points: PointsTable,

    /// Points per recomputed position in sprints
    #[serde(default = "PointsTable::sprint_default")]
    pub sprint_points: PointsTable,

    /// Directory the season CSVs are written to
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// Append-only log of export outcomes and skipped sessions
    #[serde(default = "default_log_file")]
    pub log_file: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            excluded_teams: default_excluded_teams(),
            race_points: PointsTable::race_default(),
            sprint_points: PointsTable::sprint_default(),
            output_dir: default_output_dir(),
            log_file: default_log_file(),
        }
    }
}

fn default_excluded_teams() -> Vec<String> {
    vec![
        "Mercedes".to_string(),
        "Red Bull".to_string(),
        "Ferrari".to_string(),
        "McLaren".to_string(),
    ]
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("Data")
}

fn default_log_file() -> PathBuf {
    PathBuf::from("Logs/F1P5_Automation_Log.txt")
}
