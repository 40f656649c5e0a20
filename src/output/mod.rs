pub mod csv;
pub mod formatter;

pub use csv::{
    driver_championship_csv, export_season, session_results_csv, team_championship_csv,
};
pub use formatter::{format_driver_table, format_team_table, should_use_colors};
