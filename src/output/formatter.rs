use std::io::IsTerminal;

use owo_colors::OwoColorize;
use terminal_size::{terminal_size, Width};

use crate::standings::SeasonStandings;

use super::csv::format_points;

/// Check if stdout is a TTY (for auto-detecting color support)
pub fn should_use_colors() -> bool {
    std::io::stdout().is_terminal()
}

/// Get terminal width, defaulting to None for pipes (unlimited)
fn get_terminal_width() -> Option<usize> {
    terminal_size().map(|(Width(w), _)| w as usize)
}

/// Parse a "RRGGBB" display colour. Returns None for anything that is not
/// six hex digits.
fn parse_hex_color(hex: &str) -> Option<(u8, u8, u8)> {
    let hex = hex.trim_start_matches('#');
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }
    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
    Some((r, g, b))
}

/// Truncate a cell to fit available width, accounting for Unicode
fn truncate_cell(cell: &str, max_width: usize) -> String {
    let chars: Vec<char> = cell.chars().collect();
    if chars.len() <= max_width {
        cell.to_string()
    } else if max_width > 3 {
        format!("{}...", chars[..max_width - 3].iter().collect::<String>())
    } else {
        chars[..max_width].iter().collect()
    }
}

fn colored_team(team: &str, hex: &str, use_colors: bool) -> String {
    if use_colors {
        if let Some((r, g, b)) = parse_hex_color(hex) {
            return team.truecolor(r, g, b).to_string();
        }
    }
    team.to_string()
}

/// Format the driver championship for the terminal.
/// Columns: index, points, driver name, team (in team colours on a TTY).
/// Index column: 3 chars (fits "99."), right-aligned.
/// Points column is right-aligned, 6 chars wide (fits "9999.5").
pub fn format_driver_table(standings: &SeasonStandings, use_colors: bool) -> String {
    if standings.drivers.is_empty() {
        return "No standings to show.".to_string();
    }

    let title = format!("F1P5 {} Driver Championship", standings.season);
    let name_width = standings
        .drivers
        .iter()
        .map(|driver| driver.name.chars().count())
        .max()
        .unwrap_or(0);
    let team_width = max_team_width(4 + 6 + 2 + name_width + 2);

    let mut lines = vec![if use_colors {
        title.bold().to_string()
    } else {
        title
    }];
    for (idx, driver) in standings.drivers.iter().enumerate() {
        let index_str = format!("{:>2}.", idx + 1);
        let points_str = format!("{:>6}", format_points(driver.points));
        let name_str = format!("{:<width$}", driver.name, width = name_width);
        let team = match team_width {
            Some(width) => truncate_cell(&driver.team, width),
            None => driver.team.clone(),
        };
        let color = standings
            .teams
            .iter()
            .find(|t| t.team == driver.team)
            .map(|t| t.color.as_str())
            .unwrap_or("");

        if use_colors {
            lines.push(format!(
                "{} {}  {}  {}",
                index_str.dimmed(),
                points_str.bold(),
                name_str,
                colored_team(&team, color, true)
            ));
        } else {
            lines.push(format!("{} {}  {}  {}", index_str, points_str, name_str, team));
        }
    }

    lines.join("\n")
}

/// Format the team championship for the terminal.
pub fn format_team_table(standings: &SeasonStandings, use_colors: bool) -> String {
    if standings.teams.is_empty() {
        return "No standings to show.".to_string();
    }

    let title = format!("F1P5 {} Team Championship", standings.season);
    let team_width = max_team_width(4 + 6 + 2);

    let mut lines = vec![if use_colors {
        title.bold().to_string()
    } else {
        title
    }];
    for (idx, team) in standings.teams.iter().enumerate() {
        let index_str = format!("{:>2}.", idx + 1);
        let points_str = format!("{:>6}", format_points(team.points));
        let name = match team_width {
            Some(width) => truncate_cell(&team.team, width),
            None => team.team.clone(),
        };

        if use_colors {
            lines.push(format!(
                "{} {}  {}",
                index_str.dimmed(),
                points_str.bold(),
                colored_team(&name, &team.color, true)
            ));
        } else {
            lines.push(format!("{} {}  {}", index_str, points_str, name));
        }
    }

    lines.join("\n")
}

/// Width left for the team cell once `fixed` columns are spoken for, or
/// None when stdout is not a terminal (no truncation in pipes).
fn max_team_width(fixed: usize) -> Option<usize> {
    let width = get_terminal_width()?;
    if width > fixed + 10 {
        Some(width - fixed)
    } else {
        Some(10)
    }
}
