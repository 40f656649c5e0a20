use std::fs;
use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use atomic_write_file::AtomicWriteFile;

use crate::fetch::SeasonData;
use crate::standings::{count_for, RankedSession, SeasonStandings};

/// Points formatted the way the exports have always carried them: whole
/// values keep one decimal ("25.0"); fractional values print as they are.
pub(crate) fn format_points(points: f64) -> String {
    if points.fract() == 0.0 {
        format!("{:.1}", points)
    } else {
        format!("{}", points)
    }
}

/// Quote a field when it needs it (comma, quote, or newline inside)
fn escape(field: &str) -> String {
    if field.contains(',') || field.contains('"') || field.contains('\n') {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

fn render_row(cells: &[String]) -> String {
    let mut line = cells
        .iter()
        .map(|cell| escape(cell))
        .collect::<Vec<_>>()
        .join(",");
    line.push('\n');
    line
}

fn render(header: Vec<String>, rows: Vec<Vec<String>>) -> String {
    let mut out = render_row(&header);
    for row in rows {
        out.push_str(&render_row(&row));
    }
    out
}

/// Countback column names for one session type, best position first
/// ("RP1", "RP2", ... / "SP1", ...)
fn countback_headers(prefix: &str, positions: &[u32]) -> Vec<String> {
    positions
        .iter()
        .map(|position| format!("{}{}", prefix, position))
        .collect()
}

fn countback_cells(
    countback: &std::collections::BTreeMap<u32, u32>,
    positions: &[u32],
) -> Vec<String> {
    positions
        .iter()
        .map(|position| count_for(countback, *position).to_string())
        .collect()
}

/// The driver championship table, one row per driver identity, already in
/// final order.
pub fn driver_championship_csv(standings: &SeasonStandings) -> String {
    let mut header: Vec<String> = ["Driver", "DriverName", "DriverNumber", "Team", "F1P5Points"]
        .iter()
        .map(|s| s.to_string())
        .collect();
    header.extend(countback_headers("RP", &standings.race_positions));
    header.extend(countback_headers("SP", &standings.sprint_positions));

    let rows = standings
        .drivers
        .iter()
        .map(|driver| {
            let mut row = vec![
                driver.code.clone(),
                driver.name.clone(),
                driver.number.clone(),
                driver.team.clone(),
                format_points(driver.points),
            ];
            row.extend(countback_cells(&driver.race_countback, &standings.race_positions));
            row.extend(countback_cells(&driver.sprint_countback, &standings.sprint_positions));
            row
        })
        .collect();

    render(header, rows)
}

/// The team championship table.
pub fn team_championship_csv(standings: &SeasonStandings) -> String {
    let mut header: Vec<String> = ["Team", "F1P5Points", "TeamColor"]
        .iter()
        .map(|s| s.to_string())
        .collect();
    header.extend(countback_headers("RP", &standings.race_positions));
    header.extend(countback_headers("SP", &standings.sprint_positions));

    let rows = standings
        .teams
        .iter()
        .map(|team| {
            let mut row = vec![
                team.team.clone(),
                format_points(team.points),
                team.color.clone(),
            ];
            row.extend(countback_cells(&team.race_countback, &standings.race_positions));
            row.extend(countback_cells(&team.sprint_countback, &standings.sprint_positions));
            row
        })
        .collect();

    render(header, rows)
}

/// The raw per-session table: every fetched entrant, original classification
/// next to the recomputed one. Entrants of excluded teams keep their session
/// row with the recomputed columns left blank.
pub fn session_results_csv(sessions: &[RankedSession]) -> String {
    let header: Vec<String> = [
        "EventName",
        "RoundNumber",
        "Driver",
        "DriverName",
        "DriverNumber",
        "Team",
        "TeamColor",
        "F1Class",
        "F1Order",
        "F1Points",
        "F1P5Order",
        "F1P5Class",
        "F1P5Points",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect();

    let rows = sessions
        .iter()
        .flat_map(|session| session.rows.iter())
        .map(|row| {
            let result = &row.result;
            let (p5_order, p5_class, p5_points) = match &row.p5 {
                Some(p5) => (
                    p5.order.to_string(),
                    p5.classification.clone(),
                    format_points(p5.points),
                ),
                None => (String::new(), String::new(), String::new()),
            };
            vec![
                result.event_name.clone(),
                result.round.to_string(),
                result.driver_code.clone(),
                result.driver_name.clone(),
                result.driver_number.clone(),
                result.team.clone(),
                result.team_color.clone(),
                result.classification.clone(),
                result.finish_order.to_string(),
                format_points(result.official_points),
                p5_order,
                p5_class,
                p5_points,
            ]
        })
        .collect();

    render(header, rows)
}

/// Replace `path` with `contents` atomically: a crashed run leaves the
/// previous export intact, never a half-written file.
fn write_table(path: &Path, contents: &str) -> Result<()> {
    let mut file = AtomicWriteFile::open(path)
        .with_context(|| format!("Failed to open {} for writing", path.display()))?;
    file.write_all(contents.as_bytes())
        .with_context(|| format!("Failed to write {}", path.display()))?;
    file.commit()
        .with_context(|| format!("Failed to commit {}", path.display()))?;
    Ok(())
}

/// Write the four season tables into `output_dir`, creating it if needed.
pub fn export_season(
    output_dir: &Path,
    standings: &SeasonStandings,
    data: &SeasonData,
) -> Result<()> {
    fs::create_dir_all(output_dir).with_context(|| {
        format!("Failed to create output directory at {}", output_dir.display())
    })?;

    let season = standings.season;
    write_table(
        &output_dir.join(format!("F1P5_{}_Driver_Championship.csv", season)),
        &driver_championship_csv(standings),
    )?;
    write_table(
        &output_dir.join(format!("F1P5_{}_Team_Championship.csv", season)),
        &team_championship_csv(standings),
    )?;
    write_table(
        &output_dir.join(format!("F1P5_{}_Race_Results.csv", season)),
        &session_results_csv(&data.races),
    )?;
    write_table(
        &output_dir.join(format!("F1P5_{}_Sprint_Results.csv", season)),
        &session_results_csv(&data.sprints),
    )?;

    Ok(())
}
