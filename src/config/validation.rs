use crate::standings::PointsTable;

use super::schema::Config;

/// Validate configuration at startup.
/// Returns all validation errors at once (not just the first).
pub fn validate_config(config: &Config) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    validate_points(&config.race_points, "race_points", &mut errors);
    validate_points(&config.sprint_points, "sprint_points", &mut errors);

    for (index, team) in config.excluded_teams.iter().enumerate() {
        if team.trim().is_empty() {
            errors.push(format!("excluded_teams[{}]: team name is blank", index));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn validate_points(table: &PointsTable, name: &str, errors: &mut Vec<String>) {
    if table.is_empty() {
        errors.push(format!("{}: points table is empty", name));
        return;
    }

    let mut previous: Option<(u32, f64)> = None;
    for (position, points) in table.iter() {
        if position == 0 {
            errors.push(format!("{}: position 0 is not a finishing position", name));
        }
        if points.is_nan() {
            errors.push(format!("{}[{}]: points must not be NaN", name, position));
        } else if points < 0.0 {
            errors.push(format!(
                "{}[{}]: points must be non-negative, got {}",
                name, position, points
            ));
        }
        // An absent position pays zero, so the keys must run 1..N
        match previous {
            None => {
                if position > 1 {
                    errors.push(format!(
                        "{}: positions must be contiguous from 1 (table starts at {})",
                        name, position
                    ));
                }
            }
            Some((better_position, better_points)) => {
                if position > better_position + 1 {
                    errors.push(format!(
                        "{}: positions must be contiguous from 1 (position {} is missing)",
                        name,
                        better_position + 1
                    ));
                }
                if points > better_points {
                    errors.push(format!(
                        "{}[{}]: {} points outranks position {} ({} points)",
                        name, position, points, better_position, better_points
                    ));
                }
            }
        }
        previous = Some((position, points));
    }
}
