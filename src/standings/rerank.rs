use std::collections::HashSet;

use thiserror::Error;

use super::points::PointsTable;
use super::types::{parse_position, P5Result, RankedRow, SessionResult};

/// A session whose results cannot be ranked. Callers skip the session and
/// carry on with the rest of the season.
#[derive(Debug, Error)]
pub enum MalformedSession {
    #[error("finish order {order} appears twice (held by {first} and {second})")]
    DuplicateFinishOrder {
        order: u32,
        first: String,
        second: String,
    },
}

/// Re-rank one session's classification with the excluded teams removed.
///
/// Every row is kept (raw exports carry ineligible entrants too), but only
/// entrants of non-excluded teams receive a recomputed outcome: a dense 1..N
/// rank in original finish order. Classified finishers take the rank as
/// their new classification and score from `table`; non-finishers keep
/// their status code and score zero. Team matching is exact and
/// case-sensitive.
pub fn rank_session(
    results: Vec<SessionResult>,
    excluded_teams: &HashSet<String>,
    table: &PointsTable,
) -> Result<Vec<RankedRow>, MalformedSession> {
    let mut ordered = results;
    // Stable, so equal finish orders keep their upstream row order and the
    // duplicate check below reports them in that order.
    ordered.sort_by_key(|result| result.finish_order);

    let mut rows = Vec::with_capacity(ordered.len());
    let mut rank = 0u32;
    let mut last_eligible: Option<(u32, String)> = None;

    for result in ordered {
        if excluded_teams.contains(&result.team) {
            rows.push(RankedRow { result, p5: None });
            continue;
        }

        if let Some((order, ref first)) = last_eligible {
            if order == result.finish_order {
                return Err(MalformedSession::DuplicateFinishOrder {
                    order,
                    first: first.clone(),
                    second: result.driver_code.clone(),
                });
            }
        }
        last_eligible = Some((result.finish_order, result.driver_code.clone()));

        rank += 1;
        let (classification, points) = match parse_position(&result.classification) {
            Some(_) => (rank.to_string(), table.points_for(rank)),
            None => (result.classification.clone(), 0.0),
        };

        rows.push(RankedRow {
            result,
            p5: Some(P5Result {
                order: rank,
                classification,
                points,
            }),
        });
    }

    Ok(rows)
}
