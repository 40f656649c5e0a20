use std::collections::BTreeMap;

/// Session kinds that award points. Each has its own points table and its
/// own countback column namespace in the exported tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SessionType {
    Race,
    Sprint,
}

impl SessionType {
    /// Lowercase label for log lines and error messages
    pub fn label(self) -> &'static str {
        match self {
            SessionType::Race => "race",
            SessionType::Sprint => "sprint",
        }
    }

    /// Prefix for this session type's countback columns ("RP1", "SP3", ...)
    pub fn countback_prefix(self) -> &'static str {
        match self {
            SessionType::Race => "RP",
            SessionType::Sprint => "SP",
        }
    }
}

/// Parse a classification string as a finishing position. Status codes such
/// as "R" (retired) or "D" (disqualified) are not positions and return None.
pub fn parse_position(classification: &str) -> Option<u32> {
    classification.parse().ok()
}

/// One entrant's outcome in one session, as reported by the timing provider.
#[derive(Debug, Clone)]
pub struct SessionResult {
    pub season: u32,
    pub round: u32,
    pub session: SessionType,
    pub event_name: String,     // race name with the trailing "Grand Prix" stripped
    pub driver_code: String,    // stable short code, e.g. "HUL"
    pub driver_name: String,
    pub driver_number: String,
    pub team: String,
    pub team_color: String,     // hex RGB without '#', carried into exports unchanged
    pub classification: String, // finishing position as text, or a status code
    pub finish_order: u32,      // classification order from the timing system
    pub official_points: f64,   // real-championship points, raw exports only
}

/// The recomputed outcome for one eligible entrant.
#[derive(Debug, Clone)]
pub struct P5Result {
    /// Dense 1..N rank among eligible entrants, in original finish order
    pub order: u32,
    /// The rank as text for classified finishers; the original status code
    /// otherwise (a DNF stays a DNF, rank or not)
    pub classification: String,
    pub points: f64,
}

/// A session row after re-ranking. `p5` is None for entrants on excluded
/// teams: they stay in the raw exports but contribute nothing to scoring.
#[derive(Debug, Clone)]
pub struct RankedRow {
    pub result: SessionResult,
    pub p5: Option<P5Result>,
}

impl RankedRow {
    /// The recomputed position, for rows that are both eligible and
    /// classified as finishers. Only these rows feed the countback.
    pub fn scoring_position(&self) -> Option<u32> {
        let p5 = self.p5.as_ref()?;
        parse_position(&p5.classification).map(|_| p5.order)
    }
}

/// One session's rows after re-ranking, in ascending original finish order.
#[derive(Debug, Clone)]
pub struct RankedSession {
    pub round: u32,
    pub session: SessionType,
    pub rows: Vec<RankedRow>,
}

/// Season standings row for one driver identity. The grouping key includes
/// the team: a driver who switches teams mid-season gets one row per team
/// rather than a silently merged identity.
#[derive(Debug, Clone, PartialEq)]
pub struct DriverStanding {
    pub code: String,
    pub name: String,
    pub number: String,
    pub team: String,
    pub points: f64,
    pub race_countback: BTreeMap<u32, u32>,
    pub sprint_countback: BTreeMap<u32, u32>,
}

/// Season standings row for one team.
#[derive(Debug, Clone, PartialEq)]
pub struct TeamStanding {
    pub team: String,
    pub color: String,
    pub points: f64,
    pub race_countback: BTreeMap<u32, u32>,
    pub sprint_countback: BTreeMap<u32, u32>,
}

/// The aggregated season: sorted standings plus the countback positions
/// observed per session type (ascending; exports zero-fill absent cells).
#[derive(Debug, Clone, PartialEq)]
pub struct SeasonStandings {
    pub season: u32,
    pub drivers: Vec<DriverStanding>,
    pub teams: Vec<TeamStanding>,
    pub race_positions: Vec<u32>,
    pub sprint_positions: Vec<u32>,
}

#[cfg(test)]
pub(crate) fn sample_result(
    round: u32,
    session: SessionType,
    code: &str,
    team: &str,
    classification: &str,
    finish_order: u32,
) -> SessionResult {
    SessionResult {
        season: 2026,
        round,
        session,
        event_name: "Australian".to_string(),
        driver_code: code.to_string(),
        driver_name: format!("{} Driver", code),
        // Stable across sessions, unlike the finish order
        driver_number: code.as_bytes().first().copied().unwrap_or(b'0').to_string(),
        team: team.to_string(),
        team_color: "52E252".to_string(),
        classification: classification.to_string(),
        finish_order,
        official_points: 0.0,
    }
}
