use serde::Deserialize;
use thiserror::Error;

use crate::standings::{SessionResult, SessionType};

use super::colors;

/// A failed attempt to retrieve or decode one API payload.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request for {url} failed: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{url} returned HTTP {status}")]
    Status { url: String, status: u16 },
    #[error("could not decode the response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("{context}: missing required field `{field}`")]
    MissingField { context: String, field: &'static str },
    #[error("{context}: invalid {field} `{value}`")]
    InvalidField {
        context: String,
        field: &'static str,
        value: String,
    },
}

impl FetchError {
    /// Field-level failures come from the data itself and will not improve
    /// on a retry; everything else is a transport problem.
    pub fn is_malformed(&self) -> bool {
        matches!(
            self,
            FetchError::MissingField { .. } | FetchError::InvalidField { .. }
        )
    }

    /// HTTP 429: the API wants us to slow down.
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, FetchError::Status { status: 429, .. })
    }
}

// Wire shapes. Jolpica keeps Ergast's MRData envelope, and every numeric
// field arrives as a string.

#[derive(Debug, Deserialize)]
pub(crate) struct ScheduleResponse {
    #[serde(rename = "MRData")]
    pub mr_data: ScheduleData,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ScheduleData {
    #[serde(rename = "RaceTable")]
    pub race_table: ScheduleTable,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ScheduleTable {
    #[serde(rename = "Races", default)]
    pub races: Vec<WireRound>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct WireRound {
    pub round: String,
    #[serde(rename = "raceName")]
    pub race_name: String,
    pub date: chrono::NaiveDate,
    /// Present only on sprint weekends
    #[serde(rename = "Sprint")]
    pub sprint: Option<WireSprint>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct WireSprint {}

#[derive(Debug, Deserialize)]
pub(crate) struct ResultsResponse {
    #[serde(rename = "MRData")]
    pub mr_data: ResultsData,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ResultsData {
    #[serde(rename = "RaceTable")]
    pub race_table: ResultsTable,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ResultsTable {
    #[serde(rename = "Races", default)]
    pub races: Vec<RaceResults>,
}

/// One round's result listing. Race and sprint payloads share this shape;
/// only one of the two arrays is ever populated.
#[derive(Debug, Deserialize)]
pub(crate) struct RaceResults {
    #[serde(rename = "raceName")]
    pub race_name: String,
    #[serde(rename = "Results", default)]
    pub results: Vec<WireResult>,
    #[serde(rename = "SprintResults", default)]
    pub sprint_results: Vec<WireResult>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct WireResult {
    pub number: Option<String>,
    pub position: Option<String>,
    #[serde(rename = "positionText")]
    pub position_text: Option<String>,
    pub points: Option<String>,
    #[serde(rename = "Driver")]
    pub driver: WireDriver,
    #[serde(rename = "Constructor")]
    pub constructor: Option<WireConstructor>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct WireDriver {
    #[serde(rename = "driverId")]
    pub driver_id: String,
    pub code: Option<String>,
    #[serde(rename = "givenName")]
    pub given_name: String,
    #[serde(rename = "familyName")]
    pub family_name: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct WireConstructor {
    #[serde(rename = "constructorId")]
    pub constructor_id: String,
    pub name: String,
}

impl WireResult {
    /// Flatten one wire entry into a session record. The display colour
    /// comes from the static constructor table; the API carries none.
    pub(crate) fn into_result(
        self,
        season: u32,
        round: u32,
        session: SessionType,
        event_name: &str,
    ) -> Result<SessionResult, FetchError> {
        let context = format!(
            "round {} {} entry for {}",
            round,
            session.label(),
            self.driver.driver_id
        );
        let missing = |field: &'static str| FetchError::MissingField {
            context: context.clone(),
            field,
        };

        let number = self.number.ok_or_else(|| missing("number"))?;
        let position = self.position.ok_or_else(|| missing("position"))?;
        let position_text = self.position_text.ok_or_else(|| missing("positionText"))?;
        let points = self.points.ok_or_else(|| missing("points"))?;
        let constructor = self.constructor.ok_or_else(|| missing("Constructor"))?;
        let code = self.driver.code.ok_or_else(|| missing("Driver.code"))?;

        let finish_order: u32 = position.parse().map_err(|_| FetchError::InvalidField {
            context: context.clone(),
            field: "position",
            value: position.clone(),
        })?;
        let official_points: f64 = points.parse().map_err(|_| FetchError::InvalidField {
            context: context.clone(),
            field: "points",
            value: points.clone(),
        })?;

        Ok(SessionResult {
            season,
            round,
            session,
            event_name: event_name.to_string(),
            driver_code: code,
            driver_name: format!("{} {}", self.driver.given_name, self.driver.family_name),
            driver_number: number,
            team: constructor.name,
            team_color: colors::team_color(&constructor.constructor_id).to_string(),
            classification: position_text,
            finish_order,
            official_points,
        })
    }
}

/// Strip the trailing "Grand Prix" from an event name, matching how the
/// exports label rounds ("Bahrain Grand Prix" -> "Bahrain").
pub(crate) fn short_event_name(race_name: &str) -> String {
    race_name.replace("Grand Prix", "").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_ENTRY: &str = r#"{
        "number": "27",
        "position": "5",
        "positionText": "5",
        "points": "10",
        "grid": "8",
        "laps": "57",
        "status": "Finished",
        "Driver": {
            "driverId": "hulkenberg",
            "permanentNumber": "27",
            "code": "HUL",
            "givenName": "Nico",
            "familyName": "Hulkenberg"
        },
        "Constructor": {
            "constructorId": "sauber",
            "name": "Sauber"
        }
    }"#;

    fn sample_entry() -> WireResult {
        serde_json::from_str(SAMPLE_ENTRY).unwrap()
    }

    #[test]
    fn test_into_result_flattens_the_entry() {
        let result = sample_entry()
            .into_result(2026, 4, SessionType::Race, "Bahrain")
            .unwrap();

        assert_eq!(result.season, 2026);
        assert_eq!(result.round, 4);
        assert_eq!(result.event_name, "Bahrain");
        assert_eq!(result.driver_code, "HUL");
        assert_eq!(result.driver_name, "Nico Hulkenberg");
        assert_eq!(result.driver_number, "27");
        assert_eq!(result.team, "Sauber");
        assert_eq!(result.team_color, "52E252");
        assert_eq!(result.classification, "5");
        assert_eq!(result.finish_order, 5);
        assert_eq!(result.official_points, 10.0);
    }

    #[test]
    fn test_retired_entry_keeps_status_text() {
        let mut entry = sample_entry();
        entry.position = Some("18".to_string());
        entry.position_text = Some("R".to_string());
        entry.points = Some("0".to_string());

        let result = entry
            .into_result(2026, 4, SessionType::Race, "Bahrain")
            .unwrap();
        assert_eq!(result.classification, "R");
        assert_eq!(result.finish_order, 18);
    }

    #[test]
    fn test_missing_code_is_a_field_error() {
        let mut entry = sample_entry();
        entry.driver.code = None;

        let err = entry
            .into_result(2026, 4, SessionType::Race, "Bahrain")
            .unwrap_err();
        assert!(err.is_malformed());
        assert!(err.to_string().contains("Driver.code"));
        assert!(err.to_string().contains("hulkenberg"));
    }

    #[test]
    fn test_unparseable_position_is_a_field_error() {
        let mut entry = sample_entry();
        entry.position = Some("fifth".to_string());

        let err = entry
            .into_result(2026, 4, SessionType::Sprint, "Bahrain")
            .unwrap_err();
        assert!(err.is_malformed());
        assert!(err.to_string().contains("fifth"));
    }

    #[test]
    fn test_fractional_points_parse() {
        // Half points happen (2021 Spa paid them)
        let mut entry = sample_entry();
        entry.points = Some("12.5".to_string());

        let result = entry
            .into_result(2021, 12, SessionType::Race, "Belgian")
            .unwrap();
        assert_eq!(result.official_points, 12.5);
    }

    #[test]
    fn test_unknown_constructor_gets_fallback_color() {
        let mut entry = sample_entry();
        entry.constructor = Some(WireConstructor {
            constructor_id: "brawn".to_string(),
            name: "Brawn".to_string(),
        });

        let result = entry
            .into_result(2009, 1, SessionType::Race, "Australian")
            .unwrap();
        assert_eq!(result.team_color, "CCCCCC");
    }

    #[test]
    fn test_transport_errors_are_not_malformed() {
        let err = FetchError::Status {
            url: "https://api.jolpica.ca/ergast/f1/2026/1/results.json".to_string(),
            status: 503,
        };
        assert!(!err.is_malformed());
        assert!(!err.is_rate_limited());

        let limited = FetchError::Status {
            url: "https://api.jolpica.ca/ergast/f1/2026/1/results.json".to_string(),
            status: 429,
        };
        assert!(limited.is_rate_limited());
    }

    #[test]
    fn test_short_event_name_strips_grand_prix() {
        assert_eq!(short_event_name("Bahrain Grand Prix"), "Bahrain");
        assert_eq!(short_event_name("Las Vegas Grand Prix"), "Las Vegas");
        assert_eq!(short_event_name("70th Anniversary"), "70th Anniversary");
    }
}
