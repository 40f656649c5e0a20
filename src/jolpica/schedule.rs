use std::path::Path;

use chrono::NaiveDate;

use super::cache::{self, CacheConfig, SCHEDULE_TTL_SECONDS};
use super::client::{fetch_body, BASE_URL};
use super::types::{FetchError, ScheduleResponse};

/// One round of the season calendar.
#[derive(Debug, Clone)]
pub struct RoundSchedule {
    pub round: u32,
    pub name: String,
    /// Race day; the round counts as completed once this date has passed
    pub date: NaiveDate,
    pub has_sprint: bool,
}

/// Fetch the season calendar. An empty vec means the API knows nothing
/// about the season yet.
pub async fn season_schedule(
    client: &reqwest::Client,
    cache_config: &CacheConfig,
    cache_path: &Path,
    season: u32,
) -> Result<Vec<RoundSchedule>, FetchError> {
    let url = format!("{}/{}.json", BASE_URL, season);

    if cache_config.enabled {
        if let Some(body) = cache::read(cache_path, &url, Some(SCHEDULE_TTL_SECONDS)) {
            if let Ok(rounds) = decode_schedule(&body, &url) {
                return Ok(rounds);
            }
            // A cached body that no longer decodes is treated as a miss
        }
    }

    let body = fetch_body(client, &url).await?;
    let rounds = decode_schedule(&body, &url)?;

    if cache_config.enabled && !rounds.is_empty() {
        let _ = cache::write(cache_path, &url, &body);
    }

    Ok(rounds)
}

/// Keep only the rounds whose race day is on or before `today`. A round
/// that ran but has no results published yet simply comes back empty from
/// the results endpoint and is skipped downstream.
pub fn completed_rounds(rounds: Vec<RoundSchedule>, today: NaiveDate) -> Vec<RoundSchedule> {
    rounds
        .into_iter()
        .filter(|round| round.date <= today)
        .collect()
}

fn decode_schedule(body: &str, url: &str) -> Result<Vec<RoundSchedule>, FetchError> {
    let response: ScheduleResponse =
        serde_json::from_str(body).map_err(|source| FetchError::Decode {
            url: url.to_string(),
            source,
        })?;

    response
        .mr_data
        .race_table
        .races
        .into_iter()
        .map(|wire| {
            let round = wire.round.parse().map_err(|_| FetchError::InvalidField {
                context: wire.race_name.clone(),
                field: "round",
                value: wire.round.clone(),
            })?;
            Ok(RoundSchedule {
                round,
                name: wire.race_name,
                date: wire.date,
                has_sprint: wire.sprint.is_some(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_SCHEDULE: &str = r#"{
        "MRData": {
            "xmlns": "",
            "series": "f1",
            "limit": "30",
            "offset": "0",
            "total": "3",
            "RaceTable": {
                "season": "2026",
                "Races": [
                    {
                        "season": "2026",
                        "round": "1",
                        "raceName": "Australian Grand Prix",
                        "date": "2026-03-08",
                        "time": "05:00:00Z"
                    },
                    {
                        "season": "2026",
                        "round": "2",
                        "raceName": "Chinese Grand Prix",
                        "date": "2026-03-15",
                        "Sprint": {
                            "date": "2026-03-14",
                            "time": "03:00:00Z"
                        }
                    },
                    {
                        "season": "2026",
                        "round": "3",
                        "raceName": "Japanese Grand Prix",
                        "date": "2026-03-29"
                    }
                ]
            }
        }
    }"#;

    #[test]
    fn test_decode_schedule_reads_rounds_and_sprints() {
        let rounds = decode_schedule(SAMPLE_SCHEDULE, "test").unwrap();

        assert_eq!(rounds.len(), 3);
        assert_eq!(rounds[0].round, 1);
        assert_eq!(rounds[0].name, "Australian Grand Prix");
        assert!(!rounds[0].has_sprint);
        assert!(rounds[1].has_sprint);
        assert_eq!(
            rounds[2].date,
            NaiveDate::from_ymd_opt(2026, 3, 29).unwrap()
        );
    }

    #[test]
    fn test_decode_schedule_rejects_garbage() {
        let err = decode_schedule("not json", "test").unwrap_err();
        assert!(!err.is_malformed());
    }

    #[test]
    fn test_unknown_season_decodes_to_no_rounds() {
        let body = r#"{"MRData": {"RaceTable": {"season": "2031", "Races": []}}}"#;
        assert!(decode_schedule(body, "test").unwrap().is_empty());
    }

    #[test]
    fn test_completed_rounds_cut_off_at_today() {
        let rounds = decode_schedule(SAMPLE_SCHEDULE, "test").unwrap();

        let mid_season = NaiveDate::from_ymd_opt(2026, 3, 15).unwrap();
        let completed = completed_rounds(rounds.clone(), mid_season);
        assert_eq!(completed.len(), 2);

        let pre_season = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap();
        assert!(completed_rounds(rounds, pre_season).is_empty());
    }
}
