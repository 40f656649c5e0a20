use std::path::Path;

use crate::standings::{SessionResult, SessionType};

use super::cache::{self, CacheConfig};
use super::client::{fetch_body, BASE_URL};
use super::types::{short_event_name, FetchError, ResultsResponse};

/// Fetch one session's classification, in upstream order. An empty vec
/// means the session has no published results (not run yet, or the API is
/// still loading them): only non-empty payloads are cached, completed
/// results never change.
pub async fn session_results(
    client: &reqwest::Client,
    cache_config: &CacheConfig,
    cache_path: &Path,
    season: u32,
    round: u32,
    session: SessionType,
) -> Result<Vec<SessionResult>, FetchError> {
    let endpoint = match session {
        SessionType::Race => "results",
        SessionType::Sprint => "sprint",
    };
    let url = format!("{}/{}/{}/{}.json", BASE_URL, season, round, endpoint);

    if cache_config.enabled {
        if let Some(body) = cache::read(cache_path, &url, None) {
            if let Ok(results) = decode_session(&body, &url, season, round, session) {
                return Ok(results);
            }
            // A cached body that no longer decodes is treated as a miss
        }
    }

    let body = fetch_body(client, &url).await?;
    let results = decode_session(&body, &url, season, round, session)?;

    if cache_config.enabled && !results.is_empty() {
        let _ = cache::write(cache_path, &url, &body);
    }

    Ok(results)
}

fn decode_session(
    body: &str,
    url: &str,
    season: u32,
    round: u32,
    session: SessionType,
) -> Result<Vec<SessionResult>, FetchError> {
    let response: ResultsResponse =
        serde_json::from_str(body).map_err(|source| FetchError::Decode {
            url: url.to_string(),
            source,
        })?;

    let Some(race) = response.mr_data.race_table.races.into_iter().next() else {
        return Ok(Vec::new());
    };

    let event_name = short_event_name(&race.race_name);
    let entries = match session {
        SessionType::Race => race.results,
        SessionType::Sprint => race.sprint_results,
    };

    entries
        .into_iter()
        .map(|entry| entry.into_result(season, round, session, &event_name))
        .collect()
}
