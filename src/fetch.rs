use anyhow::{Context, Result};
use futures::stream::{FuturesUnordered, StreamExt};
use std::collections::HashSet;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::config::Config;
use crate::jolpica::{self, CacheConfig, FetchError, RoundSchedule};
use crate::standings::{rank_session, RankedSession, SessionResult, SessionType};

/// How many rounds are fetched at once. Jolpica's rate limits are modest,
/// so stay well under them.
const MAX_CONCURRENT_ROUNDS: usize = 3;

/// A session that contributed nothing this run, and why.
#[derive(Debug)]
pub enum SessionFailure {
    /// The provider could not supply the session
    Retrieval {
        round: u32,
        session: SessionType,
        reason: String,
    },
    /// The provider supplied data this tool refuses to rank
    Malformed {
        round: u32,
        session: SessionType,
        reason: String,
    },
}

impl fmt::Display for SessionFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionFailure::Retrieval {
                round,
                session,
                reason,
            } => write!(
                f,
                "round {} {}: retrieval failed ({})",
                round,
                session.label(),
                reason
            ),
            SessionFailure::Malformed {
                round,
                session,
                reason,
            } => write!(
                f,
                "round {} {}: malformed results ({})",
                round,
                session.label(),
                reason
            ),
        }
    }
}

/// Everything one season produced: ranked sessions by type, plus the
/// sessions skipped this run.
#[derive(Debug, Default)]
pub struct SeasonData {
    pub races: Vec<RankedSession>,
    pub sprints: Vec<RankedSession>,
    pub failures: Vec<SessionFailure>,
}

/// One round's raw fetch outcome. The sprint slot is None on conventional
/// weekends.
struct RoundFetch {
    round: u32,
    race: Result<Vec<SessionResult>, FetchError>,
    sprint: Option<Result<Vec<SessionResult>, FetchError>>,
}

async fn fetch_round(
    client: reqwest::Client,
    cache_config: CacheConfig,
    cache_path: PathBuf,
    season: u32,
    round: RoundSchedule,
) -> RoundFetch {
    let race = jolpica::session_results(
        &client,
        &cache_config,
        &cache_path,
        season,
        round.round,
        SessionType::Race,
    )
    .await;

    let sprint = if round.has_sprint {
        Some(
            jolpica::session_results(
                &client,
                &cache_config,
                &cache_path,
                season,
                round.round,
                SessionType::Sprint,
            )
            .await,
        )
    } else {
        None
    };

    RoundFetch {
        round: round.round,
        race,
        sprint,
    }
}

/// Accumulates ranked sessions and skip records as round fetches complete.
struct Collector<'a> {
    config: &'a Config,
    excluded: HashSet<String>,
    verbose: bool,
    data: SeasonData,
}

impl Collector<'_> {
    fn new(config: &Config, verbose: bool) -> Collector<'_> {
        Collector {
            excluded: config.excluded_teams.iter().cloned().collect(),
            config,
            verbose,
            data: SeasonData::default(),
        }
    }

    /// Rank one fetched session and file it, or record why it was skipped.
    /// A failed session never takes the rest of the season down with it.
    fn collect(
        &mut self,
        round: u32,
        session: SessionType,
        outcome: Result<Vec<SessionResult>, FetchError>,
        rate_limited: &AtomicBool,
    ) {
        let results = match outcome {
            Ok(results) => results,
            Err(e) => {
                if e.is_rate_limited() {
                    eprintln!("Warning: Rate limit hit. Remaining rounds are skipped.");
                    rate_limited.store(true, Ordering::Relaxed);
                }
                let failure = if e.is_malformed() {
                    SessionFailure::Malformed {
                        round,
                        session,
                        reason: e.to_string(),
                    }
                } else {
                    SessionFailure::Retrieval {
                        round,
                        session,
                        reason: e.to_string(),
                    }
                };
                eprintln!("Warning: Skipping {}", failure);
                self.data.failures.push(failure);
                return;
            }
        };

        if results.is_empty() {
            if self.verbose {
                eprintln!("  No results published for round {} {}", round, session.label());
            }
            return;
        }

        if self.verbose {
            eprintln!(
                "  Found {} entrants in round {} {}",
                results.len(),
                round,
                session.label()
            );
        }

        let table = match session {
            SessionType::Race => &self.config.race_points,
            SessionType::Sprint => &self.config.sprint_points,
        };

        match rank_session(results, &self.excluded, table) {
            Ok(rows) => {
                let ranked = RankedSession {
                    round,
                    session,
                    rows,
                };
                match session {
                    SessionType::Race => self.data.races.push(ranked),
                    SessionType::Sprint => self.data.sprints.push(ranked),
                }
            }
            Err(e) => {
                let failure = SessionFailure::Malformed {
                    round,
                    session,
                    reason: e.to_string(),
                };
                eprintln!("Warning: Skipping {}", failure);
                self.data.failures.push(failure);
            }
        }
    }
}

/// Fetch and rank every completed session of `season`.
///
/// Rounds are fetched with bounded concurrency. Individual sessions that
/// fail are skipped and recorded in `SeasonData::failures`; only a schedule
/// that cannot be fetched at all is an error.
pub async fn fetch_season(
    client: &reqwest::Client,
    config: &Config,
    cache_config: &CacheConfig,
    cache_path: &Path,
    season: u32,
    verbose: bool,
) -> Result<SeasonData> {
    if verbose {
        let cache_status = if cache_config.enabled {
            "enabled"
        } else {
            "disabled (--no-cache)"
        };
        eprintln!("Cache: {}", cache_status);
    }

    let schedule = jolpica::season_schedule(client, cache_config, cache_path, season)
        .await
        .with_context(|| format!("Failed to fetch the {} schedule", season))?;

    let today = chrono::Utc::now().date_naive();
    let rounds = jolpica::completed_rounds(schedule, today);

    if verbose {
        eprintln!("  {} completed rounds in {}", rounds.len(), season);
    }

    let mut collector = Collector::new(config, verbose);

    // Rate limit flag shared across concurrent tasks
    let rate_limited = Arc::new(AtomicBool::new(false));

    let mut futures = FuturesUnordered::new();
    let mut rounds_iter = rounds.into_iter();

    // Fill initial batch
    for _ in 0..MAX_CONCURRENT_ROUNDS {
        if let Some(round) = rounds_iter.next() {
            futures.push(fetch_round(
                client.clone(),
                cache_config.clone(),
                cache_path.to_path_buf(),
                season,
                round,
            ));
        }
    }

    // Process results and feed new tasks
    while let Some(fetched) = futures.next().await {
        collector.collect(fetched.round, SessionType::Race, fetched.race, &rate_limited);
        if let Some(sprint) = fetched.sprint {
            collector.collect(fetched.round, SessionType::Sprint, sprint, &rate_limited);
        }

        // Add the next round if not rate limited
        if !rate_limited.load(Ordering::Relaxed) {
            if let Some(next_round) = rounds_iter.next() {
                futures.push(fetch_round(
                    client.clone(),
                    cache_config.clone(),
                    cache_path.to_path_buf(),
                    season,
                    next_round,
                ));
            }
        }
    }

    // Rounds never submitted (rate limited) are recorded as skipped
    let mut data = collector.data;
    for missed in rounds_iter {
        data.failures.push(SessionFailure::Retrieval {
            round: missed.round,
            session: SessionType::Race,
            reason: "not fetched: rate limited".to_string(),
        });
        if missed.has_sprint {
            data.failures.push(SessionFailure::Retrieval {
                round: missed.round,
                session: SessionType::Sprint,
                reason: "not fetched: rate limited".to_string(),
            });
        }
    }

    // Fetches complete out of order; everything downstream wants round order
    data.races.sort_by_key(|s| s.round);
    data.sprints.sort_by_key(|s| s.round);

    Ok(data)
}
