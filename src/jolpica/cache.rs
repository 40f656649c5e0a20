use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// How long a cached schedule stays fresh. Round dates move occasionally,
/// so a day is plenty. Completed-session results are immutable and get no
/// TTL at all.
pub const SCHEDULE_TTL_SECONDS: u64 = 24 * 60 * 60;

/// Configuration for HTTP response caching
#[derive(Clone, Debug)]
pub struct CacheConfig {
    pub enabled: bool,
}

impl Default for CacheConfig {
    fn default() -> Self {
        CacheConfig { enabled: true }
    }
}

/// Platform-appropriate cache directory for f1p5
pub fn get_cache_path() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(|| PathBuf::from(".cache"))
        .join("f1p5")
        .join("http-cache")
}

/// One cached response body with its fetch time
#[derive(Debug, Serialize, Deserialize)]
struct CachedResponse {
    body: String,
    fetched_at: u64, // Unix timestamp, seconds
}

fn now_unix() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_secs())
        .unwrap_or(0)
}

fn is_fresh(entry: &CachedResponse, ttl_seconds: Option<u64>) -> bool {
    match ttl_seconds {
        None => true,
        Some(ttl) => now_unix().saturating_sub(entry.fetched_at) < ttl,
    }
}

/// Read a cached body for `url`, if present and fresh. `ttl_seconds: None`
/// means the entry never goes stale.
pub fn read(cache_path: &Path, url: &str, ttl_seconds: Option<u64>) -> Option<String> {
    let bytes = cacache::read_sync(cache_path, url).ok()?;
    let entry: CachedResponse = serde_json::from_slice(&bytes).ok()?;
    if is_fresh(&entry, ttl_seconds) {
        Some(entry.body)
    } else {
        None
    }
}

/// Cache a response body for `url`.
pub fn write(cache_path: &Path, url: &str, body: &str) -> Result<()> {
    let entry = CachedResponse {
        body: body.to_string(),
        fetched_at: now_unix(),
    };
    let bytes = serde_json::to_vec(&entry)?;
    cacache::write_sync(cache_path, url, bytes)?;
    Ok(())
}

/// Drop the cache directory. A cache that never existed counts as cleared.
pub fn clear(cache_path: &Path) -> Result<()> {
    match std::fs::remove_dir_all(cache_path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e).context("Failed to remove cache directory"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;

    fn temp_cache(name: &str) -> PathBuf {
        env::temp_dir().join(format!("f1p5-cache-test-{}-{}", name, std::process::id()))
    }

    #[test]
    fn test_round_trip() {
        let dir = temp_cache("round-trip");
        let url = "https://api.jolpica.ca/ergast/f1/2026/1/results.json";

        write(&dir, url, "{\"MRData\":{}}").unwrap();
        assert_eq!(read(&dir, url, None), Some("{\"MRData\":{}}".to_string()));

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_miss_returns_none() {
        let dir = temp_cache("miss");
        assert_eq!(read(&dir, "https://api.jolpica.ca/nope", None), None);
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_zero_ttl_expires_immediately() {
        let dir = temp_cache("expiry");
        let url = "https://api.jolpica.ca/ergast/f1/2026.json";

        write(&dir, url, "schedule").unwrap();
        assert_eq!(read(&dir, url, Some(0)), None);
        assert_eq!(read(&dir, url, Some(SCHEDULE_TTL_SECONDS)), Some("schedule".to_string()));

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_clear_removes_entries() {
        let dir = temp_cache("clear");
        let url = "https://api.jolpica.ca/ergast/f1/2025.json";

        write(&dir, url, "schedule").unwrap();
        clear(&dir).unwrap();
        assert_eq!(read(&dir, url, None), None);

        // Clearing an already-missing cache is fine
        clear(&dir).unwrap();
    }
}
