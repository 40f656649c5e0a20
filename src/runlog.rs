use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::Local;

/// Append one timestamped line to the automation log, creating the file and
/// its directory on first use. The format matches what the log has always
/// held: `[2026-03-08 17:42:11] SUCCESS: ...`
pub fn append(path: &Path, message: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create log directory at {}", parent.display())
            })?;
        }
    }

    let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S");
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open log file at {}", path.display()))?;
    writeln!(file, "[{}] {}", timestamp, message)
        .with_context(|| format!("Failed to write to log file at {}", path.display()))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::fs;
    use std::path::PathBuf;

    fn temp_log(name: &str) -> PathBuf {
        env::temp_dir()
            .join(format!("f1p5-runlog-test-{}-{}", name, std::process::id()))
            .join("log.txt")
    }

    #[test]
    fn test_append_creates_and_appends() {
        let path = temp_log("append");

        append(&path, "SUCCESS: Data exported for the 2026 season.").unwrap();
        append(&path, "WARNING: No data found in either current or previous season.").unwrap();

        let contents = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with('['));
        assert!(lines[0].ends_with("SUCCESS: Data exported for the 2026 season."));
        assert!(lines[1].contains("WARNING"));

        let _ = fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn test_timestamp_format() {
        let path = temp_log("stamp");

        append(&path, "SUCCESS: test").unwrap();

        let contents = fs::read_to_string(&path).unwrap();
        // "[YYYY-MM-DD HH:MM:SS] ..."
        assert_eq!(contents.as_bytes()[0], b'[');
        assert_eq!(contents.as_bytes()[11], b' ');
        assert_eq!(contents.as_bytes()[20], b']');

        let _ = fs::remove_dir_all(path.parent().unwrap());
    }
}
