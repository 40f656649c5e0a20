mod schema;
mod validation;

pub use schema::Config;
pub use validation::validate_config;

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Get the config directory path (~/.config/f1p5/)
pub fn get_config_dir() -> PathBuf {
    let home = dirs::home_dir().expect("Could not determine home directory");
    home.join(".config").join("f1p5")
}

/// Get the default config file path (~/.config/f1p5/config.yaml)
pub fn get_config_path() -> PathBuf {
    get_config_dir().join("config.yaml")
}

/// Load configuration from a YAML file
///
/// # Arguments
///
/// * `path` - Optional path to config file. With an explicit path the file
///   must exist; with None, the default path is used when present and the
///   built-in defaults otherwise (f1p5 runs fine without a config file).
///
/// # Errors
///
/// Returns an error if:
/// - An explicitly given config file does not exist
/// - The config file cannot be read
/// - The YAML cannot be parsed
pub fn load_config(path: Option<PathBuf>) -> Result<Config> {
    let (config_path, required) = match path {
        Some(explicit) => (explicit, true),
        None => (get_config_path(), false),
    };

    if !config_path.exists() {
        if required {
            anyhow::bail!("Config file not found at {}", config_path.display());
        }
        return Ok(Config::default());
    }

    let config_content = fs::read_to_string(&config_path)
        .with_context(|| format!("Failed to read config file at {}", config_path.display()))?;

    let config: Config = serde_saphyr::from_str(&config_content)
        .with_context(|| format!("Failed to parse config: invalid YAML in {}", config_path.display()))?;

    Ok(config)
}

/// Write the default configuration to `path` (used by `f1p5 init`).
pub fn write_default_config(path: &Path) -> Result<()> {
    let yaml = serde_saphyr::to_string(&Config::default())
        .map_err(|e| anyhow::anyhow!("Failed to serialize config: {}", e))?;

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }
    }

    fs::write(path, &yaml)
        .with_context(|| format!("Failed to write config to {}", path.display()))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;

    fn temp_path(name: &str) -> PathBuf {
        env::temp_dir().join(format!("f1p5-config-test-{}-{}", name, std::process::id()))
    }

    #[test]
    fn test_explicitly_given_missing_config_errors() {
        let missing = temp_path("missing").join("config.yaml");
        assert!(load_config(Some(missing)).is_err());
    }

    #[test]
    fn test_load_config_reads_yaml() {
        let dir = temp_path("load");
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.yaml");
        fs::write(&path, "excluded_teams:\n  - Mercedes\n").unwrap();

        let config = load_config(Some(path)).unwrap();
        assert_eq!(config.excluded_teams, vec!["Mercedes".to_string()]);

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_load_config_rejects_bad_yaml() {
        let dir = temp_path("bad");
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.yaml");
        fs::write(&path, "excluded_teams: {not a list").unwrap();

        assert!(load_config(Some(path)).is_err());

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_write_default_config_round_trips() {
        let dir = temp_path("write");
        let path = dir.join("nested").join("config.yaml");

        write_default_config(&path).unwrap();
        let config = load_config(Some(path)).unwrap();
        assert_eq!(config, Config::default());

        let _ = fs::remove_dir_all(&dir);
    }
}
