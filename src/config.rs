/// Configuration module for synscrape.
///
/// Handles loading, validating, and providing default batch parameters.
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

// ── Default value functions ──────────────────────────────────────────

fn default_words_file() -> String {
    "words.txt".to_string()
}

fn default_words_per_run() -> usize {
    1
}

fn default_wait_secs() -> u64 {
    10
}

fn default_max_word_len() -> usize {
    100
}

fn default_log_file() -> String {
    "log.txt".to_string()
}

fn default_comment_marker() -> String {
    "#".to_string()
}

fn default_db_path() -> String {
    "./thesaurus.db".to_string()
}

fn default_true() -> bool {
    true
}

fn default_base_url() -> String {
    "https://www.thesaurus.com/browse/".to_string()
}

fn default_user_agent() -> String {
    format!("synscrape/{}", env!("CARGO_PKG_VERSION"))
}

fn default_timeout_secs() -> u64 {
    30
}

// ── Config structs ───────────────────────────────────────────────────

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Config {
    /// Line-oriented list of words still waiting to be scraped.
    #[serde(default = "default_words_file")]
    pub words_file: String,

    #[serde(default = "default_words_per_run")]
    pub words_per_run: usize,

    /// Pause between consecutive page fetches.
    #[serde(default = "default_wait_secs")]
    pub wait_secs: u64,

    /// Longest word or phrase the `words` table accepts.
    #[serde(default = "default_max_word_len")]
    pub max_word_len: usize,

    #[serde(default = "default_log_file")]
    pub log_file: String,

    /// Strip consumed lines from `words_file` after reading them.
    #[serde(default = "default_true")]
    pub delete_consumed: bool,

    #[serde(default = "default_comment_marker")]
    pub comment_marker: String,

    #[serde(default = "default_db_path")]
    pub db_path: String,

    /// Commit each word's fragments in one transaction instead of
    /// statement-by-statement.
    #[serde(default)]
    pub atomic_per_word: bool,

    #[serde(default)]
    pub fetch: FetchConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct FetchConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

// ── Default impls ────────────────────────────────────────────────────

impl Default for Config {
    fn default() -> Self {
        Self {
            words_file: default_words_file(),
            words_per_run: default_words_per_run(),
            wait_secs: default_wait_secs(),
            max_word_len: default_max_word_len(),
            log_file: default_log_file(),
            delete_consumed: default_true(),
            comment_marker: default_comment_marker(),
            db_path: default_db_path(),
            atomic_per_word: false,
            fetch: FetchConfig::default(),
        }
    }
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            user_agent: default_user_agent(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

// ── Config implementation ────────────────────────────────────────────

impl Config {
    /// Delay applied between two fetch attempts.
    #[must_use]
    pub fn wait(&self) -> Duration {
        Duration::from_secs(self.wait_secs)
    }

    /// Load configuration from a JSON file.
    ///
    /// If `config_path` is empty, defaults to `"config.json"`.
    /// If the file does not exist, returns a default config and, for the
    /// default path only, writes a template next to the binary.
    pub fn load(config_path: &str) -> Result<Self> {
        let path = if config_path.is_empty() {
            "config.json"
        } else {
            config_path
        };

        if !Path::new(path).exists() {
            info!("{path} not found, using defaults");
            let cfg = Self::default();

            if path == "config.json" {
                match cfg.save(path) {
                    Ok(()) => info!("Generated config template: {path}"),
                    Err(e) => warn!("Failed to generate config template: {e}"),
                }
            }

            return Ok(cfg);
        }

        let data = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config: {path}"))?;

        let mut cfg: Config = match serde_json::from_str(&data) {
            Ok(c) => c,
            Err(e) => {
                warn!("Invalid JSON in {path}: {e}");
                warn!("Using default configuration");
                return Ok(Self::default());
            }
        };

        info!("Loaded configuration from {path}");

        if cfg.comment_marker.is_empty() {
            cfg.comment_marker = default_comment_marker();
        }

        Ok(cfg)
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &str) -> Result<()> {
        let data = serde_json::to_string_pretty(self).context("failed to marshal config")?;
        std::fs::write(path, data).with_context(|| format!("failed to write config: {path}"))?;
        Ok(())
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<()> {
        anyhow::ensure!(self.words_per_run > 0, "words_per_run must be positive");
        anyhow::ensure!(self.max_word_len > 0, "max_word_len must be positive");
        anyhow::ensure!(
            !self.comment_marker.is_empty(),
            "comment_marker must not be empty"
        );
        anyhow::ensure!(!self.words_file.is_empty(), "words_file must be set");
        anyhow::ensure!(!self.db_path.is_empty(), "db_path must be set");
        anyhow::ensure!(
            self.fetch.timeout_secs > 0,
            "fetch.timeout_secs must be positive"
        );
        reqwest::Url::parse(&self.fetch.base_url)
            .with_context(|| format!("invalid fetch.base_url: {}", self.fetch.base_url))?;
        Ok(())
    }
}

// ── Tests ────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.words_file, "words.txt");
        assert_eq!(config.words_per_run, 1);
        assert_eq!(config.wait_secs, 10);
        assert_eq!(config.max_word_len, 100);
        assert_eq!(config.log_file, "log.txt");
        assert_eq!(config.comment_marker, "#");
        assert!(config.delete_consumed);
        assert!(!config.atomic_per_word);
        assert_eq!(config.fetch.base_url, "https://www.thesaurus.com/browse/");
        assert_eq!(config.wait(), Duration::from_secs(10));
    }

    #[test]
    fn test_load_from_json() {
        let json = r#"{"words_per_run": 5, "db_path": "./test.db", "fetch": {"timeout_secs": 3}}"#;
        let config: Config = serde_json::from_str(json).unwrap();
        assert_eq!(config.words_per_run, 5);
        assert_eq!(config.db_path, "./test.db");
        assert_eq!(config.fetch.timeout_secs, 3);
        // Other fields should have defaults
        assert_eq!(config.max_word_len, 100);
        assert_eq!(config.fetch.base_url, "https://www.thesaurus.com/browse/");
    }

    #[test]
    fn test_validate_ok() {
        let config = Config::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_zero_words() {
        let mut config = Config::default();
        config.words_per_run = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_bad_base_url() {
        let mut config = Config::default();
        config.fetch.base_url = "not a url".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_missing_file_uses_defaults() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("missing.json");
        let config = Config::load(path.to_str().unwrap()).unwrap();
        assert_eq!(config.words_per_run, 1);
        // Templates are only generated for the default path
        assert!(!path.exists());
    }

    #[test]
    fn test_load_invalid_json_uses_defaults() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("broken.json");
        std::fs::write(&path, "{ not json").unwrap();
        let config = Config::load(path.to_str().unwrap()).unwrap();
        assert_eq!(config.max_word_len, 100);
    }

    #[test]
    fn test_save_then_load() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("config.json");
        let path = path.to_str().unwrap();

        let mut config = Config::default();
        config.words_per_run = 7;
        config.delete_consumed = false;
        config.save(path).unwrap();

        let loaded = Config::load(path).unwrap();
        assert_eq!(loaded.words_per_run, 7);
        assert!(!loaded.delete_consumed);
    }
}
