//! Run configuration threaded through every stage.
//!
//! Values are resolved in three layers: built-in defaults, an optional YAML
//! file passed with `--config`, then command-line flags. Directory paths
//! starting with `~` are expanded against `$HOME`.
//!
//! ```yaml
//! src_dir: ~/news/raw
//! dest_dir: ~/news/out
//! max_retry: 3
//! retry_delay_secs: 3
//! concurrency: 4
//! rank_limit: 100
//! report_limit: 30
//! dictionary: ipadic
//! on_tokenize_error: abort
//! ```

use crate::analysis::rank::DEFAULT_RANK_LIMIT;
use crate::errors::{NewsError, Result};
use crate::utils::expand_home;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{info, instrument};

pub const DEFAULT_RSS_INDEX_URL: &str = "https://news.yahoo.co.jp/rss";

/// Morphological dictionary backing the tokenizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Dictionary {
    Ipadic,
    IpadicNeologd,
}

/// What to do with an article whose title cannot be tokenized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TokenizeErrorPolicy {
    /// Fail the whole date.
    Abort,
    /// Log the title and leave the article out of the ranking.
    Skip,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub src_dir: PathBuf,
    pub dest_dir: PathBuf,
    /// Retries after the first failed request.
    pub max_retry: usize,
    pub retry_delay_secs: u64,
    /// Feed downloads in flight at once.
    pub concurrency: usize,
    /// Keywords kept after ranking.
    pub rank_limit: usize,
    /// Keywords kept in `topic.json`.
    pub report_limit: usize,
    pub rss_index_url: String,
    pub dictionary: Dictionary,
    pub on_tokenize_error: TokenizeErrorPolicy,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            src_dir: PathBuf::from("~/Desktop"),
            dest_dir: PathBuf::from("~/Desktop"),
            max_retry: 3,
            retry_delay_secs: 3,
            concurrency: 4,
            rank_limit: DEFAULT_RANK_LIMIT,
            report_limit: 30,
            rss_index_url: DEFAULT_RSS_INDEX_URL.to_string(),
            dictionary: Dictionary::Ipadic,
            on_tokenize_error: TokenizeErrorPolicy::Abort,
        }
    }
}

impl Config {
    /// Load the YAML file at `path`, or the defaults when no file is given.
    #[instrument(level = "info")]
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config = match path {
            Some(path) => {
                let raw = std::fs::read_to_string(path).map_err(|e| {
                    NewsError::Configuration(format!("cannot read {}: {e}", path.display()))
                })?;
                let config = Self::from_yaml(&raw)?;
                info!(path = %path.display(), "Loaded configuration file");
                config
            }
            None => Self::default(),
        };
        config.validate()?;
        Ok(config)
    }

    pub fn from_yaml(raw: &str) -> Result<Self> {
        serde_yaml::from_str(raw)
            .map_err(|e| NewsError::Configuration(format!("invalid configuration: {e}")))
    }

    /// Apply command-line overrides and expand `~` in directory paths.
    pub fn with_overrides(mut self, src: Option<&str>, dest: Option<&str>) -> Self {
        if let Some(src) = src {
            self.src_dir = PathBuf::from(src);
        }
        if let Some(dest) = dest {
            self.dest_dir = PathBuf::from(dest);
        }
        self.src_dir = expand_home(&self.src_dir);
        self.dest_dir = expand_home(&self.dest_dir);
        self
    }

    pub fn retry_delay(&self) -> Duration {
        Duration::from_secs(self.retry_delay_secs)
    }

    fn validate(&self) -> Result<()> {
        if self.concurrency == 0 {
            return Err(NewsError::Configuration(
                "concurrency must be at least 1".to_string(),
            ));
        }
        if self.report_limit > self.rank_limit {
            return Err(NewsError::Configuration(format!(
                "report_limit ({}) cannot exceed rank_limit ({})",
                self.report_limit, self.rank_limit
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.max_retry, 3);
        assert_eq!(config.retry_delay(), Duration::from_secs(3));
        assert_eq!(config.rank_limit, 100);
        assert_eq!(config.report_limit, 30);
        assert_eq!(config.dictionary, Dictionary::Ipadic);
        assert_eq!(config.on_tokenize_error, TokenizeErrorPolicy::Abort);
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let config = Config::from_yaml("report_limit: 10\non_tokenize_error: skip\n").unwrap();
        assert_eq!(config.report_limit, 10);
        assert_eq!(config.on_tokenize_error, TokenizeErrorPolicy::Skip);
        assert_eq!(config.rank_limit, 100);
        assert_eq!(config.rss_index_url, DEFAULT_RSS_INDEX_URL);
    }

    #[test]
    fn test_unknown_dictionary_is_configuration_error() {
        let err = Config::from_yaml("dictionary: unidic\n").unwrap_err();
        assert!(matches!(err, NewsError::Configuration(_)));
    }

    #[test]
    fn test_load_from_file_and_validate() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "rank_limit: 20\nreport_limit: 40").unwrap();
        let err = Config::load(Some(file.path())).unwrap_err();
        assert!(err.is_fatal());

        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "src_dir: /data/raw\ndictionary: ipadic-neologd").unwrap();
        let config = Config::load(Some(file.path())).unwrap();
        assert_eq!(config.src_dir, PathBuf::from("/data/raw"));
        assert_eq!(config.dictionary, Dictionary::IpadicNeologd);
    }

    #[test]
    fn test_misspelled_key_is_rejected() {
        let err = Config::from_yaml("report_limt: 10\n").unwrap_err();
        assert!(err.is_fatal());
        assert!(err.to_string().contains("report_limt"));
    }

    #[test]
    fn test_cli_overrides_win() {
        let config = Config::default().with_overrides(Some("/in"), None);
        assert_eq!(config.src_dir, PathBuf::from("/in"));
        assert!(config.dest_dir.ends_with("Desktop"));
    }
}
