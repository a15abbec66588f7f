//! Error types shared by every pipeline stage.
//!
//! Variants map onto how a failure is handled by the caller:
//!
//! | Variant | Scope |
//! |---------|-------|
//! | [`NewsError::TokenizerUnavailable`], [`NewsError::Configuration`] | fatal, abort the process |
//! | [`NewsError::Input`], [`NewsError::Output`], [`NewsError::EmptyContent`] | fail the current date only |
//! | [`NewsError::Tokenization`] | fail the current date (or skip the article, see `on_tokenize_error`) |
//! | [`NewsError::Fetch`], [`NewsError::FeedParse`] | logged and skipped per feed |
//! | [`NewsError::Batch`] | aggregate of per-date failures across a date range |

use chrono::NaiveDate;
use std::fmt;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum NewsError {
    #[error("tokenizer unavailable: {0}")]
    TokenizerUnavailable(String),

    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("failed to read input '{path}': {reason}")]
    Input { path: String, reason: String },

    #[error("failed to tokenize title '{title}': {reason}")]
    Tokenization { title: String, reason: String },

    #[error("failed to write output '{path}': {reason}")]
    Output { path: String, reason: String },

    #[error("request to {url} failed: {reason}")]
    Fetch { url: String, reason: String },

    #[error("failed to parse feed '{path}': {reason}")]
    FeedParse { path: String, reason: String },

    #[error("no ranked keywords in '{0}'")]
    EmptyContent(String),

    #[error(transparent)]
    Batch(#[from] BatchFailure),
}

impl NewsError {
    pub fn input(path: &Path, reason: impl fmt::Display) -> Self {
        NewsError::Input {
            path: path.display().to_string(),
            reason: reason.to_string(),
        }
    }

    pub fn output(path: &Path, reason: impl fmt::Display) -> Self {
        NewsError::Output {
            path: path.display().to_string(),
            reason: reason.to_string(),
        }
    }

    pub fn fetch(url: &str, reason: impl fmt::Display) -> Self {
        NewsError::Fetch {
            url: url.to_string(),
            reason: reason.to_string(),
        }
    }

    /// Errors that must stop the whole process instead of a single date.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            NewsError::TokenizerUnavailable(_) | NewsError::Configuration(_)
        )
    }
}

/// Failures collected while walking a date range.
#[derive(Debug, Default)]
pub struct BatchFailure {
    pub attempted: usize,
    pub failures: Vec<(NaiveDate, NewsError)>,
}

impl BatchFailure {
    pub fn succeeded(&self) -> usize {
        self.attempted - self.failures.len()
    }
}

impl fmt::Display for BatchFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} of {} date(s) failed",
            self.failures.len(),
            self.attempted
        )?;
        for (date, err) in &self.failures {
            write!(f, "\n  {}: {}", date.format("%Y%m%d"), err)?;
        }
        Ok(())
    }
}

impl std::error::Error for BatchFailure {}

pub type Result<T> = std::result::Result<T, NewsError>;
