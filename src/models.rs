//! Data models flowing between the pipeline stages.
//!
//! - [`Feed`]: one RSS source discovered on the portal's index page
//! - [`NewsArticleRecord`]: one article published on the target date
//! - [`ContentItem`]: a person-name keyword with the articles that mention it
//! - [`RankedContent`]: the ranked keyword list persisted as `topic.json`
//!
//! Every model serializes with snake_case keys matching the on-disk JSON and
//! JSONL files.

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use std::path::{Component, Path, PathBuf};

/// An RSS feed listed on the portal's RSS index page.
///
/// The `id` doubles as the relative path of the downloaded feed file inside
/// a date directory, e.g. `rss/topics/top-picks`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Feed {
    /// Link path without the leading `/` and the trailing `.xml`.
    pub id: String,
    /// Display name taken from the anchor text.
    pub name: String,
    /// Absolute URL of the feed.
    pub url: String,
}

impl Feed {
    /// Location of the downloaded feed inside a date directory.
    ///
    /// Returns `None` for ids that would escape the directory (absolute
    /// paths, `..` components) or are empty.
    pub fn relative_path(&self) -> Option<PathBuf> {
        let path = Path::new(&self.id);
        let safe = path
            .components()
            .all(|c| matches!(c, Component::Normal(_)));
        (safe && !self.id.is_empty()).then(|| path.to_path_buf())
    }
}

/// An article extracted from a downloaded feed for one target date.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct NewsArticleRecord {
    /// Publication timestamp in local time (RFC3339 on disk).
    pub date: DateTime<FixedOffset>,
    pub url: String,
    /// Title of the feed channel the article came from.
    pub name: String,
    pub title: String,
    /// Not used by the ranking; kept so records from other producers load.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

/// Reference to an article supporting a keyword.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Article {
    /// The original, unnormalized headline.
    pub title: String,
    pub url: String,
}

/// A keyword and every article whose title mentions it.
///
/// `count` always equals `articles.len()`; only [`ContentItem::push`]
/// mutates the article list.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ContentItem {
    pub word: String,
    pub count: usize,
    pub articles: Vec<Article>,
}

impl ContentItem {
    pub fn new(word: impl Into<String>) -> Self {
        Self {
            word: word.into(),
            count: 0,
            articles: Vec::new(),
        }
    }

    pub fn push(&mut self, article: Article) {
        self.articles.push(article);
        self.count = self.articles.len();
    }
}

/// The ranked keyword list for one date.
///
/// # JSON Schema
///
/// ```text
/// {
///   "format_date": "2024/01/02",
///   "date": "2024-01-02T00:00:00+09:00",
///   "items": [{"word": "...", "count": 2, "articles": [{"title": "...", "url": "..."}]}]
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct RankedContent {
    /// The date as `YYYY/MM/DD`, used in report headings.
    pub format_date: String,
    /// Start of the target day in local time.
    pub date: DateTime<FixedOffset>,
    pub items: Vec<ContentItem>,
}

impl RankedContent {
    pub fn new(date: DateTime<FixedOffset>, items: Vec<ContentItem>) -> Self {
        Self {
            format_date: date.format("%Y/%m/%d").to_string(),
            date,
            items,
        }
    }
}
