//! Keyword extraction and ranking.
//!
//! This is the analytical core of the pipeline:
//!
//! 1. [`normalize`]: strip bracketed annotations from each headline
//! 2. [`tokenizer`]: split the cleaned headline into tagged morphemes
//! 3. [`extract`]: keep general person-name proper nouns and group articles by name
//! 4. [`rank`]: order names by article count and truncate
//!
//! [`rank_keywords`] runs steps 1-4; [`build_content`] wraps the result into
//! the dated [`RankedContent`] that is written as `topic.json`.

pub mod extract;
pub mod normalize;
pub mod rank;
pub mod tokenizer;

use crate::config::Config;
use crate::errors::Result;
use crate::models::{ContentItem, NewsArticleRecord, RankedContent};
use crate::utils::start_of_day;
use chrono::NaiveDate;
use extract::KeywordExtractor;
use tokenizer::Tokenize;
use tracing::{info, instrument, warn};

/// Extract and rank person-name keywords from a batch of articles.
#[instrument(level = "info", skip_all, fields(articles = records.len(), limit = config.rank_limit))]
pub fn rank_keywords<T: Tokenize>(
    tokenizer: &T,
    records: &[NewsArticleRecord],
    config: &Config,
) -> Result<Vec<ContentItem>> {
    let keywords = KeywordExtractor::new(tokenizer, config.on_tokenize_error).extract(records)?;
    if keywords.is_empty() {
        warn!("No person names found in any title");
    }
    let distinct = keywords.len();
    let ranked = rank::rank(keywords, config.rank_limit);
    info!(distinct, ranked = ranked.len(), "Ranked keywords");
    Ok(ranked)
}

/// Assemble the report for `date`, keeping the top `report_limit` keywords.
pub fn build_content(
    date: NaiveDate,
    mut ranked: Vec<ContentItem>,
    report_limit: usize,
) -> RankedContent {
    ranked.truncate(report_limit);
    RankedContent::new(start_of_day(date), ranked)
}
