//! Turn downloaded feeds into the article records of one day.
//!
//! For every feed in the feed list, the file `<date dir>/<feed id>` is parsed
//! and each item published on the target date (in local time) becomes a
//! [`NewsArticleRecord`]. Articles listed in several feeds are kept once,
//! under the first feed that carried them.

use crate::models::{Feed, NewsArticleRecord};
use crate::scrapers::decode_document;
use crate::scrapers::rss::{ParsedFeed, parse_feed};
use crate::utils::start_of_day;
use chrono::{Local, NaiveDate};
use std::collections::HashSet;
use std::path::Path;
use tokio::fs;
use tracing::{debug, info, instrument, warn};

/// Collect the articles of `date` from the feeds downloaded into `date_dir`.
///
/// Feeds without a downloaded file are skipped silently (the feed list may
/// have changed since the download). Files that cannot be read or parsed are
/// logged and skipped.
#[instrument(level = "info", skip_all, fields(date_dir = %date_dir.display(), feeds = feeds.len()))]
pub async fn collect_articles(
    feeds: &[Feed],
    date_dir: &Path,
    date: NaiveDate,
) -> Vec<NewsArticleRecord> {
    let mut seen = HashSet::new();
    let mut records = Vec::new();

    for feed in feeds {
        let Some(relative) = feed.relative_path() else {
            warn!(id = %feed.id, "Feed id is not a safe relative path");
            continue;
        };
        let path = date_dir.join(relative);
        if !fs::metadata(&path).await.is_ok_and(|m| m.is_file()) {
            debug!(path = %path.display(), "No downloaded feed file");
            continue;
        }

        let xml = match fs::read(&path).await {
            Ok(bytes) => decode_document(&bytes),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Failed to open RSS file");
                continue;
            }
        };
        let parsed = match parse_feed(&xml) {
            Ok(parsed) => parsed,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Failed to parse RSS");
                continue;
            }
        };

        let before = records.len();
        select_items(parsed, date, &mut seen, &mut records);
        debug!(id = %feed.id, added = records.len() - before, "Selected items");
    }

    info!(count = records.len(), "Collected articles");
    records
}

/// Append the items of `feed` published on `date` whose links are not in `seen`.
///
/// An item without timestamps is assumed to belong to `date`.
pub fn select_items(
    feed: ParsedFeed,
    date: NaiveDate,
    seen: &mut HashSet<String>,
    out: &mut Vec<NewsArticleRecord>,
) {
    for item in feed.items {
        if seen.contains(&item.link) {
            continue;
        }
        let stamp = item
            .published
            .or(item.updated)
            .unwrap_or_else(|| start_of_day(date));
        let local = stamp.with_timezone(&Local);
        if local.date_naive() != date {
            continue;
        }

        seen.insert(item.link.clone());
        out.push(NewsArticleRecord {
            date: local.fixed_offset(),
            url: item.link,
            name: feed.title.clone(),
            title: item.title,
            category: None,
        });
    }
}
