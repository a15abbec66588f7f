//! Yahoo! News RSS index scraper and feed downloader.
//!
//! The portal publishes a single index page (`https://news.yahoo.co.jp/rss`)
//! linking to every category feed with relative URLs such as
//! `/rss/topics/top-picks.xml`. This module turns that page into a list of
//! [`Feed`]s and downloads each feed into a date directory.

use crate::errors::{NewsError, Result};
use crate::fetch::FetchAsync;
use crate::models::Feed;
use crate::scrapers::decode_document;
use futures::stream::{self, StreamExt};
use itertools::Itertools;
use once_cell::sync::Lazy;
use scraper::{Html, Selector};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, error, info, instrument, warn};
use url::Url;

static FEED_LINK: Lazy<Selector> =
    Lazy::new(|| Selector::parse(r#"a[href^="/rss/"]"#).unwrap());

/// Outcome of downloading a feed list.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct DownloadSummary {
    pub saved: usize,
    pub failed: usize,
}

/// Fetch the RSS index page and extract its feed links.
///
/// # Returns
///
/// Feeds in document order, de-duplicated by link.
#[instrument(level = "info", skip(fetcher))]
pub async fn index_feeds<F: FetchAsync>(fetcher: &F, index_url: &str) -> Result<Vec<Feed>> {
    let base = Url::parse(index_url)
        .map_err(|e| NewsError::Configuration(format!("invalid RSS index URL {index_url}: {e}")))?;
    let body = fetcher.fetch(index_url).await?;
    let html = decode_document(&body);
    let feeds = parse_feed_links(&html, &base);

    info!(count = feeds.len(), source = index_url, "Indexed RSS feeds");
    debug!(ids = ?feeds.iter().map(|f| &f.id).collect::<Vec<_>>(), "Feed ids");
    Ok(feeds)
}

/// Extract every `/rss/...` anchor of the index page as a [`Feed`].
pub fn parse_feed_links(html: &str, base: &Url) -> Vec<Feed> {
    let document = Html::parse_document(html);
    document
        .select(&FEED_LINK)
        .filter_map(|element| {
            let href = element.value().attr("href")?;
            let url = base.join(href).ok()?;
            let path = href.trim_start_matches('/');
            let id = path.strip_suffix(".xml").unwrap_or(path);
            Some((href.to_string(), Feed {
                id: id.to_string(),
                name: element.text().collect::<String>().trim().to_string(),
                url: url.to_string(),
            }))
        })
        .unique_by(|(href, _)| href.clone())
        .map(|(_, feed)| feed)
        .collect()
}

/// Download every feed into `out_dir`, `concurrency` requests at a time.
///
/// Each feed is written to `out_dir/<feed id>`. Failed downloads are logged
/// and counted without failing the batch.
#[instrument(level = "info", skip_all, fields(out_dir = %out_dir.display(), feeds = feeds.len()))]
pub async fn download_feeds<F: FetchAsync>(
    fetcher: &F,
    feeds: &[Feed],
    out_dir: &Path,
    concurrency: usize,
) -> DownloadSummary {
    let results: Vec<bool> = stream::iter(feeds)
        .map(|feed| async move {
            match download_feed(fetcher, feed, out_dir).await {
                Ok(path) => {
                    debug!(url = %feed.url, path = %path.display(), "Saved feed");
                    true
                }
                Err(e) => {
                    error!(url = %feed.url, error = %e, "Failed to fetch RSS");
                    false
                }
            }
        })
        .buffer_unordered(concurrency.max(1))
        .collect()
        .await;

    let saved = results.iter().filter(|ok| **ok).count();
    let summary = DownloadSummary {
        saved,
        failed: results.len() - saved,
    };
    info!(saved = summary.saved, failed = summary.failed, "Downloaded feeds");
    summary
}

async fn download_feed<F: FetchAsync>(fetcher: &F, feed: &Feed, out_dir: &Path) -> Result<PathBuf> {
    let Some(relative) = feed.relative_path() else {
        warn!(id = %feed.id, "Feed id is not a safe relative path");
        return Err(NewsError::fetch(&feed.url, format!("unusable feed id '{}'", feed.id)));
    };
    let body = fetcher.fetch(&feed.url).await?;

    let path = out_dir.join(relative);
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir)
            .await
            .map_err(|e| NewsError::output(dir, e))?;
    }
    fs::write(&path, &body)
        .await
        .map_err(|e| NewsError::output(&path, e))?;
    Ok(path)
}
