//! The five pipeline stages behind the CLI subcommands.
//!
//! | Stage | Reads | Writes |
//! |-------|-------|--------|
//! | [`fetch_feed_list`] | RSS index page | `dest/rss.jsonl` |
//! | [`fetch_feed_files`] | `src/rss.jsonl` | `dest/<today>/<feed id>` |
//! | [`transform_articles`] | `src/rss.jsonl`, `src/<date>/<feed id>` | `dest/<date>/rss.jsonl` |
//! | [`transform_analysis`] | `src/<date>/rss.jsonl` | `dest/<date>/topic.json` |
//! | [`transform_markdown`] | `src/<date>/topic.json` | `dest/<date>/report.md` |

use crate::analysis::tokenizer::Tokenize;
use crate::analysis::{build_content, rank_keywords};
use crate::articles::collect_articles;
use crate::config::Config;
use crate::errors::Result;
use crate::fetch::FetchAsync;
use crate::models::{Feed, NewsArticleRecord};
use crate::outputs::{
    ARTICLES_FILE, FEED_LIST_FILE, REPORT_FILE, TOPIC_FILE, json, jsonl, markdown,
};
use crate::scrapers::yahoo::{self, DownloadSummary};
use crate::utils::date_key;
use chrono::NaiveDate;
use tracing::{info, instrument};

/// Scrape the RSS index and save the feed list.
///
/// # Returns
///
/// The number of feeds found. Nothing is written when there are none.
#[instrument(level = "info", skip_all, fields(dest = %config.dest_dir.display()))]
pub async fn fetch_feed_list<F: FetchAsync>(config: &Config, fetcher: &F) -> Result<usize> {
    let feeds = yahoo::index_feeds(fetcher, &config.rss_index_url).await?;
    if !feeds.is_empty() {
        jsonl::write_jsonl(&config.dest_dir.join(FEED_LIST_FILE), &feeds).await?;
    }
    Ok(feeds.len())
}

/// Download every listed feed into the date directory of `today`.
#[instrument(level = "info", skip_all, fields(today = %date_key(today)))]
pub async fn fetch_feed_files<F: FetchAsync>(
    config: &Config,
    fetcher: &F,
    today: NaiveDate,
) -> Result<DownloadSummary> {
    let feeds: Vec<Feed> = jsonl::read_jsonl(&config.src_dir.join(FEED_LIST_FILE)).await?;
    let out_dir = config.dest_dir.join(date_key(today));
    Ok(yahoo::download_feeds(fetcher, &feeds, &out_dir, config.concurrency).await)
}

/// Extract the articles published on `date` from its downloaded feeds.
///
/// # Returns
///
/// The number of articles written. Nothing is written when there are none.
#[instrument(level = "info", skip_all, fields(date = %date_key(date)))]
pub async fn transform_articles(config: &Config, date: NaiveDate) -> Result<usize> {
    let feeds: Vec<Feed> = jsonl::read_jsonl(&config.src_dir.join(FEED_LIST_FILE)).await?;
    let records = collect_articles(&feeds, &config.src_dir.join(date_key(date)), date).await;
    if !records.is_empty() {
        let path = config.dest_dir.join(date_key(date)).join(ARTICLES_FILE);
        jsonl::write_jsonl(&path, &records).await?;
    }
    Ok(records.len())
}

/// Rank the person names in the titles of `date` and write `topic.json`.
#[instrument(level = "info", skip_all, fields(date = %date_key(date)))]
pub async fn transform_analysis<T: Tokenize>(
    config: &Config,
    tokenizer: &T,
    date: NaiveDate,
) -> Result<()> {
    let key = date_key(date);
    let records: Vec<NewsArticleRecord> =
        jsonl::read_jsonl(&config.src_dir.join(&key).join(ARTICLES_FILE)).await?;

    let ranked = rank_keywords(tokenizer, &records, config)?;
    let content = build_content(date, ranked, config.report_limit);
    info!(items = content.items.len(), "Built ranked content");

    json::write_content(&config.dest_dir.join(&key).join(TOPIC_FILE), &content).await
}

/// Render the `topic.json` of `date` as `report.md`.
#[instrument(level = "info", skip_all, fields(date = %date_key(date)))]
pub async fn transform_markdown(config: &Config, date: NaiveDate) -> Result<()> {
    let key = date_key(date);
    let content = json::read_content(&config.src_dir.join(&key).join(TOPIC_FILE)).await?;
    markdown::write_report(&config.dest_dir.join(&key).join(REPORT_FILE), &content).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::tokenizer::testing::WhitespaceTokenizer;
    use crate::errors::NewsError;
    use crate::models::RankedContent;
    use crate::utils::start_of_day;
    use chrono::Duration;
    use std::path::Path;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 2).unwrap()
    }

    /// Source and destination share one temporary directory.
    fn config(dir: &Path) -> Config {
        Config {
            src_dir: dir.to_path_buf(),
            dest_dir: dir.to_path_buf(),
            ..Config::default()
        }
    }

    fn record(title: &str, url: &str) -> NewsArticleRecord {
        NewsArticleRecord {
            date: start_of_day(date()) + Duration::hours(9),
            url: url.to_string(),
            name: "主要".to_string(),
            title: title.to_string(),
            category: None,
        }
    }

    struct Page(&'static str);

    impl FetchAsync for Page {
        async fn fetch(&self, _url: &str) -> Result<Vec<u8>> {
            Ok(self.0.as_bytes().to_vec())
        }
    }

    #[tokio::test]
    async fn test_fetch_feed_list_writes_jsonl() {
        let tmp = tempfile::tempdir().unwrap();
        let page = Page(r#"<a href="/rss/topics/top-picks.xml">主要</a><a href="/about">about</a>"#);

        let count = fetch_feed_list(&config(tmp.path()), &page).await.unwrap();

        assert_eq!(count, 1);
        let feeds: Vec<Feed> = jsonl::read_jsonl(&tmp.path().join(FEED_LIST_FILE))
            .await
            .unwrap();
        assert_eq!(feeds[0].id, "rss/topics/top-picks");
    }

    #[tokio::test]
    async fn test_fetch_feed_list_skips_empty_index() {
        let tmp = tempfile::tempdir().unwrap();
        let count = fetch_feed_list(&config(tmp.path()), &Page("<html></html>"))
            .await
            .unwrap();
        assert_eq!(count, 0);
        assert!(!tmp.path().join(FEED_LIST_FILE).exists());
    }

    #[tokio::test]
    async fn test_fetch_feed_files_saves_under_today() {
        let tmp = tempfile::tempdir().unwrap();
        let feeds = vec![Feed {
            id: "rss/topics/top-picks".to_string(),
            name: "主要".to_string(),
            url: "https://news.yahoo.co.jp/rss/topics/top-picks.xml".to_string(),
        }];
        jsonl::write_jsonl(&tmp.path().join(FEED_LIST_FILE), &feeds)
            .await
            .unwrap();

        let summary = fetch_feed_files(&config(tmp.path()), &Page("<rss/>"), date())
            .await
            .unwrap();

        assert_eq!(summary.saved, 1);
        assert!(tmp.path().join("20240102/rss/topics/top-picks").is_file());
    }

    #[tokio::test]
    async fn test_transform_articles_without_feed_list_fails() {
        let tmp = tempfile::tempdir().unwrap();
        let err = transform_articles(&config(tmp.path()), date())
            .await
            .unwrap_err();
        assert!(matches!(err, NewsError::Input { .. }));
    }

    #[tokio::test]
    async fn test_analysis_then_markdown() {
        let tmp = tempfile::tempdir().unwrap();
        let config = config(tmp.path());
        let records = vec![
            record("Tanaka meets Suzuki (video)", "https://example.com/1"),
            record("Tanaka visits Osaka", "https://example.com/2"),
        ];
        jsonl::write_jsonl(&tmp.path().join("20240102").join(ARTICLES_FILE), &records)
            .await
            .unwrap();
        let tokenizer = WhitespaceTokenizer::new(&["tanaka", "suzuki"]);

        transform_analysis(&config, &tokenizer, date()).await.unwrap();

        let content: RankedContent = json::read_content(&tmp.path().join("20240102/topic.json"))
            .await
            .unwrap();
        assert_eq!(content.format_date, "2024/01/02");
        assert_eq!(content.items[0].word, "tanaka");
        assert_eq!(content.items[0].count, 2);
        assert_eq!(content.items[1].word, "suzuki");

        transform_markdown(&config, date()).await.unwrap();
        let md = std::fs::read_to_string(tmp.path().join("20240102/report.md")).unwrap();
        assert!(md.contains("### 1位 tanaka （2記事）"));
        assert!(md.contains("- [Tanaka visits Osaka](https://example.com/2)"));
    }

    #[tokio::test]
    async fn test_analysis_missing_input_is_input_error() {
        let tmp = tempfile::tempdir().unwrap();
        let tokenizer = WhitespaceTokenizer::new(&[]);
        let err = transform_analysis(&config(tmp.path()), &tokenizer, date())
            .await
            .unwrap_err();
        assert!(matches!(err, NewsError::Input { .. }));
        assert!(!tmp.path().join("20240102/topic.json").exists());
    }

    #[tokio::test]
    async fn test_markdown_rejects_empty_ranking() {
        let tmp = tempfile::tempdir().unwrap();
        let config = config(tmp.path());
        let records = vec![record("stocks rally", "https://example.com/1")];
        jsonl::write_jsonl(&tmp.path().join("20240102").join(ARTICLES_FILE), &records)
            .await
            .unwrap();

        transform_analysis(&config, &WhitespaceTokenizer::new(&["tanaka"]), date())
            .await
            .unwrap();
        let err = transform_markdown(&config, date()).await.unwrap_err();
        assert!(matches!(err, NewsError::EmptyContent(_)));
    }
}
