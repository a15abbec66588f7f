//! # News Topics
//!
//! A daily ranking of the people who made the news. The pipeline scrapes a
//! news portal's RSS index, downloads every feed, keeps the articles of a
//! target date, extracts person names from their headlines with a Japanese
//! morphological analyzer, ranks the names by how many articles mention them
//! and renders the ranking as Markdown.
//!
//! ## Usage
//!
//! ```sh
//! news_topics feeds --dest ./data
//! news_topics rss --src ./data --dest ./data
//! news_topics json --src ./data --dest ./data --date 20240102
//! news_topics analysis --src ./data --dest ./data --date 20240102
//! news_topics markdown --src ./data --dest ./site --date 20240102
//! ```
//!
//! ## Architecture
//!
//! 1. **Indexing**: collect feed links from the RSS index page
//! 2. **Fetching**: download each feed into today's directory
//! 3. **Transforming**: keep the items published on the target date
//! 4. **Analysis**: normalize, tokenize, filter person names, rank
//! 5. **Output**: write `topic.json` and render `report.md`

use chrono::Local;
use clap::Parser;
use std::error::Error;
use std::time::Instant;
use tracing::{debug, error, info, instrument};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod analysis;
mod articles;
mod cli;
mod config;
mod errors;
mod fetch;
mod models;
mod outputs;
mod pipeline;
mod scrapers;
mod utils;

use analysis::tokenizer::LinderaTokenizer;
use cli::{Cli, Command};
use config::Config;
use errors::Result;
use fetch::{HttpFetcher, RetryFetch};
use utils::{ensure_writable_dir, expand_dates, for_each_date};

#[tokio::main]
async fn main() -> std::result::Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = Instant::now();
    let args = Cli::parse();
    debug!(?args, "Parsed CLI arguments");

    let config = Config::load(args.config.as_deref())?
        .with_overrides(args.src.as_deref(), args.dest.as_deref());
    info!(src = %config.src_dir.display(), dest = %config.dest_dir.display(), "Configuration resolved");

    if let Err(e) = run(&args.command, &config).await {
        error!(error = %e, "Run failed");
        eprintln!("Error: {e}");
        std::process::exit(1);
    }

    let elapsed = start_time.elapsed();
    info!(
        ?elapsed,
        secs = elapsed.as_secs(),
        millis = elapsed.subsec_millis(),
        "Execution complete"
    );
    Ok(())
}

fn retrying_fetcher(config: &Config) -> RetryFetch<HttpFetcher> {
    RetryFetch::new(HttpFetcher::default(), config.max_retry, config.retry_delay())
}

#[instrument(level = "info", skip(config))]
async fn run(command: &Command, config: &Config) -> Result<()> {
    match command {
        Command::Feeds => {
            ensure_writable_dir(&config.dest_dir).await?;
            let count = pipeline::fetch_feed_list(config, &retrying_fetcher(config)).await?;
            info!(count, "Saved RSS feed list");
        }
        Command::Rss => {
            ensure_writable_dir(&config.dest_dir).await?;
            let today = Local::now().date_naive();
            let summary =
                pipeline::fetch_feed_files(config, &retrying_fetcher(config), today).await?;
            info!(saved = summary.saved, failed = summary.failed, "Fetched RSS feeds");
        }
        Command::Json(args) => {
            let dates = expand_dates(&args.date)?;
            for_each_date(&dates, |date| async move {
                let count = pipeline::transform_articles(config, date).await?;
                info!(count, "Extracted articles");
                Ok(())
            })
            .await?;
        }
        Command::Analysis(args) => {
            let dates = expand_dates(&args.date)?;
            // Loaded once for the whole range; dropped on every exit path.
            let tokenizer = LinderaTokenizer::load(config.dictionary)?;
            for_each_date(&dates, |date| {
                pipeline::transform_analysis(config, &tokenizer, date)
            })
            .await?;
        }
        Command::Markdown(args) => {
            let dates = expand_dates(&args.date)?;
            for_each_date(&dates, |date| pipeline::transform_markdown(config, date)).await?;
        }
    }
    Ok(())
}
