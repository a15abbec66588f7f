//! Command-line interface definitions for News Topics.
//!
//! Every stage of the pipeline is a subcommand. Directory options are global
//! and may also come from the environment or a YAML config file.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Command-line arguments for the News Topics application.
///
/// # Examples
///
/// ```sh
/// # Discover feeds, then download them
/// news_topics feeds --dest ~/news
/// news_topics rss --src ~/news --dest ~/news
///
/// # Build the ranking for a week
/// news_topics json --src ~/news --dest ~/news --date 20240101,20240107
/// news_topics analysis --src ~/news --dest ~/news --date 20240101,20240107
/// news_topics markdown --src ~/news --dest ~/site --date 20240101,20240107
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Optional path to a config.yaml file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Source directory (overrides `src_dir` from the config file)
    #[arg(long, env = "NEWS_TOPICS_SRC", global = true)]
    pub src: Option<String>,

    /// Destination directory (overrides `dest_dir` from the config file)
    #[arg(long, env = "NEWS_TOPICS_DEST", global = true)]
    pub dest: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Fetch the news portal's RSS feed list
    Feeds,
    /// Download every listed RSS feed into today's directory
    Rss,
    /// Extract the articles of the target date from downloaded RSS files
    Json(DateArgs),
    /// Rank person-name keywords found in the article titles
    Analysis(DateArgs),
    /// Render the keyword ranking as Markdown
    Markdown(DateArgs),
}

#[derive(Args, Debug)]
pub struct DateArgs {
    /// Target date in 'YYYYmmdd' or period in 'YYYYmmdd,YYYYmmdd'
    /// (e.g. date: '20180101', period: '20180101,20180131')
    #[arg(long, required = true, value_delimiter = ',')]
    pub date: Vec<String>,
}
