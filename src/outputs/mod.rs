//! Reading and writing the date-partitioned files.
//!
//! # Submodules
//!
//! - [`jsonl`]: newline-delimited JSON for feed lists and article records
//! - [`json`]: the ranked keyword document (`topic.json`)
//! - [`markdown`]: the human-readable ranking report (`report.md`)
//!
//! # Layout
//!
//! ```text
//! <dir>/
//! ├── rss.jsonl                 # feed list
//! └── 20240102/
//!     ├── rss/topics/top-picks  # downloaded feed
//!     ├── rss.jsonl             # articles of the day
//!     ├── topic.json            # ranked keywords
//!     └── report.md             # rendered ranking
//! ```

pub mod json;
pub mod jsonl;
pub mod markdown;

use crate::errors::{NewsError, Result};
use std::path::Path;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{info, instrument};

pub const FEED_LIST_FILE: &str = "rss.jsonl";
pub const ARTICLES_FILE: &str = "rss.jsonl";
pub const TOPIC_FILE: &str = "topic.json";
pub const REPORT_FILE: &str = "report.md";

/// Create or truncate `path`, write `bytes` and flush them to disk.
///
/// Parent directories are created as needed.
#[instrument(level = "debug", skip_all, fields(path = %path.display(), bytes = bytes.len()))]
pub async fn write_file(path: &Path, bytes: &[u8]) -> Result<()> {
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir)
            .await
            .map_err(|e| NewsError::output(dir, e))?;
    }
    let mut file = fs::File::create(path)
        .await
        .map_err(|e| NewsError::output(path, e))?;
    file.write_all(bytes)
        .await
        .map_err(|e| NewsError::output(path, e))?;
    file.sync_all()
        .await
        .map_err(|e| NewsError::output(path, e))?;
    info!(path = %path.display(), "Wrote file");
    Ok(())
}
