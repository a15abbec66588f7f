//! The ranked keyword document, `topic.json`.
//!
//! One JSON object per date directory, consumed by the Markdown renderer:
//!
//! ```text
//! dest/
//! └── 20240102/
//!     └── topic.json
//! ```

use crate::errors::{NewsError, Result};
use crate::models::RankedContent;
use crate::outputs::write_file;
use std::path::Path;
use tokio::fs;
use tracing::{info, instrument};

/// Serialize `content` to `path`, replacing any existing file.
#[instrument(level = "info", skip_all, fields(path = %path.display(), items = content.items.len()))]
pub async fn write_content(path: &Path, content: &RankedContent) -> Result<()> {
    let mut json = serde_json::to_string(content).map_err(|e| NewsError::output(path, e))?;
    json.push('\n');
    write_file(path, json.as_bytes()).await?;
    info!(date = %content.format_date, "Wrote ranked keywords");
    Ok(())
}

/// Load a previously written [`RankedContent`].
#[instrument(level = "info", skip_all, fields(path = %path.display()))]
pub async fn read_content(path: &Path) -> Result<RankedContent> {
    let raw = fs::read_to_string(path)
        .await
        .map_err(|e| NewsError::input(path, e))?;
    serde_json::from_str(&raw).map_err(|e| NewsError::input(path, e))
}
