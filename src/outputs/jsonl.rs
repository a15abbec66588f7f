//! Newline-delimited JSON files.

use crate::errors::{NewsError, Result};
use crate::outputs::write_file;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::path::Path;
use tokio::fs;
use tracing::{info, instrument};

/// Read one JSON value per non-blank line.
///
/// # Errors
///
/// [`NewsError::Input`] if the file cannot be read or a line does not parse;
/// the message names the offending line.
#[instrument(level = "info", skip_all, fields(path = %path.display()))]
pub async fn read_jsonl<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    let raw = fs::read_to_string(path)
        .await
        .map_err(|e| NewsError::input(path, e))?;

    let rows = raw
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(i, line)| {
            serde_json::from_str(line)
                .map_err(|e| NewsError::input(path, format!("line {}: {e}", i + 1)))
        })
        .collect::<Result<Vec<T>>>()?;

    info!(count = rows.len(), "Read JSONL rows");
    Ok(rows)
}

/// Write `rows` one JSON object per line, replacing any existing file.
#[instrument(level = "info", skip_all, fields(path = %path.display(), count = rows.len()))]
pub async fn write_jsonl<T: Serialize>(path: &Path, rows: &[T]) -> Result<()> {
    let mut buf = String::new();
    for row in rows {
        let line = serde_json::to_string(row).map_err(|e| NewsError::output(path, e))?;
        buf.push_str(&line);
        buf.push('\n');
    }
    write_file(path, buf.as_bytes()).await
}
