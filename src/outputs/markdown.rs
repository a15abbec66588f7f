//! Markdown rendering of the keyword ranking.
//!
//! The report starts with YAML front matter (title and date) so static site
//! generators can pick it up, followed by one section per keyword:
//!
//! ```text
//! ---
//! title: "2024/01/02 に話題になったキーワードランキング"
//! date: 2024-01-02T00:00:00+09:00
//! ---
//!
//! ### 1位 田中角栄 （2記事）
//! - [headline](https://...)
//! - [headline](https://...)
//! ```

use crate::errors::{NewsError, Result};
use crate::models::RankedContent;
use crate::outputs::write_file;
use chrono::SecondsFormat;
use std::fmt::Write;
use std::path::Path;
use tracing::{info, instrument};

/// Render `content` as a Markdown report with 1-based ranks.
pub fn render_report(content: &RankedContent) -> String {
    let mut md = String::new();

    writeln!(md, "---").unwrap();
    writeln!(
        md,
        "title: \"{} に話題になったキーワードランキング\"",
        content.format_date
    )
    .unwrap();
    writeln!(
        md,
        "date: {}",
        content.date.to_rfc3339_opts(SecondsFormat::Secs, true)
    )
    .unwrap();
    writeln!(md, "---\n").unwrap();

    for (i, item) in content.items.iter().enumerate() {
        writeln!(md, "### {}位 {} （{}記事）", i + 1, item.word, item.count).unwrap();
        for article in &item.articles {
            writeln!(md, "- [{}]({})", escape_link_text(&article.title), article.url).unwrap();
        }
        writeln!(md).unwrap();
    }

    md
}

/// Square brackets inside link text would end the link early.
fn escape_link_text(text: &str) -> String {
    text.replace('[', "\\[").replace(']', "\\]")
}

/// Render `content` and write it to `path`.
///
/// # Errors
///
/// [`NewsError::EmptyContent`] when there is nothing to rank; the report is
/// not written in that case.
#[instrument(level = "info", skip_all, fields(path = %path.display(), items = content.items.len()))]
pub async fn write_report(path: &Path, content: &RankedContent) -> Result<()> {
    if content.items.is_empty() {
        return Err(NewsError::EmptyContent(content.format_date.clone()));
    }
    let md = render_report(content);
    write_file(path, md.as_bytes()).await?;
    info!(bytes = md.len(), "Wrote Markdown report");
    Ok(())
}
