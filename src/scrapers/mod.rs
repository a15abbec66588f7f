//! Feed discovery, download and parsing.
//!
//! # Submodules
//!
//! | Module | Role |
//! |--------|------|
//! | [`yahoo`] | Scrape the portal's RSS index page and download each feed |
//! | [`rss`] | Parse downloaded RSS / Atom documents |
//!
//! Downloads use [`crate::fetch::RetryFetch`], run a bounded number of
//! requests concurrently and log-and-skip failed feeds.

pub mod rss;
pub mod yahoo;

use encoding_rs::{Encoding, UTF_8, UTF_16BE, UTF_16LE};
use tracing::debug;

/// Bytes scanned for a `charset=` or `encoding=` declaration.
const SNIFF_LEN: usize = 1024;

/// Decode a fetched HTML or XML document to text.
///
/// A byte order mark wins, then a charset declared near the top of the
/// document (`<meta charset>`, `Content-Type` meta or the XML declaration),
/// then UTF-8. Malformed sequences become U+FFFD.
pub fn decode_document(bytes: &[u8]) -> String {
    let declared = declared_encoding(bytes).unwrap_or(UTF_8);
    let (text, used, had_errors) = declared.decode(bytes);
    if had_errors {
        debug!(encoding = used.name(), "Document contained malformed sequences");
    }
    text.into_owned()
}

fn declared_encoding(bytes: &[u8]) -> Option<&'static Encoding> {
    let head = String::from_utf8_lossy(&bytes[..bytes.len().min(SNIFF_LEN)]).to_ascii_lowercase();
    ["charset=", "encoding="].iter().find_map(|key| {
        let start = head.find(key)? + key.len();
        let label: String = head[start..]
            .trim_start_matches(['"', '\''])
            .chars()
            .take_while(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | ':' | '.'))
            .collect();
        let encoding = Encoding::for_label(label.as_bytes())?;
        // An ASCII-readable declaration cannot be UTF-16.
        if encoding == UTF_16LE || encoding == UTF_16BE {
            Some(UTF_8)
        } else {
            Some(encoding)
        }
    })
}
