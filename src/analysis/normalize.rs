//! Headline clean-up applied before tokenization.
//!
//! Portal headlines often carry bracketed annotations such as `（動画）`,
//! `【速報】` or `[写真]`. Those confuse the morphological analyzer, so they
//! are cut away before the title is tokenized. The stored article keeps the
//! original title.

/// Opening markers, applied in this order; each truncates at its last occurrence.
const OPENING_MARKERS: [char; 5] = ['(', '（', '[', '〈', '【'];

/// Substrings dropped anywhere in the title.
const NOISE: [&str; 2] = [":", "にも"];

/// Normalize a raw headline for tokenization.
///
/// 1. Trim and lower-case.
/// 2. For each of `(`, `（`, `[`, `〈`, `【` in turn, cut the title at the last
///    occurrence of that marker.
/// 3. If a `]` remains, drop everything before the first one.
/// 4. Remove every `:` and `にも`.
///
/// Surrounding whitespace left over by the cuts is trimmed as well.
pub fn normalize_title(raw: &str) -> String {
    let mut title = raw.trim().to_lowercase();

    for marker in OPENING_MARKERS {
        if let Some(i) = title.rfind(marker) {
            title.truncate(i);
        }
    }

    if let Some(i) = title.find(']') {
        title.drain(..i);
    }

    for noise in NOISE {
        title = title.replace(noise, "");
    }
    title.trim().to_string()
}
