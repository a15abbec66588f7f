//! Keyword ranking by article count.

use crate::analysis::extract::KeywordMap;
use crate::models::ContentItem;

/// Keywords kept by [`rank`] unless configured otherwise.
pub const DEFAULT_RANK_LIMIT: usize = 100;

/// Sort keywords by descending article count and keep at most `limit`.
///
/// Keywords with equal counts stay in first-seen order, so the same input
/// always produces the same ranking.
pub fn rank(keywords: KeywordMap, limit: usize) -> Vec<ContentItem> {
    let mut items = keywords.into_items();
    // Stable sort: ties keep insertion order.
    items.sort_by(|a, b| b.count.cmp(&a.count));
    items.truncate(limit);
    items
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Article;

    fn map_from(counts: &[(&str, usize)]) -> KeywordMap {
        let mut map = KeywordMap::default();
        for (word, count) in counts {
            for i in 0..*count {
                map.record(
                    word,
                    Article {
                        title: format!("{word} {i}"),
                        url: format!("https://example.com/{word}/{i}"),
                    },
                );
            }
        }
        map
    }

    #[test]
    fn test_orders_by_count_descending() {
        let ranked = rank(map_from(&[("b", 1), ("a", 3), ("c", 2)]), DEFAULT_RANK_LIMIT);
        let words: Vec<_> = ranked.iter().map(|i| i.word.as_str()).collect();
        assert_eq!(words, vec!["a", "c", "b"]);
        assert!(ranked.windows(2).all(|w| w[0].count >= w[1].count));
    }

    #[test]
    fn test_ties_keep_first_seen_order() {
        let ranked = rank(
            map_from(&[("yamada", 1), ("sato", 2), ("ito", 1), ("kato", 2)]),
            DEFAULT_RANK_LIMIT,
        );
        let words: Vec<_> = ranked.iter().map(|i| i.word.as_str()).collect();
        assert_eq!(words, vec!["sato", "kato", "yamada", "ito"]);
    }

    #[test]
    fn test_fewer_keywords_than_limit() {
        let ranked = rank(map_from(&[("a", 1), ("b", 1)]), DEFAULT_RANK_LIMIT);
        assert_eq!(ranked.len(), 2);
        assert!(rank(KeywordMap::default(), DEFAULT_RANK_LIMIT).is_empty());
    }

    #[test]
    fn test_truncates_to_limit() {
        let words: Vec<String> = (0..150).map(|i| format!("w{i}")).collect();
        let counts: Vec<(&str, usize)> = words
            .iter()
            .enumerate()
            .map(|(i, w)| (w.as_str(), 1 + i % 5))
            .collect();

        let ranked = rank(map_from(&counts), DEFAULT_RANK_LIMIT);
        assert_eq!(ranked.len(), 100);
        assert!(ranked.windows(2).all(|w| w[0].count >= w[1].count));
        assert_eq!(ranked[0].count, 5);
    }
}
