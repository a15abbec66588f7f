//! Person-name keyword extraction.
//!
//! Each article title is normalized, tokenized, and every token tagged as a
//! general person-name proper noun becomes a keyword. A keyword collects the
//! articles whose titles mention it.

use crate::analysis::normalize::normalize_title;
use crate::analysis::tokenizer::{Token, Tokenize};
use crate::config::TokenizeErrorPolicy;
use crate::errors::{NewsError, Result};
use crate::models::{Article, ContentItem, NewsArticleRecord};
use crate::utils::truncate_for_log;
use std::collections::HashMap;
use tracing::{debug, info, instrument, warn};

/// Leading IPADIC feature fields of a general personal name:
/// noun / proper noun / person name / general.
pub const PERSON_NAME_PATTERN: [&str; 4] = ["名詞", "固有名詞", "人名", "一般"];

/// Whether `token` is tagged as a general person-name proper noun.
pub fn is_person_name(token: &Token) -> bool {
    token.features.len() >= PERSON_NAME_PATTERN.len()
        && token
            .features
            .iter()
            .zip(PERSON_NAME_PATTERN)
            .all(|(field, expected)| field == expected)
}

/// Keywords keyed by surface form, remembering first-seen order.
#[derive(Debug, Default)]
pub struct KeywordMap {
    index: HashMap<String, usize>,
    items: Vec<ContentItem>,
}

impl KeywordMap {
    /// Append `article` to `word`, creating the keyword on first sight.
    pub fn record(&mut self, word: &str, article: Article) {
        let slot = match self.index.get(word) {
            Some(&slot) => slot,
            None => {
                self.items.push(ContentItem::new(word));
                self.index.insert(word.to_string(), self.items.len() - 1);
                self.items.len() - 1
            }
        };
        self.items[slot].push(article);
    }

    #[cfg(test)]
    pub fn get(&self, word: &str) -> Option<&ContentItem> {
        self.index.get(word).map(|&slot| &self.items[slot])
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Keywords in the order they were first matched.
    pub fn into_items(self) -> Vec<ContentItem> {
        self.items
    }
}

/// Runs titles through a [`Tokenize`] implementation and aggregates person names.
pub struct KeywordExtractor<'a, T> {
    tokenizer: &'a T,
    on_error: TokenizeErrorPolicy,
}

impl<'a, T: Tokenize> KeywordExtractor<'a, T> {
    pub fn new(tokenizer: &'a T, on_error: TokenizeErrorPolicy) -> Self {
        Self {
            tokenizer,
            on_error,
        }
    }

    /// Build the keyword map for a batch of articles.
    ///
    /// The stored [`Article`] carries the original title, not the normalized
    /// one. Every matching token appends an article, so a name repeated
    /// within one title lists that article once per mention.
    ///
    /// # Errors
    ///
    /// With [`TokenizeErrorPolicy::Abort`], the first title that fails to
    /// tokenize fails the whole batch with [`NewsError::Tokenization`].
    #[instrument(level = "info", skip_all, fields(articles = records.len()))]
    pub fn extract(&self, records: &[NewsArticleRecord]) -> Result<KeywordMap> {
        let mut keywords = KeywordMap::default();
        let mut skipped = 0usize;

        for record in records {
            let normalized = normalize_title(&record.title);
            let tokens = match self.tokenizer.tokenize(&normalized) {
                Ok(tokens) => tokens,
                Err(e) => {
                    let reason = match e {
                        NewsError::Tokenization { reason, .. } => reason,
                        other => other.to_string(),
                    };
                    match self.on_error {
                        TokenizeErrorPolicy::Abort => {
                            return Err(NewsError::Tokenization {
                                title: record.title.clone(),
                                reason,
                            });
                        }
                        TokenizeErrorPolicy::Skip => {
                            warn!(
                                title = %truncate_for_log(&record.title, 120),
                                url = %record.url,
                                %reason,
                                "Skipping article whose title cannot be tokenized"
                            );
                            skipped += 1;
                            continue;
                        }
                    }
                }
            };

            for token in tokens.iter().filter(|t| is_person_name(t)) {
                debug!(word = %token.surface, url = %record.url, "Matched person name");
                keywords.record(
                    &token.surface,
                    Article {
                        title: record.title.clone(),
                        url: record.url.clone(),
                    },
                );
            }
        }

        info!(keywords = keywords.len(), skipped, "Extracted keywords");
        Ok(keywords)
    }
}
