//! Morphological analyzer adapter.
//!
//! [`Tokenize`] is the seam between keyword extraction and the analyzer.
//! [`LinderaTokenizer`] implements it with lindera and an embedded IPADIC
//! family dictionary, compiled in with the `ipadic` (default) or
//! `ipadic-neologd` cargo features. Asking for a dictionary that was not
//! compiled in reports [`NewsError::TokenizerUnavailable`].

use crate::config::Dictionary;
use crate::errors::{NewsError, Result};

/// One morpheme: its surface text and the analyzer's feature fields.
///
/// For IPADIC the fields are part of speech, three sub-category tiers,
/// conjugation type and form, base form, reading and pronunciation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub surface: String,
    pub features: Vec<String>,
}

/// Splits text into tokens.
pub trait Tokenize {
    fn tokenize(&self, text: &str) -> Result<Vec<Token>>;
}

/// lindera-backed tokenizer holding a loaded dictionary.
///
/// The dictionary is released when the value is dropped.
pub struct LinderaTokenizer {
    #[cfg(any(feature = "ipadic", feature = "ipadic-neologd"))]
    inner: lindera::tokenizer::Tokenizer,
}

impl LinderaTokenizer {
    /// Load the embedded dictionary.
    ///
    /// # Errors
    ///
    /// [`NewsError::TokenizerUnavailable`] if the dictionary was not compiled
    /// into this binary or fails to load.
    #[cfg(any(feature = "ipadic", feature = "ipadic-neologd"))]
    pub fn load(dictionary: Dictionary) -> Result<Self> {
        use lindera::dictionary::{DictionaryKind, load_dictionary_from_kind};
        use lindera::mode::Mode;
        use lindera::segmenter::Segmenter;
        use lindera::tokenizer::Tokenizer;

        let kind = match dictionary {
            #[cfg(feature = "ipadic")]
            Dictionary::Ipadic => DictionaryKind::IPADIC,
            #[cfg(feature = "ipadic-neologd")]
            Dictionary::IpadicNeologd => DictionaryKind::IPADICNEologd,
            #[allow(unreachable_patterns)]
            other => return Err(not_compiled(other)),
        };
        let loaded = load_dictionary_from_kind(kind)
            .map_err(|e| NewsError::TokenizerUnavailable(e.to_string()))?;
        let segmenter = Segmenter::new(Mode::Normal, loaded, None);
        tracing::info!(?dictionary, "Loaded morphological dictionary");

        Ok(Self {
            inner: Tokenizer::new(segmenter),
        })
    }

    #[cfg(not(any(feature = "ipadic", feature = "ipadic-neologd")))]
    pub fn load(dictionary: Dictionary) -> Result<Self> {
        Err(not_compiled(dictionary))
    }
}

fn not_compiled(dictionary: Dictionary) -> NewsError {
    let feature = match dictionary {
        Dictionary::Ipadic => "ipadic",
        Dictionary::IpadicNeologd => "ipadic-neologd",
    };
    NewsError::TokenizerUnavailable(format!(
        "dictionary {feature} is not built in; rebuild with `--features {feature}`"
    ))
}

#[cfg(any(feature = "ipadic", feature = "ipadic-neologd"))]
impl Tokenize for LinderaTokenizer {
    fn tokenize(&self, text: &str) -> Result<Vec<Token>> {
        let mut tokens = self
            .inner
            .tokenize(text)
            .map_err(|e| NewsError::Tokenization {
                title: text.to_string(),
                reason: e.to_string(),
            })?;

        Ok(tokens
            .iter_mut()
            .map(|token| {
                let features: Vec<String> =
                    token.details().into_iter().map(str::to_string).collect();
                Token {
                    surface: token.surface.to_string(),
                    features,
                }
            })
            .collect())
    }
}

#[cfg(not(any(feature = "ipadic", feature = "ipadic-neologd")))]
impl Tokenize for LinderaTokenizer {
    fn tokenize(&self, text: &str) -> Result<Vec<Token>> {
        Err(NewsError::Tokenization {
            title: text.to_string(),
            reason: "no dictionary compiled in".to_string(),
        })
    }
}


#[cfg(test)]
mod tests {
    use super::testing::WhitespaceTokenizer;
    use super::*;

    #[test]
    fn test_fake_tokenizer_tags_names() {
        let tokenizer = WhitespaceTokenizer::new(&["tanaka"]);
        let tokens = tokenizer.tokenize("tanaka meets suzuki").unwrap();
        assert_eq!(tokens.len(), 3);
        assert_eq!(tokens[0].features[2], "人名");
        assert_eq!(tokens[2].features[1], "一般");
    }

    #[cfg(not(any(feature = "ipadic", feature = "ipadic-neologd")))]
    #[test]
    fn test_load_without_dictionary_is_unavailable() {
        let err = LinderaTokenizer::load(Dictionary::IpadicNeologd).err().unwrap();
        assert!(matches!(err, NewsError::TokenizerUnavailable(_)));
        assert!(err.is_fatal());
        assert!(err.to_string().contains("--features ipadic-neologd"));
    }

    #[cfg(all(feature = "ipadic", not(feature = "ipadic-neologd")))]
    #[test]
    fn test_load_missing_neologd_is_unavailable() {
        let err = LinderaTokenizer::load(Dictionary::IpadicNeologd).err().unwrap();
        assert!(matches!(err, NewsError::TokenizerUnavailable(_)));
        assert!(err.to_string().contains("--features ipadic-neologd"));
    }

    #[cfg(feature = "ipadic")]
    #[test]
    fn test_ipadic_tags_person_names() {
        let tokenizer = LinderaTokenizer::load(Dictionary::Ipadic).unwrap();
        let tokens = tokenizer.tokenize("田中が東京へ行く").unwrap();
        let tanaka = tokens.iter().find(|t| t.surface == "田中").unwrap();
        assert_eq!(&tanaka.features[..3], &["名詞", "固有名詞", "人名"]);
    }

    #[cfg(feature = "ipadic")]
    #[test]
    fn test_ipadic_splits_headline() {
        let tokenizer = LinderaTokenizer::load(Dictionary::Ipadic).unwrap();
        let tokens = tokenizer.tokenize("東京で会見").unwrap();
        let surfaces: Vec<_> = tokens.iter().map(|t| t.surface.as_str()).collect();
        assert_eq!(surfaces.concat(), "東京で会見");
        assert!(tokens.iter().all(|t| t.features.len() >= 4));
        assert_eq!(tokens[0].features[0], "名詞");
    }
}
