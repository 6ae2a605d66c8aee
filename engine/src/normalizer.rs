use lazy_static::lazy_static;
use regex::Regex;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

use crate::config::NormalizerConfig;
use crate::error::Result;
use crate::stemmer::{self, IdentityStemmer, Stemmer};
use crate::stopwords::{StopwordPredicate, StopwordSet};

lazy_static! {
    static ref NON_LETTER: Regex = Regex::new(r"[^a-z\s]").expect("valid regex");
}

/// Turns raw text into the ordered sequence of terms shared by the index,
/// the vector model and query processing.
///
/// The same instance must normalize both documents and queries; the output
/// is a pure function of the input and of the stemmer/stopword configuration.
pub struct Normalizer {
    stemmer: Box<dyn Stemmer>,
    stopwords: Box<dyn StopwordPredicate>,
    min_token_len: usize,
    fold_diacritics: bool,
}

impl Normalizer {
    pub fn new(stemmer: Box<dyn Stemmer>, stopwords: Box<dyn StopwordPredicate>) -> Self {
        Self { stemmer, stopwords, min_token_len: 3, fold_diacritics: false }
    }

    pub fn from_config(cfg: &NormalizerConfig) -> Result<Self> {
        Ok(Self {
            stemmer: stemmer::from_kind(&cfg.stemmer)?,
            stopwords: Box::new(StopwordSet::from_config(cfg)),
            min_token_len: cfg.min_token_len,
            fold_diacritics: cfg.fold_diacritics,
        })
    }

    /// No stemming and no stopwords; only case folding, the letter filter
    /// and the length cut apply.
    pub fn plain() -> Self {
        Self::new(Box::new(IdentityStemmer), Box::new(StopwordSet::default()))
    }

    pub fn with_min_token_len(mut self, len: usize) -> Self {
        self.min_token_len = len;
        self
    }

    pub fn stemmer_name(&self) -> &'static str { self.stemmer.name() }

    /// Lowercase, replace everything but ASCII letters and whitespace with a
    /// space, split on whitespace, drop stopwords and short tokens, stem, and
    /// drop tokens that stem to nothing.
    pub fn normalize(&self, text: &str) -> Vec<String> {
        let lowered = if self.fold_diacritics {
            text.nfkd().filter(|c| !is_combining_mark(*c)).collect::<String>().to_lowercase()
        } else {
            text.to_lowercase()
        };
        let cleaned = NON_LETTER.replace_all(&lowered, " ");
        cleaned
            .split_whitespace()
            .filter(|token| token.len() >= self.min_token_len && !self.stopwords.is_stopword(token))
            .map(|token| self.stemmer.stem(token))
            .filter(|stem| !stem.is_empty())
            .collect()
    }
}

impl std::fmt::Debug for Normalizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Normalizer")
            .field("stemmer", &self.stemmer.name())
            .field("min_token_len", &self.min_token_len)
            .field("fold_diacritics", &self.fold_diacritics)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_digits_and_punctuation() {
        let n = Normalizer::plain();
        assert_eq!(n.normalize("PHP7, Gaji: 5jt!"), vec!["php", "gaji"]);
    }

    #[test]
    fn drops_short_tokens() {
        let n = Normalizer::plain();
        assert_eq!(n.normalize("ui ux web dev"), vec!["web", "dev"]);
        assert_eq!(Normalizer::plain().with_min_token_len(1).normalize("ui ux"), vec!["ui", "ux"]);
    }

    #[test]
    fn non_latin_text_disappears() {
        let n = Normalizer::plain();
        assert!(n.normalize("日本語 123 ---").is_empty());
    }
}
