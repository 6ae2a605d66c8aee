use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::Result;

/// Domain abbreviations and filler words common in job postings that the
/// base stopword lists miss.
pub const DOMAIN_STOPWORDS: &[&str] = &[
    "yg", "utk", "dgn", "jg", "dg", "sbb", "yakni", "wfo", "wfh", "di", "dan", "atau", "untuk",
    "adalah", "merupakan", "pada", "ke", "dari", "dengan", "yang", "ini", "itu", "tersebut", "info",
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum StemmerKind {
    /// Rule-based Indonesian affix stripping.
    Indonesian,
    /// One of the Snowball algorithms shipped with `rust-stemmers`.
    Snowball { algorithm: String },
    Identity,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopwordList {
    Indonesian,
    English,
    None,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NormalizerConfig {
    pub stemmer: StemmerKind,
    pub stopwords: StopwordList,
    pub extra_stopwords: Vec<String>,
    /// Tokens shorter than this many characters are dropped.
    pub min_token_len: usize,
    /// Decompose accented letters and drop the combining marks before the
    /// ASCII filter, so `café` survives as `cafe` instead of `caf`.
    pub fold_diacritics: bool,
}

impl Default for NormalizerConfig {
    fn default() -> Self {
        Self {
            stemmer: StemmerKind::Indonesian,
            stopwords: StopwordList::Indonesian,
            extra_stopwords: DOMAIN_STOPWORDS.iter().map(|s| s.to_string()).collect(),
            min_token_len: 3,
            fold_diacritics: false,
        }
    }
}

/// How a Boolean query token that normalizes to several stems is looked up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompoundTermPolicy {
    /// Intersect the postings of every stem.
    #[default]
    AllStems,
    /// Look up the first stem only.
    FirstStem,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BooleanConfig {
    pub compound_terms: CompoundTermPolicy,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SnippetConfig {
    pub max_chars: usize,
    /// Characters taken from the start of a document with no sentence breaks.
    pub fallback_chars: usize,
    pub marker: String,
}

impl Default for SnippetConfig {
    fn default() -> Self {
        Self { max_chars: 250, fallback_chars: 150, marker: "**".to_string() }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub normalizer: NormalizerConfig,
    pub boolean: BooleanConfig,
    pub snippet: SnippetConfig,
    pub default_k: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            normalizer: NormalizerConfig::default(),
            boolean: BooleanConfig::default(),
            snippet: SnippetConfig::default(),
            default_k: 5,
        }
    }
}

impl EngineConfig {
    /// Load a JSON config file. Missing fields take their defaults.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_defaults() {
        let cfg = EngineConfig::from_json(r#"{ "default_k": 3, "normalizer": { "stemmer": { "kind": "identity" } } }"#)
            .unwrap();
        assert_eq!(cfg.default_k, 3);
        assert_eq!(cfg.normalizer.stemmer, StemmerKind::Identity);
        assert_eq!(cfg.normalizer.min_token_len, 3);
        assert_eq!(cfg.boolean.compound_terms, CompoundTermPolicy::AllStems);
        assert_eq!(cfg.snippet.marker, "**");
    }

    #[test]
    fn snowball_stemmer_from_json() {
        let cfg = EngineConfig::from_json(
            r#"{ "normalizer": { "stemmer": { "kind": "snowball", "algorithm": "english" }, "stopwords": "english" } }"#,
        )
        .unwrap();
        assert_eq!(cfg.normalizer.stemmer, StemmerKind::Snowball { algorithm: "english".into() });
        assert_eq!(cfg.normalizer.stopwords, StopwordList::English);
    }

    #[test]
    fn invalid_json_is_config_error() {
        let err = EngineConfig::from_json("{ not json").unwrap_err();
        assert!(matches!(err, crate::EngineError::Config(_)));
    }
}
