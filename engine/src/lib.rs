//! Small information-retrieval engine: text normalization, a Boolean
//! inverted index with a strict left-to-right evaluator, and a TF-IDF
//! vector-space model with cosine ranking.

pub mod boolean;
pub mod config;
pub mod engine;
pub mod error;
pub mod eval;
pub mod incidence;
pub mod index;
pub mod loader;
pub mod normalizer;
pub mod snippet;
pub mod stemmer;
pub mod stopwords;
pub mod vsm;

pub use boolean::{BooleanOp, BooleanQuery, QueryError};
pub use config::{CompoundTermPolicy, EngineConfig, NormalizerConfig, SnippetConfig, StemmerKind, StopwordList};
pub use engine::{display_title, EngineStats, RetrievalModel, SearchEngine};
pub use error::{EngineError, Result};
pub use incidence::IncidenceMatrix;
pub use index::{DocName, Document, InvertedIndex};
pub use loader::{load_directory, LoadReport, SkippedDocument};
pub use normalizer::Normalizer;
pub use vsm::{ScoredDoc, VsmModel};
