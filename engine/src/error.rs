use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Failures raised while configuring the engine or building it from a corpus.
///
/// Malformed Boolean queries are deliberately not represented here: they are
/// reported through [`crate::boolean::QueryError`] and evaluate to no hits.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("corpus directory not found: {}", .0.display())]
    MissingDirectory(PathBuf),

    /// No documents were supplied to the build.
    #[error("cannot build an index from an empty corpus")]
    EmptyCorpus,

    /// Every document normalized to an empty term sequence.
    #[error("all {0} documents are empty after normalization")]
    NoIndexableTerms(usize),

    #[error("duplicate document id: {0}")]
    DuplicateDocument(String),
}

impl EngineError {
    pub fn config<S: Into<String>>(msg: S) -> Self {
        EngineError::Config(msg.into())
    }
}

impl From<serde_json::Error> for EngineError {
    fn from(err: serde_json::Error) -> Self {
        EngineError::Config(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, EngineError>;
