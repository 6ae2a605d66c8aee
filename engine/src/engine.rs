use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap, HashSet};
use std::fmt;
use std::str::FromStr;

use crate::boolean::{self, BooleanOp, BooleanQuery, QueryError};
use crate::config::EngineConfig;
use crate::error::{EngineError, Result};
use crate::incidence::IncidenceMatrix;
use crate::index::{DocName, Document, InvertedIndex};
use crate::normalizer::Normalizer;
use crate::snippet;
use crate::vsm::{ScoredDoc, VsmModel};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RetrievalModel {
    Boolean,
    Vsm,
}

impl FromStr for RetrievalModel {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "boolean" | "bool" => Ok(RetrievalModel::Boolean),
            "vsm" | "vector" => Ok(RetrievalModel::Vsm),
            other => Err(format!("unknown retrieval model '{other}', expected 'boolean' or 'vsm'")),
        }
    }
}

impl fmt::Display for RetrievalModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            RetrievalModel::Boolean => "boolean",
            RetrievalModel::Vsm => "vsm",
        })
    }
}

/// Corpus counters reported by front ends.
#[derive(Debug, Clone, Serialize)]
pub struct EngineStats {
    pub documents: usize,
    pub empty_documents: usize,
    pub index_terms: usize,
    pub vocabulary: usize,
    pub incidence_nnz: usize,
    pub stemmer: &'static str,
}

/// Everything built from one corpus load. Immutable once built: rebuild to
/// pick up corpus changes.
#[derive(Debug)]
pub struct SearchEngine {
    config: EngineConfig,
    normalizer: Normalizer,
    documents: Vec<Document>,
    by_name: HashMap<DocName, usize>,
    terms: Vec<Vec<String>>,
    index: InvertedIndex,
    incidence: IncidenceMatrix,
    vsm: VsmModel,
}

impl SearchEngine {
    pub fn build(documents: Vec<Document>, config: EngineConfig) -> Result<Self> {
        let normalizer = Normalizer::from_config(&config.normalizer)?;
        Self::build_with(documents, config, normalizer)
    }

    /// Build with a caller-supplied normalizer, e.g. a custom stemmer.
    pub fn build_with(documents: Vec<Document>, config: EngineConfig, normalizer: Normalizer) -> Result<Self> {
        if documents.is_empty() {
            return Err(EngineError::EmptyCorpus);
        }
        let mut by_name = HashMap::with_capacity(documents.len());
        for (i, doc) in documents.iter().enumerate() {
            if by_name.insert(doc.name.clone(), i).is_some() {
                return Err(EngineError::DuplicateDocument(doc.name.clone()));
            }
        }

        let terms: Vec<Vec<String>> = documents
            .iter()
            .map(|doc| {
                let terms = normalizer.normalize(&doc.text);
                if terms.is_empty() {
                    tracing::warn!(doc = %doc.name, "document is empty after normalization");
                }
                terms
            })
            .collect();
        if terms.iter().all(Vec::is_empty) {
            return Err(EngineError::NoIndexableTerms(documents.len()));
        }

        let pairs = || documents.iter().zip(&terms).map(|(d, t)| (d.name.as_str(), t.as_slice()));
        let vsm = VsmModel::build(pairs())?;
        let index = InvertedIndex::build(pairs());
        let incidence = IncidenceMatrix::build(pairs());

        Ok(Self { config, normalizer, documents, by_name, terms, index, incidence, vsm })
    }

    pub fn config(&self) -> &EngineConfig { &self.config }

    pub fn normalizer(&self) -> &Normalizer { &self.normalizer }

    pub fn index(&self) -> &InvertedIndex { &self.index }

    pub fn incidence(&self) -> &IncidenceMatrix { &self.incidence }

    pub fn vsm(&self) -> &VsmModel { &self.vsm }

    pub fn documents(&self) -> &[Document] { &self.documents }

    pub fn document(&self, name: &str) -> Option<&Document> {
        self.by_name.get(name).map(|&i| &self.documents[i])
    }

    /// Normalized terms of a loaded document.
    pub fn document_terms(&self, name: &str) -> Option<&[String]> {
        self.by_name.get(name).map(|&i| self.terms[i].as_slice())
    }

    pub fn boolean(&self, query: &str) -> BTreeSet<DocName> {
        boolean::evaluate(query, &self.index, &self.normalizer, self.config.boolean.compound_terms)
    }

    /// Like [`boolean`](Self::boolean) but surfaces why a query was rejected.
    pub fn explain_boolean(&self, query: &str) -> std::result::Result<BTreeSet<DocName>, QueryError> {
        let parsed = BooleanQuery::parse(query)?;
        Ok(parsed.execute(&self.index, &self.normalizer, self.config.boolean.compound_terms))
    }

    pub fn ranked(&self, query: &str, k: usize) -> Vec<ScoredDoc> { self.vsm.search(query, &self.normalizer, k) }

    /// Deduplicated normalized terms of `query`, in first-occurrence order,
    /// for highlighting. Boolean operator words are dropped first.
    pub fn query_terms(&self, query: &str, model: RetrievalModel) -> Vec<String> {
        let text = match model {
            RetrievalModel::Boolean => query
                .split_whitespace()
                .filter(|tok| tok.parse::<BooleanOp>().is_err())
                .collect::<Vec<_>>()
                .join(" "),
            RetrievalModel::Vsm => query.to_string(),
        };
        let mut seen = HashSet::new();
        self.normalizer.normalize(&text).into_iter().filter(|t| seen.insert(t.clone())).collect()
    }

    pub fn snippet(&self, name: &str, terms: &[String]) -> Option<String> {
        self.document(name).map(|doc| snippet::create_snippet(&doc.text, terms, &self.config.snippet))
    }

    pub fn stats(&self) -> EngineStats {
        EngineStats {
            documents: self.documents.len(),
            empty_documents: self.terms.iter().filter(|t| t.is_empty()).count(),
            index_terms: self.index.num_terms(),
            vocabulary: self.vsm.vocabulary_len(),
            incidence_nnz: self.incidence.nnz(),
            stemmer: self.normalizer.stemmer_name(),
        }
    }
}

/// Display title derived from a file name: `doc03_web_developer.txt` ->
/// `03 Web Developer`.
pub fn display_title(name: &str) -> String {
    let base = name.trim_end_matches(".txt").replace("doc", "").replace('_', " ");
    base.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}
