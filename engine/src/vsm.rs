//! TF-IDF vector-space model with cosine ranking.
//!
//! Weights follow the usual smoothed formulation: raw term counts times
//! `idf(t) = ln((1 + N) / (1 + df(t))) + 1`, with every document vector
//! L2-normalized. The vocabulary is sorted lexicographically.

use serde::Serialize;
use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};

use crate::error::{EngineError, Result};
use crate::index::DocName;
use crate::normalizer::Normalizer;

/// Sparse vector of `(vocabulary index, weight)` sorted by index.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SparseVector {
    entries: Vec<(usize, f64)>,
}

impl SparseVector {
    fn from_counts(counts: BTreeMap<usize, u32>, idf: &[f64]) -> Self {
        let entries = counts.into_iter().map(|(i, tf)| (i, tf as f64 * idf[i])).collect();
        let mut v = Self { entries };
        v.l2_normalize();
        v
    }

    pub fn entries(&self) -> &[(usize, f64)] { &self.entries }

    pub fn is_zero(&self) -> bool { self.entries.iter().all(|&(_, w)| w == 0.0) }

    pub fn norm(&self) -> f64 {
        // summing the squares in ascending order makes the norm independent
        // of which vocabulary slots hold the weights
        let mut squares: Vec<f64> = self.entries.iter().map(|&(_, w)| w * w).collect();
        squares.sort_by(f64::total_cmp);
        squares.iter().sum::<f64>().sqrt()
    }

    fn l2_normalize(&mut self) {
        let norm = self.norm();
        if norm > 0.0 {
            for (_, w) in self.entries.iter_mut() {
                *w /= norm;
            }
        }
    }

    pub fn dot(&self, other: &SparseVector) -> f64 {
        let (mut i, mut j, mut sum) = (0, 0, 0.0);
        while i < self.entries.len() && j < other.entries.len() {
            let (a, wa) = self.entries[i];
            let (b, wb) = other.entries[j];
            match a.cmp(&b) {
                Ordering::Less => i += 1,
                Ordering::Greater => j += 1,
                Ordering::Equal => {
                    sum += wa * wb;
                    i += 1;
                    j += 1;
                }
            }
        }
        sum
    }

    pub fn weight(&self, slot: usize) -> f64 {
        self.entries
            .binary_search_by_key(&slot, |&(i, _)| i)
            .map(|pos| self.entries[pos].1)
            .unwrap_or(0.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredDoc {
    pub doc: DocName,
    pub score: f64,
}

/// Fitted vocabulary, IDF weights and the document-term matrix.
#[derive(Debug, Clone, PartialEq)]
pub struct VsmModel {
    vocabulary: BTreeMap<String, usize>,
    terms: Vec<String>,
    idf: Vec<f64>,
    doc_names: Vec<DocName>,
    doc_slots: HashMap<DocName, usize>,
    doc_vectors: Vec<SparseVector>,
}

impl VsmModel {
    /// Fit over `(document, normalized terms)` pairs in corpus order.
    /// Fails when there is nothing to fit: no documents or no terms at all.
    pub fn build<'a, I>(docs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (&'a str, &'a [String])>,
    {
        let docs: Vec<(&str, &[String])> = docs.into_iter().collect();
        if docs.is_empty() {
            return Err(EngineError::EmptyCorpus);
        }

        let mut df: BTreeMap<&str, u32> = BTreeMap::new();
        for &(_, terms) in &docs {
            let mut seen: Vec<&str> = terms.iter().map(String::as_str).collect();
            seen.sort_unstable();
            seen.dedup();
            for term in seen {
                *df.entry(term).or_insert(0) += 1;
            }
        }
        if df.is_empty() {
            return Err(EngineError::NoIndexableTerms(docs.len()));
        }

        let n = docs.len() as f64;
        let terms: Vec<String> = df.keys().map(|t| t.to_string()).collect();
        let idf: Vec<f64> = df.values().map(|&d| ((1.0 + n) / (1.0 + d as f64)).ln() + 1.0).collect();
        let vocabulary: BTreeMap<String, usize> =
            terms.iter().enumerate().map(|(i, t)| (t.clone(), i)).collect();

        let mut model = Self {
            vocabulary,
            terms,
            idf,
            doc_names: Vec::with_capacity(docs.len()),
            doc_slots: HashMap::with_capacity(docs.len()),
            doc_vectors: Vec::with_capacity(docs.len()),
        };
        for (name, doc_terms) in docs {
            let vector = model.vectorize(doc_terms);
            model.doc_slots.insert(name.to_string(), model.doc_names.len());
            model.doc_names.push(name.to_string());
            model.doc_vectors.push(vector);
        }
        tracing::info!(
            num_docs = model.doc_names.len(),
            vocabulary = model.terms.len(),
            "fitted tf-idf model"
        );
        Ok(model)
    }

    /// TF-IDF vector for already-normalized terms under the fitted
    /// vocabulary. Out-of-vocabulary terms are ignored.
    pub fn vectorize(&self, terms: &[String]) -> SparseVector {
        let mut counts: BTreeMap<usize, u32> = BTreeMap::new();
        for term in terms {
            if let Some(&slot) = self.vocabulary.get(term) {
                *counts.entry(slot).or_insert(0) += 1;
            }
        }
        SparseVector::from_counts(counts, &self.idf)
    }

    /// Normalize `query`, then rank documents by cosine similarity.
    pub fn search(&self, query: &str, normalizer: &Normalizer, k: usize) -> Vec<ScoredDoc> {
        let terms = normalizer.normalize(query);
        if terms.is_empty() {
            tracing::debug!(query, "query is empty after normalization");
            return Vec::new();
        }
        self.search_terms(&terms, k)
    }

    /// Rank by cosine similarity and keep at most `k` (at least 1) hits with
    /// a non-zero score, ordered by score descending then document name.
    pub fn search_terms(&self, terms: &[String], k: usize) -> Vec<ScoredDoc> {
        let query = self.vectorize(terms);
        if query.is_zero() {
            return Vec::new();
        }
        let mut scored: Vec<(usize, f64)> = self
            .doc_vectors
            .iter()
            .enumerate()
            .map(|(i, doc)| (i, query.dot(doc)))
            .filter(|&(_, score)| score > 0.0)
            .collect();
        scored.sort_by(|a, b| {
            b.1.total_cmp(&a.1).then_with(|| self.doc_names[a.0].cmp(&self.doc_names[b.0]))
        });
        scored.truncate(k.max(1));
        scored
            .into_iter()
            .map(|(i, score)| ScoredDoc { doc: self.doc_names[i].clone(), score })
            .collect()
    }

    /// The `n` highest-weighted terms of `doc`, ties broken by term.
    pub fn top_terms(&self, doc: &str, n: usize) -> Vec<(String, f64)> {
        let Some(&slot) = self.doc_slots.get(doc) else {
            return Vec::new();
        };
        let mut weights: Vec<(usize, f64)> = self.doc_vectors[slot].entries().to_vec();
        weights.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| self.terms[a.0].cmp(&self.terms[b.0])));
        weights.into_iter().take(n).map(|(i, w)| (self.terms[i].clone(), w)).collect()
    }

    pub fn weight(&self, term: &str, doc: &str) -> f64 {
        match (self.vocabulary.get(term), self.doc_slots.get(doc)) {
            (Some(&t), Some(&d)) => self.doc_vectors[d].weight(t),
            _ => 0.0,
        }
    }

    pub fn idf(&self, term: &str) -> Option<f64> { self.vocabulary.get(term).map(|&i| self.idf[i]) }

    pub fn vocabulary_len(&self) -> usize { self.terms.len() }

    pub fn vocabulary(&self) -> &[String] { &self.terms }

    pub fn doc_names(&self) -> &[DocName] { &self.doc_names }
}
