//! Retrieval effectiveness metrics with binary relevance.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use crate::engine::SearchEngine;
use crate::error::Result;
use crate::index::DocName;

/// Precision, recall and F1 of an unranked result set. Both sets empty
/// counts as a perfect answer.
pub fn precision_recall_f1(retrieved: &BTreeSet<DocName>, relevant: &BTreeSet<DocName>) -> (f64, f64, f64) {
    if retrieved.is_empty() && relevant.is_empty() {
        return (1.0, 1.0, 1.0);
    }
    let tp = retrieved.intersection(relevant).count() as f64;
    let fp = retrieved.difference(relevant).count() as f64;
    let fn_ = relevant.difference(retrieved).count() as f64;

    let precision = if tp + fp > 0.0 { tp / (tp + fp) } else { 0.0 };
    let recall = if tp + fn_ > 0.0 { tp / (tp + fn_) } else { 0.0 };
    let f1 = if precision + recall > 0.0 { 2.0 * precision * recall / (precision + recall) } else { 0.0 };
    (precision, recall, f1)
}

/// Fraction of the first `k` ranks that are relevant. Missing ranks count as
/// non-relevant.
pub fn precision_at_k(ranked: &[DocName], relevant: &BTreeSet<DocName>, k: usize) -> f64 {
    if k == 0 {
        return 0.0;
    }
    let hits = ranked.iter().take(k).filter(|d| relevant.contains(*d)).count();
    hits as f64 / k as f64
}

/// AP@k, normalized by the total number of relevant documents rather than k.
pub fn average_precision_at_k(ranked: &[DocName], relevant: &BTreeSet<DocName>, k: usize) -> f64 {
    if relevant.is_empty() {
        return 0.0;
    }
    let mut hits = 0usize;
    let mut sum = 0.0;
    for (i, doc) in ranked.iter().take(k).enumerate() {
        if relevant.contains(doc) {
            hits += 1;
            sum += hits as f64 / (i + 1) as f64;
        }
    }
    if hits == 0 {
        return 0.0;
    }
    sum / relevant.len() as f64
}

pub fn map_at_k(runs: &[(Vec<DocName>, BTreeSet<DocName>)], k: usize) -> f64 {
    if runs.is_empty() {
        return 0.0;
    }
    runs.iter().map(|(ranked, relevant)| average_precision_at_k(ranked, relevant, k)).sum::<f64>()
        / runs.len() as f64
}

pub fn dcg_at_k(ranked: &[DocName], relevant: &BTreeSet<DocName>, k: usize) -> f64 {
    ranked
        .iter()
        .take(k)
        .enumerate()
        .filter(|(_, doc)| relevant.contains(*doc))
        .map(|(i, _)| 1.0 / ((i + 2) as f64).log2())
        .sum()
}

/// Best achievable DCG@k: every relevant document ranked first.
pub fn idcg_at_k(relevant: &BTreeSet<DocName>, k: usize) -> f64 {
    (0..k.min(relevant.len())).map(|i| 1.0 / ((i + 2) as f64).log2()).sum()
}

pub fn ndcg_at_k(ranked: &[DocName], relevant: &BTreeSet<DocName>, k: usize) -> f64 {
    let idcg = idcg_at_k(relevant, k);
    if idcg == 0.0 {
        return 0.0;
    }
    dcg_at_k(ranked, relevant, k) / idcg
}

pub fn mean_ndcg_at_k(runs: &[(Vec<DocName>, BTreeSet<DocName>)], k: usize) -> f64 {
    if runs.is_empty() {
        return 0.0;
    }
    runs.iter().map(|(ranked, relevant)| ndcg_at_k(ranked, relevant, k)).sum::<f64>() / runs.len() as f64
}

/// Gold-standard relevance for one query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Judgement {
    pub query: String,
    /// Boolean form of the query; defaults to `query`.
    #[serde(default)]
    pub boolean_query: Option<String>,
    pub relevant: BTreeSet<DocName>,
}

pub fn load_judgements<P: AsRef<Path>>(path: P) -> Result<Vec<Judgement>> {
    let text = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&text)?)
}

#[derive(Debug, Clone, Serialize)]
pub struct QueryEvaluation {
    pub query: String,
    pub boolean_hits: usize,
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
    pub ranked: Vec<DocName>,
    pub precision_at_k: f64,
    pub average_precision: f64,
    pub ndcg: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct EvalReport {
    pub k: usize,
    pub queries: Vec<QueryEvaluation>,
    pub map: f64,
    pub mean_ndcg: f64,
}

/// Run every judgement through both models and score the results.
pub fn evaluate_judgements(engine: &SearchEngine, judgements: &[Judgement], k: usize) -> EvalReport {
    let mut queries = Vec::with_capacity(judgements.len());
    let mut runs = Vec::with_capacity(judgements.len());
    for j in judgements {
        let boolean = engine.boolean(j.boolean_query.as_deref().unwrap_or(&j.query));
        let (precision, recall, f1) = precision_recall_f1(&boolean, &j.relevant);
        let ranked: Vec<DocName> = engine.ranked(&j.query, k).into_iter().map(|hit| hit.doc).collect();
        queries.push(QueryEvaluation {
            query: j.query.clone(),
            boolean_hits: boolean.len(),
            precision,
            recall,
            f1,
            precision_at_k: precision_at_k(&ranked, &j.relevant, k),
            average_precision: average_precision_at_k(&ranked, &j.relevant, k),
            ndcg: ndcg_at_k(&ranked, &j.relevant, k),
            ranked: ranked.clone(),
        });
        runs.push((ranked, j.relevant.clone()));
    }
    EvalReport { k, map: map_at_k(&runs, k), mean_ndcg: mean_ndcg_at_k(&runs, k), queries }
}
