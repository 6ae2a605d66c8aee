//! Strict Boolean retrieval over the [`InvertedIndex`].
//!
//! Grammar: `term (operator term)*` with `AND`, `OR`, `NOT` (case-insensitive),
//! folded strictly left to right with no precedence and no parentheses.
//! Anything else is a malformed query, which evaluates to the empty set.

use serde::Serialize;
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::config::CompoundTermPolicy;
use crate::index::{DocName, InvertedIndex};
use crate::normalizer::Normalizer;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BooleanOp {
    And,
    Or,
    Not,
}

impl BooleanOp {
    pub fn apply(self, acc: BTreeSet<DocName>, rhs: &BTreeSet<DocName>) -> BTreeSet<DocName> {
        match self {
            BooleanOp::And => acc.intersection(rhs).cloned().collect(),
            BooleanOp::Or => acc.union(rhs).cloned().collect(),
            BooleanOp::Not => acc.difference(rhs).cloned().collect(),
        }
    }
}

impl FromStr for BooleanOp {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "AND" => Ok(BooleanOp::And),
            "OR" => Ok(BooleanOp::Or),
            "NOT" => Ok(BooleanOp::Not),
            _ => Err(()),
        }
    }
}

impl fmt::Display for BooleanOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            BooleanOp::And => "AND",
            BooleanOp::Or => "OR",
            BooleanOp::Not => "NOT",
        })
    }
}

/// Why a query was rejected. Positions are 1-based token positions.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
pub enum QueryError {
    #[error("empty query")]
    Empty,
    #[error("expected AND, OR or NOT at position {position}, found '{found}'")]
    ExpectedOperator { position: usize, found: String },
    #[error("query ends with operator {op}")]
    TrailingOperator { op: BooleanOp },
}

/// A syntactically valid query; terms are kept raw until evaluation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BooleanQuery {
    pub first: String,
    pub rest: Vec<(BooleanOp, String)>,
}

impl BooleanQuery {
    pub fn parse(query: &str) -> Result<Self, QueryError> {
        let tokens: Vec<&str> = query.split_whitespace().collect();
        let (first, tail) = tokens.split_first().ok_or(QueryError::Empty)?;
        let mut rest = Vec::with_capacity(tail.len() / 2);
        let mut i = 0;
        while i < tail.len() {
            let op: BooleanOp = tail[i].parse().map_err(|_| QueryError::ExpectedOperator {
                position: i + 2,
                found: tail[i].to_string(),
            })?;
            let term = tail.get(i + 1).ok_or(QueryError::TrailingOperator { op })?;
            rest.push((op, term.to_string()));
            i += 2;
        }
        Ok(Self { first: first.to_string(), rest })
    }

    /// Raw terms in query order.
    pub fn terms(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.first.as_str()).chain(self.rest.iter().map(|(_, t)| t.as_str()))
    }

    pub fn execute(
        &self,
        index: &InvertedIndex,
        normalizer: &Normalizer,
        policy: CompoundTermPolicy,
    ) -> BTreeSet<DocName> {
        let mut acc = resolve_term(&self.first, index, normalizer, policy);
        for (op, term) in &self.rest {
            let rhs = resolve_term(term, index, normalizer, policy);
            acc = op.apply(acc, &rhs);
        }
        acc
    }
}

/// Postings for one raw query token. A token that normalizes to nothing
/// (stopword, too short, no letters) matches nothing.
pub fn resolve_term(
    raw: &str,
    index: &InvertedIndex,
    normalizer: &Normalizer,
    policy: CompoundTermPolicy,
) -> BTreeSet<DocName> {
    let stems = normalizer.normalize(raw);
    let Some((head, tail)) = stems.split_first() else {
        return BTreeSet::new();
    };
    let mut docs = index.lookup(head);
    if policy == CompoundTermPolicy::AllStems {
        for stem in tail {
            docs = BooleanOp::And.apply(docs, &index.lookup(stem));
        }
    }
    docs
}

/// Evaluate a raw query. Malformed input yields the empty set.
pub fn evaluate(
    query: &str,
    index: &InvertedIndex,
    normalizer: &Normalizer,
    policy: CompoundTermPolicy,
) -> BTreeSet<DocName> {
    match BooleanQuery::parse(query) {
        Ok(parsed) => parsed.execute(index, normalizer, policy),
        Err(err) => {
            tracing::debug!(query, %err, "rejected boolean query");
            BTreeSet::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_alternating_tokens() {
        let q = BooleanQuery::parse("admin and semarang NOT jakarta").unwrap();
        assert_eq!(q.first, "admin");
        assert_eq!(
            q.rest,
            vec![(BooleanOp::And, "semarang".to_string()), (BooleanOp::Not, "jakarta".to_string())]
        );
        assert_eq!(q.terms().collect::<Vec<_>>(), vec!["admin", "semarang", "jakarta"]);
    }

    #[test]
    fn reports_malformed_queries() {
        assert_eq!(BooleanQuery::parse("   "), Err(QueryError::Empty));
        assert_eq!(
            BooleanQuery::parse("magang internship"),
            Err(QueryError::ExpectedOperator { position: 2, found: "internship".into() })
        );
        assert_eq!(BooleanQuery::parse("magang AND"), Err(QueryError::TrailingOperator { op: BooleanOp::And }));
        assert_eq!(
            BooleanQuery::parse("a OR b XOR c"),
            Err(QueryError::ExpectedOperator { position: 4, found: "XOR".into() })
        );
    }

    #[test]
    fn compound_policy() {
        let terms = |w: &[&str]| w.iter().map(|s| s.to_string()).collect::<Vec<_>>();
        let d1 = terms(&["front", "end"]);
        let d2 = terms(&["front"]);
        let index = InvertedIndex::build([("d1", d1.as_slice()), ("d2", d2.as_slice())]);
        let n = Normalizer::plain();
        let all = resolve_term("front-end", &index, &n, CompoundTermPolicy::AllStems);
        let first = resolve_term("front-end", &index, &n, CompoundTermPolicy::FirstStem);
        assert_eq!(all.into_iter().collect::<Vec<_>>(), vec!["d1"]);
        assert_eq!(first.len(), 2);
    }
}
