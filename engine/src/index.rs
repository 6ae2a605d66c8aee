use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};

/// Documents are identified by their name, typically the source file name.
pub type DocName = String;

/// A loaded document: its stable name and raw text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub name: DocName,
    pub text: String,
}

impl Document {
    pub fn new<N: Into<String>, T: Into<String>>(name: N, text: T) -> Self {
        Self { name: name.into(), text: text.into() }
    }
}

/// Term -> set of documents containing it. Presence only: no frequencies or
/// positions are kept, so this supports Boolean membership and nothing else.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct InvertedIndex {
    postings: HashMap<String, BTreeSet<DocName>>,
    num_docs: usize,
}

impl InvertedIndex {
    pub fn new() -> Self { Self::default() }

    /// Build from `(document, normalized terms)` pairs. Repeated terms within
    /// a document are idempotent.
    pub fn build<'a, I>(docs: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a [String])>,
    {
        let mut index = Self::new();
        for (name, terms) in docs {
            index.num_docs += 1;
            for term in terms {
                index.postings.entry(term.clone()).or_default().insert(name.to_string());
            }
        }
        tracing::info!(num_docs = index.num_docs, num_terms = index.postings.len(), "built inverted index");
        index
    }

    pub fn postings(&self, term: &str) -> Option<&BTreeSet<DocName>> { self.postings.get(term) }

    /// Postings for `term`, or the empty set for an unknown term.
    pub fn lookup(&self, term: &str) -> BTreeSet<DocName> {
        self.postings.get(term).cloned().unwrap_or_default()
    }

    pub fn contains(&self, term: &str, doc: &str) -> bool {
        self.postings.get(term).is_some_and(|docs| docs.contains(doc))
    }

    pub fn num_terms(&self) -> usize { self.postings.len() }

    pub fn num_docs(&self) -> usize { self.num_docs }

    /// Terms in lexicographic order.
    pub fn terms(&self) -> Vec<&str> {
        let mut terms: Vec<&str> = self.postings.keys().map(String::as_str).collect();
        terms.sort_unstable();
        terms
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn terms(words: &[&str]) -> Vec<String> { words.iter().map(|w| w.to_string()).collect() }

    #[test]
    fn duplicates_are_presence_only() {
        let a = terms(&["magang", "magang", "admin"]);
        let b = terms(&["magang"]);
        let index = InvertedIndex::build([("a.txt", a.as_slice()), ("b.txt", b.as_slice())]);
        assert_eq!(index.num_docs(), 2);
        assert_eq!(index.num_terms(), 2);
        assert_eq!(index.lookup("magang").len(), 2);
        assert!(index.contains("admin", "a.txt"));
        assert!(!index.contains("admin", "b.txt"));
        assert!(index.lookup("unknown").is_empty());
        assert_eq!(index.terms(), vec!["admin", "magang"]);
    }
}
