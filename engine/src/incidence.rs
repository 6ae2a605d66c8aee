use std::collections::{BTreeSet, HashMap};

use crate::index::DocName;

/// Binary term/document incidence matrix in CSR layout: one row per term of
/// the sorted vocabulary, one column per document in load order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncidenceMatrix {
    vocabulary: Vec<String>,
    term_to_row: HashMap<String, usize>,
    doc_names: Vec<DocName>,
    indptr: Vec<usize>,
    indices: Vec<usize>,
}

impl IncidenceMatrix {
    pub fn build<'a, I>(docs: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a [String])>,
    {
        let docs: Vec<(&str, &[String])> = docs.into_iter().collect();
        let vocabulary: Vec<String> = docs
            .iter()
            .flat_map(|(_, terms)| terms.iter().cloned())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        let term_to_row: HashMap<String, usize> =
            vocabulary.iter().enumerate().map(|(i, t)| (t.clone(), i)).collect();

        let mut rows: Vec<BTreeSet<usize>> = vec![BTreeSet::new(); vocabulary.len()];
        for (col, (_, terms)) in docs.iter().enumerate() {
            for term in terms.iter() {
                rows[term_to_row[term]].insert(col);
            }
        }

        let mut indptr = Vec::with_capacity(rows.len() + 1);
        let mut indices = Vec::new();
        indptr.push(0);
        for row in rows {
            indices.extend(row);
            indptr.push(indices.len());
        }

        Self {
            vocabulary,
            term_to_row,
            doc_names: docs.iter().map(|(name, _)| name.to_string()).collect(),
            indptr,
            indices,
        }
    }

    pub fn vocabulary(&self) -> &[String] { &self.vocabulary }

    pub fn doc_names(&self) -> &[DocName] { &self.doc_names }

    /// (terms, documents)
    pub fn shape(&self) -> (usize, usize) { (self.vocabulary.len(), self.doc_names.len()) }

    /// Number of stored ones.
    pub fn nnz(&self) -> usize { self.indices.len() }

    /// Column indices of the documents containing `term`, ascending.
    pub fn row(&self, term: &str) -> &[usize] {
        match self.term_to_row.get(term) {
            Some(&r) => &self.indices[self.indptr[r]..self.indptr[r + 1]],
            None => &[],
        }
    }

    pub fn contains(&self, term: &str, doc: &str) -> bool {
        self.row(term).iter().any(|&col| self.doc_names[col] == doc)
    }
}
