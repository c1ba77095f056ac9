use crate::{SparseVec, TermId};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Posting {
    pub doc_id: String,
    pub weight: f32, // normalized tf-idf weight
}

/// Term -> postings fan-out over the nonzero entries of the weight matrix.
/// Pure candidate lookup: ranking happens in the engine, not here.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct InvertedIndex {
    postings: HashMap<TermId, Vec<Posting>>,
}

impl InvertedIndex {
    /// Build from sparse weight rows. Rows are visited in document order, so
    /// each postings list is ordered by document insertion.
    pub fn build(rows: &[(String, SparseVec)]) -> Self {
        let mut postings: HashMap<TermId, Vec<Posting>> = HashMap::new();
        for (doc_id, row) in rows {
            for (&tid, &weight) in row {
                if weight > 0.0 {
                    postings
                        .entry(tid)
                        .or_default()
                        .push(Posting { doc_id: doc_id.clone(), weight });
                }
            }
        }
        Self { postings }
    }

    /// Postings for a term; the empty slice for unknown or postings-free terms.
    pub fn postings(&self, term: TermId) -> &[Posting] {
        self.postings.get(&term).map_or(&[], Vec::as_slice)
    }

    pub fn num_terms(&self) -> usize {
        self.postings.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (TermId, &[Posting])> {
        self.postings.iter().map(|(&tid, plist)| (tid, plist.as_slice()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(entries: &[(TermId, f32)]) -> SparseVec {
        entries.iter().copied().collect()
    }

    #[test]
    fn build_preserves_document_order() {
        let rows = vec![
            ("a".to_string(), row(&[(0, 0.5)])),
            ("b".to_string(), row(&[(0, 0.7), (1, 0.2)])),
        ];
        let index = InvertedIndex::build(&rows);
        let ids: Vec<&str> = index.postings(0).iter().map(|p| p.doc_id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b"]);
        assert_eq!(index.postings(1).len(), 1);
    }

    #[test]
    fn unknown_term_is_empty_not_error() {
        let index = InvertedIndex::build(&[]);
        assert!(index.postings(42).is_empty());
    }

    #[test]
    fn zero_weights_are_skipped() {
        let rows = vec![("a".to_string(), row(&[(3, 0.0)]))];
        let index = InvertedIndex::build(&rows);
        assert!(index.postings(3).is_empty());
        assert_eq!(index.num_terms(), 0);
    }
}
