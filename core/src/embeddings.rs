use crate::SparseVec;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One dense tf-idf vector per document, keyed by document id. Dense is
/// required here: cosine scoring walks the full vector by term index.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct EmbeddingStore {
    dim: usize,
    vectors: HashMap<String, Vec<f32>>,
}

impl EmbeddingStore {
    pub fn new(dim: usize) -> Self {
        Self { dim, vectors: HashMap::new() }
    }

    /// Densify the sparse weight rows into per-document vectors of length `dim`.
    pub fn from_rows(rows: &[(String, SparseVec)], dim: usize) -> Self {
        let mut store = Self::new(dim);
        for (doc_id, row) in rows {
            let mut dense = vec![0.0f32; dim];
            for (&tid, &weight) in row {
                dense[tid as usize] = weight;
            }
            store.put(doc_id.clone(), dense);
        }
        store
    }

    pub fn put(&mut self, doc_id: String, vector: Vec<f32>) {
        debug_assert_eq!(vector.len(), self.dim);
        self.vectors.insert(doc_id, vector);
    }

    /// `None` means "not found"; callers exclude the document from ranking
    /// rather than failing the query.
    pub fn get(&self, doc_id: &str) -> Option<&[f32]> {
        self.vectors.get(doc_id).map(Vec::as_slice)
    }

    pub fn dim(&self) -> usize {
        self.dim
    }

    pub fn len(&self) -> usize {
        self.vectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }

    pub fn contains(&self, doc_id: &str) -> bool {
        self.vectors.contains_key(doc_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn densifies_sparse_rows() {
        let rows = vec![("a".to_string(), [(1u32, 0.6f32), (3, 0.8)].into_iter().collect())];
        let store = EmbeddingStore::from_rows(&rows, 4);
        assert_eq!(store.get("a"), Some(&[0.0, 0.6, 0.0, 0.8][..]));
    }

    #[test]
    fn missing_doc_is_none() {
        let store = EmbeddingStore::new(2);
        assert!(store.get("ghost").is_none());
    }
}
