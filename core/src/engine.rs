use crate::embeddings::EmbeddingStore;
use crate::error::BuildError;
use crate::index::InvertedIndex;
use crate::query::ProcessedQuery;
use crate::vectorizer::{Document, TfidfVectorizer};
use crate::SparseVec;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::sync::Arc;

/// Immutable build artifact: the frozen model plus the two derived stores.
/// Index and embeddings always come from the same build pass; they are
/// published and replaced together, never independently.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    pub vectorizer: TfidfVectorizer,
    pub index: InvertedIndex,
    pub embeddings: EmbeddingStore,
}

impl Snapshot {
    /// Train the model and derive index + embeddings in one pass.
    pub fn build(corpus: &[Document]) -> Result<Self, BuildError> {
        let vectorizer = TfidfVectorizer::fit(corpus)?;

        let rows: Vec<(String, SparseVec)> = corpus
            .iter()
            .map(|doc| (doc.id.clone(), vectorizer.transform(&doc.text)))
            .collect();

        let index = InvertedIndex::build(&rows);
        let embeddings = EmbeddingStore::from_rows(&rows, vectorizer.vocab_size());

        tracing::info!(
            num_docs = rows.len(),
            num_terms = vectorizer.vocab_size(),
            "built snapshot"
        );
        Ok(Self { vectorizer, index, embeddings })
    }

    /// Candidate generation + exact scoring, descending by similarity with
    /// ascending doc-id tie-break for deterministic output.
    pub fn search(&self, query: &ProcessedQuery) -> Vec<SearchHit> {
        // Union of postings: one matching term is enough to be a candidate.
        let mut candidates: BTreeSet<&str> = BTreeSet::new();
        for &tid in &query.terms {
            for posting in self.index.postings(tid) {
                candidates.insert(&posting.doc_id);
            }
        }

        let mut hits: Vec<SearchHit> = candidates
            .into_iter()
            .filter_map(|doc_id| {
                // A candidate without an embedding is excluded, not an error.
                let embedding = self.embeddings.get(doc_id)?;
                Some(SearchHit {
                    doc_id: doc_id.to_string(),
                    similarity: cosine(&query.vector, embedding),
                })
            })
            .collect();

        hits.sort_by(|a, b| {
            b.similarity
                .partial_cmp(&a.similarity)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.doc_id.cmp(&b.doc_id))
        });
        hits
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    pub doc_id: String,
    pub similarity: f32,
}

/// Cosine of a sparse query vector against a dense document vector.
/// Zero-norm on either side scores 0.0, never NaN.
fn cosine(query: &SparseVec, doc: &[f32]) -> f32 {
    let mut dot = 0.0f32;
    let mut q_norm = 0.0f32;
    for (&tid, &w) in query {
        q_norm += w * w;
        if let Some(&d) = doc.get(tid as usize) {
            dot += w * d;
        }
    }
    let d_norm: f32 = doc.iter().map(|d| d * d).sum();
    if q_norm == 0.0 || d_norm == 0.0 {
        return 0.0;
    }
    dot / (q_norm.sqrt() * d_norm.sqrt())
}

/// Single-writer / multi-reader handle around the current snapshot.
/// Readers clone the Arc and compute against an immutable snapshot; a
/// rebuild swaps the pointer so old and new stores never mix.
pub struct SearchEngine {
    snapshot: RwLock<Arc<Snapshot>>,
}

impl SearchEngine {
    pub fn new(snapshot: Snapshot) -> Self {
        Self { snapshot: RwLock::new(Arc::new(snapshot)) }
    }

    /// Current snapshot; the only lock a query ever takes.
    pub fn snapshot(&self) -> Arc<Snapshot> {
        self.snapshot.read().clone()
    }

    /// Publish a fully built snapshot, replacing the old one atomically.
    pub fn publish(&self, snapshot: Snapshot) {
        *self.snapshot.write() = Arc::new(snapshot);
    }

    /// Rebuild from a fresh corpus. On build failure nothing is published
    /// and the previous snapshot remains authoritative.
    pub fn rebuild(&self, corpus: &[Document]) -> Result<(), BuildError> {
        let snapshot = Snapshot::build(corpus)?;
        self.publish(snapshot);
        Ok(())
    }

    pub fn search(&self, query: &ProcessedQuery) -> Vec<SearchHit> {
        self.snapshot().search(query)
    }
}
