use crate::error::QueryError;
use crate::vectorizer::TfidfVectorizer;
use crate::{SparseVec, TermId};
use std::collections::HashMap;

/// External lemmatization collaborator (spaCy-class tooling lives outside
/// this crate). Implementations must be side-effect free.
pub trait Lemmatizer: Send + Sync {
    fn lemmatize(&self, text: &str) -> String;
}

/// No-op lemmatizer for corpora whose text is already lemma-normalized.
#[derive(Debug, Default)]
pub struct PassthroughLemmatizer;

impl Lemmatizer for PassthroughLemmatizer {
    fn lemmatize(&self, text: &str) -> String {
        text.to_string()
    }
}

/// Apply accepted spelling corrections to a query. Interactive approval is a
/// UI concern; by the time this runs the caller has decided which
/// corrections to take.
pub fn apply_corrections(query: &str, corrections: &HashMap<String, String>) -> String {
    query
        .split_whitespace()
        .map(|word| corrections.get(word).map_or(word, String::as_str))
        .collect::<Vec<_>>()
        .join(" ")
}

/// A normalized query projected through the frozen vectorization model.
#[derive(Debug, Clone)]
pub struct ProcessedQuery {
    /// Recognized term ids, ascending, for candidate lookup.
    pub terms: Vec<TermId>,
    /// Sparse query vector for cosine scoring. Ephemeral, never persisted.
    pub vector: SparseVec,
}

/// Normalize a finalized query string and project it: trim + lowercase,
/// lemmatize, then transform through the model.
///
/// A query with no tokens at all after normalization is `EmptyQuery`. A
/// query whose tokens are all out of vocabulary projects to the empty
/// vector; searching with it yields an empty result set.
pub fn process_query(
    raw: &str,
    lemmatizer: &dyn Lemmatizer,
    vectorizer: &TfidfVectorizer,
) -> Result<ProcessedQuery, QueryError> {
    let normalized = raw.trim().to_lowercase();
    if normalized.is_empty() {
        return Err(QueryError::EmptyQuery);
    }

    let lemmatized = lemmatizer.lemmatize(&normalized);
    if lemmatized.trim().is_empty() {
        return Err(QueryError::EmptyQuery);
    }

    let vector = vectorizer.transform(&lemmatized);
    let mut terms: Vec<TermId> = vector.keys().copied().collect();
    terms.sort_unstable();
    Ok(ProcessedQuery { terms, vector })
}
