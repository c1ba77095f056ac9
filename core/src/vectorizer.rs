use crate::error::BuildError;
use crate::tokenizer::tokenize;
use crate::{SparseVec, TermId};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One corpus entry: a stable opaque identifier plus normalized text
/// (the output of the external scraper + lemmatizer).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    pub id: String,
    pub text: String,
}

impl Document {
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self { id: id.into(), text: text.into() }
    }
}

/// TF-IDF vectorization model. The vocabulary and idf table are frozen at
/// fit time; `transform` projects any later text into the same space.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TfidfVectorizer {
    vocabulary: HashMap<String, TermId>,
    idf: Vec<f32>,
    num_docs: u32,
}

impl TfidfVectorizer {
    /// Learn the vocabulary and idf weights from a training corpus.
    ///
    /// Term ids are assigned in lexicographic term order, so fitting the
    /// same corpus twice yields an identical model.
    pub fn fit(corpus: &[Document]) -> Result<Self, BuildError> {
        if corpus.is_empty() {
            return Err(BuildError::EmptyCorpus);
        }

        let mut df: HashMap<String, u32> = HashMap::new();
        for doc in corpus {
            let mut seen = tokenize(&doc.text);
            seen.sort_unstable();
            seen.dedup();
            for term in seen {
                *df.entry(term).or_insert(0) += 1;
            }
        }
        if df.is_empty() {
            return Err(BuildError::EmptyVocabulary);
        }

        let mut terms: Vec<String> = df.keys().cloned().collect();
        terms.sort_unstable();

        let n = corpus.len() as f32;
        let mut vocabulary = HashMap::with_capacity(terms.len());
        let mut idf = Vec::with_capacity(terms.len());
        for (tid, term) in terms.into_iter().enumerate() {
            let df_t = df[&term] as f32;
            // Smoothed idf: >= 1 for every observed term, finite for unseen df.
            idf.push(((1.0 + n) / (1.0 + df_t)).ln() + 1.0);
            vocabulary.insert(term, tid as TermId);
        }

        tracing::debug!(num_docs = corpus.len(), num_terms = vocabulary.len(), "fitted vectorizer");
        Ok(Self { vocabulary, idf, num_docs: corpus.len() as u32 })
    }

    /// Project text into the frozen vector space: tf x idf per known term,
    /// L2-normalized. Out-of-vocabulary terms are dropped; text with no
    /// known terms maps to the empty (zero) vector.
    pub fn transform(&self, text: &str) -> SparseVec {
        let mut tf: HashMap<TermId, f32> = HashMap::new();
        for term in tokenize(text) {
            if let Some(&tid) = self.vocabulary.get(&term) {
                *tf.entry(tid).or_insert(0.0) += 1.0;
            }
        }

        let mut vec: SparseVec = tf
            .into_iter()
            .map(|(tid, count)| (tid, count * self.idf[tid as usize]))
            .collect();

        let norm = vec.values().map(|w| w * w).sum::<f32>().sqrt();
        if norm > 0.0 {
            for w in vec.values_mut() {
                *w /= norm;
            }
        }
        vec
    }

    pub fn term_id(&self, term: &str) -> Option<TermId> {
        self.vocabulary.get(term).copied()
    }

    pub fn vocab_size(&self) -> usize {
        self.vocabulary.len()
    }

    pub fn num_docs(&self) -> u32 {
        self.num_docs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn corpus() -> Vec<Document> {
        vec![
            Document::new("a", "cell biology research"),
            Document::new("b", "quantum physics lab"),
            Document::new("c", "cell and molecular biology"),
        ]
    }

    #[test]
    fn fit_rejects_empty_corpus() {
        assert_eq!(TfidfVectorizer::fit(&[]).unwrap_err(), BuildError::EmptyCorpus);
    }

    #[test]
    fn fit_rejects_all_stopword_corpus() {
        let docs = vec![Document::new("x", "the and of"), Document::new("y", "a an")];
        assert_eq!(TfidfVectorizer::fit(&docs).unwrap_err(), BuildError::EmptyVocabulary);
    }

    #[test]
    fn transform_is_unit_norm() {
        let model = TfidfVectorizer::fit(&corpus()).unwrap();
        let v = model.transform("cell biology research");
        let norm: f32 = v.values().map(|w| w * w).sum::<f32>().sqrt();
        assert!((norm - 1.0).abs() < 1e-6);
    }

    #[test]
    fn unknown_terms_are_dropped() {
        let model = TfidfVectorizer::fit(&corpus()).unwrap();
        assert!(model.transform("astrophysics").is_empty());
    }

    #[test]
    fn rarer_terms_weigh_more() {
        let model = TfidfVectorizer::fit(&corpus()).unwrap();
        // "quantum" appears in 1 doc, "cell" in 2: idf(quantum) > idf(cell)
        let v = model.transform("quantum cell");
        let q = v[&model.term_id("quantum").unwrap()];
        let c = v[&model.term_id("cell").unwrap()];
        assert!(q > c);
    }

    #[test]
    fn refit_is_reproducible() {
        let m1 = TfidfVectorizer::fit(&corpus()).unwrap();
        let m2 = TfidfVectorizer::fit(&corpus()).unwrap();
        assert_eq!(m1.term_id("cell biology"), m2.term_id("cell biology"));
        let v1 = m1.transform("molecular biology");
        let v2 = m2.transform("molecular biology");
        assert_eq!(v1, v2);
    }
}
