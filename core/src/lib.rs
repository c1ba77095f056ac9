pub mod docstore;
pub mod embeddings;
pub mod engine;
pub mod error;
pub mod index;
pub mod paginate;
pub mod persist;
pub mod query;
pub mod tokenizer;
pub mod vectorizer;

pub use docstore::{DocRecord, DocStore};
pub use embeddings::EmbeddingStore;
pub use engine::{SearchEngine, SearchHit, Snapshot};
pub use error::{BuildError, QueryError};
pub use index::{InvertedIndex, Posting};
pub use paginate::{paginate, DEFAULT_PAGE_SIZE};
pub use query::{apply_corrections, process_query, Lemmatizer, ProcessedQuery};
pub use vectorizer::{Document, TfidfVectorizer};

pub type TermId = u32;

/// Sparse tf-idf row: term id -> weight, only nonzero entries materialized.
pub type SparseVec = std::collections::HashMap<TermId, f32>;
