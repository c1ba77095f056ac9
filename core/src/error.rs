use thiserror::Error;

/// Build-time failures. Fatal to that build: the caller must not publish a
/// new snapshot when one of these is returned.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BuildError {
    #[error("corpus contains no documents")]
    EmptyCorpus,
    #[error("no terms survived tokenization and stop-word filtering")]
    EmptyVocabulary,
}

/// Query-time failures. Recoverable: the caller reports "not enough
/// information" and retries with a reformulated query.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum QueryError {
    #[error("query is empty after normalization")]
    EmptyQuery,
}
