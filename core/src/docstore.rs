use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Display metadata for one document, looked up by id when decorating
/// search results. Owned by document storage, not by the snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocRecord {
    pub title: String,
    pub url: Option<String>,
    pub summary: String,
}

/// sled-backed key-value store of document metadata, keyed by document id.
pub struct DocStore {
    db: sled::Db,
}

impl DocStore {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let db = sled::open(path)?;
        Ok(Self { db })
    }

    pub fn put(&self, doc_id: &str, record: &DocRecord) -> Result<()> {
        let bytes = bincode::serialize(record)?;
        self.db.insert(doc_id.as_bytes(), bytes)?;
        Ok(())
    }

    /// `Ok(None)` for an unknown id; the caller excludes or substitutes
    /// placeholder metadata, it does not fail the query.
    pub fn get(&self, doc_id: &str) -> Result<Option<DocRecord>> {
        match self.db.get(doc_id.as_bytes())? {
            Some(bytes) => Ok(Some(bincode::deserialize(&bytes)?)),
            None => Ok(None),
        }
    }

    pub fn len(&self) -> usize {
        self.db.len()
    }

    pub fn is_empty(&self) -> bool {
        self.db.is_empty()
    }

    pub fn flush(&self) -> Result<()> {
        self.db.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn put_get_round_trip() {
        let dir = tempdir().unwrap();
        let store = DocStore::open(dir.path()).unwrap();
        let record = DocRecord {
            title: "Dr. Jane Doe".into(),
            url: Some("https://example.edu/faculty/jdoe".into()),
            summary: "cell and molecular biology".into(),
        };
        store.put("doc-1", &record).unwrap();
        assert_eq!(store.get("doc-1").unwrap(), Some(record));
        assert_eq!(store.get("missing").unwrap(), None);
    }
}
