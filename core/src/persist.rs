use crate::embeddings::EmbeddingStore;
use crate::engine::Snapshot;
use crate::index::InvertedIndex;
use crate::vectorizer::TfidfVectorizer;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs::{create_dir_all, File};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

#[derive(Debug, Serialize, Deserialize)]
pub struct MetaFile {
    pub num_docs: u32,
    pub created_at: String,
    pub version: u32,
}

pub struct IndexPaths {
    pub root: PathBuf,
}

impl IndexPaths {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self { root: root.as_ref().to_path_buf() }
    }
    fn vectorizer(&self) -> PathBuf { self.root.join("vectorizer.bin") }
    fn index(&self) -> PathBuf { self.root.join("index.bin") }
    fn embeddings(&self) -> PathBuf { self.root.join("embeddings.bin") }
    fn meta(&self) -> PathBuf { self.root.join("meta.json") }
}

fn save_bincode<T: Serialize>(path: PathBuf, value: &T) -> Result<()> {
    let mut f = File::create(path)?;
    let bytes = bincode::serialize(value)?;
    f.write_all(&bytes)?;
    Ok(())
}

fn load_bincode<T: for<'de> Deserialize<'de>>(path: PathBuf) -> Result<T> {
    let mut f = File::open(path)?;
    let mut buf = Vec::new();
    f.read_to_end(&mut buf)?;
    Ok(bincode::deserialize(&buf)?)
}

pub fn save_vectorizer(paths: &IndexPaths, model: &TfidfVectorizer) -> Result<()> {
    create_dir_all(&paths.root)?;
    save_bincode(paths.vectorizer(), model)
}

pub fn load_vectorizer(paths: &IndexPaths) -> Result<TfidfVectorizer> {
    load_bincode(paths.vectorizer())
}

pub fn save_index(paths: &IndexPaths, index: &InvertedIndex) -> Result<()> {
    create_dir_all(&paths.root)?;
    save_bincode(paths.index(), index)
}

pub fn load_index(paths: &IndexPaths) -> Result<InvertedIndex> {
    load_bincode(paths.index())
}

pub fn save_embeddings(paths: &IndexPaths, store: &EmbeddingStore) -> Result<()> {
    create_dir_all(&paths.root)?;
    save_bincode(paths.embeddings(), store)
}

pub fn load_embeddings(paths: &IndexPaths) -> Result<EmbeddingStore> {
    load_bincode(paths.embeddings())
}

pub fn save_meta(paths: &IndexPaths, meta: &MetaFile) -> Result<()> {
    create_dir_all(&paths.root)?;
    let mut f = File::create(paths.meta())?;
    let json = serde_json::to_string_pretty(meta)?;
    f.write_all(json.as_bytes())?;
    Ok(())
}

pub fn load_meta(paths: &IndexPaths) -> Result<MetaFile> {
    let mut f = File::open(paths.meta())?;
    let mut buf = String::new();
    f.read_to_string(&mut buf)?;
    Ok(serde_json::from_str(&buf)?)
}

/// Persist a build pass wholesale. Model, index and embeddings come from the
/// same pass and are written together so a reload can never mix builds.
pub fn save_snapshot(paths: &IndexPaths, snapshot: &Snapshot) -> Result<()> {
    save_vectorizer(paths, &snapshot.vectorizer)?;
    save_index(paths, &snapshot.index)?;
    save_embeddings(paths, &snapshot.embeddings)?;
    let meta = MetaFile {
        num_docs: snapshot.vectorizer.num_docs(),
        created_at: time::OffsetDateTime::now_utc()
            .format(&time::format_description::well_known::Rfc3339)
            .unwrap_or_default(),
        version: 1,
    };
    save_meta(paths, &meta)
}

pub fn load_snapshot(paths: &IndexPaths) -> Result<Snapshot> {
    let vectorizer = load_vectorizer(paths)?;
    let index = load_index(paths)?;
    let embeddings = load_embeddings(paths)?;
    Ok(Snapshot { vectorizer, index, embeddings })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vectorizer::Document;
    use tempfile::tempdir;

    #[test]
    fn snapshot_round_trips() {
        let corpus = vec![
            Document::new("a", "cell biology research"),
            Document::new("b", "quantum physics lab"),
        ];
        let snapshot = Snapshot::build(&corpus).unwrap();
        let before = snapshot.vectorizer.transform("cell biology");

        let dir = tempdir().unwrap();
        let paths = IndexPaths::new(dir.path());
        save_snapshot(&paths, &snapshot).unwrap();

        let reloaded = load_snapshot(&paths).unwrap();
        assert_eq!(reloaded.vectorizer.transform("cell biology"), before);
        assert_eq!(reloaded.embeddings.len(), 2);
        assert_eq!(load_meta(&paths).unwrap().num_docs, 2);
    }
}
