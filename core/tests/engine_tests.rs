use facsearch_core::query::PassthroughLemmatizer;
use facsearch_core::{
    paginate, process_query, Document, EmbeddingStore, ProcessedQuery, Snapshot,
};

fn corpus() -> Vec<Document> {
    vec![
        Document::new("a", "cell biology research"),
        Document::new("b", "quantum physics lab"),
        Document::new("c", "cell and molecular biology"),
    ]
}

fn query(snapshot: &Snapshot, raw: &str) -> ProcessedQuery {
    process_query(raw, &PassthroughLemmatizer, &snapshot.vectorizer).unwrap()
}

#[test]
fn stored_embeddings_are_unit_norm() {
    let snapshot = Snapshot::build(&corpus()).unwrap();
    for doc in corpus() {
        let embedding = snapshot.embeddings.get(&doc.id).unwrap();
        let norm: f32 = embedding.iter().map(|w| w * w).sum::<f32>().sqrt();
        assert!((norm - 1.0).abs() < 1e-5, "doc {} has norm {norm}", doc.id);
    }
}

#[test]
fn every_posting_has_an_embedding() {
    let snapshot = Snapshot::build(&corpus()).unwrap();
    for (_tid, postings) in snapshot.index.iter() {
        for posting in postings {
            assert!(
                snapshot.embeddings.contains(&posting.doc_id),
                "posting for {} has no embedding",
                posting.doc_id
            );
        }
    }
}

#[test]
fn biology_query_ranks_biology_docs_and_drops_physics() {
    let snapshot = Snapshot::build(&corpus()).unwrap();
    let hits = snapshot.search(&query(&snapshot, "biology"));
    let ids: Vec<&str> = hits.iter().map(|h| h.doc_id.as_str()).collect();
    // "biology" shares no postings with b, so b is not even a candidate
    assert_eq!(ids, vec!["a", "c"]);
}

#[test]
fn ranked_search_is_reproducible_across_snapshots_of_the_same_corpus() {
    let s1 = Snapshot::build(&corpus()).unwrap();
    let s2 = Snapshot::build(&corpus()).unwrap();
    let hits1 = s1.search(&query(&s1, "cell molecular biology"));
    let hits2 = s2.search(&query(&s2, "cell molecular biology"));
    assert_eq!(hits1, hits2);
}

#[test]
fn pagination_windows_search_hits() {
    let snapshot = Snapshot::build(&corpus()).unwrap();
    let hits = snapshot.search(&query(&snapshot, "cell biology"));
    let (page0, total_pages) = paginate(&hits, 0, 1);
    assert_eq!(total_pages, hits.len());
    assert_eq!(page0.len(), 1);
    assert_eq!(page0[0], hits[0]);
    let (past_end, _) = paginate(&hits, total_pages, 1);
    assert!(past_end.is_empty());
}

#[test]
fn candidate_without_embedding_is_excluded_not_an_error() {
    let mut snapshot = Snapshot::build(&corpus()).unwrap();
    let q = query(&snapshot, "biology");
    assert_eq!(snapshot.search(&q).len(), 2);

    // Desync the stores: keep only c's vector. The index still lists a as a
    // candidate, but without an embedding it is silently excluded.
    let mut partial = EmbeddingStore::new(snapshot.embeddings.dim());
    partial.put("c".to_string(), snapshot.embeddings.get("c").unwrap().to_vec());
    snapshot.embeddings = partial;

    let hits = snapshot.search(&q);
    let ids: Vec<&str> = hits.iter().map(|h| h.doc_id.as_str()).collect();
    assert_eq!(ids, vec!["c"]);

    // All embeddings gone: empty result set, not a failure
    snapshot.embeddings = EmbeddingStore::new(snapshot.embeddings.dim());
    assert!(snapshot.search(&q).is_empty());
}

#[test]
fn zero_length_document_is_indexed_without_postings() {
    let mut docs = corpus();
    docs.push(Document::new("d", "the of and")); // all stop-words
    let snapshot = Snapshot::build(&docs).unwrap();

    // zero vector stored, but never a candidate
    let embedding = snapshot.embeddings.get("d").unwrap();
    assert!(embedding.iter().all(|&w| w == 0.0));
    let hits = snapshot.search(&query(&snapshot, "cell biology quantum physics"));
    assert!(hits.iter().all(|h| h.doc_id != "d"));
}
