use anyhow::Result;
use axum::extract::{Path as AxumPath, Query, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use facsearch_core::persist::{load_snapshot, save_snapshot, IndexPaths};
use facsearch_core::query::PassthroughLemmatizer;
use facsearch_core::{
    paginate, process_query, DocRecord, DocStore, Document, QueryError, SearchEngine,
    DEFAULT_PAGE_SIZE,
};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

#[derive(Deserialize)]
pub struct SearchParams {
    pub q: String,
    #[serde(default)]
    pub page: usize,
    #[serde(default = "default_page_size")]
    pub page_size: usize,
}
fn default_page_size() -> usize {
    DEFAULT_PAGE_SIZE
}

#[derive(Serialize)]
pub struct SearchResponse {
    pub query: String,
    pub took_s: f64,
    pub total_hits: usize,
    pub page: usize,
    pub total_pages: usize,
    pub results: Vec<SearchResult>,
}

#[derive(Serialize)]
pub struct SearchResult {
    pub document_id: String,
    pub similarity: f32,
    pub url: Option<String>,
    pub summary: String,
}

#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<SearchEngine>,
    pub docs: Arc<DocStore>,
    pub index_root: PathBuf,
    /// JSONL corpus used by /reindex; reindexing is disabled when unset.
    pub corpus_path: Option<PathBuf>,
    pub admin_token: Option<String>,
}

pub fn build_app(index_dir: String, corpus_path: Option<String>) -> Result<Router> {
    let index_paths = IndexPaths::new(&index_dir);
    let snapshot = load_snapshot(&index_paths)?;
    let docs = DocStore::open(index_paths.root.join("docstore"))?;
    let admin_token = std::env::var("ADMIN_TOKEN").ok();

    let app_state = AppState {
        engine: Arc::new(SearchEngine::new(snapshot)),
        docs: Arc::new(docs),
        index_root: PathBuf::from(&index_dir),
        corpus_path: corpus_path.map(PathBuf::from),
        admin_token,
    };

    // CORS: read CORS_ALLOW_ORIGIN (comma-separated) or allow Any by default
    let cors = match std::env::var("CORS_ALLOW_ORIGIN") {
        Ok(val) => {
            let origins: Vec<_> = val.split(',').filter_map(|s| s.trim().parse().ok()).collect();
            if origins.is_empty() {
                CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any)
            } else {
                CorsLayer::new()
                    .allow_origin(AllowOrigin::list(origins))
                    .allow_methods(Any)
                    .allow_headers(Any)
            }
        }
        Err(_) => CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any),
    };

    let app = Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/search", get(search_handler))
        .route("/doc/:doc_id", get(doc_handler))
        .route("/reindex", post(reindex_handler))
        .with_state(app_state)
        .layer(cors);
    Ok(app)
}

pub async fn search_handler(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<SearchResponse>, (StatusCode, String)> {
    let start = std::time::Instant::now();

    if params.page_size == 0 {
        return Err((StatusCode::BAD_REQUEST, "page_size must be positive".into()));
    }

    let snapshot = state.engine.snapshot();
    let query = match process_query(&params.q, &PassthroughLemmatizer, &snapshot.vectorizer) {
        Ok(q) => q,
        Err(QueryError::EmptyQuery) => {
            return Err((
                StatusCode::BAD_REQUEST,
                "no terms recognized in query".into(),
            ));
        }
    };

    let hits = snapshot.search(&query);
    let total_hits = hits.len();
    let (window, total_pages) = paginate(&hits, params.page, params.page_size);

    let results: Vec<SearchResult> = window
        .into_iter()
        .map(|hit| {
            let meta = state.docs.get(&hit.doc_id).ok().flatten();
            SearchResult {
                document_id: hit.doc_id,
                similarity: hit.similarity,
                url: meta.as_ref().and_then(|m| m.url.clone()),
                summary: meta.map(|m| m.summary).unwrap_or_default(),
            }
        })
        .collect();

    Ok(Json(SearchResponse {
        query: params.q,
        took_s: start.elapsed().as_secs_f64(),
        total_hits,
        page: params.page,
        total_pages,
        results,
    }))
}

pub async fn doc_handler(
    State(state): State<AppState>,
    AxumPath(doc_id): AxumPath<String>,
) -> Result<Json<serde_json::Value>, (StatusCode, String)> {
    match state.docs.get(&doc_id) {
        Ok(Some(meta)) => Ok(Json(serde_json::json!({
            "document_id": doc_id,
            "title": meta.title,
            "url": meta.url,
            "summary": meta.summary,
        }))),
        Ok(None) => Err((StatusCode::NOT_FOUND, "document not found".into())),
        Err(err) => Err((StatusCode::INTERNAL_SERVER_ERROR, err.to_string())),
    }
}

/// Rebuild from the configured corpus and republish atomically. On failure
/// the previous snapshot stays authoritative and keeps serving queries.
async fn reindex_handler(
    State(state): State<AppState>,
    headers: axum::http::HeaderMap,
) -> Result<Json<serde_json::Value>, (StatusCode, String)> {
    authorize(&state, &headers)?;
    let corpus_path = state
        .corpus_path
        .as_ref()
        .ok_or((StatusCode::SERVICE_UNAVAILABLE, "no corpus configured".to_string()))?;

    let records = read_corpus(corpus_path)
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?;
    let corpus: Vec<Document> = records
        .iter()
        .map(|r| Document::new(r.id.clone(), r.text.clone()))
        .collect();
    state
        .engine
        .rebuild(&corpus)
        .map_err(|e| (StatusCode::UNPROCESSABLE_ENTITY, e.to_string()))?;

    // Refresh display metadata alongside the snapshot so documents first
    // introduced here don't surface with empty url/summary.
    for record in &records {
        let meta = DocRecord {
            title: record.title.clone().unwrap_or_else(|| record.id.clone()),
            url: record.url.clone(),
            summary: record.summary.clone().unwrap_or_default(),
        };
        state
            .docs
            .put(&record.id, &meta)
            .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?;
    }
    state
        .docs
        .flush()
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?;

    let snapshot = state.engine.snapshot();
    save_snapshot(&IndexPaths::new(&state.index_root), &snapshot)
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?;

    tracing::info!(num_docs = corpus.len(), "reindexed and republished snapshot");
    Ok(Json(serde_json::json!({ "status": "ok", "num_docs": corpus.len() })))
}

#[derive(Deserialize)]
struct CorpusRecord {
    id: String,
    text: String,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    summary: Option<String>,
}

fn read_corpus(path: &PathBuf) -> Result<Vec<CorpusRecord>> {
    let reader = BufReader::new(File::open(path)?);
    let mut records = Vec::new();
    for line in reader.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        match serde_json::from_str::<CorpusRecord>(&line) {
            Ok(rec) => records.push(rec),
            Err(err) => tracing::warn!(%err, "skipping malformed corpus record"),
        }
    }
    Ok(records)
}

fn authorize(state: &AppState, headers: &axum::http::HeaderMap) -> Result<(), (StatusCode, String)> {
    let required = match &state.admin_token {
        Some(t) => t,
        None => return Err((StatusCode::UNAUTHORIZED, "ADMIN_TOKEN not set".into())),
    };
    let provided = headers.get("X-ADMIN-TOKEN").and_then(|v| v.to_str().ok()).unwrap_or("");
    if provided == required {
        Ok(())
    } else {
        Err((StatusCode::UNAUTHORIZED, "invalid admin token".into()))
    }
}
