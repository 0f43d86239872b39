use anyhow::{Context, Result};
use axum::{
    extract::{Path, Query, State},
    http::{header, HeaderMap, HeaderName, HeaderValue, Method, StatusCode},
    routing::{get, post},
    Json, Router,
};
use engine::labels;
use engine::persist::{load_corpus, DataPaths};
use engine::trends::{growth_trends, GrowthTrend};
use engine::{DatasetSource, DatasetView, DirectorySource, QaCorpus, QaError, QaPair};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

#[derive(Deserialize)]
pub struct QaParams {
    pub dataset_id: Option<String>,
    #[serde(default)]
    pub q: String,
    #[serde(default = "default_limit")]
    pub limit: usize,
}
fn default_limit() -> usize { 20 }

#[derive(Serialize)]
pub struct QaResponse {
    pub created_at: String,
    pub total_hits: usize,
    pub results: Vec<QaPair>,
}

#[derive(Serialize)]
pub struct DatasetSummary {
    pub dataset_id: String,
    pub pairs: usize,
}

#[derive(Serialize)]
pub struct TrendsResponse {
    pub dataset_id: String,
    pub trends: Vec<GrowthTrend>,
}

/// Loaded corpus plus per-dataset pair counts.
pub struct Snapshot {
    pub corpus: QaCorpus,
    pub counts: BTreeMap<String, usize>,
}

impl Snapshot {
    pub fn new(corpus: QaCorpus) -> Self {
        let mut counts = BTreeMap::new();
        for pair in &corpus.qa_pairs {
            *counts.entry(pair.dataset_id.clone()).or_insert(0) += 1;
        }
        Self { corpus, counts }
    }

    fn load(paths: &DataPaths) -> Result<Self> {
        let file = paths.corpus_file();
        let corpus = load_corpus(&file).with_context(|| format!("loading corpus {}", file.display()))?;
        Ok(Self::new(corpus))
    }
}

#[derive(Clone)]
pub struct AppState {
    pub paths: Arc<DataPaths>,
    pub snapshot: Arc<RwLock<Snapshot>>,
    pub admin_token: Option<String>,
}

const ADMIN_HEADER: &str = "x-admin-token";

/// Startup settings of the corpus service.
#[derive(Debug, Clone, Default)]
pub struct ServiceConfig {
    /// Workspace root holding `data/qa_dataset.json` and `downloads/json`.
    pub root: PathBuf,
    /// Enables `POST /admin/reload` when set.
    pub admin_token: Option<String>,
    /// Browser origins allowed to read the corpus; empty allows any.
    pub allowed_origins: Vec<HeaderValue>,
}

impl ServiceConfig {
    /// `ADMIN_TOKEN` and comma-separated `CORS_ALLOW_ORIGIN` from the environment.
    pub fn from_env(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            admin_token: std::env::var("ADMIN_TOKEN").ok().filter(|t| !t.is_empty()),
            allowed_origins: std::env::var("CORS_ALLOW_ORIGIN").map(|v| parse_origins(&v)).unwrap_or_default(),
        }
    }
}

/// Unparsable entries are dropped.
pub fn parse_origins(list: &str) -> Vec<HeaderValue> {
    list.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .filter_map(|s| s.parse().ok())
        .collect()
}

fn corpus_cors(origins: &[HeaderValue]) -> CorsLayer {
    let allow_origin = if origins.is_empty() {
        AllowOrigin::any()
    } else {
        AllowOrigin::list(origins.iter().cloned())
    };
    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE, HeaderName::from_static(ADMIN_HEADER)])
}

pub fn build_app(config: &ServiceConfig) -> Result<Router> {
    let paths = DataPaths::new(&config.root);
    let snapshot = Snapshot::load(&paths)?;
    tracing::info!(pairs = snapshot.corpus.qa_pairs.len(), datasets = snapshot.counts.len(), "corpus loaded");
    let app_state = AppState {
        paths: Arc::new(paths),
        snapshot: Arc::new(RwLock::new(snapshot)),
        admin_token: config.admin_token.clone(),
    };

    let app = Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/qa", get(qa_handler))
        .route("/datasets", get(datasets_handler))
        .route("/datasets/:dataset_id/trends", get(trends_handler))
        .route("/admin/reload", post(reload_handler))
        .with_state(app_state)
        .layer(corpus_cors(&config.allowed_origins))
        .layer(TraceLayer::new_for_http());
    Ok(app)
}

pub async fn qa_handler(State(state): State<AppState>, Query(params): Query<QaParams>) -> Json<QaResponse> {
    let needle = labels::normalize(params.q.trim()).to_lowercase();
    let limit = params.limit.clamp(1, 100);
    let snapshot = state.snapshot.read();

    let hits: Vec<&QaPair> = snapshot
        .corpus
        .qa_pairs
        .iter()
        .filter(|p| params.dataset_id.as_deref().map_or(true, |id| p.dataset_id == id))
        .filter(|p| needle.is_empty() || labels::normalize(&p.question).to_lowercase().contains(&needle))
        .collect();
    Json(QaResponse {
        created_at: snapshot.corpus.created_at.clone(),
        total_hits: hits.len(),
        results: hits.into_iter().take(limit).cloned().collect(),
    })
}

pub async fn datasets_handler(State(state): State<AppState>) -> Json<Vec<DatasetSummary>> {
    let snapshot = state.snapshot.read();
    Json(
        snapshot
            .counts
            .iter()
            .map(|(id, n)| DatasetSummary { dataset_id: id.clone(), pairs: *n })
            .collect(),
    )
}

pub async fn trends_handler(
    State(state): State<AppState>,
    Path(dataset_id): Path<String>,
) -> Result<Json<TrendsResponse>, (StatusCode, String)> {
    let source = DirectorySource::new(state.paths.downloads_dir("json"));
    let doc = source.load(&dataset_id).map_err(|e| match e {
        QaError::DatasetLoad { .. } => (StatusCode::NOT_FOUND, e.to_string()),
        other => (StatusCode::INTERNAL_SERVER_ERROR, other.to_string()),
    })?;
    let view = DatasetView::new(&doc)
        .ok_or_else(|| (StatusCode::UNPROCESSABLE_ENTITY, format!("dataset {dataset_id} has no data rows")))?;
    Ok(Json(TrendsResponse { trends: growth_trends(&view), dataset_id }))
}

async fn reload_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<serde_json::Value>, (StatusCode, String)> {
    authorize(&state, &headers)?;
    let fresh = Snapshot::load(&state.paths).map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, format!("{e:#}")))?;
    let pairs = fresh.corpus.qa_pairs.len();
    *state.snapshot.write() = fresh;
    tracing::info!(pairs, "corpus reloaded");
    Ok(Json(serde_json::json!({ "pairs": pairs })))
}

/// Reload needs a configured token and a matching `X-ADMIN-TOKEN` header.
fn authorize(state: &AppState, headers: &HeaderMap) -> Result<(), (StatusCode, String)> {
    let Some(required) = state.admin_token.as_deref() else {
        return Err((StatusCode::UNAUTHORIZED, "corpus reload disabled: ADMIN_TOKEN not set".into()));
    };
    match headers.get(ADMIN_HEADER).map(HeaderValue::as_bytes) {
        Some(provided) if provided == required.as_bytes() => Ok(()),
        _ => Err((StatusCode::UNAUTHORIZED, "invalid admin token".into())),
    }
}
