use anyhow::Result;
use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, HeaderValue, StatusCode},
    response::Html,
    routing::{get, post},
    Json, Router,
};
use engine::{display_title, load_directory, EngineConfig, EngineStats, RetrievalModel, SearchEngine};
use parking_lot::{Mutex, RwLock};
use serde::{Deserialize, Deserializer, Serialize};
use std::path::PathBuf;
use std::sync::Arc;
use time::format_description::well_known::Rfc3339;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

const INDEX_HTML: &str = include_str!("index.html");

#[derive(Deserialize)]
pub struct SearchParams {
    pub q: String,
    #[serde(default = "default_model", deserialize_with = "parse_model")]
    pub model: RetrievalModel,
    pub k: Option<usize>,
}
fn default_model() -> RetrievalModel { RetrievalModel::Vsm }

/// Same spellings the CLI accepts, case-insensitive.
fn parse_model<'de, D: Deserializer<'de>>(de: D) -> std::result::Result<RetrievalModel, D::Error> {
    let raw = String::deserialize(de)?;
    raw.parse().map_err(serde::de::Error::custom)
}

#[derive(Serialize)]
pub struct SearchResponse {
    pub query: String,
    pub model: RetrievalModel,
    pub took_ms: u128,
    pub took_s: f64,
    pub total_hits: usize,
    pub terms: Vec<String>,
    pub results: Vec<SearchHit>,
    /// Set when the query produced no results for a reason worth showing.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Serialize)]
pub struct SearchHit {
    pub doc: String,
    pub title: String,
    pub score: Option<f64>,
    pub snippet: Option<String>,
    pub explain: Option<String>,
}

#[derive(Serialize)]
pub struct StatsResponse {
    #[serde(flatten)]
    pub engine: EngineStats,
    pub skipped: usize,
    pub built_at: String,
}

/// One built corpus. Replaced wholesale on reload, never mutated.
pub struct Loaded {
    pub engine: SearchEngine,
    pub skipped: usize,
    pub built_at: String,
}

#[derive(Clone)]
pub struct AppState {
    pub data_dir: PathBuf,
    pub config: EngineConfig,
    pub current: Arc<RwLock<Arc<Loaded>>>,
    /// Serializes rebuilds so two reloads never race on the same corpus.
    pub build_gate: Arc<Mutex<()>>,
    pub admin_token: Option<String>,
}

impl AppState {
    /// Build the initial corpus from `data_dir`. `admin_token` gates
    /// `POST /index/reload`; `None` disables reloads.
    pub fn load(data_dir: impl Into<PathBuf>, config: EngineConfig, admin_token: Option<String>) -> Result<Self> {
        let data_dir = data_dir.into();
        let loaded = load(&data_dir, &config)?;
        tracing::info!(documents = loaded.engine.documents().len(), "corpus ready");
        Ok(Self {
            data_dir,
            config,
            current: Arc::new(RwLock::new(Arc::new(loaded))),
            build_gate: Arc::new(Mutex::new(())),
            admin_token,
        })
    }

    fn snapshot(&self) -> Arc<Loaded> { self.current.read().clone() }
}

fn load(data_dir: &std::path::Path, config: &EngineConfig) -> Result<Loaded> {
    let report = load_directory(data_dir)?;
    for s in &report.skipped {
        tracing::warn!(path = %s.path.display(), reason = %s.reason, "skipped document");
    }
    let skipped = report.skipped.len();
    let engine = SearchEngine::build(report.documents, config.clone())?;
    let built_at = time::OffsetDateTime::now_utc().format(&Rfc3339).unwrap_or_else(|_| "".into());
    Ok(Loaded { engine, skipped, built_at })
}

pub fn build_app(data_dir: String) -> Result<Router> { build_app_with_config(data_dir, EngineConfig::default()) }

/// The admin token for reloads comes from `ADMIN_TOKEN`.
pub fn build_app_with_config(data_dir: String, config: EngineConfig) -> Result<Router> {
    let state = AppState::load(data_dir, config, std::env::var("ADMIN_TOKEN").ok())?;
    Ok(router(state))
}

pub fn router(app_state: AppState) -> Router {
    Router::new()
        .route("/", get(|| async { Html(INDEX_HTML) }))
        .route("/health", get(|| async { "ok" }))
        .route("/search", get(search_handler))
        .route("/doc/:name", get(doc_handler))
        .route("/stats", get(stats_handler))
        .route("/index/reload", post(reload_handler))
        .with_state(app_state)
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer())
}

/// Origins come from `CORS_ALLOW_ORIGIN` (comma separated); unset or
/// unparsable means any origin.
fn cors_layer() -> CorsLayer {
    let origins: Vec<HeaderValue> = std::env::var("CORS_ALLOW_ORIGIN")
        .map(|val| val.split(',').filter_map(|s| s.trim().parse().ok()).collect())
        .unwrap_or_default();
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    if origins.is_empty() {
        layer.allow_origin(Any)
    } else {
        layer.allow_origin(AllowOrigin::list(origins))
    }
}

pub async fn search_handler(State(state): State<AppState>, Query(params): Query<SearchParams>) -> Json<SearchResponse> {
    let start = std::time::Instant::now();
    let loaded = state.snapshot();
    let engine = &loaded.engine;
    let k = params.k.unwrap_or(engine.config().default_k).clamp(1, 100);
    let terms = engine.query_terms(&params.q, params.model);

    let mut message = None;
    let results: Vec<SearchHit> = match params.model {
        RetrievalModel::Boolean => match engine.explain_boolean(&params.q) {
            Ok(docs) => docs
                .into_iter()
                .map(|doc| SearchHit {
                    title: display_title(&doc),
                    snippet: engine.snippet(&doc, &terms),
                    score: None,
                    explain: None,
                    doc,
                })
                .collect(),
            Err(err) => {
                message = Some(format!("malformed boolean query: {err}"));
                Vec::new()
            }
        },
        RetrievalModel::Vsm => {
            if terms.is_empty() && !params.q.trim().is_empty() {
                message = Some("query has no searchable terms".to_string());
            }
            engine
                .ranked(&params.q, k)
                .into_iter()
                .map(|hit| {
                    let top: Vec<String> =
                        engine.vsm().top_terms(&hit.doc, 3).into_iter().map(|(t, _)| t).collect();
                    SearchHit {
                        title: display_title(&hit.doc),
                        snippet: engine.snippet(&hit.doc, &terms),
                        score: Some(hit.score),
                        explain: Some(format!("top terms: {}", top.join(", "))),
                        doc: hit.doc,
                    }
                })
                .collect()
        }
    };

    let elapsed = start.elapsed();
    Json(SearchResponse {
        query: params.q,
        model: params.model,
        took_ms: elapsed.as_millis(),
        took_s: elapsed.as_secs_f64(),
        total_hits: results.len(),
        terms,
        results,
        message,
    })
}

pub async fn doc_handler(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<serde_json::Value>, (StatusCode, String)> {
    let loaded = state.snapshot();
    let doc = loaded.engine.document(&name).ok_or((StatusCode::NOT_FOUND, format!("no document named {name}")))?;
    Ok(Json(serde_json::json!({
        "doc": doc.name,
        "title": display_title(&doc.name),
        "text": doc.text,
        "terms": loaded.engine.document_terms(&name).unwrap_or_default(),
    })))
}

pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    let loaded = state.snapshot();
    Json(StatsResponse { engine: loaded.engine.stats(), skipped: loaded.skipped, built_at: loaded.built_at.clone() })
}

/// Rebuild everything from the corpus directory and swap it in. There is
/// no incremental path: a reload is a full build.
async fn reload_handler(State(state): State<AppState>, headers: HeaderMap) -> Result<Json<StatsResponse>, (StatusCode, String)> {
    authorize(&state, &headers)?;
    let worker = state.clone();
    let loaded = tokio::task::spawn_blocking(move || {
        // held through the swap so overlapping reloads publish in order
        let _gate = worker.build_gate.lock();
        let loaded = Arc::new(load(&worker.data_dir, &worker.config)?);
        *worker.current.write() = loaded.clone();
        Ok::<_, anyhow::Error>(loaded)
    })
    .await
    .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?
    .map_err(|e| (StatusCode::UNPROCESSABLE_ENTITY, e.to_string()))?;

    tracing::info!(documents = loaded.engine.documents().len(), "corpus reloaded");
    Ok(Json(StatsResponse { engine: loaded.engine.stats(), skipped: loaded.skipped, built_at: loaded.built_at.clone() }))
}

fn authorize(state: &AppState, headers: &HeaderMap) -> Result<(), (StatusCode, String)> {
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
