//! HTTP API server for hangul-autocomplete.

use crate::config::ServiceConfig;
use crate::errors::AutocompleteError;
use crate::inference::{Autocompleter, OutputMode, Recommendation};
use crate::monitoring::Telemetry;
use axum::{
    extract::{rejection::QueryRejection, Query, State},
    http::{header, StatusCode},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub struct AppState {
    pub autocompleter: Arc<Autocompleter>,
    pub telemetry: Arc<Telemetry>,
    pub config: ServiceConfig,
}

impl AppState {
    pub fn new(autocompleter: Arc<Autocompleter>, config: ServiceConfig) -> Self {
        Self {
            autocompleter,
            telemetry: Arc::new(Telemetry::new()),
            config,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub q: Option<String>,
    pub n: Option<usize>,
    #[serde(rename = "type")]
    pub mode: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct Subkey {
    pub subkey: String,
    pub prob: f32,
}

impl From<&Recommendation> for Subkey {
    fn from(r: &Recommendation) -> Self {
        Self {
            subkey: r.text.clone(),
            prob: r.probability,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SearchResponse {
    pub q: String,
    pub subkeys: Vec<Subkey>,
}

/// A validated search request.
struct SearchRequest {
    query: String,
    num_results: usize,
    mode: OutputMode,
}

impl SearchRequest {
    fn parse(params: SearchParams, config: &ServiceConfig) -> Result<Self, AutocompleteError> {
        let query = params
            .q
            .ok_or_else(|| AutocompleteError::InvalidInput("missing query parameter 'q'".into()))?;
        let chars = query.chars().count();
        if chars == 0 || chars > config.max_query_chars {
            return Err(AutocompleteError::InvalidInput(format!(
                "'q' must be 1..={} characters (got {})",
                config.max_query_chars, chars
            )));
        }
        let num_results = params
            .n
            .unwrap_or(config.default_results)
            .clamp(1, config.max_results);
        let mode = match params.mode.as_deref() {
            Some(m) => m.parse()?,
            None => OutputMode::default(),
        };
        Ok(Self {
            query,
            num_results,
            mode,
        })
    }
}

/// Build the application router.
pub fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(health_check))
        .route("/health", get(health_check))
        .route("/api/v1/search", get(search))
        .route("/metrics", get(metrics))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

/// Serve `autocompleter` on `config.host:config.port` until Ctrl-C.
pub async fn run_server(
    autocompleter: Arc<Autocompleter>,
    config: ServiceConfig,
) -> Result<(), AutocompleteError> {
    let addr = config.bind_address();
    let state = Arc::new(AppState::new(autocompleter, config));
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(addr.as_str()).await?;
    tracing::info!("Server running on http://{}", addr);
    tracing::info!("Search: http://{}/api/v1/search?q=", addr);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Failed to listen for shutdown signal: {}", e);
    }
}

async fn health_check() -> &'static str {
    "OK"
}

async fn search(
    State(state): State<Arc<AppState>>,
    params: Result<Query<SearchParams>, QueryRejection>,
) -> Result<Json<SearchResponse>, ApiError> {
    let start = Instant::now();
    let result = run_search(&state, params).await;
    match &result {
        Ok(Json(resp)) => state
            .telemetry
            .record_request(start.elapsed(), resp.subkeys.len()),
        Err(_) => state.telemetry.record_error(start.elapsed()),
    }
    state
        .telemetry
        .set_cache_hit_rate(state.autocompleter.cache().hit_rate());
    result
}

async fn run_search(
    state: &Arc<AppState>,
    params: Result<Query<SearchParams>, QueryRejection>,
) -> Result<Json<SearchResponse>, ApiError> {
    let Query(params) = params.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    let request = SearchRequest::parse(params, &state.config)?;

    let autocompleter = Arc::clone(&state.autocompleter);
    let query = request.query.clone();
    let recommendations = tokio::task::spawn_blocking(move || {
        autocompleter.suggest(&query, request.num_results, request.mode)
    })
    .await
    .map_err(|e| ApiError::Internal(format!("search task failed: {}", e)))??;

    Ok(Json(SearchResponse {
        q: request.query,
        subkeys: recommendations.iter().map(Subkey::from).collect(),
    }))
}

async fn metrics(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4; charset=utf-8")],
        state.telemetry.export_metrics(),
    )
}

#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    Internal(String),
}

impl From<AutocompleteError> for ApiError {
    fn from(e: AutocompleteError) -> Self {
        match e {
            AutocompleteError::InvalidInput(msg) => ApiError::BadRequest(msg),
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match self {
            ApiError::BadRequest(m) => (StatusCode::BAD_REQUEST, m),
            ApiError::Internal(m) => {
                tracing::error!("search failed: {}", m);
                (StatusCode::INTERNAL_SERVER_ERROR, m)
            }
        };
        (status, Json(serde_json::json!({ "error": message }))).into_response()
    }
}
