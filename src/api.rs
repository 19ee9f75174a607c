//! HTTP surface over the analysis engine.
//!
//! Thin axum layer: handlers validate, call into the orchestrator / exporter /
//! verifier, and map the error taxonomy to status codes. A request always gets
//! either a well-formed JSON result or a clear rejection, never a partial body.

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;
use tower_http::cors::CorsLayer;
use tracing::warn;

use crate::error::AnalysisError;
use crate::export::{export_graph, GraphExport};
use crate::model::PostEvent;
use crate::orchestrator::{NetworkAnalysisResult, NetworkAnalyzer};
use crate::store::{AuthorStore, ConnectionStore};
use crate::verify::{extract_keywords, score_claim, NewsClient};

#[derive(Clone)]
pub struct AppState {
    pub analyzer: Arc<NetworkAnalyzer>,
    pub authors: Arc<dyn AuthorStore>,
    pub connections: Arc<dyn ConnectionStore>,
    pub news: Arc<NewsClient>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(service_status))
        .route("/health", get(|| async { "ok" }))
        .route("/analyze/network", post(analyze_network))
        .route("/network/graph", get(network_graph))
        .route("/verify/claim", post(verify_claim))
        .layer(CorsLayer::very_permissive())
        .with_state(state)
}

/// API-boundary error with a status code; body is always `{"error": ...}`.
struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    fn validation(msg: impl Into<String>) -> Self {
        Self {
            status: StatusCode::UNPROCESSABLE_ENTITY,
            message: msg.into(),
        }
    }
}

impl From<AnalysisError> for ApiError {
    fn from(err: AnalysisError) -> Self {
        let status = match err {
            AnalysisError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AnalysisError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        Self {
            status,
            message: err.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "error": self.message }))).into_response()
    }
}

async fn service_status(State(state): State<AppState>) -> Json<serde_json::Value> {
    let network_size = state.authors.author_count().await.unwrap_or(0);
    Json(json!({
        "service": "misinfo-network-analyzer",
        "version": env!("CARGO_PKG_VERSION"),
        "status": "active",
        "network_size": network_size,
        "news_api_configured": state.news.configured(),
    }))
}

async fn analyze_network(
    State(state): State<AppState>,
    Json(post): Json<PostEvent>,
) -> Result<Json<NetworkAnalysisResult>, ApiError> {
    let result = state.analyzer.analyze(&post).await?;
    Ok(Json(result))
}

async fn network_graph(State(state): State<AppState>) -> Result<Json<GraphExport>, ApiError> {
    match export_graph(state.authors.as_ref(), state.connections.as_ref()).await {
        Ok(graph) => {
            metrics::counter!("graph_exports_total").increment(1);
            Ok(Json(graph))
        }
        Err(e) => {
            warn!(error = %e, "graph export failed");
            Err(ApiError {
                status: StatusCode::SERVICE_UNAVAILABLE,
                message: format!("graph export failed: {e}"),
            })
        }
    }
}

#[derive(Debug, Deserialize)]
struct VerifyClaimRequest {
    claim_text: String,
    author_handle: String,
    #[serde(default)]
    context_keywords: Vec<String>,
}

/// Default reach assumed for a bare claim with no collector metadata.
const CLAIM_DEFAULT_REACH: u64 = 1_000;
const CLAIM_MIN_LEN: usize = 10;
const CLAIM_MAX_LEN: usize = 2_000;

async fn verify_claim(
    State(state): State<AppState>,
    Json(req): Json<VerifyClaimRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    if req.claim_text.len() < CLAIM_MIN_LEN || req.claim_text.len() > CLAIM_MAX_LEN {
        return Err(ApiError::validation(format!(
            "claim_text must be between {CLAIM_MIN_LEN} and {CLAIM_MAX_LEN} characters"
        )));
    }

    // Analyze the claim author's network first; this also validates the handle.
    let mut post = PostEvent::new(req.author_handle.clone(), CLAIM_DEFAULT_REACH);
    post.content = Some(req.claim_text.clone());
    let analysis = state.analyzer.analyze(&post).await?;

    // News search degrades to "no coverage"; a dead news backend must not fail
    // the verification request.
    let mut keywords = extract_keywords(&req.claim_text);
    keywords.extend(req.context_keywords.iter().cloned());
    let query = keywords
        .iter()
        .take(5)
        .cloned()
        .collect::<Vec<_>>()
        .join(" OR ");
    let articles = match state.news.search(&query, 20).await {
        Ok(articles) => articles,
        Err(e) => {
            warn!(error = %e, "news search failed; verifying without coverage");
            Vec::new()
        }
    };

    let verification = score_claim(&req.claim_text, &articles, &analysis);

    let mut shown = req.claim_text.clone();
    if shown.chars().count() > 200 {
        shown = shown.chars().take(200).collect();
        shown.push_str("...");
    }

    Ok(Json(json!({
        "claim_text": shown,
        "verification": verification,
        "author_analysis": {
            "handle": analysis.source_update.handle,
            "credibility_score": analysis.source_update.credibility_score,
            "risk_level": analysis.source_update.risk_level,
        },
        "risk_assessment": analysis.risk_assessment,
    })))
}
