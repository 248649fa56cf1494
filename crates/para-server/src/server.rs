use std::sync::Arc;
use std::time::Instant;

use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

use para_core::{Analysis, AnalysisBackend};

use crate::error::AppError;
use crate::rate_limit::RateLimiter;

pub struct AppState {
    backend: Arc<dyn AnalysisBackend>,
    service_name: String,
    limiter: Option<RateLimiter>,
}

impl AppState {
    pub fn new(
        backend: Arc<dyn AnalysisBackend>,
        service_name: impl Into<String>,
        limiter: Option<RateLimiter>,
    ) -> Self {
        Self {
            backend,
            service_name: service_name.into(),
            limiter,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct GenerateRequest {
    pub paragraph: String,
}

#[derive(Debug, Serialize)]
pub struct RootResponse {
    pub message: String,
}

/// Routes: `GET /` (liveness) and `POST /generate`. CORS allows any origin.
pub fn create_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(root))
        .route("/generate", post(generate))
        .layer(cors)
        .with_state(state)
}

async fn root(State(state): State<Arc<AppState>>) -> Json<RootResponse> {
    Json(RootResponse {
        message: format!("{} - {}", state.service_name, state.backend.label()),
    })
}

async fn generate(
    State(state): State<Arc<AppState>>,
    Json(req): Json<GenerateRequest>,
) -> Result<Json<Analysis>, AppError> {
    if let Some(limiter) = &state.limiter {
        limiter.check().await?;
    }

    let started = Instant::now();
    let analysis = state.backend.analyze(&req.paragraph).await?;
    info!(
        backend = state.backend.label(),
        paragraph_chars = req.paragraph.chars().count(),
        questions = analysis.questions.len(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "generated questions"
    );
    Ok(Json(analysis))
}
