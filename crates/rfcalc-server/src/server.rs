//! HTTP front end for the calculators.
//!
//! The API is mounted twice, under `/api/v1` and at the root:
//!
//! - `POST /calculate`: `{scenario, data}` in, calculation plus explanation out
//! - `GET /ai?prompt=...`: raw prompt passthrough to the explainer
//! - `GET /health`
//!
//! When a static directory is configured, `/` serves `welcome.html`,
//! `/index.html` serves `index.html` and `/static/*` serves assets.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use rfcalc_core::prelude::*;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tower_http::cors::CorsLayer;
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;

use crate::explain::{ExplainError, ExplainRequest, Explainer};

/// Shared handler state.
pub struct AppState {
    pub explainer: Arc<dyn Explainer>,
    /// Upper bound on one explanation call
    pub explain_timeout: Duration,
}

impl AppState {
    pub fn new(explainer: Arc<dyn Explainer>, explain_timeout: Duration) -> Self {
        Self {
            explainer,
            explain_timeout,
        }
    }

    async fn explain(&self, request: ExplainRequest) -> Result<String, ExplainError> {
        match tokio::time::timeout(self.explain_timeout, self.explainer.explain(&request)).await {
            Ok(result) => result,
            Err(_) => Err(ExplainError::ServiceUnavailable(format!(
                "timed out after {:?}",
                self.explain_timeout
            ))),
        }
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("explainer", &self.explainer.name())
            .field("explain_timeout", &self.explain_timeout)
            .finish()
    }
}

#[derive(Debug, Deserialize)]
struct CalculateBody {
    /// Kept loose so a missing or non-string name is answered in JSON
    #[serde(default)]
    scenario: Value,
    #[serde(default)]
    data: Value,
}

impl CalculateBody {
    fn scenario(&self) -> Result<Scenario, ApiError> {
        match &self.scenario {
            Value::String(name) => Ok(name.parse()?),
            Value::Null => Err(ApiError {
                status: StatusCode::BAD_REQUEST,
                message: "Missing scenario.".to_string(),
            }),
            other => Err(CalcError::UnknownScenario(other.to_string()).into()),
        }
    }
}

#[derive(Debug, Serialize)]
struct CalculateResponse {
    calculation: ScenarioOutput,
    explanation: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    explanation_error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AskParams {
    prompt: String,
}

#[derive(Debug, Serialize)]
struct AskResponse {
    response: String,
}

/// Error body shared by every failing endpoint.
#[derive(Debug)]
struct ApiError {
    status: StatusCode,
    message: String,
}

impl From<CalcError> for ApiError {
    fn from(err: CalcError) -> Self {
        let status = match err {
            CalcError::InvalidInput { .. } | CalcError::Domain { .. } => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            CalcError::UnknownScenario(_) => StatusCode::BAD_REQUEST,
            CalcError::Unexpected(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        Self {
            status,
            message: err.to_string(),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self {
            status: rejection.status(),
            message: rejection.body_text(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = serde_json::json!({"error": self.message, "explanation": Value::Null});
        (self.status, Json(body)).into_response()
    }
}

/// Builds the router; `static_dir` adds the web front end.
pub fn build_router(state: Arc<AppState>, static_dir: Option<PathBuf>) -> Router {
    let api = Router::new()
        .route("/calculate", post(calculate_handler))
        .route("/ai", get(ask_handler))
        .route("/health", get(health_handler));

    let mut router = Router::new().nest("/api/v1", api.clone()).merge(api);

    if let Some(dir) = static_dir {
        router = router
            .route_service("/", ServeFile::new(dir.join("welcome.html")))
            .route_service("/index.html", ServeFile::new(dir.join("index.html")))
            .nest_service("/static", ServeDir::new(dir.join("static")));
    }

    router
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn calculate_handler(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<CalculateBody>, JsonRejection>,
) -> Result<Json<CalculateResponse>, ApiError> {
    let Json(body) = payload?;
    let scenario = body.scenario()?;
    let data = body.data.as_object().cloned().unwrap_or_default();

    let output = compute(scenario, &data)?;

    let prompt = explanation_prompt(&data, &output);
    let (explanation, explanation_error) = match state
        .explain(ExplainRequest::for_scenario(scenario, prompt))
        .await
    {
        Ok(text) => (Some(text), None),
        Err(e) => {
            tracing::warn!(%scenario, error = %e, "explanation failed");
            (None, Some(e.to_string()))
        }
    };

    tracing::info!(%scenario, explained = explanation.is_some(), "calculation served");

    Ok(Json(CalculateResponse {
        calculation: output,
        explanation,
        explanation_error,
    }))
}

async fn ask_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<AskParams>,
) -> Result<Json<AskResponse>, ApiError> {
    match state.explain(ExplainRequest::new(params.prompt)).await {
        Ok(response) => Ok(Json(AskResponse { response })),
        Err(e) => {
            tracing::warn!(error = %e, "prompt passthrough failed");
            Err(ApiError {
                status: StatusCode::SERVICE_UNAVAILABLE,
                message: e.to_string(),
            })
        }
    }
}

async fn health_handler() -> Json<Value> {
    Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
