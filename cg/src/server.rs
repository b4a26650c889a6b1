//! HTTP server
//!
//! `POST /api/generate-plan` turns a brief into plan text, `POST /api/download`
//! turns plan text into a document file.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::{Request, State};
use axum::http::{StatusCode, header};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use eyre::Result;
use serde::{Deserialize, Serialize};
use tracing::{Instrument, debug, error, info, info_span, warn};
use uuid::Uuid;

use plandoc::{Branding, OutputFormat, Theme};

use crate::planner::{FAILURE_SENTINEL, Planner, PlannerError};

/// Shared, read-only server state
#[derive(Clone)]
pub struct AppState {
    pub planner: Arc<Planner>,
    pub branding: Branding,
    pub theme: Theme,
}

// Error type

pub struct AppError {
    status: StatusCode,
    message: String,
}

impl AppError {
    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: msg.into(),
        }
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: msg.into(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = serde_json::json!({ "error": self.message });
        (self.status, Json(body)).into_response()
    }
}

// Request and response types

#[derive(Debug, Deserialize)]
pub struct GeneratePlanRequest {
    #[serde(default)]
    pub brief: String,
}

#[derive(Debug, Serialize)]
pub struct GeneratePlanResponse {
    pub plan: String,
}

#[derive(Debug, Deserialize)]
pub struct DownloadRequest {
    #[serde(default)]
    pub plan: String,
    pub format: Option<String>,
}

// Router

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/generate-plan", post(generate_plan))
        .route("/api/download", post(download))
        .layer(middleware::from_fn(request_span))
        .with_state(state)
}

// Entry point

pub async fn run_serve(state: AppState, bind: &str, port: u16) -> Result<()> {
    let app = build_router(state);
    let addr: SocketAddr = format!("{bind}:{port}").parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("cg serve listening on http://{addr}");
    axum::serve(listener, app).with_graceful_shutdown(shutdown_signal()).await?;
    info!("cg serve shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to install Ctrl+C handler: {}", e);
        std::future::pending::<()>().await;
    }
}

/// Tag every request with a time-ordered id
async fn request_span(req: Request, next: Next) -> Response {
    let span = info_span!(
        "request",
        id = %Uuid::now_v7(),
        method = %req.method(),
        path = %req.uri().path()
    );
    async move {
        let response = next.run(req).await;
        info!(status = %response.status(), "Request finished");
        response
    }
    .instrument(span)
    .await
}

// Handlers

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

async fn generate_plan(
    State(state): State<AppState>,
    Json(req): Json<GeneratePlanRequest>,
) -> Result<Response, AppError> {
    debug!(brief_len = req.brief.len(), "generate_plan: called");

    match state.planner.generate(&req.brief).await {
        Ok(plan) => Ok(Json(GeneratePlanResponse { plan }).into_response()),
        Err(PlannerError::EmptyBrief) => Err(AppError::bad_request(PlannerError::EmptyBrief.to_string())),
        Err(e) => {
            error!("Plan generation failed: {}", e);
            let body = GeneratePlanResponse {
                plan: FAILURE_SENTINEL.to_string(),
            };
            Ok((StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response())
        }
    }
}

async fn download(State(state): State<AppState>, Json(req): Json<DownloadRequest>) -> Result<Response, AppError> {
    debug!(plan_len = req.plan.len(), format = ?req.format, "download: called");

    let format = match req.format.as_deref() {
        Some(f) => f.parse::<OutputFormat>().map_err(AppError::bad_request)?,
        None => OutputFormat::default(),
    };

    let today = chrono::Local::now().date_naive();
    let exporter = format.exporter(state.theme.clone());
    let bytes = plandoc::render(&req.plan, &state.branding, today, exporter.as_ref()).map_err(|e| {
        warn!("Export failed: {}", e);
        AppError::internal(e.to_string())
    })?;

    let disposition = format!("attachment; filename=\"{}\"", format.file_name());
    Ok((
        [
            (header::CONTENT_TYPE, format.content_type().to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        bytes,
    )
        .into_response())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use tower::ServiceExt;

    use crate::config::LlmConfig;
    use crate::llm::MockLlmClient;
    use crate::prompts::PromptLoader;

    const PLAN: &str = "### Campaign Overview\nLaunch\n### Budget Breakdown (USD)\nSocial  $3,000\nEvents  $1,500";

    fn state(client: Arc<MockLlmClient>) -> AppState {
        let planner = Planner::new(client, Arc::new(PromptLoader::embedded_only()), &LlmConfig::default());
        AppState {
            planner: Arc::new(planner),
            branding: Branding::default(),
            theme: Theme::default(),
        }
    }

    async fn post_json(state: AppState, uri: &str, body: serde_json::Value) -> Response {
        build_router(state)
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri(uri)
                    .header("content-type", "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap()
    }

    async fn body_bytes(response: Response) -> Vec<u8> {
        axum::body::to_bytes(response.into_body(), 10 * 1_048_576)
            .await
            .unwrap()
            .to_vec()
    }

    async fn body_json(response: Response) -> serde_json::Value {
        serde_json::from_slice(&body_bytes(response).await).unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let resp = build_router(state(Arc::new(MockLlmClient::new(vec![]))))
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(body_json(resp).await, serde_json::json!({ "status": "ok" }));
    }

    #[tokio::test]
    async fn test_generate_plan_ok() {
        let client = Arc::new(MockLlmClient::new(vec![PLAN]));
        let resp = post_json(
            state(client.clone()),
            "/api/generate-plan",
            serde_json::json!({ "brief": "Launch a coffee brand" }),
        )
        .await;

        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(body_json(resp).await["plan"], PLAN);
        assert_eq!(client.call_count(), 1);
    }

    #[tokio::test]
    async fn test_generate_plan_empty_brief() {
        let client = Arc::new(MockLlmClient::new(vec![PLAN]));
        let resp = post_json(state(client.clone()), "/api/generate-plan", serde_json::json!({ "brief": "   " })).await;

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert!(body_json(resp).await["error"].is_string());
        assert_eq!(client.call_count(), 0);
    }

    #[tokio::test]
    async fn test_generate_plan_missing_brief() {
        let client = Arc::new(MockLlmClient::new(vec![PLAN]));
        let resp = post_json(state(client), "/api/generate-plan", serde_json::json!({})).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_generate_plan_llm_failure() {
        let client = Arc::new(MockLlmClient::scripted(vec![Err("boom".to_string())]));
        let resp = post_json(state(client), "/api/generate-plan", serde_json::json!({ "brief": "x" })).await;

        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body_json(resp).await["plan"], FAILURE_SENTINEL);
    }

    #[tokio::test]
    async fn test_generate_plan_empty_content() {
        let client = Arc::new(MockLlmClient::new(vec![""]));
        let resp = post_json(state(client), "/api/generate-plan", serde_json::json!({ "brief": "x" })).await;

        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(body_json(resp).await["plan"], "No response generated.");
    }

    #[tokio::test]
    async fn test_download_docx() {
        let resp = post_json(
            state(Arc::new(MockLlmClient::new(vec![]))),
            "/api/download",
            serde_json::json!({ "plan": PLAN }),
        )
        .await;

        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(
            resp.headers()[header::CONTENT_DISPOSITION],
            "attachment; filename=\"campaign_plan.docx\""
        );
        assert_eq!(
            resp.headers()[header::CONTENT_TYPE],
            "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
        );
        assert!(body_bytes(resp).await.starts_with(b"PK"));
    }

    #[tokio::test]
    async fn test_download_json() {
        let resp = post_json(
            state(Arc::new(MockLlmClient::new(vec![]))),
            "/api/download",
            serde_json::json!({ "plan": PLAN, "format": "json" }),
        )
        .await;

        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(
            resp.headers()[header::CONTENT_DISPOSITION],
            "attachment; filename=\"campaign_plan.json\""
        );
        let doc = body_json(resp).await;
        assert!(doc["blocks"].is_array());
    }

    #[tokio::test]
    async fn test_download_unknown_format() {
        let resp = post_json(
            state(Arc::new(MockLlmClient::new(vec![]))),
            "/api/download",
            serde_json::json!({ "plan": PLAN, "format": "pdf" }),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_download_invalid_theme() {
        let mut s = state(Arc::new(MockLlmClient::new(vec![])));
        s.theme.accent = "teal".to_string();

        let resp = post_json(s, "/api/download", serde_json::json!({ "plan": PLAN })).await;

        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body_json(resp).await["error"].as_str().unwrap().contains("teal"));
    }
}
