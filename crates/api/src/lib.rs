mod config;
mod rate_limit;

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::extract::{Json, Query, State};
use axum::http::{header, HeaderValue, Method, Request, StatusCode};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{body::Body, Router};
use helpdesk_agents::HelpdeskAgent;
use helpdesk_core::{HelpdeskError, PolicyResult, RouterResult, WorkflowResult};
use helpdesk_observability::{AppMetrics, MetricsSnapshot};
use helpdesk_retrieval::KnowledgeStats;
use serde::{Deserialize, Serialize};
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;

pub use crate::config::ApiConfig;
use crate::rate_limit::ClientRateLimiter;

const MAX_QUESTION_LEN: usize = 2_000;
const MAX_BODY_BYTES: usize = 16 * 1024;

#[derive(Clone)]
pub struct ApiState {
    pub agent: Arc<HelpdeskAgent>,
    pub metrics: Arc<AppMetrics>,
    pub api_key: String,
    pub limiter: ClientRateLimiter,
    pub allowed_origins: Arc<Vec<String>>,
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    timestamp_utc: String,
    metrics: MetricsSnapshot,
    knowledge: KnowledgeStats,
}

#[derive(Debug, Deserialize)]
struct AskRequest {
    question: String,
}

#[derive(Debug, Serialize)]
struct AskResponse {
    #[serde(flatten)]
    result: RouterResult,
    companion_policy: Option<PolicyResult>,
}

#[derive(Debug, Deserialize)]
struct PolicyQuery {
    topic: String,
}

#[derive(Debug, Deserialize)]
struct FaqRequest {
    query: String,
}

#[derive(Debug, Deserialize)]
struct WorkflowRequest {
    name: String,
}

#[derive(Debug, Serialize)]
struct WorkflowResponse {
    #[serde(flatten)]
    result: WorkflowResult,
    template_path: Option<String>,
}

#[derive(Debug, Serialize)]
struct TopicsResponse {
    topics: Vec<String>,
}

/// Loads the knowledge base under `kb_root` and wires the router with
/// settings taken from the environment.
pub fn build_app(kb_root: impl AsRef<Path>) -> Result<Router> {
    let config = ApiConfig {
        kb_root: kb_root.as_ref().to_path_buf(),
        ..ApiConfig::from_env()
    };
    build_app_with_config(&config)
}

pub fn build_app_with_config(config: &ApiConfig) -> Result<Router> {
    let metrics = AppMetrics::shared();
    let agent = HelpdeskAgent::load(&config.kb_root, metrics.clone()).with_context(|| {
        format!(
            "failed to load knowledge base from {}",
            config.kb_root.display()
        )
    })?;

    let state = ApiState {
        agent: Arc::new(agent),
        metrics,
        api_key: config.api_key.clone(),
        limiter: ClientRateLimiter::new(config.rate_limit_window, config.rate_limit_max),
        allowed_origins: Arc::new(config.allowed_origins.clone()),
    };

    Ok(build_router(state))
}

pub fn build_router(state: ApiState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/v1/ask", post(ask))
        .route("/v1/policy", get(policy))
        .route("/v1/policies", get(policies))
        .route("/v1/faq", post(faq))
        .route("/v1/workflow", post(workflow))
        .layer(build_cors_layer(&state.allowed_origins))
        .layer(middleware::from_fn(security_headers_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            api_key_middleware,
        ))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            rate_limit_middleware,
        ))
        .with_state(state)
}

async fn health(State(state): State<ApiState>) -> impl IntoResponse {
    let payload = HealthResponse {
        status: "ok",
        timestamp_utc: chrono::Utc::now().to_rfc3339(),
        metrics: state.metrics.snapshot(),
        knowledge: state.agent.knowledge().stats(),
    };
    (StatusCode::OK, Json(payload))
}

async fn ask(State(state): State<ApiState>, Json(body): Json<AskRequest>) -> Response {
    let question = body.question.trim();
    if question.is_empty() {
        return error_response(
            StatusCode::BAD_REQUEST,
            "empty_question",
            "question must not be empty",
        );
    }
    if question.chars().count() > MAX_QUESTION_LEN {
        return error_response(
            StatusCode::PAYLOAD_TOO_LARGE,
            "question_too_long",
            "question exceeds the maximum length",
        );
    }

    let result = match state.agent.ask(question) {
        Ok(result) => result,
        Err(err) => return knowledge_error(err),
    };
    let companion_policy = match state.agent.policy_companion(question) {
        Ok(companion) => companion,
        Err(err) => return knowledge_error(err),
    };

    (
        StatusCode::OK,
        Json(AskResponse {
            result,
            companion_policy,
        }),
    )
        .into_response()
}

async fn policy(State(state): State<ApiState>, Query(query): Query<PolicyQuery>) -> Response {
    match state.agent.policy_fetch(&query.topic) {
        Ok(result) => (StatusCode::OK, Json(result)).into_response(),
        Err(err) => knowledge_error(err),
    }
}

async fn policies(State(state): State<ApiState>) -> Response {
    match state.agent.policy_topics() {
        Ok(topics) => (StatusCode::OK, Json(TopicsResponse { topics })).into_response(),
        Err(err) => knowledge_error(err),
    }
}

async fn faq(State(state): State<ApiState>, Json(body): Json<FaqRequest>) -> impl IntoResponse {
    (StatusCode::OK, Json(state.agent.faq_lookup(&body.query)))
}

async fn workflow(
    State(state): State<ApiState>,
    Json(body): Json<WorkflowRequest>,
) -> impl IntoResponse {
    let result = state.agent.workflow_guide(&body.name);
    let template_path = match &result {
        WorkflowResult::Found(hit) => hit
            .template_id
            .as_deref()
            .and_then(|template_id| state.agent.knowledge().template_path(template_id))
            .map(|path| path.display().to_string()),
        WorkflowResult::NotFound => None,
    };

    (
        StatusCode::OK,
        Json(WorkflowResponse {
            result,
            template_path,
        }),
    )
}

fn error_response(status: StatusCode, error: &str, message: &str) -> Response {
    (
        status,
        Json(serde_json::json!({
            "error": error,
            "message": message
        })),
    )
        .into_response()
}

fn knowledge_error(err: HelpdeskError) -> Response {
    tracing::error!(error = %err, "knowledge base lookup failed");
    error_response(
        StatusCode::INTERNAL_SERVER_ERROR,
        "knowledge_base_error",
        "the knowledge base could not be read",
    )
}

fn is_public_endpoint(path: &str) -> bool {
    path == "/health"
}

async fn api_key_middleware(
    State(state): State<ApiState>,
    request: Request<Body>,
    next: Next,
) -> Response {
    if request.method() == Method::OPTIONS || is_public_endpoint(request.uri().path()) {
        return next.run(request).await;
    }

    let header_key = request
        .headers()
        .get("x-api-key")
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default();

    if header_key != state.api_key {
        return error_response(
            StatusCode::UNAUTHORIZED,
            "unauthorized",
            "missing or invalid x-api-key",
        );
    }

    next.run(request).await
}

async fn rate_limit_middleware(
    State(state): State<ApiState>,
    request: Request<Body>,
    next: Next,
) -> Response {
    if request.method() == Method::OPTIONS || is_public_endpoint(request.uri().path()) {
        return next.run(request).await;
    }

    let ip = request_ip(&request);
    let Some(remaining) = state.limiter.acquire(&ip) else {
        tracing::warn!(client = %ip, "rate limit exceeded");
        return error_response(
            StatusCode::TOO_MANY_REQUESTS,
            "rate_limited",
            "rate limit exceeded for this IP",
        );
    };

    let mut response = next.run(request).await;
    response.headers_mut().insert(
        header::HeaderName::from_static("x-ratelimit-remaining"),
        HeaderValue::from(remaining),
    );
    response
}

fn request_ip(request: &Request<Body>) -> String {
    request
        .headers()
        .get("x-forwarded-for")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(',').next())
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .unwrap_or_else(|| "local".to_string())
}

async fn security_headers_middleware(request: Request<Body>, next: Next) -> Response {
    let mut response = next.run(request).await;
    let headers = response.headers_mut();

    headers.insert(
        header::X_CONTENT_TYPE_OPTIONS,
        HeaderValue::from_static("nosniff"),
    );
    headers.insert(header::X_FRAME_OPTIONS, HeaderValue::from_static("DENY"));
    headers.insert(
        header::REFERRER_POLICY,
        HeaderValue::from_static("no-referrer"),
    );
    headers.insert(
        header::CONTENT_SECURITY_POLICY,
        HeaderValue::from_static("default-src 'none'; frame-ancestors 'none'"),
    );
    headers.insert(header::CACHE_CONTROL, HeaderValue::from_static("no-store"));

    response
}

/// CORS for the configured front-end origins; unparsable entries are dropped.
fn build_cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let origins = allowed_origins
        .iter()
        .filter(|origin| origin.as_str() != "*")
        .filter_map(|origin| HeaderValue::from_str(origin).ok());

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([
            header::CONTENT_TYPE,
            header::HeaderName::from_static("x-api-key"),
        ])
}
