use std::path::PathBuf;
use std::time::Duration;

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use helpdesk_api::{build_app, build_app_with_config, ApiConfig};
use serde_json::{json, Value};
use tower::ServiceExt;

const TEST_KEY: &str = "test-helpdesk-key";

fn kb_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../kb")
}

fn test_app() -> Router {
    let config = ApiConfig {
        kb_root: kb_root(),
        api_key: TEST_KEY.to_string(),
        ..ApiConfig::default()
    };
    build_app_with_config(&config).expect("app should build")
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .header("x-api-key", TEST_KEY)
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get_with_key(uri: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .header("x-api-key", TEST_KEY)
        .body(Body::empty())
        .unwrap()
}

async fn read_json(response: axum::response::Response) -> Value {
    let bytes = to_bytes(response.into_body(), 1024 * 1024).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn health_is_public() {
    let app = build_app(kb_root()).expect("app should build");

    let response = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get("x-content-type-options").unwrap(),
        "nosniff"
    );
    let payload = read_json(response).await;
    assert_eq!(payload["status"], "ok");
    assert_eq!(payload["knowledge"]["faqs_loaded"], 6);
    assert_eq!(payload["knowledge"]["workflows_loaded"], 2);
}

#[tokio::test]
async fn ask_requires_api_key() {
    let request = Request::builder()
        .method("POST")
        .uri("/v1/ask")
        .header("content-type", "application/json")
        .body(Body::from(
            json!({ "question": "How to get transcript?" }).to_string(),
        ))
        .unwrap();

    let response = test_app().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let payload = read_json(response).await;
    assert_eq!(payload["error"], "unauthorized");
}

#[tokio::test]
async fn ask_returns_answer_and_evidence() {
    let response = test_app()
        .oneshot(post_json(
            "/v1/ask",
            json!({ "question": "How to get transcript?" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().contains_key("x-request-id"));

    let payload = read_json(response).await;
    assert_eq!(payload["branch"], "workflow");
    assert!(payload["answer"]
        .as_str()
        .unwrap()
        .starts_with("**Official Transcript Request**"));
    assert!(payload["companion_policy"].is_null());

    let evidence = payload["evidence"].as_array().unwrap();
    let tools: Vec<&str> = evidence
        .iter()
        .map(|step| step["tool"].as_str().unwrap())
        .collect();
    assert_eq!(tools, vec!["FAQLookup", "WorkflowGuide", "Notice"]);
    assert_eq!(evidence[1]["result"]["id"], "transcript");
    assert_eq!(evidence[2]["result"]["info"], "No-LLM mode (offline).");
}

#[tokio::test]
async fn ask_attaches_companion_policy_for_policy_questions() {
    let response = test_app()
        .oneshot(post_json(
            "/v1/ask",
            json!({ "question": "What is the attendance policy?" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json(response).await;
    assert_eq!(payload["branch"], "policy");
    assert_eq!(payload["companion_policy"]["found"], true);
    assert_eq!(payload["companion_policy"]["title"], "Attendance Policy");
}

#[tokio::test]
async fn ask_rejects_blank_question() {
    let response = test_app()
        .oneshot(post_json("/v1/ask", json!({ "question": "   " })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let payload = read_json(response).await;
    assert_eq!(payload["error"], "empty_question");
}

#[tokio::test]
async fn policy_endpoint_resolves_sections() {
    let response = test_app()
        .oneshot(get_with_key("/v1/policy?topic=Attendance%23medical"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json(response).await;
    assert_eq!(payload["found"], true);
    assert_eq!(payload["topic"], "attendance");
    assert_eq!(payload["section"], "Medical leave");
    assert!(payload["body"]
        .as_str()
        .unwrap()
        .starts_with("Medical leave is granted"));
}

#[tokio::test]
async fn policy_endpoint_reports_missing_topics() {
    let response = test_app()
        .oneshot(get_with_key("/v1/policy?topic=parking"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json(response).await;
    assert_eq!(payload, json!({ "found": false, "topic": "parking" }));
}

#[tokio::test]
async fn policies_lists_available_topics() {
    let response = test_app()
        .oneshot(get_with_key("/v1/policies"))
        .await
        .unwrap();

    let payload = read_json(response).await;
    assert_eq!(payload["topics"], json!(["attendance", "plagiarism"]));
}

#[tokio::test]
async fn faq_endpoint_returns_best_match() {
    let response = test_app()
        .oneshot(post_json(
            "/v1/faq",
            json!({ "query": "When are tuition fees due?" }),
        ))
        .await
        .unwrap();

    let payload = read_json(response).await;
    assert_eq!(payload["found"], true);
    assert_eq!(payload["score"], 1.0);
    assert_eq!(payload["id"], "fees-due");
}

#[tokio::test]
async fn workflow_endpoint_includes_template_path() {
    let response = test_app()
        .oneshot(post_json("/v1/workflow", json!({ "name": "reval" })))
        .await
        .unwrap();

    let payload = read_json(response).await;
    assert_eq!(payload["found"], true);
    assert_eq!(payload["id"], "reval");
    assert_eq!(payload["name"], "Answer Sheet Re-evaluation");
    assert!(payload["template_path"]
        .as_str()
        .unwrap()
        .ends_with("reval_request.md"));
}

#[tokio::test]
async fn rate_limit_rejects_excess_requests() {
    let config = ApiConfig {
        kb_root: kb_root(),
        api_key: TEST_KEY.to_string(),
        rate_limit_window: Duration::from_secs(60),
        rate_limit_max: 2,
        ..ApiConfig::default()
    };
    let app = build_app_with_config(&config).expect("app should build");

    for _ in 0..2 {
        let response = app
            .clone()
            .oneshot(get_with_key("/v1/policies"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    let response = app.oneshot(get_with_key("/v1/policies")).await.unwrap();
    assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
}

#[tokio::test]
async fn cors_allows_only_configured_origins() {
    let request = |origin: &str| {
        Request::builder()
            .uri("/health")
            .header("origin", origin)
            .body(Body::empty())
            .unwrap()
    };

    let allowed = test_app()
        .oneshot(request("http://localhost:8080"))
        .await
        .unwrap();
    assert_eq!(
        allowed
            .headers()
            .get("access-control-allow-origin")
            .unwrap(),
        "http://localhost:8080"
    );

    let foreign = test_app()
        .oneshot(request("https://elsewhere.example"))
        .await
        .unwrap();
    assert!(!foreign
        .headers()
        .contains_key("access-control-allow-origin"));
}

