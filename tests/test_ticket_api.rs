// tests/test_ticket_api.rs

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::{json, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tower::ServiceExt;

use ticketpilot::api::{router, AppState};
use ticketpilot::classify::ClassificationService;
use ticketpilot::llm::{CompletionModel, LlmConfig, LlmServiceError};
use ticketpilot::tickets::MemoryStore;

/// Model stub returning a fixed reply and counting calls
struct StubModel {
    reply: Option<String>,
    calls: AtomicUsize,
}

#[async_trait]
impl CompletionModel for StubModel {
    async fn complete(&self, _prompt: &str) -> Result<String, LlmServiceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.reply
            .clone()
            .ok_or_else(|| LlmServiceError::Transport("connection reset by peer".to_string()))
    }

    fn model_name(&self) -> &str {
        "stub"
    }
}

fn stub(reply: Option<&str>) -> Arc<StubModel> {
    Arc::new(StubModel {
        reply: reply.map(str::to_string),
        calls: AtomicUsize::new(0),
    })
}

fn create_test_app(config: LlmConfig, model: Arc<StubModel>) -> axum::Router {
    let classifier = ClassificationService::new(config, model);
    let state = AppState::new(Arc::new(MemoryStore::new()), Arc::new(classifier));
    router(state)
}

fn default_app() -> axum::Router {
    create_test_app(LlmConfig::with_api_key("test-key"), stub(None))
}

async fn send(app: &axum::Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(json) => {
            builder = builder.header("content-type", "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };

    let response = app
        .clone()
        .oneshot(builder.body(body).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, value)
}

fn ticket_body(title: &str, category: &str, priority: &str) -> Value {
    json!({
        "title": title,
        "description": format!("{} - full description", title),
        "category": category,
        "priority": priority,
    })
}

#[tokio::test]
async fn test_health() {
    let app = default_app();
    let (status, body) = send(&app, "GET", "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_create_and_list_tickets() {
    let app = default_app();

    let (status, created) = send(
        &app,
        "POST",
        "/api/tickets/",
        Some(ticket_body("Charged twice", "billing", "high")),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["id"], 1);
    assert_eq!(created["status"], "open");
    assert!(created["created_at"].is_string());

    send(&app, "POST", "/api/tickets", Some(ticket_body("App crashes", "technical", "critical"))).await;

    let (status, list) = send(&app, "GET", "/api/tickets/", None).await;
    assert_eq!(status, StatusCode::OK);
    let list = list.as_array().unwrap();
    assert_eq!(list.len(), 2);
    // Newest first
    assert_eq!(list[0]["title"], "App crashes");
    assert_eq!(list[1]["title"], "Charged twice");
}

#[tokio::test]
async fn test_create_rejects_invalid_payloads() {
    let app = default_app();

    let (status, body) = send(&app, "POST", "/api/tickets/", Some(ticket_body("", "billing", "low"))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["field"], "title");

    let (status, _) = send(&app, "POST", "/api/tickets/", Some(ticket_body("Title", "banana", "low"))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let long_title = "t".repeat(201);
    let (status, body) = send(&app, "POST", "/api/tickets/", Some(ticket_body(&long_title, "billing", "low"))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["field"], "title");

    let (status, _) = send(&app, "POST", "/api/tickets/", Some(json!({"title": "only a title"}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_filters_combine() {
    let app = default_app();
    send(&app, "POST", "/api/tickets/", Some(ticket_body("Invoice missing", "billing", "low"))).await;
    send(&app, "POST", "/api/tickets/", Some(ticket_body("Refund invoice", "billing", "high"))).await;
    send(&app, "POST", "/api/tickets/", Some(ticket_body("Login loop", "account", "high"))).await;

    let (_, list) = send(&app, "GET", "/api/tickets/?category=billing&priority=high", None).await;
    let list = list.as_array().unwrap();
    assert_eq!(list.len(), 1);
    assert_eq!(list[0]["title"], "Refund invoice");

    let (_, list) = send(&app, "GET", "/api/tickets/?search=INVOICE&status=open", None).await;
    assert_eq!(list.as_array().unwrap().len(), 2);

    let (_, list) = send(&app, "GET", "/api/tickets/?category=banana", None).await;
    assert!(list.as_array().unwrap().is_empty());

    let (_, list) = send(&app, "GET", "/api/tickets/?category=&search=", None).await;
    assert_eq!(list.as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn test_get_and_patch_ticket() {
    let app = default_app();
    send(&app, "POST", "/api/tickets/", Some(ticket_body("Slow dashboard", "technical", "medium"))).await;

    let (status, patched) = send(
        &app,
        "PATCH",
        "/api/tickets/1/",
        Some(json!({"status": "in_progress", "priority": "high"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(patched["status"], "in_progress");
    assert_eq!(patched["priority"], "high");
    assert_eq!(patched["title"], "Slow dashboard");

    let (status, fetched) = send(&app, "GET", "/api/tickets/1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched, patched);

    let (status, _) = send(&app, "PATCH", "/api/tickets/1/", Some(json!({"status": "banana"}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(&app, "PATCH", "/api/tickets/99/", Some(json!({"status": "closed"}))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, "GET", "/api/tickets/not-a-number/", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_is_not_allowed() {
    let app = default_app();
    send(&app, "POST", "/api/tickets/", Some(ticket_body("Keep me", "general", "low"))).await;

    let (status, _) = send(&app, "DELETE", "/api/tickets/1/", None).await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn test_stats() {
    let app = default_app();

    let (status, empty) = send(&app, "GET", "/api/tickets/stats/", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(empty["total_tickets"], 0);
    assert_eq!(empty["avg_tickets_per_day"], 0.0);

    send(&app, "POST", "/api/tickets/", Some(ticket_body("A", "billing", "high"))).await;
    send(&app, "POST", "/api/tickets/", Some(ticket_body("B", "technical", "high"))).await;
    send(&app, "PATCH", "/api/tickets/2/", Some(json!({"status": "resolved"}))).await;

    let (_, stats) = send(&app, "GET", "/api/tickets/stats", None).await;
    assert_eq!(stats["total_tickets"], 2);
    assert_eq!(stats["open_tickets"], 1);
    assert_eq!(stats["resolved_tickets"], 1);
    assert_eq!(stats["in_progress_tickets"], 0);
    assert_eq!(stats["avg_tickets_per_day"], 2.0);
    assert_eq!(stats["priority_breakdown"]["high"], 2);
    assert_eq!(stats["category_breakdown"]["billing"], 1);
    assert_eq!(stats["category_breakdown"]["technical"], 1);
}

#[tokio::test]
async fn test_classify_success() {
    let model = stub(Some(
        "```json\n{\"suggested_category\": \"Account\", \"suggested_priority\": \"Medium\"}\n```",
    ));
    let app = create_test_app(LlmConfig::with_api_key("test-key"), model.clone());

    let (status, body) = send(
        &app,
        "POST",
        "/api/tickets/classify/",
        Some(json!({"description": "I cannot reset my password at all"})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({"suggested_category": "account", "suggested_priority": "medium"})
    );
    assert_eq!(model.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_classify_validates_description() {
    let model = stub(Some("{}"));
    let app = create_test_app(LlmConfig::with_api_key("test-key"), model.clone());

    let (status, body) = send(&app, "POST", "/api/tickets/classify/", Some(json!({"description": "   "}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Description is required for classification.");

    let (status, body) = send(&app, "POST", "/api/tickets/classify/", Some(json!({}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["field"], "description");

    let (status, body) = send(&app, "POST", "/api/tickets/classify/", Some(json!({"description": "  too short  "}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("minimum 10 characters"));

    assert_eq!(model.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_classify_unavailable_without_key() {
    let model = stub(Some(r#"{"suggested_category": "billing", "suggested_priority": "low"}"#));
    let app = create_test_app(LlmConfig::default(), model.clone());

    let (status, body) = send(
        &app,
        "POST",
        "/api/tickets/classify/",
        Some(json!({"description": "Where is my invoice for March?"})),
    )
    .await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(
        body["error"],
        "Classification unavailable. Please select category and priority manually."
    );
    assert_eq!(model.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_classify_unavailable_on_transport_error_and_garbage() {
    let app = create_test_app(LlmConfig::with_api_key("test-key"), stub(None));
    let (status, _) = send(
        &app,
        "POST",
        "/api/tickets/classify",
        Some(json!({"description": "Checkout page throws a 500 error"})),
    )
    .await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);

    let app = create_test_app(LlmConfig::with_api_key("test-key"), stub(Some("I cannot classify this.")));
    let (status, _) = send(
        &app,
        "POST",
        "/api/tickets/classify/",
        Some(json!({"description": "Checkout page throws a 500 error"})),
    )
    .await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);

    // Ticket management keeps working while classification is unavailable
    let (status, _) = send(&app, "POST", "/api/tickets/", Some(ticket_body("Manual triage", "technical", "high"))).await;
    assert_eq!(status, StatusCode::CREATED);
}
