use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use pgvec_provision_core::SqlStatement;
use pgvec_provision_service::{ExecutorFactory, ProvisioningService};
use pgvec_provision_storage::{Acknowledgement, ExecutionError, SqlExecutor};
use serde_json::{json, Value};
use tower::ServiceExt;

use crate::{create_router, AppState};

struct ScriptedExecutor {
    log: Arc<Mutex<Vec<String>>>,
    reject_table: bool,
}

#[async_trait]
impl SqlExecutor for ScriptedExecutor {
    async fn execute(&mut self, statement: &SqlStatement) -> Result<Acknowledgement, ExecutionError> {
        if self.reject_table && statement.sql.starts_with("CREATE TABLE") {
            return Err(ExecutionError::Rejected(
                "relation already exists with incompatible schema".to_owned(),
            ));
        }
        self.log.lock().unwrap().push(statement.sql.clone());
        Ok(Acknowledgement::default())
    }
}

struct ScriptedFactory {
    log: Arc<Mutex<Vec<String>>>,
    reject_table: bool,
}

#[async_trait]
impl ExecutorFactory for ScriptedFactory {
    async fn open(&self) -> Result<Box<dyn SqlExecutor>, ExecutionError> {
        Ok(Box::new(ScriptedExecutor { log: Arc::clone(&self.log), reject_table: self.reject_table }))
    }
}

fn router(reject_table: bool) -> (axum::Router, Arc<Mutex<Vec<String>>>) {
    let log = Arc::new(Mutex::new(Vec::new()));
    let factory = Arc::new(ScriptedFactory { log: Arc::clone(&log), reject_table });
    let state = Arc::new(AppState { service: Arc::new(ProvisioningService::new(factory)) });
    (create_router(state), log)
}

fn rag_event() -> Value {
    json!({
        "schema_name": "rag",
        "table_name": "docs",
        "table_Schema": {
            "primary_key_field": "id",
            "vector_field": "embedding",
            "text_field": "content",
            "metadata_field": "meta"
        },
        "dimensional_embedding": 1024
    })
}

fn post(uri: &str, body: impl Into<Body>) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(body.into())
        .unwrap()
}

async fn json_body(response: axum::response::Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_health() {
    let (app, _) = router(false);
    let response =
        app.oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap()).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_invoke_success_envelope() {
    let (app, log) = router(false);

    let response = app.oneshot(post("/invoke", rag_event().to_string())).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        json_body(response).await,
        json!({"statusCode": 200, "body": "SQL commands executed successfully"})
    );
    assert_eq!(log.lock().unwrap().len(), 4);
}

#[tokio::test]
async fn test_invoke_statement_failure_envelope() {
    let (app, log) = router(true);

    let response = app.oneshot(post("/invoke", rag_event().to_string())).await.unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = json_body(response).await;
    assert_eq!(body["statusCode"], 500);
    assert!(
        body["body"].as_str().unwrap().contains("relation already exists with incompatible schema")
    );
    assert_eq!(log.lock().unwrap().len(), 2);
}

#[tokio::test]
async fn test_invoke_malformed_body_still_gets_envelope() {
    let (app, log) = router(false);

    let response = app.oneshot(post("/invoke", "{not json")).await.unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = json_body(response).await;
    assert!(body["body"].as_str().unwrap().starts_with("Error executing SQL commands: invalid payload"));
    assert!(log.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_preview_statements() {
    let (app, log) = router(false);

    let response = app.oneshot(post("/api/statements", rag_event().to_string())).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    let kinds: Vec<&str> =
        body.as_array().unwrap().iter().map(|s| s["kind"].as_str().unwrap()).collect();
    assert_eq!(kinds, ["extension", "schema", "table", "index"]);
    assert!(log.lock().unwrap().is_empty(), "preview must not execute anything");
}

#[tokio::test]
async fn test_preview_missing_field_is_bad_request() {
    let (app, _) = router(false);
    let mut event = rag_event();
    event["table_Schema"].as_object_mut().unwrap().remove("text_field");

    let response = app.oneshot(post("/api/statements", event.to_string())).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json_body(response).await, json!({"error": "missing required field: text_field"}));
}
