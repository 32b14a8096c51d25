use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use apiscope_client::{HttpDocsClient, load_file};
use apiscope_core::config::ApiscopeConfig;
use apiscope_core::error::{GenerationError, LoadError};
use apiscope_core::parse::operation::HttpMethod;
use apiscope_core::render::render_examples;
use apiscope_core::shell::{Action, Selection, SpecLoad};
use apiscope_core::{DocsClient, Example, ViewShell, project};
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{Value, json};

const DOC: &str = r#"{
  "openapi": "3.0.1",
  "info": {"title": "Pets", "version": "1"},
  "servers": [{"url": "http://pets.local"}],
  "paths": {
    "/pets/{id}": {
      "get": {
        "tags": ["pets"],
        "parameters": [
          {"name": "id", "in": "path", "required": true, "schema": {"type": "integer"}}
        ],
        "responses": {"200": {"description": "A pet"}}
      }
    }
  }
}"#;

/// Last body and query seen by the examples route.
type Seen = Arc<Mutex<Option<(Value, HashMap<String, String>)>>>;

struct TestServer {
    base_url: String,
    seen: Seen,
}

async fn generate(
    State(seen): State<Seen>,
    Query(query): Query<HashMap<String, String>>,
    Json(body): Json<Value>,
) -> Json<Value> {
    let server = query.get("serverUrl").cloned().unwrap_or_default();
    let path = body["path"].as_str().unwrap_or_default().replace("{id}", "7");
    *seen.lock().unwrap() = Some((body, query));
    Json(json!([
        {"description": "Fetch pet 7", "command": format!("curl {server}{path}")},
        {"error": "second example could not be generated"}
    ]))
}

async fn start_test_server() -> TestServer {
    let seen: Seen = Arc::default();
    let app = Router::new()
        .route("/autodocer/api-docs", get(|| async { DOC }))
        .route("/broken/api-docs", get(|| async { "not json" }))
        .route("/autodocer/ai/generate-examples", post(generate))
        .route(
            "/failing/generate-examples",
            post(|| async { StatusCode::INTERNAL_SERVER_ERROR }),
        )
        .route("/garbled/generate-examples", post(|| async { "{}" }))
        .with_state(seen.clone());

    // Bind to random port.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    TestServer {
        base_url: format!("http://{addr}"),
        seen,
    }
}

fn client(server: &TestServer, spec_path: &str, examples_path: &str) -> HttpDocsClient {
    let config = ApiscopeConfig {
        base_url: server.base_url.clone(),
        spec_path: spec_path.to_string(),
        examples_path: examples_path.to_string(),
        timeout_secs: 5,
    };
    HttpDocsClient::new(&config).unwrap()
}

#[tokio::test]
async fn fetch_spec_parses_document() {
    let server = start_test_server().await;
    let docs = client(&server, "/autodocer/api-docs", "/autodocer/ai/generate-examples");
    let spec = docs.fetch_spec().await.unwrap();
    assert_eq!(spec.title(), "Pets");
    assert!(spec.operation("/pets/{id}", HttpMethod::Get).is_some());
}

#[tokio::test]
async fn fetch_spec_reports_status() {
    let server = start_test_server().await;
    let docs = client(&server, "/nowhere", "/autodocer/ai/generate-examples");
    let err = docs.fetch_spec().await.unwrap_err();
    assert!(matches!(err, LoadError::Status(404)));
    assert_eq!(err.to_string(), "HTTP 404");
}

#[tokio::test]
async fn fetch_spec_rejects_invalid_body() {
    let server = start_test_server().await;
    let docs = client(&server, "/broken/api-docs", "/autodocer/ai/generate-examples");
    assert!(matches!(
        docs.fetch_spec().await,
        Err(LoadError::Parse(_))
    ));
}

#[tokio::test]
async fn generate_posts_descriptor_with_server_url() {
    let server = start_test_server().await;
    let docs = client(&server, "/autodocer/api-docs", "/autodocer/ai/generate-examples");
    let spec = docs.fetch_spec().await.unwrap();
    let operation = spec.operation("/pets/{id}", HttpMethod::Get).unwrap();
    let descriptor = project("/pets/{id}", HttpMethod::Get, operation);

    let examples = docs
        .generate_examples(&descriptor, "http://pets.local")
        .await
        .unwrap();
    assert_eq!(
        examples,
        vec![
            Example::command(Some("Fetch pet 7"), "curl http://pets.local/pets/7"),
            Example::error("second example could not be generated"),
        ]
    );

    let (body, query) = server.seen.lock().unwrap().take().unwrap();
    assert_eq!(query.get("serverUrl").map(String::as_str), Some("http://pets.local"));
    assert_eq!(body["httpMethod"], "GET");
    assert_eq!(body["parameters"][0]["name"], "id");
    assert_eq!(body["parameters"][0]["sourceType"], "PathVariable");
    assert_eq!(body["parameters"][0]["isRequired"], true);
}

#[tokio::test]
async fn generate_reports_server_error() {
    let server = start_test_server().await;
    let docs = client(&server, "/autodocer/api-docs", "/failing/generate-examples");
    let spec = docs.fetch_spec().await.unwrap();
    let operation = spec.operation("/pets/{id}", HttpMethod::Get).unwrap();

    let err = docs
        .generate_examples(&project("/pets/{id}", HttpMethod::Get, operation), "http://pets.local")
        .await
        .unwrap_err();
    assert!(matches!(err, GenerationError::Status { status: 500, .. }));
    assert_eq!(err.to_string(), "HTTP 500: Internal Server Error");
}

#[tokio::test]
async fn generate_rejects_non_list_payload() {
    let server = start_test_server().await;
    let docs = client(&server, "/autodocer/api-docs", "/garbled/generate-examples");
    let spec = docs.fetch_spec().await.unwrap();
    let operation = spec.operation("/pets/{id}", HttpMethod::Get).unwrap();

    let err = docs
        .generate_examples(&project("/pets/{id}", HttpMethod::Get, operation), "/")
        .await
        .unwrap_err();
    assert!(matches!(err, GenerationError::Decode(_)));
}

#[tokio::test]
async fn shell_shows_server_error_as_single_entry() {
    let server = start_test_server().await;
    let mut shell = ViewShell::new(client(
        &server,
        "/autodocer/api-docs",
        "/failing/generate-examples",
    ));
    shell.load().await.unwrap();
    shell
        .dispatch(Action::SelectEndpoint(Selection::new(
            "/pets/{id}",
            HttpMethod::Get,
        )))
        .unwrap();

    let state = shell.generate().await.unwrap();
    assert_eq!(
        render_examples(state.examples()),
        "Error: HTTP 500: Internal Server Error\n"
    );
}

#[tokio::test]
async fn shell_load_failure_is_shown() {
    let server = start_test_server().await;
    let mut shell = ViewShell::new(client(&server, "/nowhere", "/unused"));
    let state = shell.load().await.unwrap();
    assert_eq!(state.load(), &SpecLoad::Failed("HTTP 404".to_string()));
}

#[tokio::test]
async fn spec_file_is_read_by_extension() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("pets.json");
    std::fs::write(&path, DOC).unwrap();

    let spec = load_file(&path).await.unwrap();
    assert_eq!(spec.title(), "Pets");

    let docs = HttpDocsClient::new(&ApiscopeConfig::default())
        .unwrap()
        .with_spec_file(path.clone());
    assert_eq!(docs.fetch_spec().await.unwrap(), spec);

    let missing = load_file(&dir.path().join("missing.yaml")).await.unwrap_err();
    assert!(matches!(missing, LoadError::Io { .. }));
}
