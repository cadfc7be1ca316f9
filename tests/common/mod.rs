// file: tests/common/mod.rs
// description: in-process fake of the backend REST API for integration tests
// reference: https://docs.rs/axum

#![allow(dead_code)]

use axum::extract::{Multipart, Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use local_ai_client::{Config, HttpGateway};
use serde_json::{Value, json};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// What the fake backend saw, plus the documents it currently holds.
#[derive(Default)]
pub struct Recorded {
    pub query_bodies: Vec<Value>,
    pub uploads: Vec<UploadSeen>,
    pub documents: Vec<Value>,
    pub loaded: Vec<String>,
    /// List endpoints answer 200 without their list key.
    pub drop_list_keys: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct UploadSeen {
    pub field: String,
    pub file_name: String,
    pub content_type: Option<String>,
    pub len: usize,
}

pub type Shared = Arc<Mutex<Recorded>>;

pub struct FakeBackend {
    pub base_url: String,
    pub state: Shared,
}

impl FakeBackend {
    pub async fn spawn() -> Self {
        let state = Shared::default();
        let api = Router::new()
            .route("/health", get(health))
            .route("/models", get(list_models))
            .route("/models/download", post(download_model))
            .route("/models/load", post(load_model))
            .route("/models/{name}", delete(delete_model))
            .route("/documents", get(list_documents))
            .route("/documents/upload", post(upload_document))
            .route("/documents/{id}", delete(delete_document))
            .route("/wiki/search", get(search_wiki))
            .route("/query", post(query));
        let app = Router::new().nest("/api/v1", api).with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url: format!("http://{}/api/v1", addr),
            state,
        }
    }

    pub fn config(&self) -> Config {
        let mut config = Config::default_config();
        config.backend.base_url = self.base_url.clone();
        config.backend.request_timeout_secs = 5;
        config
    }

    pub fn gateway(&self) -> HttpGateway {
        HttpGateway::new(&self.config().backend).unwrap()
    }

    pub fn query_bodies(&self) -> Vec<Value> {
        self.state.lock().unwrap().query_bodies.clone()
    }

    pub fn uploads(&self) -> Vec<UploadSeen> {
        self.state.lock().unwrap().uploads.clone()
    }

    pub fn drop_list_keys(&self) {
        self.state.lock().unwrap().drop_list_keys = true;
    }
}

fn error(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "error": message }))).into_response()
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok", "message": "Local AI backend is running" }))
}

fn keyless(state: &Shared) -> Option<Json<Value>> {
    state
        .lock()
        .unwrap()
        .drop_list_keys
        .then(|| Json(json!({ "message": "oops" })))
}

async fn list_models(State(state): State<Shared>) -> Json<Value> {
    if let Some(reply) = keyless(&state) {
        return reply;
    }
    Json(json!({
        "models": [
            { "id": 1, "name": "llama2", "size": 3825819519u64, "status": "loaded" },
            { "id": "mistral", "name": "mistral", "size": "4.1 GB", "status": "available",
              "description": "Mistral 7B" },
            { "id": 1, "name": "llama2-duplicate", "size": 1, "status": "error" }
        ]
    }))
}

async fn download_model(Json(body): Json<Value>) -> Response {
    let name = body["name"].as_str().unwrap_or_default();
    if body["url"].as_str().unwrap_or_default().is_empty() {
        return error(StatusCode::BAD_REQUEST, "url is required");
    }
    Json(json!({ "message": format!("Download of {} started", name) })).into_response()
}

async fn load_model(State(state): State<Shared>, Json(body): Json<Value>) -> Response {
    let name = body["name"].as_str().unwrap_or_default().to_string();
    if name == "ghost" {
        return error(StatusCode::NOT_FOUND, "Model not found");
    }
    state.lock().unwrap().loaded.push(name.clone());
    Json(json!({ "message": format!("Model {} loaded", name) })).into_response()
}

async fn delete_model(Path(name): Path<String>) -> Json<Value> {
    Json(json!({ "message": format!("Model {} deleted", name) }))
}

async fn list_documents(State(state): State<Shared>) -> Json<Value> {
    if let Some(reply) = keyless(&state) {
        return reply;
    }
    let documents = state.lock().unwrap().documents.clone();
    Json(json!({ "documents": documents }))
}

async fn upload_document(State(state): State<Shared>, mut multipart: Multipart) -> Response {
    while let Ok(Some(field)) = multipart.next_field().await {
        let seen = UploadSeen {
            field: field.name().unwrap_or_default().to_string(),
            file_name: field.file_name().unwrap_or_default().to_string(),
            content_type: field.content_type().map(str::to_string),
            len: 0,
        };
        let bytes = match field.bytes().await {
            Ok(bytes) => bytes,
            Err(e) => return error(StatusCode::BAD_REQUEST, &e.to_string()),
        };
        let seen = UploadSeen {
            len: bytes.len(),
            ..seen
        };

        let mut recorded = state.lock().unwrap();
        let id = format!("d{}", recorded.documents.len() + 1);
        recorded.documents.push(json!({
            "id": id,
            "name": seen.file_name,
            "type": "md",
            "size": seen.len,
            "uploadDate": "2024-05-01T10:00:00Z",
            "status": "processing"
        }));
        recorded.uploads.push(seen);
        return Json(json!({ "message": "Document uploaded successfully" })).into_response();
    }
    error(StatusCode::BAD_REQUEST, "No file uploaded")
}

async fn delete_document(State(state): State<Shared>, Path(id): Path<String>) -> Response {
    if id == "locked" {
        return (StatusCode::INTERNAL_SERVER_ERROR, "disk busy").into_response();
    }
    state.lock().unwrap().documents.retain(|doc| doc["id"] != id.as_str());
    Json(json!({ "message": "Document deleted" })).into_response()
}

async fn search_wiki(
    State(state): State<Shared>,
    Query(params): Query<HashMap<String, String>>,
) -> Json<Value> {
    if let Some(reply) = keyless(&state) {
        return reply;
    }
    let q = params.get("q").cloned().unwrap_or_default();
    let score = if q == "overconfident" { 1.7 } else { 0.92 };
    Json(json!({
        "results": [{
            "pageId": 25_338_u64,
            "title": "Quantum entanglement",
            "url": "https://en.wikipedia.org/wiki/Quantum_entanglement",
            "extract": format!("Result for {}", q),
            "relevanceScore": score
        }]
    }))
}

async fn query(State(state): State<Shared>, Json(body): Json<Value>) -> Json<Value> {
    let question = body["query"].as_str().unwrap_or_default().to_string();
    let include_wiki = body["include_wiki"].as_bool().unwrap_or(true);
    state.lock().unwrap().query_bodies.push(body);

    if question.contains("malformed") {
        return Json(json!({ "answer": 42 }));
    }
    // Unrequested source lists come back as null.
    if !include_wiki {
        return Json(json!({
            "response": "Answered from the model alone.",
            "sources": { "documents": null, "wiki": null }
        }));
    }
    Json(json!({
        "response": "Entanglement is a correlation between particles.",
        "sources": {
            "documents": [],
            "wiki": [{
                "pageId": 25_338_u64,
                "title": "Quantum entanglement",
                "url": "https://en.wikipedia.org/wiki/Quantum_entanglement",
                "extract": "Quantum entanglement is the phenomenon...",
                "relevanceScore": 0.92
            }]
        }
    }))
}
