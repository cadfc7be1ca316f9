// file: src/gateway/testing.rs
// description: scripted in-memory gateway for unit tests

use super::{Gateway, GatewayResult, HealthResponse, MessageResponse, UploadResponse};
use crate::error::GatewayError;
use crate::models::{Document, Model, QueryRequest, QueryResponse, UploadFile, WikiResult};
use async_trait::async_trait;
use std::sync::Mutex;
use tokio::sync::oneshot;

/// Every operation answers from its scripted slot. `fail_next` makes the
/// next call of any kind fail; `hold_query` parks the next query until the
/// returned sender fires.
#[derive(Default)]
pub(crate) struct FakeGateway {
    pub calls: Mutex<Vec<String>>,
    pub models: Mutex<Vec<Model>>,
    pub documents: Mutex<Vec<Document>>,
    pub wiki: Mutex<Vec<WikiResult>>,
    pub health: Mutex<Option<HealthResponse>>,
    pub upload_reply: Mutex<Option<UploadResponse>>,
    pub query_reply: Mutex<Option<GatewayResult<QueryResponse>>>,
    pub last_query: Mutex<Option<QueryRequest>>,
    pub fail_next: Mutex<Option<GatewayError>>,
    gate: Mutex<Option<oneshot::Receiver<()>>>,
}

impl FakeGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_models(models: Vec<Model>) -> Self {
        let fake = Self::new();
        *fake.models.lock().unwrap() = models;
        fake
    }

    pub fn with_documents(documents: Vec<Document>) -> Self {
        let fake = Self::new();
        *fake.documents.lock().unwrap() = documents;
        fake
    }

    pub fn set_models(&self, models: Vec<Model>) {
        *self.models.lock().unwrap() = models;
    }

    pub fn set_documents(&self, documents: Vec<Document>) {
        *self.documents.lock().unwrap() = documents;
    }

    pub fn reply_to_query(&self, reply: GatewayResult<QueryResponse>) {
        *self.query_reply.lock().unwrap() = Some(reply);
    }

    pub fn reply_to_upload(&self, reply: UploadResponse) {
        *self.upload_reply.lock().unwrap() = Some(reply);
    }

    pub fn fail_next(&self, err: GatewayError) {
        *self.fail_next.lock().unwrap() = Some(err);
    }

    pub fn hold_query(&self) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        *self.gate.lock().unwrap() = Some(rx);
        tx
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self, operation: &str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|call| call.split(' ').next() == Some(operation))
            .count()
    }

    fn record(&self, call: String) -> GatewayResult<()> {
        self.calls.lock().unwrap().push(call);
        match self.fail_next.lock().unwrap().take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    fn ack(message: &str) -> MessageResponse {
        MessageResponse {
            message: message.to_string(),
        }
    }
}

pub(crate) fn model(name: &str, status: crate::models::ModelStatus) -> Model {
    Model {
        id: name.to_string(),
        name: name.to_string(),
        size: crate::models::ModelSize::Display("3.8 GB".to_string()),
        status,
        download_progress: None,
        description: None,
        model_type: crate::models::ModelType::Chat,
    }
}

pub(crate) fn document(id: &str, name: &str, status: crate::models::DocumentStatus) -> Document {
    Document {
        id: id.to_string(),
        name: name.to_string(),
        doc_type: crate::models::DocumentType::from_file_name(name)
            .unwrap_or(crate::models::DocumentType::Txt),
        size: 2048,
        upload_date: "2024-03-01T10:15:00Z".to_string(),
        status,
        chunks: None,
        embeddings: None,
    }
}

#[async_trait]
impl Gateway for FakeGateway {
    async fn health(&self) -> GatewayResult<HealthResponse> {
        self.record("health".to_string())?;
        Ok(self.health.lock().unwrap().clone().unwrap_or(HealthResponse {
            status: "ok".to_string(),
            message: "Local AI Project API is running".to_string(),
        }))
    }

    async fn list_models(&self) -> GatewayResult<Vec<Model>> {
        self.record("list_models".to_string())?;
        Ok(self.models.lock().unwrap().clone())
    }

    async fn download_model(&self, name: &str, url: &str) -> GatewayResult<MessageResponse> {
        self.record(format!("download_model {} {}", name, url))?;
        Ok(Self::ack("Model downloaded successfully"))
    }

    async fn load_model(&self, name: &str) -> GatewayResult<MessageResponse> {
        self.record(format!("load_model {}", name))?;
        Ok(Self::ack("Model loaded successfully"))
    }

    async fn delete_model(&self, name: &str) -> GatewayResult<MessageResponse> {
        self.record(format!("delete_model {}", name))?;
        self.models.lock().unwrap().retain(|m| !m.matches(name));
        Ok(Self::ack("Model deleted successfully"))
    }

    async fn list_documents(&self) -> GatewayResult<Vec<Document>> {
        self.record("list_documents".to_string())?;
        Ok(self.documents.lock().unwrap().clone())
    }

    async fn upload_document(&self, file: &UploadFile) -> GatewayResult<UploadResponse> {
        self.record(format!("upload_document {}", file.name))?;
        let reply = self.upload_reply.lock().unwrap().take().unwrap_or(UploadResponse {
            success: true,
            document: None,
            message: "Document uploaded successfully".to_string(),
        });
        if let Some(doc) = &reply.document {
            self.documents.lock().unwrap().push(doc.clone());
        }
        Ok(reply)
    }

    async fn delete_document(&self, id: &str) -> GatewayResult<MessageResponse> {
        self.record(format!("delete_document {}", id))?;
        self.documents.lock().unwrap().retain(|d| d.id != id);
        Ok(Self::ack("Document deleted successfully"))
    }

    async fn search_wiki(&self, query: &str) -> GatewayResult<Vec<WikiResult>> {
        self.record(format!("search_wiki {}", query))?;
        Ok(self.wiki.lock().unwrap().clone())
    }

    async fn query(&self, request: &QueryRequest) -> GatewayResult<QueryResponse> {
        self.record(format!("query {}", request.query))?;
        *self.last_query.lock().unwrap() = Some(request.clone());

        let gate = self.gate.lock().unwrap().take();
        if let Some(gate) = gate {
            let _ = gate.await;
        }

        self.query_reply
            .lock()
            .unwrap()
            .take()
            .unwrap_or_else(|| Err(GatewayError::network("no scripted reply")))
    }
}
