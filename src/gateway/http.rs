// file: src/gateway/http.rs
// description: reqwest implementation of the backend gateway
// reference: https://docs.rs/reqwest

use super::types::{
    DocumentsEnvelope, DownloadModelRequest, ErrorBody, HealthResponse, LoadModelRequest,
    MessageResponse, ModelsEnvelope, UploadResponse, WikiSearchEnvelope,
};
use super::{Gateway, GatewayResult};
use crate::config::BackendConfig;
use crate::error::{AppError, GatewayError, Result};
use crate::models::{Document, Model, QueryRequest, QueryResponse, UploadFile, WikiResult};
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, RequestBuilder, Url};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

#[derive(Clone)]
pub struct HttpGateway {
    client: Client,
    base_url: Url,
}

impl HttpGateway {
    pub fn new(config: &BackendConfig) -> Result<Self> {
        let base_url = Url::parse(&config.base_url)
            .map_err(|e| AppError::Config(format!("Invalid base_url {}: {}", config.base_url, e)))?;

        if base_url.cannot_be_a_base() {
            return Err(AppError::Config(format!(
                "base_url cannot carry paths: {}",
                config.base_url
            )));
        }

        let client = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| AppError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Appends percent-encoded path segments to the base path.
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    async fn send<T: DeserializeOwned>(
        &self,
        operation: &str,
        request: RequestBuilder,
    ) -> GatewayResult<T> {
        debug!("Gateway call: {}", operation);

        let response = request.send().await.map_err(|e| {
            warn!("{} failed before a response arrived: {}", operation, e);
            GatewayError::network(format!("{} request failed: {}", operation, e))
        })?;

        let status = response.status();
        let body = response.bytes().await.map_err(|e| {
            GatewayError::network(format!("{} response body could not be read: {}", operation, e))
        })?;

        if !status.is_success() {
            let message = ErrorBody::describe(&String::from_utf8_lossy(&body));
            warn!("{} returned status {}: {}", operation, status, message);
            return Err(GatewayError::Status {
                status: status.as_u16(),
                message,
            });
        }

        serde_json::from_slice(&body).map_err(|e| {
            warn!("{} returned a malformed payload: {}", operation, e);
            GatewayError::Decode {
                status: status.as_u16(),
                message: format!("{} response could not be parsed: {}", operation, e),
            }
        })
    }
}

#[async_trait]
impl Gateway for HttpGateway {
    async fn health(&self) -> GatewayResult<HealthResponse> {
        let url = self.endpoint(&["health"]);
        self.send("health", self.client.get(url)).await
    }

    async fn list_models(&self) -> GatewayResult<Vec<Model>> {
        let url = self.endpoint(&["models"]);
        let envelope: ModelsEnvelope = self.send("list models", self.client.get(url)).await?;
        Ok(envelope.models.unwrap_or_default())
    }

    async fn download_model(&self, name: &str, url: &str) -> GatewayResult<MessageResponse> {
        let endpoint = self.endpoint(&["models", "download"]);
        let body = DownloadModelRequest { name, url };
        self.send("download model", self.client.post(endpoint).json(&body))
            .await
    }

    async fn load_model(&self, name: &str) -> GatewayResult<MessageResponse> {
        let url = self.endpoint(&["models", "load"]);
        let body = LoadModelRequest { name };
        self.send("load model", self.client.post(url).json(&body)).await
    }

    async fn delete_model(&self, name: &str) -> GatewayResult<MessageResponse> {
        let url = self.endpoint(&["models", name]);
        self.send("delete model", self.client.delete(url)).await
    }

    async fn list_documents(&self) -> GatewayResult<Vec<Document>> {
        let url = self.endpoint(&["documents"]);
        let envelope: DocumentsEnvelope =
            self.send("list documents", self.client.get(url)).await?;
        Ok(envelope.documents.unwrap_or_default())
    }

    async fn upload_document(&self, file: &UploadFile) -> GatewayResult<UploadResponse> {
        let url = self.endpoint(&["documents", "upload"]);

        let mut part = Part::bytes(file.bytes.clone()).file_name(file.name.clone());
        if let Some(kind) = crate::models::DocumentType::from_file_name(&file.name) {
            part = part
                .mime_str(kind.mime_type())
                .map_err(|e| GatewayError::network(format!("Invalid upload content type: {}", e)))?;
        }
        let form = Form::new().part("file", part);

        self.send("upload document", self.client.post(url).multipart(form))
            .await
    }

    async fn delete_document(&self, id: &str) -> GatewayResult<MessageResponse> {
        let url = self.endpoint(&["documents", id]);
        self.send("delete document", self.client.delete(url)).await
    }

    async fn search_wiki(&self, query: &str) -> GatewayResult<Vec<WikiResult>> {
        let url = self.endpoint(&["wiki", "search"]);
        let envelope: WikiSearchEnvelope = self
            .send("wiki search", self.client.get(url).query(&[("q", query)]))
            .await?;
        Ok(envelope.results.unwrap_or_default())
    }

    async fn query(&self, request: &QueryRequest) -> GatewayResult<QueryResponse> {
        let url = self.endpoint(&["query"]);
        self.send("query", self.client.post(url).json(request)).await
    }
}
