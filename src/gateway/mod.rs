// file: src/gateway/mod.rs
// description: typed boundary between client state and the backend REST API
// reference: https://docs.rs/async-trait

pub mod http;
#[cfg(test)]
pub(crate) mod testing;
pub mod types;

pub use http::HttpGateway;
pub use types::{HealthResponse, MessageResponse, UploadResponse};

use crate::error::GatewayError;
use crate::models::{Document, Model, QueryRequest, QueryResponse, UploadFile, WikiResult};
use async_trait::async_trait;

pub type GatewayResult<T> = std::result::Result<T, GatewayError>;

/// One operation per backend capability. Implementations marshal only:
/// no retries, no caching, one request in flight per call.
#[async_trait]
pub trait Gateway: Send + Sync {
    async fn health(&self) -> GatewayResult<HealthResponse>;

    async fn list_models(&self) -> GatewayResult<Vec<Model>>;

    async fn download_model(&self, name: &str, url: &str) -> GatewayResult<MessageResponse>;

    async fn load_model(&self, name: &str) -> GatewayResult<MessageResponse>;

    async fn delete_model(&self, name: &str) -> GatewayResult<MessageResponse>;

    async fn list_documents(&self) -> GatewayResult<Vec<Document>>;

    async fn upload_document(&self, file: &UploadFile) -> GatewayResult<UploadResponse>;

    async fn delete_document(&self, id: &str) -> GatewayResult<MessageResponse>;

    async fn search_wiki(&self, query: &str) -> GatewayResult<Vec<WikiResult>>;

    async fn query(&self, request: &QueryRequest) -> GatewayResult<QueryResponse>;
}
