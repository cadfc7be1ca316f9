// file: src/lib.rs
// description: library entry point and public api exports
// reference: rust library patterns
#![doc = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/readme.md"))]

pub mod config;
pub mod error;
pub mod gateway;
pub mod models;
pub mod orchestrator;
pub mod registry;
pub mod session;
pub mod utils;

pub use config::{BackendConfig, Config, LoggingConfig, QueryConfig};
pub use error::{AppError, GatewayError, Result};
pub use gateway::{
    Gateway, GatewayResult, HealthResponse, HttpGateway, MessageResponse, UploadResponse,
};
pub use models::{
    ChatMessage, Document, DocumentStatus, DocumentType, Model, ModelSize, ModelStatus, ModelType,
    QueryRequest, QueryResponse, Role, Source, SourceKind, Sources, UploadFile, WikiResult,
};
pub use orchestrator::{PendingSpinner, QueryOrchestrator, QueryState, Transcript};
pub use registry::{DocumentRegistry, ModelRegistry};
pub use session::Session;
pub use utils::{HealthCheck, HealthReport, HealthStatus, MAX_UPLOAD_BYTES, Validator};
