// file: src/models/mod.rs
// description: data models module exports
// reference: internal module structure

pub mod catalog;
pub mod chat;
mod de;
pub mod document;
pub mod model;
pub mod query;
pub mod upload;
pub mod wiki;

pub use catalog::{SUGGESTED_MODELS, SuggestedModel, find_suggested};
pub use chat::{ChatMessage, Role};
pub use document::{Document, DocumentStatus, DocumentType};
pub use model::{Model, ModelSize, ModelStatus, ModelType};
pub use query::{QueryRequest, QueryResponse, Source, SourceKind, Sources};
pub use upload::UploadFile;
pub use wiki::WikiResult;
