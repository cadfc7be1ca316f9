// file: src/models/document.rs
// description: uploaded document model and its ingestion status
// reference: backend GET /documents contract

use super::de;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentType {
    Pdf,
    Docx,
    Txt,
    Md,
}

impl DocumentType {
    pub const ALL: [DocumentType; 4] = [
        DocumentType::Pdf,
        DocumentType::Txt,
        DocumentType::Docx,
        DocumentType::Md,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentType::Pdf => "pdf",
            DocumentType::Docx => "docx",
            DocumentType::Txt => "txt",
            DocumentType::Md => "md",
        }
    }

    /// Case-insensitive lookup by bare extension (`"PDF"`, `"md"`).
    pub fn from_extension(ext: &str) -> Option<Self> {
        let ext = ext.to_ascii_lowercase();
        Self::ALL.into_iter().find(|kind| kind.as_str() == ext)
    }

    pub fn from_file_name(name: &str) -> Option<Self> {
        Path::new(name)
            .extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::from_extension)
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            DocumentType::Pdf => "application/pdf",
            DocumentType::Docx => {
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
            }
            DocumentType::Txt => "text/plain",
            DocumentType::Md => "text/markdown",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentStatus {
    Processing,
    Ready,
    Error,
}

impl DocumentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentStatus::Processing => "processing",
            DocumentStatus::Ready => "ready",
            DocumentStatus::Error => "error",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    #[serde(deserialize_with = "de::string_or_number")]
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub doc_type: DocumentType,
    pub size: u64,
    pub upload_date: String,
    pub status: DocumentStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chunks: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub embeddings: Option<bool>,
}

impl Document {
    pub fn is_ready(&self) -> bool {
        self.status == DocumentStatus::Ready
    }

    /// Upload date rendered as `YYYY-MM-DD` when it parses as RFC 3339.
    pub fn upload_day(&self) -> String {
        chrono::DateTime::parse_from_rfc3339(&self.upload_date)
            .map(|dt| dt.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|_| self.upload_date.clone())
    }
}
