// file: src/gateway/types.rs
// description: request and response envelopes of the backend REST API
// reference: backend handler contract under the configured base path

use crate::models::{Document, Model, WikiResult};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    #[serde(default)]
    pub message: String,
}

impl HealthResponse {
    pub fn is_ok(&self) -> bool {
        self.status.eq_ignore_ascii_case("ok")
    }
}

/// Plain `{message}` acknowledgement returned by mutating endpoints.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MessageResponse {
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UploadResponse {
    /// A 2xx reply that omits the flag counts as accepted.
    #[serde(default = "default_success")]
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub document: Option<Document>,
    #[serde(default)]
    pub message: String,
}

fn default_success() -> bool {
    true
}

// List keys are required; only an explicit `null` stands for an empty list.

#[derive(Debug, Deserialize)]
pub(crate) struct ModelsEnvelope {
    #[serde(deserialize_with = "Option::deserialize")]
    pub models: Option<Vec<Model>>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct DocumentsEnvelope {
    #[serde(deserialize_with = "Option::deserialize")]
    pub documents: Option<Vec<Document>>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct WikiSearchEnvelope {
    #[serde(deserialize_with = "Option::deserialize")]
    pub results: Option<Vec<WikiResult>>,
}

#[derive(Debug, Serialize)]
pub(crate) struct DownloadModelRequest<'a> {
    pub name: &'a str,
    pub url: &'a str,
}

#[derive(Debug, Serialize)]
pub(crate) struct LoadModelRequest<'a> {
    pub name: &'a str,
}

/// Error body shape used by the backend on non-2xx replies.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct ErrorBody {
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl ErrorBody {
    /// Best human message from a raw error body.
    pub fn describe(raw: &str) -> String {
        let parsed: ErrorBody = serde_json::from_str(raw).unwrap_or_default();
        parsed
            .error
            .or(parsed.message)
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| {
                let trimmed = raw.trim();
                if trimmed.is_empty() {
                    "Unknown error".to_string()
                } else {
                    trimmed.to_string()
                }
            })
    }
}
