// file: src/models/model.rs
// description: language model entry as reported by the backend model registry
// reference: backend GET /models contract

use super::de;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelStatus {
    Available,
    Downloading,
    Loading,
    Loaded,
    Error,
}

impl ModelStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ModelStatus::Available => "available",
            ModelStatus::Downloading => "downloading",
            ModelStatus::Loading => "loading",
            ModelStatus::Loaded => "loaded",
            ModelStatus::Error => "error",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelType {
    #[default]
    Chat,
    Embedding,
    Multimodal,
}

/// The backend reports size either as raw bytes or as a preformatted string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ModelSize {
    Bytes(u64),
    Display(String),
}

impl fmt::Display for ModelSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelSize::Bytes(bytes) => f.write_str(&crate::utils::format::format_file_size(*bytes)),
            ModelSize::Display(text) => f.write_str(text),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[serde(default, deserialize_with = "de::string_or_number")]
    pub id: String,
    pub name: String,
    pub size: ModelSize,
    pub status: ModelStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub download_progress: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub model_type: ModelType,
}

impl Model {
    /// Identity used for selection and removal; falls back to `name` when
    /// the backend omits an id.
    pub fn key(&self) -> &str {
        if self.id.is_empty() { &self.name } else { &self.id }
    }

    /// True when `reference` names this model by id or by name.
    pub fn matches(&self, reference: &str) -> bool {
        self.key() == reference || self.name == reference
    }

    pub fn is_loaded(&self) -> bool {
        self.status == ModelStatus::Loaded
    }
}
