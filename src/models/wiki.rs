// file: src/models/wiki.rs
// description: encyclopedia search hit returned alongside an answer
// reference: backend GET /wiki/search contract

use super::de;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WikiResult {
    #[serde(default)]
    pub page_id: u64,
    pub title: String,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extract: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
    /// Always within `[0, 1]`; payloads outside that range fail to parse.
    #[serde(
        default,
        deserialize_with = "de::unit_interval",
        skip_serializing_if = "Option::is_none"
    )]
    pub relevance_score: Option<f64>,
}

impl WikiResult {
    pub fn relevance_percent(&self) -> Option<String> {
        self.relevance_score
            .map(crate::utils::format::format_relevance)
    }
}
