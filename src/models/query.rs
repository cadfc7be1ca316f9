// file: src/models/query.rs
// description: augmented query request and the attributed answer it produces
// reference: backend POST /query contract

use super::{Document, WikiResult, de};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryRequest {
    pub query: String,
    pub include_wiki: bool,
    /// Empty lets the backend pick its default model.
    pub model_name: String,
}

impl QueryRequest {
    pub fn new(
        query: impl Into<String>,
        include_wiki: bool,
        model_name: impl Into<String>,
    ) -> Self {
        Self {
            query: query.into(),
            include_wiki,
            model_name: model_name.into(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Sources {
    #[serde(default, deserialize_with = "de::null_as_default")]
    pub documents: Vec<Document>,
    #[serde(default, deserialize_with = "de::null_as_default")]
    pub wiki: Vec<WikiResult>,
}

impl Sources {
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty() && self.wiki.is_empty()
    }

    pub fn len(&self) -> usize {
        self.documents.len() + self.wiki.len()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryResponse {
    pub response: String,
    #[serde(default, deserialize_with = "de::null_as_default")]
    pub sources: Sources,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    Document,
    Wiki,
}

/// Uniform view over one document or wiki hit that backed an answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Source {
    #[serde(rename = "type")]
    pub kind: SourceKind,
    pub title: String,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub relevance_score: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub document_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl From<&Document> for Source {
    fn from(doc: &Document) -> Self {
        Self {
            kind: SourceKind::Document,
            title: doc.name.clone(),
            content: String::new(),
            relevance_score: None,
            document_id: Some(doc.id.clone()),
            url: None,
        }
    }
}

impl From<&WikiResult> for Source {
    fn from(hit: &WikiResult) -> Self {
        Self {
            kind: SourceKind::Wiki,
            title: hit.title.clone(),
            content: hit
                .extract
                .clone()
                .or_else(|| hit.description.clone())
                .unwrap_or_default(),
            relevance_score: hit.relevance_score,
            document_id: None,
            url: Some(hit.url.clone()),
        }
    }
}

impl QueryResponse {
    /// Documents first, then wiki hits, each in the order the backend ranked them.
    pub fn attributed_sources(&self) -> Vec<Source> {
        self.sources
            .documents
            .iter()
            .map(Source::from)
            .chain(self.sources.wiki.iter().map(Source::from))
            .collect()
    }
}
