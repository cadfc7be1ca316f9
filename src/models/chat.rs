// file: src/models/chat.rs
// description: in-session chat message exchanged with the assistant
// reference: chat transcript shown next to the answer view

use super::Source;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
    System,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: Uuid,
    pub role: Role,
    pub content: String,
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sources: Vec<Source>,
}

impl ChatMessage {
    fn new(role: Role, content: String, sources: Vec<Source>) -> Self {
        Self {
            id: Uuid::new_v4(),
            role,
            content,
            timestamp: Utc::now(),
            sources,
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content.into(), Vec::new())
    }

    pub fn assistant(content: impl Into<String>, sources: Vec<Source>) -> Self {
        Self::new(Role::Assistant, content.into(), sources)
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::new(Role::System, content.into(), Vec::new())
    }
}
