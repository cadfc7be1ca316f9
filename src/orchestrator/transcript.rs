// file: src/orchestrator/transcript.rs
// description: in-memory chat transcript for the current session

use crate::models::{ChatMessage, QueryResponse, Role};
use tokio::sync::watch;

/// Lives only as long as the session; nothing is written to disk.
pub struct Transcript {
    messages: watch::Sender<Vec<ChatMessage>>,
}

impl Default for Transcript {
    fn default() -> Self {
        Self::new()
    }
}

impl Transcript {
    pub fn new() -> Self {
        let (messages, _) = watch::channel(Vec::new());
        Self { messages }
    }

    pub fn record_question(&self, question: &str) {
        self.push(ChatMessage::user(question.trim()));
    }

    pub fn record_answer(&self, response: &QueryResponse) {
        self.push(ChatMessage::assistant(
            response.response.clone(),
            response.attributed_sources(),
        ));
    }

    pub fn record_notice(&self, notice: &str) {
        self.push(ChatMessage::system(notice));
    }

    pub fn messages(&self) -> Vec<ChatMessage> {
        self.messages.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Vec<ChatMessage>> {
        self.messages.subscribe()
    }

    pub fn last_answer(&self) -> Option<ChatMessage> {
        self.messages
            .borrow()
            .iter()
            .rev()
            .find(|m| m.role == Role::Assistant)
            .cloned()
    }

    pub fn len(&self) -> usize {
        self.messages.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.borrow().is_empty()
    }

    pub fn clear(&self) {
        self.messages.send_replace(Vec::new());
    }

    fn push(&self, message: ChatMessage) {
        self.messages.send_modify(|messages| messages.push(message));
    }
}
