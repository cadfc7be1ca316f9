// file: src/orchestrator/mod.rs
// description: query orchestration module exports and public api
// reference: query orchestration

mod progress;
mod query;
mod transcript;

pub use progress::PendingSpinner;
pub use query::{QueryOrchestrator, QueryState};
pub use transcript::Transcript;
