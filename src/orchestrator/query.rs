// file: src/orchestrator/query.rs
// description: augmented query state machine holding the current answer
// reference: Idle -> Pending -> Succeeded | Failed | Cancelled

use crate::error::{AppError, GatewayError, Result};
use crate::gateway::Gateway;
use crate::models::{QueryRequest, QueryResponse};
use crate::utils::{OperationTimer, Validator};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tracing::{debug, info, warn};

const SLOW_QUERY_THRESHOLD: Duration = Duration::from_secs(20);

#[derive(Debug, Clone, PartialEq)]
pub enum QueryState {
    Idle,
    Pending { question: String },
    Succeeded,
    Failed(GatewayError),
    /// The submitting future was dropped before the backend replied.
    Cancelled,
}

impl QueryState {
    pub fn is_pending(&self) -> bool {
        matches!(self, QueryState::Pending { .. })
    }

    pub fn label(&self) -> &'static str {
        match self {
            QueryState::Idle => "idle",
            QueryState::Pending { .. } => "pending",
            QueryState::Succeeded => "succeeded",
            QueryState::Failed(_) => "failed",
            QueryState::Cancelled => "cancelled",
        }
    }
}

pub struct QueryOrchestrator {
    gateway: Arc<dyn Gateway>,
    state: watch::Sender<QueryState>,
    current: watch::Sender<Option<QueryResponse>>,
}

/// Moves a dropped in-flight query to `Cancelled` so the state machine
/// never stays `Pending` without an owner.
struct PendingGuard<'a> {
    state: &'a watch::Sender<QueryState>,
    armed: bool,
}

impl PendingGuard<'_> {
    fn disarm(mut self) {
        self.armed = false;
    }
}

impl Drop for PendingGuard<'_> {
    fn drop(&mut self) {
        if self.armed {
            warn!("Query abandoned while pending");
            self.state.send_replace(QueryState::Cancelled);
        }
    }
}

impl QueryOrchestrator {
    pub fn new(gateway: Arc<dyn Gateway>) -> Self {
        let (state, _) = watch::channel(QueryState::Idle);
        let (current, _) = watch::channel(None);
        Self {
            gateway,
            state,
            current,
        }
    }

    pub fn state(&self) -> QueryState {
        self.state.borrow().clone()
    }

    pub fn is_pending(&self) -> bool {
        self.state.borrow().is_pending()
    }

    pub fn subscribe_state(&self) -> watch::Receiver<QueryState> {
        self.state.subscribe()
    }

    pub fn current(&self) -> Option<QueryResponse> {
        self.current.borrow().clone()
    }

    pub fn subscribe_current(&self) -> watch::Receiver<Option<QueryResponse>> {
        self.current.subscribe()
    }

    /// Issues one augmented query.
    ///
    /// Returns `Ok(None)` without any transition or network call when the
    /// question is blank, and `Err(AppError::QueryInFlight)` while another
    /// query is pending. A successful reply replaces the current response;
    /// a failure leaves it untouched and moves the state to `Failed`.
    pub async fn submit(
        &self,
        question: &str,
        include_wiki: bool,
        selected_model_id: &str,
    ) -> Result<Option<QueryResponse>> {
        let Some(question) = Validator::normalize_question(question) else {
            debug!("Ignoring blank question");
            return Ok(None);
        };

        let mut accepted = false;
        self.state.send_if_modified(|state| {
            if state.is_pending() {
                return false;
            }
            *state = QueryState::Pending {
                question: question.to_string(),
            };
            accepted = true;
            true
        });

        if !accepted {
            warn!("Rejected query while another is pending");
            return Err(AppError::QueryInFlight);
        }

        let guard = PendingGuard {
            state: &self.state,
            armed: true,
        };

        let request = QueryRequest::new(question, include_wiki, selected_model_id);
        info!(
            "Submitting query (wiki: {}, model: {})",
            include_wiki,
            if selected_model_id.is_empty() { "<backend default>" } else { selected_model_id }
        );

        let timer = OperationTimer::with_threshold("query", SLOW_QUERY_THRESHOLD);
        let outcome = self.gateway.query(&request).await;
        timer.finish();
        guard.disarm();

        match outcome {
            Ok(response) => {
                info!(
                    "Query answered with {} document and {} wiki sources",
                    response.sources.documents.len(),
                    response.sources.wiki.len()
                );
                self.current.send_replace(Some(response.clone()));
                self.state.send_replace(QueryState::Succeeded);
                Ok(Some(response))
            }
            Err(e) => {
                warn!("Query failed: {}", e);
                self.state.send_replace(QueryState::Failed(e.clone()));
                Err(e.into())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::testing::FakeGateway;
    use crate::models::{Sources, WikiResult};
    use pretty_assertions::assert_eq;

    fn reply(text: &str) -> QueryResponse {
        QueryResponse {
            response: text.to_string(),
            sources: Sources::default(),
        }
    }

    fn entanglement_reply() -> QueryResponse {
        QueryResponse {
            response: "Entangled particles share a joint quantum state.".to_string(),
            sources: Sources {
                documents: vec![],
                wiki: vec![WikiResult {
                    page_id: 1,
                    title: "Quantum entanglement".to_string(),
                    url: "https://en.wikipedia.org/wiki/Quantum_entanglement".to_string(),
                    description: None,
                    extract: None,
                    thumbnail: None,
                    relevance_score: Some(0.92),
                }],
            },
        }
    }

    #[tokio::test]
    async fn test_submit_success_stores_reply() {
        let fake = Arc::new(FakeGateway::new());
        let orchestrator = QueryOrchestrator::new(fake.clone());
        fake.reply_to_query(Ok(entanglement_reply()));

        assert_eq!(orchestrator.state(), QueryState::Idle);
        let answer = orchestrator
            .submit("What is quantum entanglement?", true, "llama2")
            .await
            .unwrap();

        assert_eq!(answer, Some(entanglement_reply()));
        assert_eq!(orchestrator.state(), QueryState::Succeeded);
        assert_eq!(orchestrator.current(), Some(entanglement_reply()));

        let sent = fake.last_query.lock().unwrap().clone().unwrap();
        assert_eq!(
            sent,
            QueryRequest::new("What is quantum entanglement?", true, "llama2")
        );

        let current = orchestrator.current().unwrap();
        assert_eq!(current.sources.wiki.len(), 1);
        assert_eq!(current.sources.wiki[0].relevance_score, Some(0.92));
    }

    #[tokio::test]
    async fn test_blank_question_is_noop() {
        let fake = Arc::new(FakeGateway::new());
        let orchestrator = QueryOrchestrator::new(fake.clone());
        let mut rx = orchestrator.subscribe_state();

        for question in ["", "   ", "\n\t "] {
            assert_eq!(orchestrator.submit(question, true, "").await.unwrap(), None);
        }

        assert_eq!(orchestrator.state(), QueryState::Idle);
        assert!(!rx.has_changed().unwrap());
        assert!(fake.calls().is_empty());
    }

    #[tokio::test]
    async fn test_question_is_trimmed_and_empty_model_allowed() {
        let fake = Arc::new(FakeGateway::new());
        let orchestrator = QueryOrchestrator::new(fake.clone());
        fake.reply_to_query(Ok(reply("hi")));

        orchestrator.submit("  hello  ", false, "").await.unwrap();

        let sent = fake.last_query.lock().unwrap().clone().unwrap();
        assert_eq!(sent, QueryRequest::new("hello", false, ""));
    }

    #[tokio::test]
    async fn test_failure_keeps_previous_response() {
        let fake = Arc::new(FakeGateway::new());
        let orchestrator = QueryOrchestrator::new(fake.clone());

        fake.reply_to_query(Ok(reply("first")));
        orchestrator.submit("one", true, "").await.unwrap();

        let failure = GatewayError::Status {
            status: 500,
            message: "model crashed".to_string(),
        };
        fake.reply_to_query(Err(failure.clone()));
        let err = orchestrator.submit("two", true, "").await.unwrap_err();

        assert_eq!(err.as_gateway(), Some(&failure));
        assert_eq!(orchestrator.state(), QueryState::Failed(failure));
        assert_eq!(orchestrator.current(), Some(reply("first")));

        fake.reply_to_query(Ok(reply("third")));
        orchestrator.submit("three", true, "").await.unwrap();
        assert_eq!(orchestrator.state(), QueryState::Succeeded);
        assert_eq!(orchestrator.current(), Some(reply("third")));
    }

    #[tokio::test]
    async fn test_malformed_payload_fails() {
        let fake = Arc::new(FakeGateway::new());
        let orchestrator = QueryOrchestrator::new(fake.clone());
        fake.reply_to_query(Err(GatewayError::Decode {
            status: 200,
            message: "missing field `response`".to_string(),
        }));

        assert!(orchestrator.submit("q", true, "").await.is_err());
        assert!(matches!(orchestrator.state(), QueryState::Failed(GatewayError::Decode { .. })));
        assert_eq!(orchestrator.current(), None);
    }

    #[tokio::test]
    async fn test_second_submit_rejected_while_pending() {
        let fake = Arc::new(FakeGateway::new());
        let orchestrator = QueryOrchestrator::new(fake.clone());
        fake.reply_to_query(Ok(reply("done")));
        let release = fake.hold_query();

        let (first, second) = tokio::join!(orchestrator.submit("first", true, ""), async {
            assert_eq!(
                orchestrator.state(),
                QueryState::Pending {
                    question: "first".to_string()
                }
            );
            let rejected = orchestrator.submit("second", true, "").await;
            release.send(()).unwrap();
            rejected
        });

        assert_eq!(first.unwrap(), Some(reply("done")));
        assert!(matches!(second, Err(AppError::QueryInFlight)));
        assert_eq!(fake.call_count("query"), 1);
        assert_eq!(orchestrator.state(), QueryState::Succeeded);
    }

    #[tokio::test]
    async fn test_dropped_submit_becomes_cancelled() {
        let fake = Arc::new(FakeGateway::new());
        let orchestrator = QueryOrchestrator::new(fake.clone());
        let _release = fake.hold_query();

        let outcome = tokio::time::timeout(
            Duration::from_millis(20),
            orchestrator.submit("never answered", true, ""),
        )
        .await;

        assert!(outcome.is_err());
        assert_eq!(orchestrator.state(), QueryState::Cancelled);

        fake.reply_to_query(Ok(reply("later")));
        orchestrator.submit("again", true, "").await.unwrap();
        assert_eq!(orchestrator.state(), QueryState::Succeeded);
    }

    #[tokio::test]
    async fn test_state_transitions_are_observable() {
        let fake = Arc::new(FakeGateway::new());
        let orchestrator = QueryOrchestrator::new(fake.clone());
        let mut rx = orchestrator.subscribe_state();
        fake.reply_to_query(Ok(reply("ok")));
        let release = fake.hold_query();

        let (_, seen) = tokio::join!(orchestrator.submit("q", true, ""), async {
            rx.changed().await.unwrap();
            let pending = rx.borrow_and_update().clone();
            release.send(()).unwrap();
            rx.changed().await.unwrap();
            (pending, rx.borrow_and_update().clone())
        });

        assert!(seen.0.is_pending());
        assert_eq!(seen.1, QueryState::Succeeded);
    }
}
