// file: src/session.rs
// description: application root wiring registries, query orchestration and model selection
// reference: coordinates view intents against the backend gateway

use crate::config::Config;
use crate::error::{AppError, Result};
use crate::gateway::{Gateway, HttpGateway, UploadResponse};
use crate::models::{Document, Model, QueryResponse, UploadFile, WikiResult};
use crate::orchestrator::{QueryOrchestrator, Transcript};
use crate::registry::{DocumentRegistry, ModelRegistry};
use crate::utils::{HealthCheck, HealthReport, OperationTimer, Validator};
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{info, warn};

/// Owns every piece of client state. The selected model is a reference into
/// the model registry and is re-validated whenever the registry changes or a
/// query is sent.
pub struct Session {
    gateway: Arc<dyn Gateway>,
    models: ModelRegistry,
    documents: DocumentRegistry,
    queries: QueryOrchestrator,
    transcript: Transcript,
    selected_model: watch::Sender<Option<String>>,
    backend_label: String,
}

impl Session {
    pub fn new(gateway: Arc<dyn Gateway>) -> Self {
        let (selected_model, _) = watch::channel(None);
        Self {
            models: ModelRegistry::new(gateway.clone()),
            documents: DocumentRegistry::new(gateway.clone()),
            queries: QueryOrchestrator::new(gateway.clone()),
            transcript: Transcript::new(),
            gateway,
            selected_model,
            backend_label: "backend".to_string(),
        }
    }

    /// Builds an HTTP-backed session. A configured default model becomes the
    /// initial selection and is reconciled on the first model refresh.
    pub fn from_config(config: &Config) -> Result<Self> {
        let gateway = HttpGateway::new(&config.backend)?;
        info!("Using backend at {}", gateway.base_url());

        let backend_label = gateway.base_url().to_string();
        let mut session = Self::new(Arc::new(gateway));
        session.backend_label = backend_label;
        if let Some(model) = config.query.default_model.as_deref().filter(|m| !m.is_empty()) {
            session.selected_model.send_replace(Some(model.to_string()));
        }
        Ok(session)
    }

    pub fn models(&self) -> &ModelRegistry {
        &self.models
    }

    pub fn documents(&self) -> &DocumentRegistry {
        &self.documents
    }

    pub fn queries(&self) -> &QueryOrchestrator {
        &self.queries
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn selected_model(&self) -> Option<String> {
        self.selected_model.borrow().clone()
    }

    pub fn subscribe_selection(&self) -> watch::Receiver<Option<String>> {
        self.selected_model.subscribe()
    }

    /// Selects a model already present in the registry, by id or name.
    /// The name is what travels as `model_name`, so that is what is stored.
    pub fn select_model(&self, reference: &str) -> Result<()> {
        let model = self.models.get(reference).ok_or_else(|| {
            AppError::Validation(format!("Unknown model: {}", reference))
        })?;
        self.selected_model.send_replace(Some(model.name));
        Ok(())
    }

    pub fn clear_selection(&self) {
        self.selected_model.send_replace(None);
    }

    /// Clears the selection if it no longer names a registry entry.
    /// Returns the selection that survives.
    pub fn reconcile_selection(&self) -> Option<String> {
        let mut cleared = None;
        self.selected_model.send_if_modified(|selected| {
            let stale = matches!(selected.as_deref(), Some(id) if !self.models.contains(id));
            if stale {
                cleared = selected.take();
            }
            stale
        });

        if let Some(id) = cleared {
            warn!("Selected model {} is no longer available; selection cleared", id);
        }
        self.selected_model()
    }

    pub async fn refresh_models(&self) -> Result<Vec<Model>> {
        let models = self.models.list().await?;
        self.reconcile_selection();
        Ok(models)
    }

    pub async fn refresh_documents(&self) -> Result<Vec<Document>> {
        self.documents.list().await
    }

    /// Refreshes both registries concurrently on the current task.
    pub async fn refresh(&self) -> (Result<Vec<Model>>, Result<Vec<Document>>) {
        futures::join!(self.refresh_models(), self.refresh_documents())
    }

    pub async fn download_model(&self, name: &str, source: &str) -> Result<String> {
        let message = self.models.request_download(name, source).await?;
        if let Err(e) = self.refresh_models().await {
            warn!("Model list refresh after download request failed: {}", e);
        }
        Ok(message)
    }

    /// Activates a model and selects it. On failure the previous selection stays.
    pub async fn load_model(&self, name: &str) -> Result<String> {
        let message = self.models.request_load(name).await?;
        self.selected_model.send_replace(Some(name.to_string()));
        info!("Selected model {}", name);

        if let Err(e) = self.refresh_models().await {
            warn!("Model list refresh after load failed: {}", e);
        }
        Ok(message)
    }

    pub async fn remove_model(&self, name: &str) -> Result<String> {
        let message = self.models.remove(name).await?;
        self.reconcile_selection();
        Ok(message)
    }

    pub async fn upload_document(&self, file: &UploadFile) -> Result<UploadResponse> {
        self.documents.upload(file).await
    }

    pub async fn remove_document(&self, id: &str) -> Result<String> {
        self.documents.remove(id).await
    }

    pub async fn search_wiki(&self, query: &str) -> Result<Vec<WikiResult>> {
        let query = Validator::normalize_question(query)
            .ok_or_else(|| AppError::Validation("Search query is empty".to_string()))?;

        let results = self.gateway.search_wiki(query).await.map_err(|e| {
            warn!("Wiki search failed: {}", e);
            e
        })?;
        info!("Wiki search returned {} results", results.len());
        Ok(results)
    }

    /// Sends a question with the currently selected model (or the backend
    /// default when none is selected) and records the exchange.
    pub async fn ask(&self, question: &str, include_wiki: bool) -> Result<Option<QueryResponse>> {
        if Validator::normalize_question(question).is_none() {
            return Ok(None);
        }
        if self.queries.is_pending() {
            return Err(AppError::QueryInFlight);
        }

        let model = self.reconcile_selection().unwrap_or_default();
        self.transcript.record_question(question);

        match self.queries.submit(question, include_wiki, &model).await {
            Ok(Some(response)) => {
                self.transcript.record_answer(&response);
                Ok(Some(response))
            }
            Ok(None) => Ok(None),
            Err(e) => {
                self.transcript.record_notice(&format!("Query failed: {}", e));
                Err(e)
            }
        }
    }

    pub async fn health(&self) -> HealthReport {
        let timer = OperationTimer::new("health check");
        let outcome = self.gateway.health().await;
        let elapsed = timer.finish();

        let check = match outcome {
            Ok(health) if health.is_ok() => {
                let detail = Some(health.message).filter(|m| !m.is_empty());
                HealthCheck::healthy("backend", detail, elapsed)
            }
            Ok(health) => HealthCheck::degraded(
                "backend",
                format!("status {}: {}", health.status, health.message),
                elapsed,
            ),
            Err(e) => HealthCheck::unhealthy("backend", e.to_string(), elapsed),
        };

        HealthReport::new(self.backend_label.clone(), vec![check])
    }
}
