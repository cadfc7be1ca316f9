// file: src/registry/models.rs
// description: model registry state synchronized from the backend model list
// reference: backend /models endpoints

use super::dedupe_by_key;
use crate::error::Result;
use crate::gateway::Gateway;
use crate::models::Model;
use crate::utils::Validator;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{info, warn};

/// Holds the last model list the backend reported. Status is never changed
/// locally; callers re-`list()` to observe the effect of a download or load.
pub struct ModelRegistry {
    gateway: Arc<dyn Gateway>,
    models: watch::Sender<Vec<Model>>,
}

impl ModelRegistry {
    pub fn new(gateway: Arc<dyn Gateway>) -> Self {
        let (models, _) = watch::channel(Vec::new());
        Self { gateway, models }
    }

    pub fn snapshot(&self) -> Vec<Model> {
        self.models.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Vec<Model>> {
        self.models.subscribe()
    }

    pub fn get(&self, reference: &str) -> Option<Model> {
        self.models
            .borrow()
            .iter()
            .find(|model| model.matches(reference))
            .cloned()
    }

    pub fn contains(&self, reference: &str) -> bool {
        self.models.borrow().iter().any(|model| model.matches(reference))
    }

    pub fn len(&self) -> usize {
        self.models.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.borrow().is_empty()
    }

    /// Fetches the model list and replaces the whole registry with it.
    /// On failure the previous contents are left untouched.
    pub async fn list(&self) -> Result<Vec<Model>> {
        let models = self.gateway.list_models().await.map_err(|e| {
            warn!("Failed to load models: {}", e);
            e
        })?;

        let models = dedupe_by_key(models, "model", |m| m.key().to_string());
        info!("Model registry refreshed: {} models", models.len());
        self.models.send_replace(models.clone());
        Ok(models)
    }

    /// Asks the backend to fetch a model. Does not wait for completion.
    /// `source` is passed through untouched: a URL or a registry name alike.
    pub async fn request_download(&self, name: &str, source: &str) -> Result<String> {
        Validator::validate_not_blank("Model name", name)?;

        let reply = self.gateway.download_model(name, source).await.map_err(|e| {
            warn!("Model download request for {} failed: {}", name, e);
            e
        })?;

        info!("Download requested for model {}: {}", name, reply.message);
        Ok(reply.message)
    }

    /// Activates a model on the backend. Selection is left to the caller.
    pub async fn request_load(&self, name: &str) -> Result<String> {
        Validator::validate_not_blank("Model name", name)?;

        let reply = self.gateway.load_model(name).await.map_err(|e| {
            warn!("Model load for {} failed: {}", name, e);
            e
        })?;

        info!("Model {} loaded: {}", name, reply.message);
        Ok(reply.message)
    }

    pub async fn remove(&self, name: &str) -> Result<String> {
        Validator::validate_not_blank("Model name", name)?;

        let reply = self.gateway.delete_model(name).await.map_err(|e| {
            warn!("Model removal for {} failed: {}", name, e);
            e
        })?;

        self.models.send_modify(|models| models.retain(|m| !m.matches(name)));
        info!("Model {} removed", name);
        Ok(reply.message)
    }
}
