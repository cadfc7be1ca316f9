// file: src/registry/documents.rs
// description: document registry state with pre-dispatch upload validation
// reference: backend /documents endpoints

use super::dedupe_by_key;
use crate::error::{AppError, Result};
use crate::gateway::{Gateway, UploadResponse};
use crate::models::{Document, UploadFile};
use crate::utils::Validator;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{info, warn};

pub struct DocumentRegistry {
    gateway: Arc<dyn Gateway>,
    documents: watch::Sender<Vec<Document>>,
}

impl DocumentRegistry {
    pub fn new(gateway: Arc<dyn Gateway>) -> Self {
        let (documents, _) = watch::channel(Vec::new());
        Self { gateway, documents }
    }

    pub fn snapshot(&self) -> Vec<Document> {
        self.documents.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Vec<Document>> {
        self.documents.subscribe()
    }

    pub fn get(&self, id: &str) -> Option<Document> {
        self.documents.borrow().iter().find(|d| d.id == id).cloned()
    }

    pub fn len(&self) -> usize {
        self.documents.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.borrow().is_empty()
    }

    /// Full-replace refresh; a failed call leaves the registry as it was.
    pub async fn list(&self) -> Result<Vec<Document>> {
        let documents = self.gateway.list_documents().await.map_err(|e| {
            warn!("Failed to load documents: {}", e);
            e
        })?;

        let documents = dedupe_by_key(documents, "document", |d| d.id.clone());
        info!("Document registry refreshed: {} documents", documents.len());
        self.documents.send_replace(documents.clone());
        Ok(documents)
    }

    /// Validates type and size, then uploads. Invalid files never reach the
    /// gateway. An accepted document is upserted; an acknowledgement without
    /// one triggers a refresh instead.
    pub async fn upload(&self, file: &UploadFile) -> Result<UploadResponse> {
        Validator::validate_upload(&file.name, file.size()).map_err(|e| {
            warn!("Rejected upload of {}: {}", file.name, e);
            e
        })?;

        let reply = self.gateway.upload_document(file).await.map_err(|e| {
            warn!("Upload of {} failed: {}", file.name, e);
            e
        })?;

        if !reply.success {
            warn!("Backend refused {}: {}", file.name, reply.message);
            return Err(AppError::Application(if reply.message.is_empty() {
                format!("Upload of {} was not accepted", file.name)
            } else {
                reply.message
            }));
        }

        match &reply.document {
            Some(document) => {
                self.upsert(document.clone());
                info!("Uploaded {} as document {}", file.name, document.id);
            }
            None => {
                info!("Uploaded {}; refreshing document list", file.name);
                // A failed refresh does not fail the upload.
                if let Err(e) = self.list().await {
                    warn!("Refresh after upload of {} failed: {}", file.name, e);
                }
            }
        }

        Ok(reply)
    }

    pub async fn remove(&self, id: &str) -> Result<String> {
        Validator::validate_not_blank("Document id", id)?;

        let reply = self.gateway.delete_document(id).await.map_err(|e| {
            warn!("Deleting document {} failed: {}", id, e);
            e
        })?;

        self.documents.send_modify(|documents| documents.retain(|d| d.id != id));
        info!("Document {} removed", id);
        Ok(reply.message)
    }

    fn upsert(&self, document: Document) {
        self.documents.send_modify(|documents| {
            match documents.iter_mut().find(|d| d.id == document.id) {
                Some(existing) => *existing = document,
                None => documents.push(document),
            }
        });
    }
}
