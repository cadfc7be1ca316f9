// file: src/models/upload.rs
// description: in-memory file handle handed to the document upload operation

use crate::error::{AppError, Result};
use crate::utils::Validator;
use std::path::Path;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadFile {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl UploadFile {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            bytes,
        }
    }

    /// Reads a local file. Type and size limits are checked against the
    /// file metadata first so oversized files are never read into memory.
    pub async fn from_path(path: &Path) -> Result<Self> {
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| {
                AppError::Validation(format!("Path has no file name: {}", path.display()))
            })?
            .to_string();

        let metadata = tokio::fs::metadata(path).await?;
        if !metadata.is_file() {
            return Err(AppError::Validation(format!(
                "Path is not a file: {}",
                path.display()
            )));
        }
        Validator::validate_upload(&name, metadata.len())?;

        let bytes = tokio::fs::read(path).await?;
        debug!("Read {} bytes from {}", bytes.len(), path.display());

        Ok(Self { name, bytes })
    }

    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }
}
