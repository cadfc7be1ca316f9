// file: src/utils/validation.rs
// description: client-side precondition checks run before any network call
// reference: input validation patterns

use crate::error::{AppError, Result};
use crate::models::DocumentType;

/// Upload ceiling enforced before dispatch: 10 MiB.
pub const MAX_UPLOAD_BYTES: u64 = 10 * 1024 * 1024;

pub struct Validator;

impl Validator {
    /// Returns the trimmed question, or `None` when nothing is left.
    pub fn normalize_question(question: &str) -> Option<&str> {
        let trimmed = question.trim();
        if trimmed.is_empty() { None } else { Some(trimmed) }
    }

    /// Names and ids go out percent-encoded or in a JSON body, so any
    /// non-blank value is acceptable.
    pub fn validate_not_blank(kind: &str, value: &str) -> Result<()> {
        if value.trim().is_empty() {
            return Err(AppError::Validation(format!("{} must not be empty", kind)));
        }
        Ok(())
    }

    pub fn validate_upload_type(file_name: &str) -> Result<DocumentType> {
        DocumentType::from_file_name(file_name).ok_or_else(|| {
            AppError::Validation(format!(
                "Unsupported file type for {}. Please upload PDF, TXT, DOCX, or MD files",
                file_name
            ))
        })
    }

    pub fn validate_upload_size(file_name: &str, size: u64) -> Result<()> {
        if size > MAX_UPLOAD_BYTES {
            return Err(AppError::Validation(format!(
                "File too large: {} is {} bytes (max {} bytes)",
                file_name, size, MAX_UPLOAD_BYTES
            )));
        }
        Ok(())
    }

    pub fn validate_upload(file_name: &str, size: u64) -> Result<DocumentType> {
        let kind = Self::validate_upload_type(file_name)?;
        Self::validate_upload_size(file_name, size)?;
        Ok(kind)
    }

    pub fn validate_url(url: &str) -> Result<()> {
        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(AppError::Validation(format!(
                "Invalid URL format: {}",
                url
            )));
        }
        Ok(())
    }

    pub fn truncate_text(text: &str, max_chars: usize) -> String {
        match text.char_indices().nth(max_chars) {
            None => text.to_string(),
            Some((idx, _)) => format!("{}...", &text[..idx]),
        }
    }
}
