// file: src/utils/mod.rs
// description: utility functions module exports
// reference: internal module structure

pub mod format;
pub mod logging;
pub mod telemetry;
pub mod validation;

pub use format::{format_file_size, format_relevance};
pub use telemetry::{HealthCheck, HealthReport, HealthStatus, OperationTimer};
pub use validation::{MAX_UPLOAD_BYTES, Validator};
