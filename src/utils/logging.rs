// file: src/utils/logging.rs
// description: Tracing subscriber initialization with optional ANSI coloring

use crate::models::{DocumentStatus, ModelStatus};
use colored::*;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// `RUST_LOG` wins when set; otherwise `info`, or `debug` when verbose.
pub fn init_logger(colored_output: bool, verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    colored::control::set_override(colored_output);

    let fmt_layer = fmt::layer()
        .with_target(false)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_file(verbose)
        .with_line_number(verbose)
        .compact()
        .with_writer(std::io::stderr)
        .with_ansi(colored_output);

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .init();
}

pub fn format_success(msg: &str) -> String {
    format!("{} {}", "✓".green().bold(), msg.green())
}

pub fn format_error(msg: &str) -> String {
    format!("{} {}", "✗".red().bold(), msg.red())
}

pub fn format_warning(msg: &str) -> String {
    format!("{} {}", "⚠".yellow().bold(), msg.yellow())
}

pub fn format_info(msg: &str) -> String {
    format!("{} {}", "ℹ".blue().bold(), msg)
}

pub fn format_heading(msg: &str) -> String {
    msg.cyan().bold().to_string()
}

/// Status column for `models list`; loaded models stand out, failures are red.
pub fn format_model_status(status: ModelStatus) -> String {
    let label = format!("{:<12}", status.as_str());
    match status {
        ModelStatus::Loaded => label.green().bold().to_string(),
        ModelStatus::Downloading | ModelStatus::Loading => label.yellow().to_string(),
        ModelStatus::Error => label.red().to_string(),
        ModelStatus::Available => label,
    }
}

pub fn format_document_status(status: DocumentStatus) -> String {
    let label = format!("{:<10}", status.as_str());
    match status {
        DocumentStatus::Ready => label.green().to_string(),
        DocumentStatus::Processing => label.yellow().to_string(),
        DocumentStatus::Error => label.red().to_string(),
    }
}
