// file: src/utils/telemetry.rs
// description: backend health reporting and gateway call timing
// reference: GET /health contract

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
pub enum HealthStatus {
    Healthy,
    Degraded,
    Unhealthy,
}

impl HealthStatus {
    fn icon(self) -> &'static str {
        match self {
            HealthStatus::Healthy => "✓",
            HealthStatus::Degraded => "⚠",
            HealthStatus::Unhealthy => "✗",
        }
    }
}

/// Outcome of probing one component.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthCheck {
    pub component: String,
    pub status: HealthStatus,
    pub detail: Option<String>,
    pub response_time_ms: u64,
}

impl HealthCheck {
    fn new(
        component: &str,
        status: HealthStatus,
        detail: Option<String>,
        elapsed: Duration,
    ) -> Self {
        Self {
            component: component.to_string(),
            status,
            detail,
            response_time_ms: elapsed.as_millis() as u64,
        }
    }

    pub fn healthy(component: &str, detail: Option<String>, elapsed: Duration) -> Self {
        Self::new(component, HealthStatus::Healthy, detail, elapsed)
    }

    /// The component answered but reported something other than `ok`.
    pub fn degraded(component: &str, detail: String, elapsed: Duration) -> Self {
        Self::new(component, HealthStatus::Degraded, Some(detail), elapsed)
    }

    pub fn unhealthy(component: &str, detail: String, elapsed: Duration) -> Self {
        Self::new(component, HealthStatus::Unhealthy, Some(detail), elapsed)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthReport {
    pub overall_status: HealthStatus,
    pub backend_url: String,
    pub checks: Vec<HealthCheck>,
    pub checked_at: DateTime<Utc>,
    pub client_version: String,
}

impl HealthReport {
    /// The overall status is the worst individual status.
    pub fn new(backend_url: impl Into<String>, checks: Vec<HealthCheck>) -> Self {
        let overall_status = checks
            .iter()
            .map(|c| c.status)
            .max()
            .unwrap_or(HealthStatus::Healthy);

        Self {
            overall_status,
            backend_url: backend_url.into(),
            checks,
            checked_at: Utc::now(),
            client_version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }

    pub fn is_healthy(&self) -> bool {
        self.overall_status == HealthStatus::Healthy
    }

    pub fn format(&self) -> String {
        let mut output = format!(
            "{} Backend {}: {:?}\n\
             Client version: {}\n\
             Checked at: {}\n\n",
            self.overall_status.icon(),
            self.backend_url,
            self.overall_status,
            self.client_version,
            self.checked_at.format("%Y-%m-%d %H:%M:%S UTC")
        );

        for check in &self.checks {
            output.push_str(&format!(
                "{} {} - {}ms",
                check.status.icon(),
                check.component,
                check.response_time_ms
            ));
            if let Some(detail) = &check.detail {
                output.push_str(&format!("\n  {}", detail));
            }
            output.push('\n');
        }

        output
    }
}

/// Times one gateway call; warns on `finish` when a threshold is set and exceeded.
pub struct OperationTimer {
    operation: &'static str,
    start: Instant,
    slow_after: Option<Duration>,
}

impl OperationTimer {
    pub fn new(operation: &'static str) -> Self {
        debug!("Starting {}", operation);
        Self {
            operation,
            start: Instant::now(),
            slow_after: None,
        }
    }

    pub fn with_threshold(operation: &'static str, slow_after: Duration) -> Self {
        Self {
            slow_after: Some(slow_after),
            ..Self::new(operation)
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    pub fn finish(self) -> Duration {
        let elapsed = self.elapsed();
        match self.slow_after {
            Some(limit) if elapsed > limit => warn!(
                "{} took {:.2}s (expected under {:.0}s)",
                self.operation,
                elapsed.as_secs_f64(),
                limit.as_secs_f64()
            ),
            _ => debug!("{} finished in {:.2}s", self.operation, elapsed.as_secs_f64()),
        }
        elapsed
    }
}
