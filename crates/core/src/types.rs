use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque identifier naming one unit of work: a stack path segment, a
/// command, a registry host. Immutable once enumerated.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Target(String);

impl Target {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Target {
    fn from(name: &str) -> Self {
        Self(name.to_string())
    }
}

impl From<String> for Target {
    fn from(name: String) -> Self {
        Self(name)
    }
}

/// Result of one task execution against a single target.
///
/// Produced exactly once per dispatched task; ownership transfers to the
/// collector on completion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum TaskOutcome {
    Success,
    Failure { diagnostic: String },
}

impl TaskOutcome {
    #[must_use]
    pub fn failure(diagnostic: impl Into<String>) -> Self {
        TaskOutcome::Failure {
            diagnostic: diagnostic.into(),
        }
    }

    #[must_use]
    pub fn is_failure(&self) -> bool {
        matches!(self, TaskOutcome::Failure { .. })
    }
}

/// One task's outcome paired with the target that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetOutcome {
    pub target: Target,
    pub outcome: TaskOutcome,
}

impl TargetOutcome {
    #[must_use]
    pub fn new(target: Target, outcome: TaskOutcome) -> Self {
        Self { target, outcome }
    }
}

/// Aggregate record of one multi-target execution.
///
/// Mutated only by the single collector while the call is in flight;
/// immutable after the call returns. `failure_count` always equals
/// `reports.len()`.
#[derive(Debug, Clone, Serialize)]
pub struct ExecutionSummary {
    pub total_targets: usize,
    pub failure_count: usize,
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
    pub reports: Vec<String>,
}

impl ExecutionSummary {
    /// Start a summary for `total_targets` targets, stamping the start time.
    #[must_use]
    pub fn begin(total_targets: usize) -> Self {
        Self {
            total_targets,
            failure_count: 0,
            started_at: Utc::now(),
            finished_at: None,
            reports: Vec::new(),
        }
    }

    /// Record one rendered failure report in arrival order.
    pub fn record(&mut self, rendered: String) {
        self.reports.push(rendered);
        self.failure_count = self.reports.len();
    }

    /// Stamp the end of the execution.
    pub fn finish(&mut self) {
        self.finished_at = Some(Utc::now());
    }

    #[must_use]
    pub fn has_failures(&self) -> bool {
        self.failure_count > 0
    }
}
