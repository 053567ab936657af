//! Drift detection across Terraform/Terragrunt stacks.
//!
//! The scanner fans a plan out over every stack under a root path with a
//! configurable concurrency ceiling, tolerates per-stack failures, and
//! renders one templated report entry per drifted stack. The plan itself is
//! an opaque call against the orchestration runtime, reached through the
//! [`StackPlanner`] boundary trait.

pub mod scanner;
pub mod template;

pub use scanner::{DriftScanner, ScanConfig, StackPlanner};
pub use template::{DriftReport, ReportTemplate, DEFAULT_TEMPLATE};
