//! Bounded-concurrency drift scan across infrastructure stacks.

use crate::template::{DriftReport, ReportTemplate};
use async_trait::async_trait;
use conveyor_core::{ExecutionSummary, Result, Target, TaskOutcome};
use conveyor_engine::{ScatterPool, TargetOperation};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Scan configuration, typically loaded from pipeline config.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanConfig {
    /// Path under which the stacks live; prefixed onto every stack name
    /// when invoking the planner.
    pub root_stacks_path: String,
    /// Maximum concurrently running plans; 0 means unbounded.
    #[serde(default)]
    pub max_parallel: usize,
}

/// Runs a plan for one stack against the orchestration runtime.
///
/// Any error — a detailed-exit-code diff as much as a transport or auth
/// failure — is treated as drift and its text becomes the report content.
#[async_trait]
pub trait StackPlanner: Send + Sync {
    async fn plan(&self, stack_path: &str) -> Result<()>;
}

struct PlanOperation {
    planner: Arc<dyn StackPlanner>,
    root: String,
}

#[async_trait]
impl TargetOperation for PlanOperation {
    async fn run(&self, target: &Target) -> Result<()> {
        self.planner
            .plan(&format!("{}/{}", self.root, target))
            .await
    }
}

/// Fans a plan out over every stack, bounded by `max_parallel`, and
/// collects one rendered report entry per drifted stack.
pub struct DriftScanner {
    config: ScanConfig,
    template: ReportTemplate,
}

impl DriftScanner {
    #[must_use]
    pub fn new(config: ScanConfig, template: ReportTemplate) -> Self {
        Self { config, template }
    }

    /// Scan the given stacks, blocking until every plan has completed and
    /// every outcome has been collected.
    ///
    /// Successes leave no trace in the report; absence of an entry for a
    /// stack means no drift. Report entries arrive in completion order,
    /// which is run-to-run nondeterministic; each entry embeds its stack
    /// name so identity is never lost. A template render failure is fatal
    /// and aborts collection, while already-running plans finish detached.
    pub async fn scan(
        &self,
        stacks: Vec<Target>,
        planner: Arc<dyn StackPlanner>,
    ) -> Result<ExecutionSummary> {
        let mut summary = ExecutionSummary::begin(stacks.len());
        tracing::info!(
            stacks = stacks.len(),
            root = %self.config.root_stacks_path,
            max_parallel = self.config.max_parallel,
            "starting drift scan"
        );

        let pool = ScatterPool::new(self.config.max_parallel);
        let operation = Arc::new(PlanOperation {
            planner,
            root: self.config.root_stacks_path.clone(),
        });

        let mut outcomes = pool.scatter(stacks, operation);
        while let Some(outcome) = outcomes.recv().await {
            if let TaskOutcome::Failure { diagnostic } = outcome.outcome {
                tracing::debug!(stack = %outcome.target, "drift detected");
                let rendered = self.template.render(&DriftReport {
                    stack_name: outcome.target.to_string(),
                    drift_content: diagnostic,
                })?;
                summary.record(rendered);
            }
        }

        summary.finish();
        tracing::info!(
            stacks = summary.total_targets,
            drifted = summary.failure_count,
            "drift scan finished"
        );
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::template::DEFAULT_TEMPLATE;
    use conveyor_core::Error;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    struct FakePlanner {
        drifted: Vec<String>,
        in_flight: AtomicUsize,
        max_observed: AtomicUsize,
    }

    impl FakePlanner {
        fn new(drifted: &[&str]) -> Self {
            Self {
                drifted: drifted.iter().map(|s| s.to_string()).collect(),
                in_flight: AtomicUsize::new(0),
                max_observed: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl StackPlanner for FakePlanner {
        async fn plan(&self, stack_path: &str) -> Result<()> {
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.max_observed.fetch_max(now, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(15)).await;
            self.in_flight.fetch_sub(1, Ordering::SeqCst);

            if self.drifted.iter().any(|d| stack_path.ends_with(d.as_str())) {
                return Err(Error::execution(stack_path, "plan produced a diff", Some(2)));
            }
            Ok(())
        }
    }

    fn scanner(max_parallel: usize) -> DriftScanner {
        DriftScanner::new(
            ScanConfig {
                root_stacks_path: "stacks".to_string(),
                max_parallel,
            },
            ReportTemplate::parse(DEFAULT_TEMPLATE).unwrap(),
        )
    }

    fn stacks(names: &[&str]) -> Vec<Target> {
        names.iter().map(|n| Target::from(*n)).collect()
    }

    #[tokio::test]
    async fn single_drifted_stack_yields_one_report_entry() {
        let planner = Arc::new(FakePlanner::new(&["stackB"]));
        let summary = scanner(2)
            .scan(
                stacks(&["stackA", "stackB", "stackC"]),
                Arc::clone(&planner) as Arc<dyn StackPlanner>,
            )
            .await
            .unwrap();

        assert_eq!(summary.total_targets, 3);
        assert_eq!(summary.failure_count, 1);
        assert_eq!(summary.reports.len(), 1);
        assert!(summary.reports[0].contains("stackB"));
        assert!(planner.max_observed.load(Ordering::SeqCst) <= 2);
        assert!(summary.finished_at.unwrap() >= summary.started_at);
    }

    #[tokio::test]
    async fn empty_stack_list_yields_empty_summary() {
        let planner = Arc::new(FakePlanner::new(&[]));
        let summary = scanner(4)
            .scan(Vec::new(), planner as Arc<dyn StackPlanner>)
            .await
            .unwrap();

        assert_eq!(summary.total_targets, 0);
        assert_eq!(summary.failure_count, 0);
        assert!(summary.reports.is_empty());
    }

    #[tokio::test]
    async fn planner_path_is_prefixed_with_root() {
        struct PathAssertingPlanner;

        #[async_trait]
        impl StackPlanner for PathAssertingPlanner {
            async fn plan(&self, stack_path: &str) -> Result<()> {
                assert!(stack_path.starts_with("stacks/"));
                Ok(())
            }
        }

        let summary = scanner(0)
            .scan(
                stacks(&["network", "dns"]),
                Arc::new(PathAssertingPlanner) as Arc<dyn StackPlanner>,
            )
            .await
            .unwrap();
        assert_eq!(summary.failure_count, 0);
    }

    #[tokio::test]
    async fn render_failure_is_fatal_and_returns_no_summary() {
        // An unknown function parses fine but fails at render time.
        let template = ReportTemplate::parse("{{ boom() }}").unwrap();
        let scanner = DriftScanner::new(
            ScanConfig {
                root_stacks_path: "stacks".to_string(),
                max_parallel: 0,
            },
            template,
        );

        let planner = Arc::new(FakePlanner::new(&["stackA"]));
        let err = scanner
            .scan(stacks(&["stackA"]), planner as Arc<dyn StackPlanner>)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Template { .. }));
    }

    #[test]
    fn scan_config_deserializes_with_default_parallelism() {
        let config: ScanConfig =
            serde_json::from_str(r#"{"root_stacks_path": "live/prod"}"#).unwrap();
        assert_eq!(config.root_stacks_path, "live/prod");
        assert_eq!(config.max_parallel, 0);
    }
}
