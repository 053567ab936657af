//! Semaphore-bounded task scatter feeding a single-consumer outcome channel.

use async_trait::async_trait;
use conveyor_core::{Result, Target, TargetOutcome, TaskOutcome};
use std::sync::Arc;
use tokio::sync::{mpsc, Semaphore};
use tokio::task::JoinSet;

/// One operation invocation against the external orchestration runtime.
///
/// Implementations may perform network I/O and fail for transport,
/// execution, or semantic reasons; the engine treats every failure
/// uniformly as an opaque diagnostic.
#[async_trait]
pub trait TargetOperation: Send + Sync {
    async fn run(&self, target: &Target) -> Result<()>;
}

/// Dispatches one task per target with bounded admission.
///
/// `max_parallel == 0` means unbounded. Workers never mutate shared state;
/// they emit exactly one [`TargetOutcome`] each into a channel drained by a
/// single consumer. Completion order across targets is unordered.
pub struct ScatterPool {
    max_parallel: usize,
    limiter: Option<Arc<Semaphore>>,
}

impl ScatterPool {
    #[must_use]
    pub fn new(max_parallel: usize) -> Self {
        let limiter = match max_parallel {
            0 => None,
            n => Some(Arc::new(Semaphore::new(n))),
        };
        Self {
            max_parallel,
            limiter,
        }
    }

    /// Spawn one task per target and return the outcome channel.
    ///
    /// The channel is buffered to the target count so a worker can never
    /// block on send, and it closes exactly when every dispatched task has
    /// completed. A failing target produces a `Failure` outcome carrying
    /// the operation's error text; siblings are never cancelled.
    pub fn scatter(
        &self,
        targets: Vec<Target>,
        operation: Arc<dyn TargetOperation>,
    ) -> mpsc::Receiver<TargetOutcome> {
        tracing::debug!(
            targets = targets.len(),
            max_parallel = self.max_parallel,
            "dispatching targets"
        );

        let (outcome_tx, outcome_rx) = mpsc::channel(targets.len().max(1));
        let mut workers = JoinSet::new();

        for target in targets {
            let limiter = self.limiter.clone();
            let operation = Arc::clone(&operation);
            let outcome_tx = outcome_tx.clone();

            workers.spawn(async move {
                let _permit = match limiter {
                    // The semaphore lives as long as the worker, so acquire
                    // can only fail if it were closed, which never happens.
                    Some(semaphore) => semaphore.acquire_owned().await.ok(),
                    None => None,
                };

                let outcome = match operation.run(&target).await {
                    Ok(()) => TaskOutcome::Success,
                    Err(e) => TaskOutcome::failure(e.to_string()),
                };

                let _ = outcome_tx.send(TargetOutcome::new(target, outcome)).await;
            });
        }

        // The collector's channel closes once every worker has dropped its
        // sender; this clone must go first.
        drop(outcome_tx);

        tokio::spawn(async move {
            while let Some(joined) = workers.join_next().await {
                if let Err(e) = joined {
                    tracing::warn!(error = %e, "scatter worker terminated abnormally");
                }
            }
        });

        outcome_rx
    }
}
