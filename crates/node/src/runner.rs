//! Parallel execution of package-manager commands.

use async_trait::async_trait;
use conveyor_core::{Error, Result};
use conveyor_engine::first_error;
use std::sync::Arc;

/// Executes one command inside the build container.
#[async_trait]
pub trait CommandRunner: Send + Sync {
    async fn run(&self, command: &[String]) -> Result<()>;
}

/// Run every command concurrently with no cap, returning the first error.
///
/// All commands run to completion regardless of sibling failures; when
/// several fail, callers may only rely on "an error occurred". Malformed
/// input is rejected before anything is dispatched.
pub async fn parallel_run(
    runner: Arc<dyn CommandRunner>,
    commands: Vec<Vec<String>>,
) -> Result<()> {
    if commands.iter().any(Vec::is_empty) {
        return Err(Error::configuration(
            "parallel run received an empty command",
        ));
    }

    tracing::info!(commands = commands.len(), "running commands in parallel");
    first_error(commands, |command| {
        let runner = Arc::clone(&runner);
        async move { runner.run(&command).await }
    })
    .await
}
