//! Unbounded fan-out that keeps every successful value alongside the last
//! error, for callers that want maximal partial success.

use conveyor_core::Error;
use std::future::Future;
use tokio::task::JoinSet;

/// Values produced by successful tasks plus the last error observed, if any.
///
/// Value order follows completion order and is run-to-run nondeterministic.
#[derive(Debug)]
pub struct Gathered<O> {
    pub values: Vec<O>,
    pub last_error: Option<Error>,
}

impl<O> Gathered<O> {
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.last_error.is_none()
    }
}

/// Dispatch one task per item and collect all successes.
///
/// A failing task never discards values contributed by its siblings; the
/// group always runs to completion before returning.
pub async fn gather<T, O, F, Fut>(items: Vec<T>, operation: F) -> Gathered<O>
where
    T: Send + 'static,
    O: Send + 'static,
    F: Fn(T) -> Fut,
    Fut: Future<Output = conveyor_core::Result<O>> + Send + 'static,
{
    let mut tasks = JoinSet::new();
    for item in items {
        tasks.spawn(operation(item));
    }

    let mut values = Vec::new();
    let mut last_error: Option<Error> = None;

    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok(Ok(value)) => values.push(value),
            Ok(Err(e)) => {
                tracing::debug!(error = %e, "gather task failed");
                last_error = Some(e);
            }
            Err(e) => {
                last_error = Some(Error::internal(format!(
                    "gather task failed to join: {e}"
                )));
            }
        }
    }

    Gathered { values, last_error }
}
