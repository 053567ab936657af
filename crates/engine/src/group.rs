//! Unbounded fan-out with first-error semantics.

use conveyor_core::{Error, Result};
use std::future::Future;
use tokio::task::JoinSet;

/// Dispatch one task per item and surface the first error encountered.
///
/// Every task runs to completion regardless of sibling failures; nothing is
/// cancelled. When several tasks fail, the error that joined first wins and
/// the rest are logged, so callers may only rely on "an error occurred",
/// not on which one.
pub async fn first_error<T, F, Fut>(items: Vec<T>, operation: F) -> Result<()>
where
    T: Send + 'static,
    F: Fn(T) -> Fut,
    Fut: Future<Output = Result<()>> + Send + 'static,
{
    let mut tasks = JoinSet::new();
    for item in items {
        tasks.spawn(operation(item));
    }

    let mut first_err: Option<Error> = None;
    while let Some(joined) = tasks.join_next().await {
        let result = match joined {
            Ok(result) => result,
            Err(e) => Err(Error::internal(format!("fan-out task failed to join: {e}"))),
        };

        if let Err(e) = result {
            if first_err.is_none() {
                first_err = Some(e);
            } else {
                tracing::debug!(error = %e, "additional fan-out failure suppressed");
            }
        }
    }

    match first_err {
        Some(e) => Err(e),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    #[tokio::test]
    async fn all_success_returns_ok() {
        let completed = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&completed);

        let result = first_error(vec![1u64, 2, 3], move |n| {
            let counter = Arc::clone(&counter);
            async move {
                tokio::time::sleep(Duration::from_millis(n)).await;
                counter.fetch_add(1, Ordering::SeqCst);
                Ok(())
            }
        })
        .await;

        assert!(result.is_ok());
        assert_eq!(completed.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn failure_does_not_stop_siblings() {
        let completed = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&completed);

        let result = first_error(vec!["ok-1", "fails", "ok-2", "ok-3"], move |name| {
            let counter = Arc::clone(&counter);
            async move {
                if name == "fails" {
                    return Err(Error::execution(name, "exit status 1", Some(1)));
                }
                tokio::time::sleep(Duration::from_millis(10)).await;
                counter.fetch_add(1, Ordering::SeqCst);
                Ok(())
            }
        })
        .await;

        assert!(result.is_err());
        // Siblings that outlived the failure still ran to completion.
        assert_eq!(completed.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn empty_input_is_a_no_op() {
        let result = first_error(Vec::<u8>::new(), |_| async { Ok(()) }).await;
        assert!(result.is_ok());
    }
}
