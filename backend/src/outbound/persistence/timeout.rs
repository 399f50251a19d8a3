//! Per-operation timeout guard for storage round-trips.
//!
//! Every store operation is bounded independently; exceeding it
//! aborts the operation and surfaces a failure instead of hanging the
//! worker.

use std::future::Future;
use std::time::Duration;

/// Deadline for a single store operation.
pub(crate) const QUERY_TIMEOUT: Duration = Duration::from_secs(5);

/// Message used when the deadline passes.
pub(crate) const QUERY_TIMEOUT_MESSAGE: &str = "query timed out after 5s";

/// Run a storage future under [`QUERY_TIMEOUT`], converting an elapsed
/// deadline into the adapter's timeout error.
pub(crate) async fn bounded<T, E>(
    operation: impl Future<Output = Result<T, E>>,
    timeout_error: impl FnOnce() -> E,
) -> Result<T, E> {
    match tokio::time::timeout(QUERY_TIMEOUT, operation).await {
        Ok(result) => result,
        Err(_elapsed) => Err(timeout_error()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn completed_operations_pass_through() {
        let result: Result<i32, &str> = bounded(async { Ok(7) }, || "timed out").await;
        assert_eq!(result, Ok(7));
    }

    #[tokio::test(start_paused = true)]
    async fn elapsed_deadline_yields_the_timeout_error() {
        let slow = async {
            tokio::time::sleep(Duration::from_secs(10)).await;
            Ok::<i32, &str>(7)
        };
        let result = bounded(slow, || "timed out").await;
        assert_eq!(result, Err("timed out"));
    }
}
