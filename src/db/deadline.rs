use std::future::Future;
use std::time::Duration;

use crate::error::{AppError, AppResult};

/// Runs a store call with an upper bound on its duration.
///
/// When the deadline passes the inner future is dropped, which releases any
/// pooled connection it held, and `AppError::Timeout` is returned.
pub async fn with_deadline<T, F>(deadline: Duration, operation: &str, future: F) -> AppResult<T>
where
    F: Future<Output = AppResult<T>>,
{
    match tokio::time::timeout(deadline, future).await {
        Ok(result) => result,
        Err(_) => {
            tracing::warn!(operation, ?deadline, "Store call exceeded its deadline");
            Err(AppError::Timeout {
                operation: operation.to_string(),
            })
        }
    }
}
