//! Timeout helper.

use std::future::Future;
use std::time::Duration;

use crate::geo::GeocodeError;

/// Wrap a lookup with an optional deadline.
pub async fn with_timeout<T>(
    duration: Option<Duration>,
    future: impl Future<Output = Result<T, GeocodeError>>,
) -> Result<T, GeocodeError> {
    let Some(duration) = duration else {
        return future.await;
    };
    match tokio::time::timeout(duration, future).await {
        Ok(result) => result,
        Err(_) => Err(GeocodeError::Timeout(duration.as_millis() as u64)),
    }
}
