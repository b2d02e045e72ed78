//! Deadline for the connect phase of a request.
//!
//! Only the initial request (connection plus response headers) is raced
//! against the deadline. Once the body starts streaming, reads are not
//! subject to it: a slow but live generation is never cut off mid-stream.

use std::future::Future;
use std::time::Duration;

use crate::error::{BridgeError, Result};

/// Race `future` against `duration`; the first to settle wins.
///
/// On expiry the future is dropped and [`BridgeError::Timeout`] is returned. A
/// timeout reported by the future itself is normalized to the same shape.
pub async fn with_timeout<T>(
    duration: Duration,
    future: impl Future<Output = Result<T>>,
) -> Result<T> {
    match tokio::time::timeout(duration, future).await {
        Ok(result) => result.map_err(|e| normalize_timeout(e, duration)),
        Err(_) => Err(BridgeError::timeout(duration)),
    }
}

/// Rewrite any timeout-like error into the configured deadline's message.
pub fn normalize_timeout(error: BridgeError, duration: Duration) -> BridgeError {
    if error.is_timeout() {
        BridgeError::timeout(duration)
    } else {
        error
    }
}
