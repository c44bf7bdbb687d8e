//! Bounded retry policy for outbound HTTP calls.

use reqwest::StatusCode;
use std::time::Duration;

/// Backoff before the next try after a failed 1-based attempt: 1s, 2s, 4s,
/// capped at 10s.
pub(crate) fn backoff_delay(attempt: u32) -> Duration {
    let secs = 1u64 << attempt.saturating_sub(1).min(6);
    Duration::from_secs(secs.min(10))
}

/// Rate limiting and server-side failures are worth retrying; other client
/// errors propagate immediately.
pub(crate) fn is_transient(status: StatusCode) -> bool {
    status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error()
}
