//! Exponential backoff for REST retries

use std::time::Duration;

/// Calculate next backoff duration using exponential backoff with a maximum cap
///
/// `new_backoff = min(current_backoff * multiplier, max_backoff)`
///
/// # Example
/// ```
/// use std::time::Duration;
/// use bch_slp_toolkit::api::calculate_next_backoff;
///
/// let backoff = Duration::from_millis(250);
/// let next = calculate_next_backoff(backoff, 2.0, 10);
/// assert_eq!(next, Duration::from_millis(500));
/// ```
pub fn calculate_next_backoff(
    current_backoff: Duration,
    multiplier: f64,
    max_backoff_seconds: u64,
) -> Duration {
    Duration::from_millis((current_backoff.as_millis() as f64 * multiplier) as u64)
        .min(Duration::from_secs(max_backoff_seconds))
}
