//! Cache invalidation policy.
//!
//! The policy is a pure function of `(now, last_fetched_at, window)`.

use chrono::{DateTime, Utc};

/// Outcome of the freshness check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchDecision {
    /// Data is missing or stale; call the remote source.
    Fetch,
    /// Data was fetched within the freshness window; skip the network.
    Skip,
}

/// Decides whether a refresh must hit the remote source.
///
/// - Never fetched: `Fetch`
/// - Fetched at or beyond `window` ago: `Fetch`
/// - Otherwise (including a `last_fetched_at` in the future): `Skip`
///
/// A zero `window` always fetches.
pub fn decide(
    now: DateTime<Utc>,
    last_fetched_at: Option<DateTime<Utc>>,
    window: chrono::Duration,
) -> FetchDecision {
    let Some(last) = last_fetched_at else {
        return FetchDecision::Fetch;
    };

    if window <= chrono::Duration::zero() {
        return FetchDecision::Fetch;
    }

    if now - last >= window {
        FetchDecision::Fetch
    } else {
        FetchDecision::Skip
    }
}

/// Converts a std duration into a chrono duration, saturating on overflow.
pub fn window_from_std(window: std::time::Duration) -> chrono::Duration {
    chrono::Duration::from_std(window).unwrap_or(chrono::Duration::MAX)
}
