//! Shared record of the quota the Hypixel API reports.
//!
//! [`QuotaState`] holds the `{remaining, reset_at}` pair behind a single lock
//! so readers always see both fields from the same update.

use chrono::{DateTime, SecondsFormat, TimeDelta, Utc};
use serde::Serialize;
use std::fmt;
use std::sync::{Mutex, MutexGuard, PoisonError};
use tokio::time::Instant;

/// Remaining count meaning "no trustworthy count is known; assume exhausted".
pub const UNKNOWN_REMAINING: i64 = -1;

/// A consistent snapshot of the server-reported quota.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quota {
    /// Requests left in the current window, or [`UNKNOWN_REMAINING`].
    pub remaining: i64,
    /// When the server said the window refreshes. `None` if never reported.
    pub reset_at: Option<Instant>,
}

impl Quota {
    /// The initial state: count unknown, no reset scheduled.
    pub const UNKNOWN: Quota = Quota {
        remaining: UNKNOWN_REMAINING,
        reset_at: None,
    };

    /// Whether the remaining count is the unknown sentinel.
    pub fn is_unknown(&self) -> bool {
        self.remaining == UNKNOWN_REMAINING
    }

    /// The instant callers must hold off until, if the quota is exhausted at `now`.
    ///
    /// A positive count never blocks. Neither does an unknown or zero count
    /// without a reset time still in the future.
    pub fn blocked_until(&self, now: Instant) -> Option<Instant> {
        if self.remaining > 0 {
            return None;
        }
        self.reset_at.filter(|reset| *reset > now)
    }
}

impl Default for Quota {
    fn default() -> Self {
        Self::UNKNOWN
    }
}

/// Thread-safe holder of the current [`Quota`].
#[derive(Debug, Default)]
pub struct QuotaState {
    inner: Mutex<Quota>,
}

impl QuotaState {
    /// Create a state in the unknown condition.
    pub fn new() -> Self {
        Self::default()
    }

    /// Read both fields as one snapshot.
    pub fn read(&self) -> Quota {
        *self.lock()
    }

    /// Replace both fields at once.
    pub fn write(&self, remaining: i64, reset_at: Option<Instant>) {
        *self.lock() = Quota {
            remaining,
            reset_at,
        };
    }

    /// Return to the unknown state.
    pub fn clear(&self) {
        *self.lock() = Quota::UNKNOWN;
    }

    /// Read-modify-write under the lock, so concurrent updates never lose a step.
    pub(crate) fn modify<R>(&self, f: impl FnOnce(&mut Quota) -> R) -> R {
        f(&mut self.lock())
    }

    fn lock(&self) -> MutexGuard<'_, Quota> {
        // The guarded value is plain Copy data; a panic elsewhere cannot leave it half-written.
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Read-only view of the quota for logs and diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct QuotaStatus {
    /// Requests left, or `-1` when unknown.
    pub remaining: i64,
    /// Wall-clock time of the next reset, if one is known.
    pub reset_at: Option<DateTime<Utc>>,
}

impl QuotaStatus {
    /// Convert a snapshot taken at monotonic `now` into wall-clock terms.
    pub fn from_quota(quota: Quota, now: Instant) -> Self {
        Self {
            remaining: quota.remaining,
            reset_at: quota.reset_at.and_then(|at| wall_clock(at, now)),
        }
    }
}

impl fmt::Display for QuotaStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.reset_at {
            Some(at) => write!(
                f,
                "{} remaining until {}",
                self.remaining,
                at.to_rfc3339_opts(SecondsFormat::Secs, true)
            ),
            None => write!(f, "{} remaining, no reset scheduled", self.remaining),
        }
    }
}

fn wall_clock(at: Instant, now: Instant) -> Option<DateTime<Utc>> {
    let wall_now = Utc::now();
    if at >= now {
        let ahead = TimeDelta::from_std(at - now).ok()?;
        wall_now.checked_add_signed(ahead)
    } else {
        let behind = TimeDelta::from_std(now - at).ok()?;
        wall_now.checked_sub_signed(behind)
    }
}
