//! Turning one completed response into the next quota state.
//!
//! Hypixel's headers can't be taken at face value. The API sends
//! `RateLimit-Remaining: 0` on "try again shortly" replies that are not
//! real exhaustion, reports stale counts while throttling, and leaves the
//! headers off some error responses. The rules here resolve those cases in
//! a fixed order:
//!
//! 1. `RateLimit-Reset` is always trusted and overwrites the stored reset time.
//! 2. A throttle signal (429, or `"throttle": true` in the body) forces the
//!    count to unknown, whatever `RateLimit-Remaining` says.
//! 3. Otherwise `RateLimit-Remaining` is stored, with zero and below
//!    collapsing to unknown.
//! 4. With neither, a positive count is decremented for the request just made.
//!
//! Each header is parsed on its own. A malformed one keeps its field's
//! previous value and is reported, but the other header still applies.

use crate::quota::{Quota, UNKNOWN_REMAINING};
use reqwest::header::HeaderMap;
use reqwest::StatusCode;
use serde::Deserialize;
use std::time::Duration;
use tokio::time::Instant;

/// Header carrying the requests left in the current window.
pub const REMAINING_HEADER: &str = "ratelimit-remaining";

/// Header carrying the seconds until the window resets.
pub const RESET_HEADER: &str = "ratelimit-reset";

/// Status the API reserves for rate limiting.
pub const THROTTLE_STATUS: u16 = 429;

/// What the quota coordinator needs to know about a finished request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestOutcome {
    /// HTTP status code.
    pub status: u16,
    /// Raw `RateLimit-Remaining` value, if the header was present.
    pub remaining: Option<String>,
    /// Raw `RateLimit-Reset` value, if the header was present.
    pub reset: Option<String>,
    /// Body-level `throttle` flag, if the body carried one.
    pub throttle: Option<bool>,
}

#[derive(Deserialize)]
struct ThrottleBody {
    #[serde(default)]
    throttle: Option<bool>,
}

impl RequestOutcome {
    /// An outcome with only a status code.
    pub fn new(status: u16) -> Self {
        Self {
            status,
            ..Self::default()
        }
    }

    pub fn with_remaining(mut self, value: impl Into<String>) -> Self {
        self.remaining = Some(value.into());
        self
    }

    pub fn with_reset(mut self, value: impl Into<String>) -> Self {
        self.reset = Some(value.into());
        self
    }

    pub fn with_throttle(mut self, throttle: bool) -> Self {
        self.throttle = Some(throttle);
        self
    }

    /// Extract an outcome from a raw HTTP response.
    ///
    /// A body that is not a JSON object simply carries no throttle flag.
    pub fn from_parts(status: StatusCode, headers: &HeaderMap, body: &[u8]) -> Self {
        let header = |name: &str| {
            headers
                .get(name)
                .map(|v| String::from_utf8_lossy(v.as_bytes()).into_owned())
        };
        let throttle = serde_json::from_slice::<ThrottleBody>(body)
            .ok()
            .and_then(|b| b.throttle);

        Self {
            status: status.as_u16(),
            remaining: header(REMAINING_HEADER),
            reset: header(RESET_HEADER),
            throttle,
        }
    }

    /// Whether the server rejected this request specifically for rate limiting.
    pub fn is_throttled(&self) -> bool {
        self.throttle == Some(true) || self.status == THROTTLE_STATUS
    }
}

/// A rate limit header whose value could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderParseError {
    /// Canonical header name.
    pub header: &'static str,
    /// The offending value.
    pub value: String,
}

/// The next quota state, plus any headers that had to be ignored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Interpretation {
    pub quota: Quota,
    pub errors: Vec<HeaderParseError>,
}

/// Compute the quota that follows `prev` once `outcome` has been observed at `now`.
pub fn interpret(prev: Quota, outcome: &RequestOutcome, now: Instant) -> Interpretation {
    let mut next = prev;
    let mut errors = Vec::new();

    if let Some(raw) = &outcome.reset {
        match parse_reset(raw, now) {
            Some(at) => next.reset_at = Some(at),
            None => errors.push(HeaderParseError {
                header: "RateLimit-Reset",
                value: raw.clone(),
            }),
        }
    }

    if outcome.is_throttled() {
        next.remaining = UNKNOWN_REMAINING;
    } else if let Some(raw) = &outcome.remaining {
        match raw.trim().parse::<i64>() {
            Ok(n) if n > 0 => next.remaining = n,
            Ok(_) => next.remaining = UNKNOWN_REMAINING,
            Err(_) => errors.push(HeaderParseError {
                header: "RateLimit-Remaining",
                value: raw.clone(),
            }),
        }
    } else if prev.remaining > 0 {
        next.remaining = prev.remaining - 1;
    }

    Interpretation {
        quota: next,
        errors,
    }
}

fn parse_reset(raw: &str, now: Instant) -> Option<Instant> {
    let secs = raw.trim().parse::<u64>().ok()?;
    now.checked_add(Duration::from_secs(secs))
}
