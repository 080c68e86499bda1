//! Quota gate for Hypixel API requests.
//!
//! The gate does not budget requests itself. It follows the quota the server
//! reports and holds callers back only while that quota is exhausted and a
//! reset is still pending.

use crate::error::Result;
use crate::interpret::{interpret, RequestOutcome};
use crate::quota::{Quota, QuotaState, QuotaStatus};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::watch;
use tokio::task::AbortHandle;
use tokio::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Longest a single call to [`RateGate::wait_if_needed`] will block.
///
/// Hypixel windows are five minutes; anything longer is a stale or skewed reset.
pub const MAX_WAIT: Duration = Duration::from_secs(5 * 60);

/// Coordinates requests against the server-reported quota.
///
/// Cloning is cheap and clones share state. Give each client its own gate
/// unless several clients deliberately draw from one API key.
///
/// The quota can only be changed through [`update`](Self::update) and
/// [`reset`](Self::reset):
///
/// ```compile_fail
/// let gate = hypixel_client::RateGate::new();
/// gate.state().write(100, None);
/// ```
#[derive(Debug, Clone)]
pub struct RateGate {
    inner: Arc<GateInner>,
}

#[derive(Debug)]
struct GateInner {
    state: QuotaState,
    max_wait: Duration,
    /// The one timer armed for the current exhaustion episode, if any.
    episode: Mutex<Option<Episode>>,
    timers_started: AtomicU64,
}

#[derive(Debug)]
struct Episode {
    id: u64,
    deadline: Instant,
    /// Closes when the timer fires or is disarmed; every clone wakes at once.
    released: watch::Receiver<()>,
    timer: AbortHandle,
}

impl RateGate {
    /// Create a gate in the unknown state with the default five-minute cap.
    pub fn new() -> Self {
        Self::with_max_wait(MAX_WAIT)
    }

    /// Create a gate whose waits are capped at `max_wait`.
    pub fn with_max_wait(max_wait: Duration) -> Self {
        Self {
            inner: Arc::new(GateInner {
                state: QuotaState::new(),
                max_wait,
                episode: Mutex::new(None),
                timers_started: AtomicU64::new(0),
            }),
        }
    }

    /// Wait until a request may be sent.
    ///
    /// Returns at once unless the quota is exhausted with a reset still ahead.
    /// Concurrent callers share one timer and are all released when it fires,
    /// then each re-checks the state, since a response that landed meanwhile
    /// may already have refreshed it. No call blocks longer than the cap.
    pub async fn wait_if_needed(&self) {
        let give_up = Instant::now() + self.inner.max_wait;
        while let Some(mut released) = self.attach(give_up) {
            // The timer signals by dropping its sender, so `Err` is the wake-up.
            let _ = released.changed().await;
        }
    }

    /// Like [`wait_if_needed`](Self::wait_if_needed), but gives up when `cancel` fires.
    ///
    /// Returns `false` if cancelled before the gate opened. The shared timer
    /// keeps running for any other waiters.
    pub async fn wait_if_needed_or_cancel(&self, cancel: &CancellationToken) -> bool {
        tokio::select! {
            biased;
            _ = self.wait_if_needed() => true,
            _ = cancel.cancelled() => false,
        }
    }

    /// Fold a completed request into the quota state.
    ///
    /// Whatever parses is committed. A malformed header is reported after
    /// the rest of the outcome has been applied.
    pub fn update(&self, outcome: &RequestOutcome) -> Result<QuotaStatus> {
        let now = Instant::now();
        let (quota, errors) = self.inner.state.modify(|quota| {
            let next = interpret(*quota, outcome, now);
            *quota = next.quota;
            (next.quota, next.errors)
        });

        if outcome.is_throttled() {
            debug!(status = outcome.status, "throttle signal, quota count now unknown");
        }
        debug!(
            remaining = quota.remaining,
            reset_in_ms = reset_in_ms(&quota, now),
            "quota updated"
        );

        let mut errors = errors.into_iter();
        match errors.next() {
            None => Ok(QuotaStatus::from_quota(quota, now)),
            Some(first) => {
                for other in errors {
                    warn!(header = other.header, value = %other.value, "malformed rate limit header");
                }
                Err(first.into())
            }
        }
    }

    /// Forget everything learned about the quota.
    ///
    /// Any armed timer is disarmed and its waiters released; they find no
    /// reset time and proceed.
    pub fn reset(&self) {
        self.inner.state.clear();
        let armed = self.inner.lock_episode().take();
        match armed {
            Some(episode) => {
                // Aborting drops the timer's sender, which wakes every waiter.
                episode.timer.abort();
                info!(episode = episode.id, "quota reset, releasing waiters");
            }
            None => info!("quota reset"),
        }
    }

    /// Snapshot of the quota for logs and diagnostics.
    pub fn status(&self) -> QuotaStatus {
        QuotaStatus::from_quota(self.inner.state.read(), Instant::now())
    }

    /// Raw quota snapshot.
    pub fn quota(&self) -> Quota {
        self.inner.state.read()
    }

    /// The underlying state. Outside the crate the quota changes only
    /// through [`update`](Self::update) and [`reset`](Self::reset).
    pub(crate) fn state(&self) -> &QuotaState {
        &self.inner.state
    }

    /// How many wait timers have been armed since the gate was created.
    pub fn timers_started(&self) -> u64 {
        self.inner.timers_started.load(Ordering::SeqCst)
    }

    /// The cap applied to each wait.
    pub fn max_wait(&self) -> Duration {
        self.inner.max_wait
    }

    /// Join the current episode's timer, arming one if none is active.
    ///
    /// A timer set later than this caller may wait is replaced by an earlier
    /// one; aborting it releases its waiters, who re-attach to the new timer.
    /// Returns `None` when the caller should go ahead.
    fn attach(&self, give_up: Instant) -> Option<watch::Receiver<()>> {
        let now = Instant::now();
        if now >= give_up {
            return None;
        }
        let quota = self.inner.state.read();
        let reset_at = quota.blocked_until(now)?;
        let deadline = reset_at.min(give_up);

        let mut slot = self.inner.lock_episode();
        if let Some(episode) = slot.as_ref() {
            if episode.deadline <= deadline {
                debug!(episode = episode.id, "waiting on armed quota timer");
                return Some(episode.released.clone());
            }
            debug!(episode = episode.id, "armed quota timer runs too long, replacing it");
            episode.timer.abort();
        }

        let id = self.inner.timers_started.fetch_add(1, Ordering::SeqCst) + 1;
        let (fire, released) = watch::channel(());
        let inner = Arc::clone(&self.inner);
        let timer = tokio::spawn(async move {
            tokio::time::sleep_until(deadline).await;
            inner.disarm(id);
            drop(fire);
        });

        info!(
            episode = id,
            remaining = quota.remaining,
            wait_ms = (deadline - now).as_millis() as u64,
            capped = deadline < reset_at,
            "quota exhausted, holding requests until reset"
        );
        *slot = Some(Episode {
            id,
            deadline,
            released: released.clone(),
            timer: timer.abort_handle(),
        });
        Some(released)
    }
}

impl Default for RateGate {
    fn default() -> Self {
        Self::new()
    }
}

impl GateInner {
    fn lock_episode(&self) -> MutexGuard<'_, Option<Episode>> {
        self.episode.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Clear the slot if it still holds episode `id`.
    ///
    /// Must run before the sender drops, so released waiters never re-join a fired episode.
    fn disarm(&self, id: u64) {
        let mut slot = self.lock_episode();
        if slot.as_ref().is_some_and(|e| e.id == id) {
            *slot = None;
            debug!(episode = id, "quota timer fired, releasing waiters");
        }
    }
}

fn reset_in_ms(quota: &Quota, now: Instant) -> Option<u64> {
    quota
        .reset_at
        .map(|at| at.saturating_duration_since(now).as_millis() as u64)
}
