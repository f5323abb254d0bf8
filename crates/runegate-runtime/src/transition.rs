#![forbid(unsafe_code)]

//! Transition state with enforced exclusion and a watchdog.
//!
//! The guard owns the one `in progress` flag for the whole flow. It replaces
//! the per-caller globals the original UI patches grew (`battle...InProgress`,
//! `screen...InProgress`, one per file) with a single value that has two
//! hard properties:
//!
//! - **Exclusion is enforced**: `begin_at` rejects a second transition while
//!   the first is still settling, instead of letting re-entrant activations
//!   race.
//! - **Bounded lifetime**: `in_progress_at(now)` reads as false once the
//!   settle deadline passes, so the flag clears within a bounded time even
//!   if the host's tick loop stalls. The watchdog deadline only classifies
//!   how late the eventual tick was.
//!
//! # Usage
//!
//! ```ignore
//! use runegate_runtime::transition::{TransitionGuard, TransitionConfig};
//!
//! let mut guard = TransitionGuard::new(TransitionConfig::default());
//! guard.begin_at(previous_screen, Instant::now())?;
//!
//! // Each loop iteration:
//! let tick = guard.tick_at(Instant::now());
//! ```

use std::time::{Duration, Instant};

use runegate_core::{ScreenError, ScreenId};
use tracing::{debug, warn};

/// Timing parameters for screen transitions.
#[derive(Debug, Clone)]
pub struct TransitionConfig {
    /// How long a transition is considered in progress after it begins.
    /// Re-entrant activations are rejected inside this window. Default: 150ms.
    pub settle: Duration,

    /// Upper bound after which a still-pending transition is treated as
    /// abandoned. Must be >= `settle`. Default: 2s.
    pub watchdog: Duration,
}

impl Default for TransitionConfig {
    fn default() -> Self {
        Self {
            settle: Duration::from_millis(150),
            watchdog: Duration::from_secs(2),
        }
    }
}

/// Outcome of one guard tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionTick {
    /// No transition pending.
    Idle,
    /// A transition is inside its settle window.
    Settling,
    /// The settle window elapsed; the transition is complete.
    Completed,
    /// The first tick after `begin` arrived past the watchdog deadline.
    /// The guard still clears; this is a diagnostic for a stalled loop.
    WatchdogExpired,
}

#[derive(Debug, Clone)]
struct PendingTransition {
    started: Instant,
    settle_deadline: Instant,
    watchdog_deadline: Instant,
}

/// The single owned transition state for the flow.
#[derive(Debug)]
pub struct TransitionGuard {
    config: TransitionConfig,
    pending: Option<PendingTransition>,
    last_active: Option<ScreenId>,
}

impl TransitionGuard {
    /// A guard with no transition pending and no back-navigation history.
    pub fn new(config: TransitionConfig) -> Self {
        Self {
            config,
            pending: None,
            last_active: None,
        }
    }

    /// Begin a transition at `now`, recording `previous` for back-navigation.
    ///
    /// Fails with [`ScreenError::TransitionInProgress`] while an earlier
    /// transition is still inside its settle window.
    pub fn begin_at(
        &mut self,
        previous: Option<ScreenId>,
        now: Instant,
    ) -> Result<(), ScreenError> {
        if self.in_progress_at(now) {
            return Err(ScreenError::TransitionInProgress {
                current: self.last_active.clone(),
            });
        }
        // A stale pending entry past its settle deadline is finished in all
        // but bookkeeping; replace it.
        self.pending = Some(PendingTransition {
            started: now,
            settle_deadline: now + self.config.settle,
            watchdog_deadline: now + self.config.watchdog,
        });
        if previous.is_some() {
            self.last_active = previous;
        }
        Ok(())
    }

    /// True while a transition is inside its settle window.
    ///
    /// Reads as false once the settle deadline passes, whether or not a
    /// tick has run, so the flag's lifetime is bounded by construction.
    pub fn in_progress_at(&self, now: Instant) -> bool {
        match &self.pending {
            Some(p) => now < p.settle_deadline,
            None => false,
        }
    }

    /// Convenience wrapper over [`TransitionGuard::in_progress_at`].
    pub fn in_progress(&self) -> bool {
        self.in_progress_at(Instant::now())
    }

    /// Advance the guard, retiring a settled transition.
    pub fn tick_at(&mut self, now: Instant) -> TransitionTick {
        let Some(p) = &self.pending else {
            return TransitionTick::Idle;
        };
        if now < p.settle_deadline {
            return TransitionTick::Settling;
        }
        let late = now >= p.watchdog_deadline;
        let elapsed = now.checked_duration_since(p.started).unwrap_or(Duration::ZERO);
        self.pending = None;
        if late {
            warn!(?elapsed, "transition watchdog expired before tick; clearing");
            TransitionTick::WatchdogExpired
        } else {
            debug!(?elapsed, "transition settled");
            TransitionTick::Completed
        }
    }

    /// The screen that was active before the most recent transition.
    pub fn last_active(&self) -> Option<&ScreenId> {
        self.last_active.as_ref()
    }

    /// Drop any pending transition. Idempotent; clearing an idle guard is
    /// a no-op. Back-navigation history is kept.
    pub fn clear(&mut self) {
        self.pending = None;
    }

    /// The configured timing parameters.
    pub fn config(&self) -> &TransitionConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(base: Instant, ms: u64) -> Instant {
        base + Duration::from_millis(ms)
    }

    fn guard() -> (TransitionGuard, Instant) {
        (TransitionGuard::new(TransitionConfig::default()), Instant::now())
    }

    #[test]
    fn fresh_guard_is_idle() {
        let (mut g, t0) = guard();
        assert!(!g.in_progress_at(t0));
        assert_eq!(g.tick_at(t0), TransitionTick::Idle);
        assert_eq!(g.last_active(), None);
    }

    #[test]
    fn begin_opens_the_settle_window() {
        let (mut g, t0) = guard();
        g.begin_at(Some(ScreenId::new("game")), t0).unwrap();
        assert!(g.in_progress_at(at(t0, 100)));
        assert_eq!(g.tick_at(at(t0, 100)), TransitionTick::Settling);
    }

    #[test]
    fn settle_window_closes_without_a_tick() {
        let (mut g, t0) = guard();
        g.begin_at(None, t0).unwrap();
        // No tick ran, but the flag still reads cleared past the deadline.
        assert!(!g.in_progress_at(at(t0, 151)));
    }

    #[test]
    fn tick_past_settle_completes() {
        let (mut g, t0) = guard();
        g.begin_at(None, t0).unwrap();
        assert_eq!(g.tick_at(at(t0, 200)), TransitionTick::Completed);
        assert_eq!(g.tick_at(at(t0, 201)), TransitionTick::Idle);
    }

    #[test]
    fn very_late_tick_reports_watchdog() {
        let (mut g, t0) = guard();
        g.begin_at(None, t0).unwrap();
        assert_eq!(g.tick_at(at(t0, 5_000)), TransitionTick::WatchdogExpired);
        assert!(!g.in_progress_at(at(t0, 5_001)));
    }

    #[test]
    fn reentrant_begin_is_rejected() {
        let (mut g, t0) = guard();
        g.begin_at(Some(ScreenId::new("game")), t0).unwrap();
        let err = g.begin_at(Some(ScreenId::new("battle")), at(t0, 50)).unwrap_err();
        assert_eq!(
            err,
            ScreenError::TransitionInProgress {
                current: Some(ScreenId::new("game")),
            }
        );
        // The rejected call must not clobber back-navigation history.
        assert_eq!(g.last_active(), Some(&ScreenId::new("game")));
    }

    #[test]
    fn begin_after_settle_succeeds_without_tick() {
        let (mut g, t0) = guard();
        g.begin_at(Some(ScreenId::new("game")), t0).unwrap();
        g.begin_at(Some(ScreenId::new("areaSelect")), at(t0, 200)).unwrap();
        assert_eq!(g.last_active(), Some(&ScreenId::new("areaSelect")));
    }

    #[test]
    fn begin_with_no_previous_keeps_history() {
        let (mut g, t0) = guard();
        g.begin_at(Some(ScreenId::new("game")), t0).unwrap();
        g.begin_at(None, at(t0, 200)).unwrap();
        assert_eq!(g.last_active(), Some(&ScreenId::new("game")));
    }

    #[test]
    fn clear_is_idempotent() {
        let (mut g, t0) = guard();
        g.begin_at(Some(ScreenId::new("game")), t0).unwrap();
        g.clear();
        assert!(!g.in_progress_at(at(t0, 10)));
        g.clear();
        assert_eq!(g.tick_at(at(t0, 10)), TransitionTick::Idle);
        assert_eq!(g.last_active(), Some(&ScreenId::new("game")));
    }
}
