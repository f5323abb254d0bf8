#![forbid(unsafe_code)]

//! Periodic exactly-one-visible check.
//!
//! The monitor is a safety net, not the primary mechanism: transitions
//! already preserve the visible-screen invariant, and the monitor exists to
//! catch the code paths that do not go through the manager (a competing
//! patch hiding the active screen, a view layer dropping a node). On each
//! due poll it asks the manager whether something is actually presented
//! and, if not, invokes the emergency restore.
//!
//! The check is skipped entirely while a transition is settling, even if
//! zero screens are momentarily active; restoring mid-transition would
//! fight the transition itself.

use std::time::{Duration, Instant};

use runegate_core::{GameHooks, ScreenId, ViewBackend};
use tracing::warn;

use crate::manager::ScreenManager;

/// Polling cadence for the health check.
#[derive(Debug, Clone)]
pub struct HealthConfig {
    /// Interval between checks. Default: 2.5s.
    pub interval: Duration,
}

impl Default for HealthConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_millis(2_500),
        }
    }
}

/// Outcome of one monitor poll.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthVerdict {
    /// The interval has not elapsed yet.
    NotDue,
    /// A transition is settling; the check was skipped.
    TransitionInProgress,
    /// A screen is active and the view is showing it.
    Healthy,
    /// Nothing was presented; the named screen was restored.
    Restored(ScreenId),
}

/// Detects the "no screen visible" state and self-heals.
#[derive(Debug)]
pub struct HealthMonitor {
    config: HealthConfig,
    next_due: Option<Instant>,
}

impl HealthMonitor {
    /// A monitor that becomes due one interval after its first poll.
    pub fn new(config: HealthConfig) -> Self {
        Self {
            config,
            next_due: None,
        }
    }

    /// Run the check if the interval has elapsed.
    pub fn poll_at<V: ViewBackend, G: GameHooks>(
        &mut self,
        manager: &mut ScreenManager<V, G>,
        now: Instant,
    ) -> HealthVerdict {
        match self.next_due {
            None => {
                self.next_due = Some(now + self.config.interval);
                return HealthVerdict::NotDue;
            }
            Some(due) if now < due => return HealthVerdict::NotDue,
            Some(_) => {
                self.next_due = Some(now + self.config.interval);
            }
        }

        if manager.transition_in_progress_at(now) {
            return HealthVerdict::TransitionInProgress;
        }
        if manager.is_presented() {
            return HealthVerdict::Healthy;
        }

        warn!("health check found no visible screen; restoring");
        HealthVerdict::Restored(manager.emergency_restore())
    }

    /// When the next check will run, once the first poll has scheduled it.
    pub fn next_due(&self) -> Option<Instant> {
        self.next_due
    }

    /// The configured cadence.
    pub fn config(&self) -> &HealthConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::manager::ManagerConfig;
    use runegate_core::{HeadlessView, NoopHooks, ScreenRegistry};

    fn manager() -> ScreenManager<HeadlessView, NoopHooks> {
        let registry =
            ScreenRegistry::from_ids(["runeSelect", "game", "areaSelect"]).unwrap();
        let config = ManagerConfig::new("runeSelect", "game", "runeSelect");
        ScreenManager::new(registry, HeadlessView::new(), NoopHooks, config).unwrap()
    }

    fn at(base: Instant, ms: u64) -> Instant {
        base + Duration::from_millis(ms)
    }

    #[test]
    fn first_poll_only_schedules() {
        let mut monitor = HealthMonitor::new(HealthConfig::default());
        let mut mgr = manager();
        let t0 = Instant::now();
        assert_eq!(monitor.poll_at(&mut mgr, t0), HealthVerdict::NotDue);
        assert_eq!(monitor.next_due(), Some(at(t0, 2_500)));
    }

    #[test]
    fn healthy_screen_passes_the_check() {
        let mut monitor = HealthMonitor::new(HealthConfig::default());
        let mut mgr = manager();
        let t0 = Instant::now();
        mgr.activate_at("game", t0).unwrap();

        monitor.poll_at(&mut mgr, t0);
        assert_eq!(monitor.poll_at(&mut mgr, at(t0, 2_500)), HealthVerdict::Healthy);
    }

    #[test]
    fn missing_screen_triggers_restore() {
        let mut monitor = HealthMonitor::new(HealthConfig::default());
        let mut mgr = manager();
        let t0 = Instant::now();

        monitor.poll_at(&mut mgr, t0);
        let verdict = monitor.poll_at(&mut mgr, at(t0, 2_500));
        assert_eq!(verdict, HealthVerdict::Restored(ScreenId::new("runeSelect")));
        assert!(mgr.is_presented());
    }

    #[test]
    fn check_is_skipped_during_transitions() {
        let mut monitor = HealthMonitor::new(HealthConfig {
            interval: Duration::from_millis(100),
        });
        let mut mgr = manager();
        let t0 = Instant::now();

        monitor.poll_at(&mut mgr, t0);
        // Start a transition just before the check becomes due. Zero screens
        // were active beforehand, but the settling transition must still win.
        mgr.activate_at("game", at(t0, 90)).unwrap();
        assert_eq!(
            monitor.poll_at(&mut mgr, at(t0, 100)),
            HealthVerdict::TransitionInProgress
        );
    }

    #[test]
    fn polls_between_intervals_do_nothing() {
        let mut monitor = HealthMonitor::new(HealthConfig::default());
        let mut mgr = manager();
        let t0 = Instant::now();

        monitor.poll_at(&mut mgr, t0);
        assert_eq!(monitor.poll_at(&mut mgr, at(t0, 1_000)), HealthVerdict::NotDue);
        assert_eq!(monitor.poll_at(&mut mgr, at(t0, 2_000)), HealthVerdict::NotDue);
        assert!(mgr.active().is_none());
    }

    #[test]
    fn hidden_active_screen_is_healed() {
        let mut monitor = HealthMonitor::new(HealthConfig::default());
        let mut mgr = manager();
        let t0 = Instant::now();
        mgr.activate_at("game", t0).unwrap();
        mgr.view_mut().force_hide(&ScreenId::new("game"));

        monitor.poll_at(&mut mgr, t0);
        let verdict = monitor.poll_at(&mut mgr, at(t0, 2_500));
        assert_eq!(verdict, HealthVerdict::Restored(ScreenId::new("game")));
        assert!(mgr.is_presented());
    }
}
