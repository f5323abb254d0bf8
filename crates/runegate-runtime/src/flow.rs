#![forbid(unsafe_code)]

//! The flow runtime: single owner of manager, coordinator, and monitor.
//!
//! `FlowRuntime` is the piece the host's event loop talks to. One
//! [`FlowRuntime::tick_at`] per loop iteration drives everything that is
//! time-dependent: the transition settle window, the boot sequence, and the
//! health check. UI event handlers call the operation passthroughs
//! (`activate`, `go_back`, ...); subsystems call [`FlowRuntime::acknowledge`]
//! when they finish starting.
//!
//! Two wiring rules live here rather than in the components themselves:
//!
//! - When the coordinator reaches all-active, the runtime performs the one
//!   final "is anything visible" check and emergency-restores if not. This
//!   is the last-resort guarantee that boot never ends on a blank screen,
//!   whatever the subsystems did.
//! - The health monitor only engages after boot completes. Before the
//!   screen-manager subsystem has started there is legitimately nothing to
//!   present, and restoring then would fight the boot sequence.

use std::time::Instant;

use runegate_core::{GameHooks, ScreenError, ScreenId, ScreenRegistry, ViewBackend};
use tracing::{info, warn};

use crate::coordinator::{CoordinatorConfig, CoordinatorEvent, InitCoordinator, Subsystem};
use crate::health::{HealthConfig, HealthMonitor, HealthVerdict};
use crate::manager::{ManagerConfig, ScreenManager};
use crate::transition::TransitionTick;

/// Configuration for the whole flow.
#[derive(Debug, Clone)]
pub struct FlowConfig {
    /// Screen roles and transition timing.
    pub manager: ManagerConfig,
    /// Boot retry parameters.
    pub coordinator: CoordinatorConfig,
    /// Health polling cadence.
    pub health: HealthConfig,
}

impl FlowConfig {
    /// Config with default timings for the given screen roles.
    pub fn new(manager: ManagerConfig) -> Self {
        Self {
            manager,
            coordinator: CoordinatorConfig::default(),
            health: HealthConfig::default(),
        }
    }
}

/// What one runtime tick did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlowTick {
    /// Transition guard progress.
    pub transition: TransitionTick,
    /// Boot sequence progress.
    pub coordinator: CoordinatorEvent,
    /// Health check outcome (only engaged after boot).
    pub health: HealthVerdict,
}

/// Owns the screen manager, init coordinator, and health monitor.
pub struct FlowRuntime<V: ViewBackend, G: GameHooks> {
    manager: ScreenManager<V, G>,
    coordinator: InitCoordinator,
    health: HealthMonitor,
}

impl<V: ViewBackend, G: GameHooks> FlowRuntime<V, G> {
    /// Build the runtime. Fails only on invalid screen configuration.
    pub fn new(
        registry: ScreenRegistry,
        view: V,
        hooks: G,
        config: FlowConfig,
    ) -> Result<Self, ScreenError> {
        let manager = ScreenManager::new(registry, view, hooks, config.manager)?;
        Ok(Self {
            manager,
            coordinator: InitCoordinator::new(config.coordinator),
            health: HealthMonitor::new(config.health),
        })
    }

    /// Register a boot subsystem. Call before the first tick.
    pub fn register_subsystem(&mut self, subsystem: Box<dyn Subsystem>) {
        self.coordinator.register(subsystem);
    }

    /// Advance everything time-dependent by one step.
    pub fn tick_at(&mut self, now: Instant) -> FlowTick {
        let transition = self.manager.tick_at(now);

        let coordinator = if self.coordinator.is_complete() {
            CoordinatorEvent::Done
        } else {
            let event = self.coordinator.poll_at(now);
            if event == CoordinatorEvent::AllActive {
                info!("boot sequence complete");
                if !self.manager.transition_in_progress_at(now) && !self.manager.is_presented() {
                    let restored = self.manager.emergency_restore();
                    warn!(screen = %restored, "boot finished with no visible screen; restored");
                }
            }
            event
        };

        let health = if self.coordinator.is_complete() {
            self.health.poll_at(&mut self.manager, now)
        } else {
            HealthVerdict::NotDue
        };

        FlowTick {
            transition,
            coordinator,
            health,
        }
    }

    /// Convenience wrapper over [`FlowRuntime::tick_at`].
    pub fn tick(&mut self) -> FlowTick {
        self.tick_at(Instant::now())
    }

    /// See [`ScreenManager::activate_at`].
    pub fn activate_at(&mut self, id: &str, now: Instant) -> Result<(), ScreenError> {
        self.manager.activate_at(id, now)
    }

    /// Convenience wrapper over [`FlowRuntime::activate_at`].
    pub fn activate(&mut self, id: &str) -> Result<(), ScreenError> {
        self.activate_at(id, Instant::now())
    }

    /// See [`ScreenManager::go_back_at`].
    pub fn go_back_at(&mut self, now: Instant) -> Result<ScreenId, ScreenError> {
        self.manager.go_back_at(now)
    }

    /// Convenience wrapper over [`FlowRuntime::go_back_at`].
    pub fn go_back(&mut self) -> Result<ScreenId, ScreenError> {
        self.go_back_at(Instant::now())
    }

    /// See [`ScreenManager::active`].
    pub fn active(&self) -> Option<ScreenId> {
        self.manager.active()
    }

    /// See [`ScreenManager::emergency_restore`].
    pub fn emergency_restore(&mut self) -> ScreenId {
        self.manager.emergency_restore()
    }

    /// See [`InitCoordinator::acknowledge`].
    pub fn acknowledge(&mut self, name: &str) -> bool {
        self.coordinator.acknowledge(name)
    }

    /// True once the boot sequence finished.
    pub fn boot_complete(&self) -> bool {
        self.coordinator.is_complete()
    }

    /// The screen manager.
    pub fn manager(&self) -> &ScreenManager<V, G> {
        &self.manager
    }

    /// Mutable access to the screen manager.
    pub fn manager_mut(&mut self) -> &mut ScreenManager<V, G> {
        &mut self.manager
    }

    /// The init coordinator's status records.
    pub fn coordinator(&self) -> &InitCoordinator {
        &self.coordinator
    }
}
