#![forbid(unsafe_code)]

//! Runegate Runtime
//!
//! The state machines that keep exactly one screen on the player's display:
//! a transition guard with a watchdog, a screen manager that mediates every
//! activation, an init coordinator that brings subsystems up in priority
//! order without letting any single failure stall the boot, and a health
//! monitor that heals the "nothing is visible" state when some other code
//! path breaks it.
//!
//! # Key Components
//!
//! - [`TransitionGuard`] - the single owned transition state, exclusion
//!   enforced, self-clearing within a bounded time
//! - [`ScreenManager`] - `activate` / `go_back` / `active` /
//!   `emergency_restore` over the registry and a [`ViewBackend`]
//! - [`InitCoordinator`] - fixed-priority subsystem bring-up with retries
//!   and forced-active degradation
//! - [`HealthMonitor`] - periodic exactly-one-visible check
//! - [`FlowRuntime`] - the single owner wiring all of the above
//!
//! # Concurrency model
//! Single-threaded and cooperative. Every API that depends on time takes
//! `now: Instant` (with an `Instant::now()` convenience wrapper), so the
//! host's event loop drives all progress and tests drive virtual time.
//! Nothing here blocks, sleeps, or spawns.
//!
//! [`ViewBackend`]: runegate_core::ViewBackend

pub mod coordinator;
pub mod flow;
pub mod health;
pub mod manager;
#[cfg(feature = "state-persistence")]
pub mod prefs;
pub mod transition;

pub use coordinator::{
    CoordinatorConfig, CoordinatorEvent, InitCoordinator, StartOutcome, Subsystem, SubsystemState,
    SubsystemStatus,
};
pub use flow::{FlowConfig, FlowRuntime, FlowTick};
pub use health::{HealthConfig, HealthMonitor, HealthVerdict};
pub use manager::{ManagerConfig, ScreenManager};
#[cfg(feature = "state-persistence")]
pub use prefs::{PrefStore, PrefsError};
pub use transition::{TransitionConfig, TransitionGuard, TransitionTick};
