#![forbid(unsafe_code)]

//! Fixed-priority subsystem bring-up.
//!
//! The coordinator signals each registered subsystem to start, in
//! registration order, and waits for an acknowledgement bounded by a
//! watchdog timeout. A subsystem that neither acknowledges nor fails within
//! the timeout is retried; after `max_attempts` it is forced to active
//! (degraded) so the sequence can proceed. No individual failure is fatal.
//!
//! # State machine (per subsystem)
//!
//! ```text
//! Pending ──start──▶ Pending (armed) ──ack──▶ Active
//!                         │
//!                      timeout
//!                         ▼
//!                      Failed ──retry──▶ ... ──attempts exhausted──▶ Active (forced)
//! ```
//!
//! # Ordering caveat
//!
//! Subsystems are *signaled* in priority order, but a timed-out subsystem
//! may still be working when the scan moves past it. Its late
//! acknowledgement is accepted if the subsystem is still retryable and
//! ignored if it was already forced active; it is never an error.
//!
//! # Termination
//!
//! Each poll either waits on an armed deadline or consumes one attempt, so
//! `all-active` is reached within `N * max_attempts` signal attempts for N
//! subsystems.

use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

/// What a subsystem did when signaled to start.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartOutcome {
    /// Started synchronously; counts as an immediate acknowledgement.
    Ready,
    /// Started asynchronously; will call back `acknowledge(name)`.
    Pending,
    /// Could not start; counts as a failed attempt.
    Failed,
}

/// A unit of initialization logic registered with the coordinator.
pub trait Subsystem {
    /// Name used for status tracking and acknowledgements.
    fn name(&self) -> &str;

    /// Begin starting up. Called once per attempt.
    fn start(&mut self) -> StartOutcome;
}

/// Lifecycle state of one registered subsystem.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubsystemState {
    /// Not yet signaled, or signaled and awaiting acknowledgement.
    Pending,
    /// The last attempt timed out or failed; retryable until the cap.
    Failed,
    /// Acknowledged, or forced after exhausting attempts.
    Active,
}

/// Status record for one subsystem. Created at coordinator startup and
/// kept for the life of the process.
#[derive(Debug, Clone)]
pub struct SubsystemStatus {
    /// Registered name.
    pub name: String,
    /// Current lifecycle state.
    pub state: SubsystemState,
    /// Start attempts consumed so far; never exceeds `max_attempts`.
    pub attempts: u32,
    /// True if the subsystem was degraded to active without acknowledging.
    pub forced: bool,
}

/// Retry and timeout parameters for the boot sequence.
#[derive(Debug, Clone)]
pub struct CoordinatorConfig {
    /// How long to wait for one attempt's acknowledgement. Default: 5s.
    pub attempt_timeout: Duration,
    /// Attempts per subsystem before forcing it active. Default: 3.
    pub max_attempts: u32,
}

impl Default for CoordinatorConfig {
    fn default() -> Self {
        Self {
            attempt_timeout: Duration::from_secs(5),
            max_attempts: 3,
        }
    }
}

/// One scheduling decision, reported per poll.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoordinatorEvent {
    /// A subsystem was signaled to start and a deadline was armed.
    Signaled { name: String, attempt: u32 },
    /// A subsystem acknowledged (synchronously or via `acknowledge`).
    Acknowledged { name: String },
    /// An armed deadline fired before the acknowledgement arrived.
    AttemptTimedOut { name: String, attempt: u32 },
    /// A subsystem reported failure when signaled.
    StartFailed { name: String, attempt: u32 },
    /// A subsystem exhausted its attempts and was degraded to active.
    ForcedActive { name: String },
    /// Every subsystem is now active; broadcast once.
    AllActive,
    /// An armed deadline has not fired yet; nothing to do.
    Waiting,
    /// The sequence already completed.
    Done,
}

#[derive(Debug, Clone, Copy)]
struct Inflight {
    index: usize,
    deadline: Instant,
}

/// Sequences subsystem startup, tolerating individual failures.
pub struct InitCoordinator {
    config: CoordinatorConfig,
    subsystems: Vec<Box<dyn Subsystem>>,
    status: Vec<SubsystemStatus>,
    inflight: Option<Inflight>,
    complete: bool,
}

impl InitCoordinator {
    /// An empty coordinator. Register subsystems before polling.
    pub fn new(config: CoordinatorConfig) -> Self {
        Self {
            config,
            subsystems: Vec::new(),
            status: Vec::new(),
            inflight: None,
            complete: false,
        }
    }

    /// Register a subsystem at the back of the priority order.
    pub fn register(&mut self, subsystem: Box<dyn Subsystem>) {
        self.status.push(SubsystemStatus {
            name: subsystem.name().to_string(),
            state: SubsystemState::Pending,
            attempts: 0,
            forced: false,
        });
        self.subsystems.push(subsystem);
    }

    /// Advance the boot sequence by one scheduling decision.
    pub fn poll_at(&mut self, now: Instant) -> CoordinatorEvent {
        if self.complete {
            return CoordinatorEvent::Done;
        }

        if let Some(inflight) = self.inflight {
            let index = inflight.index;
            if self.status[index].state == SubsystemState::Active {
                // Acknowledged between polls.
                self.inflight = None;
            } else if now >= inflight.deadline {
                let status = &mut self.status[index];
                status.state = SubsystemState::Failed;
                self.inflight = None;
                warn!(
                    subsystem = %status.name,
                    attempt = status.attempts,
                    "subsystem did not acknowledge before timeout"
                );
                return CoordinatorEvent::AttemptTimedOut {
                    name: self.status[index].name.clone(),
                    attempt: self.status[index].attempts,
                };
            } else {
                return CoordinatorEvent::Waiting;
            }
        }

        let Some(index) = self
            .status
            .iter()
            .position(|s| s.state != SubsystemState::Active)
        else {
            self.complete = true;
            info!("all subsystems active");
            return CoordinatorEvent::AllActive;
        };

        if self.status[index].attempts >= self.config.max_attempts {
            let status = &mut self.status[index];
            status.state = SubsystemState::Active;
            status.forced = true;
            warn!(
                subsystem = %status.name,
                attempts = status.attempts,
                "attempts exhausted; forcing subsystem active (degraded)"
            );
            return CoordinatorEvent::ForcedActive {
                name: self.status[index].name.clone(),
            };
        }

        self.status[index].attempts += 1;
        let attempt = self.status[index].attempts;
        let outcome = self.subsystems[index].start();
        let name = self.status[index].name.clone();
        match outcome {
            StartOutcome::Ready => {
                self.status[index].state = SubsystemState::Active;
                debug!(subsystem = %name, attempt, "subsystem started synchronously");
                CoordinatorEvent::Acknowledged { name }
            }
            StartOutcome::Pending => {
                self.status[index].state = SubsystemState::Pending;
                self.inflight = Some(Inflight {
                    index,
                    deadline: now + self.config.attempt_timeout,
                });
                debug!(subsystem = %name, attempt, "subsystem signaled; deadline armed");
                CoordinatorEvent::Signaled { name, attempt }
            }
            StartOutcome::Failed => {
                self.status[index].state = SubsystemState::Failed;
                warn!(subsystem = %name, attempt, "subsystem failed to start");
                CoordinatorEvent::StartFailed { name, attempt }
            }
        }
    }

    /// Record a subsystem's acknowledgement.
    ///
    /// Idempotent. Cancels the armed deadline at most once; a second
    /// acknowledgement, an acknowledgement for a forced-active subsystem,
    /// or an unknown name are all quiet no-ops. An acknowledgement from a
    /// subsystem that timed out but is still retryable is accepted: the
    /// work did finish, just late.
    pub fn acknowledge(&mut self, name: &str) -> bool {
        let Some(index) = self.status.iter().position(|s| s.name == name) else {
            debug!(subsystem = name, "acknowledge for unknown subsystem ignored");
            return false;
        };
        match self.status[index].state {
            SubsystemState::Active => {
                debug!(subsystem = name, "late acknowledge ignored; already active");
                false
            }
            SubsystemState::Pending | SubsystemState::Failed => {
                self.status[index].state = SubsystemState::Active;
                if self.inflight.is_some_and(|inflight| inflight.index == index) {
                    self.inflight = None;
                }
                debug!(subsystem = name, "subsystem acknowledged");
                true
            }
        }
    }

    /// True once every subsystem is active.
    pub fn is_complete(&self) -> bool {
        self.complete
    }

    /// Status records in priority order.
    pub fn statuses(&self) -> &[SubsystemStatus] {
        &self.status
    }

    /// Status record for one subsystem.
    pub fn status(&self, name: &str) -> Option<&SubsystemStatus> {
        self.status.iter().find(|s| s.name == name)
    }

    /// When the armed deadline (if any) will fire.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.inflight.as_ref().map(|i| i.deadline)
    }

    /// The configured retry parameters.
    pub fn config(&self) -> &CoordinatorConfig {
        &self.config
    }
}

impl std::fmt::Debug for InitCoordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InitCoordinator")
            .field("config", &self.config)
            .field("status", &self.status)
            .field("inflight", &self.inflight)
            .field("complete", &self.complete)
            .finish()
    }
}
