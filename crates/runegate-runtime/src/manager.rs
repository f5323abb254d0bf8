#![forbid(unsafe_code)]

//! The screen manager: sole writer of the active screen.
//!
//! Every visibility change in the flow goes through this type. It owns the
//! registry and the transition guard, talks to the presentation layer only
//! through [`ViewBackend`], and contains its failures: operations return
//! [`ScreenError`] to the caller, log, and leave state unchanged. Nothing
//! panics past this boundary.
//!
//! # Ordering invariant
//!
//! Activation shows the target before hiding the rest, in both the registry
//! and the view. The user can momentarily see two screens during the call;
//! they can never see zero.
//!
//! # Invariants
//!
//! - After any completed `activate`, exactly one screen is active.
//! - `emergency_restore` is idempotent: with no state change in between,
//!   repeated calls return the same screen.

use std::time::Instant;

use runegate_core::{GameHooks, ScreenError, ScreenId, ScreenRegistry, ViewBackend};
use tracing::{debug, error, info, warn};

use crate::transition::{TransitionConfig, TransitionGuard, TransitionTick};

/// Screen roles and transition timing for the manager.
#[derive(Debug, Clone)]
pub struct ManagerConfig {
    /// Fallback target for `go_back` when there is no history.
    pub default_screen: ScreenId,
    /// The main play screen; restored when a character is already in play,
    /// and the trigger for the `enter_default_area` side effect.
    pub play_screen: ScreenId,
    /// The initial selection screen; restored when no character exists yet.
    pub select_screen: ScreenId,
    /// Transition timing.
    pub transition: TransitionConfig,
}

impl ManagerConfig {
    /// Config with default transition timing.
    pub fn new(
        default_screen: impl Into<ScreenId>,
        play_screen: impl Into<ScreenId>,
        select_screen: impl Into<ScreenId>,
    ) -> Self {
        Self {
            default_screen: default_screen.into(),
            play_screen: play_screen.into(),
            select_screen: select_screen.into(),
            transition: TransitionConfig::default(),
        }
    }
}

/// Guarantees exactly one screen is presented and mediates all transitions.
#[derive(Debug)]
pub struct ScreenManager<V: ViewBackend, G: GameHooks> {
    registry: ScreenRegistry,
    guard: TransitionGuard,
    view: V,
    hooks: G,
    config: ManagerConfig,
}

impl<V: ViewBackend, G: GameHooks> ScreenManager<V, G> {
    /// Build a manager over a registry and its collaborators.
    ///
    /// Fails if the configured default screen is not registered; the other
    /// configured roles may be absent (the restore rule falls through).
    pub fn new(
        registry: ScreenRegistry,
        view: V,
        hooks: G,
        config: ManagerConfig,
    ) -> Result<Self, ScreenError> {
        if !registry.contains(config.default_screen.as_str()) {
            return Err(ScreenError::UnknownScreen(config.default_screen.clone()));
        }
        let guard = TransitionGuard::new(config.transition.clone());
        Ok(Self {
            registry,
            guard,
            view,
            hooks,
            config,
        })
    }

    /// Make `id` the active screen.
    ///
    /// Fails with [`ScreenError::UnknownScreen`] for unregistered ids and
    /// [`ScreenError::TransitionInProgress`] while an earlier transition is
    /// settling; both leave state untouched. Re-activating the current
    /// screen succeeds without starting a transition.
    pub fn activate_at(&mut self, id: &str, now: Instant) -> Result<(), ScreenError> {
        let target = match self.registry.get(id) {
            Some(screen) => screen.id.clone(),
            None => {
                warn!(screen = id, "activation rejected: unknown screen");
                return Err(ScreenError::UnknownScreen(ScreenId::new(id)));
            }
        };
        if self.guard.in_progress_at(now) {
            debug!(screen = id, "activation rejected: transition in progress");
            return Err(ScreenError::TransitionInProgress {
                current: self.active(),
            });
        }
        if self.registry.active().is_some_and(|s| s.id == target) {
            debug!(screen = id, "screen already active; nothing to do");
            return Ok(());
        }

        let previous = self.registry.activate_only(target.as_str())?;

        // Target first, then the rest: never a zero-visible window.
        self.view.set_screen_visible(&target, true);
        let others: Vec<ScreenId> = self
            .registry
            .ids()
            .filter(|other| **other != target)
            .cloned()
            .collect();
        for other in &others {
            self.view.set_screen_visible(other, false);
        }

        self.guard.begin_at(previous.clone(), now)?;

        if target == self.config.play_screen {
            self.hooks.enter_default_area();
        }
        info!(screen = %target, previous = ?previous.as_ref().map(ScreenId::as_str), "screen activated");
        Ok(())
    }

    /// Convenience wrapper over [`ScreenManager::activate_at`].
    pub fn activate(&mut self, id: &str) -> Result<(), ScreenError> {
        self.activate_at(id, Instant::now())
    }

    /// Return to the previously active screen, or the configured default
    /// when there is no usable history.
    pub fn go_back_at(&mut self, now: Instant) -> Result<ScreenId, ScreenError> {
        let target = self
            .guard
            .last_active()
            .filter(|id| self.registry.contains(id.as_str()))
            .cloned()
            .unwrap_or_else(|| self.config.default_screen.clone());
        self.activate_at(target.as_str(), now)?;
        Ok(target)
    }

    /// Convenience wrapper over [`ScreenManager::go_back_at`].
    pub fn go_back(&mut self) -> Result<ScreenId, ScreenError> {
        self.go_back_at(Instant::now())
    }

    /// The single active screen, or `None`.
    pub fn active(&self) -> Option<ScreenId> {
        self.registry.active().map(|s| s.id.clone())
    }

    /// Restore a visible screen when none is active.
    ///
    /// Decision rule: if a screen is already active, re-assert it on the
    /// view and return it (idempotent). Otherwise restore the play screen
    /// when a character is in play, else the initial selection screen, else
    /// the first registered screen as a last resort. Restoration is
    /// instantaneous (no settle window) and safe to call repeatedly.
    pub fn emergency_restore(&mut self) -> ScreenId {
        if let Some(active) = self.registry.active().map(|s| s.id.clone()) {
            self.view.set_screen_visible(&active, true);
            debug!(screen = %active, "emergency restore: active screen re-asserted");
            return active;
        }

        let target = if self.hooks.has_active_character()
            && self.registry.contains(self.config.play_screen.as_str())
        {
            self.config.play_screen.clone()
        } else if self.registry.contains(self.config.select_screen.as_str()) {
            self.config.select_screen.clone()
        } else {
            self.registry.first_id()
        };

        warn!(screen = %target, "no screen active; emergency restore");
        self.guard.clear();
        if let Err(err) = self.registry.activate_only(target.as_str()) {
            // Unreachable: every branch above checks registration.
            error!(%err, "emergency restore target vanished");
            return target;
        }
        self.view.set_screen_visible(&target, true);
        let others: Vec<ScreenId> = self
            .registry
            .ids()
            .filter(|other| **other != target)
            .cloned()
            .collect();
        for other in &others {
            self.view.set_screen_visible(other, false);
        }
        if target == self.config.play_screen {
            self.hooks.enter_default_area();
        }
        target
    }

    /// Advance the transition guard.
    pub fn tick_at(&mut self, now: Instant) -> TransitionTick {
        self.guard.tick_at(now)
    }

    /// True while a transition is settling.
    pub fn transition_in_progress_at(&self, now: Instant) -> bool {
        self.guard.in_progress_at(now)
    }

    /// True when the active screen exists and the view is showing it.
    pub fn is_presented(&self) -> bool {
        match self.registry.active() {
            Some(screen) => self
                .view
                .visible_screens()
                .iter()
                .any(|visible| *visible == screen.id),
            None => false,
        }
    }

    /// The registered screens.
    pub fn registry(&self) -> &ScreenRegistry {
        &self.registry
    }

    /// The presentation backend.
    pub fn view(&self) -> &V {
        &self.view
    }

    /// Mutable access to the presentation backend.
    pub fn view_mut(&mut self) -> &mut V {
        &mut self.view
    }

    /// The game-state hooks.
    pub fn hooks(&self) -> &G {
        &self.hooks
    }

    /// Mutable access to the game-state hooks.
    pub fn hooks_mut(&mut self) -> &mut G {
        &mut self.hooks
    }
}
