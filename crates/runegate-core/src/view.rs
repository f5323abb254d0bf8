#![forbid(unsafe_code)]

//! Collaborator seams to the presentation and game-state layers.
//!
//! The flow never manipulates presentation directly. All visibility changes
//! go through a [`ViewBackend`], and the one game-state question the flow
//! asks (is a character already in play?) goes through [`GameHooks`]. The
//! host registers concrete implementations once at startup; there is no
//! global function table to override and no wrap-the-previous-version
//! chain.
//!
//! [`HeadlessView`] is the in-memory backend used by tests and the demo.
//! Its `force_hide` hook simulates the failure this flow exists to survive:
//! some other code path hiding the active screen behind the manager's back.

use std::collections::BTreeSet;

use crate::screen::ScreenId;

/// The presentation layer, as seen by the flow.
pub trait ViewBackend {
    /// Show or hide one screen's presentation.
    fn set_screen_visible(&mut self, id: &ScreenId, visible: bool);

    /// Screens the presentation layer is actually showing right now.
    ///
    /// This is the ground truth the health monitor compares against the
    /// registry's notion of the active screen.
    fn visible_screens(&self) -> Vec<ScreenId>;
}

/// Read-only game-state queries and post-activation side effects.
pub trait GameHooks {
    /// True once the player has a character in play ("game started").
    fn has_active_character(&self) -> bool;

    /// Invoked after the main play screen becomes active.
    fn enter_default_area(&mut self) {}
}

/// Inert hooks: no character, no side effects.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopHooks;

impl GameHooks for NoopHooks {
    fn has_active_character(&self) -> bool {
        false
    }
}

/// In-memory view backend that records visibility.
#[derive(Debug, Default, Clone)]
pub struct HeadlessView {
    visible: BTreeSet<ScreenId>,
    set_calls: u64,
}

impl HeadlessView {
    /// A backend with nothing visible.
    pub fn new() -> Self {
        Self::default()
    }

    /// True if the backend is currently showing `id`.
    pub fn is_visible(&self, id: &ScreenId) -> bool {
        self.visible.contains(id)
    }

    /// Hide a screen without telling anyone, as a competing patch would.
    pub fn force_hide(&mut self, id: &ScreenId) {
        self.visible.remove(id);
    }

    /// Total `set_screen_visible` calls observed.
    pub fn set_calls(&self) -> u64 {
        self.set_calls
    }
}

impl ViewBackend for HeadlessView {
    fn set_screen_visible(&mut self, id: &ScreenId, visible: bool) {
        self.set_calls += 1;
        if visible {
            self.visible.insert(id.clone());
        } else {
            self.visible.remove(id);
        }
    }

    fn visible_screens(&self) -> Vec<ScreenId> {
        self.visible.iter().cloned().collect()
    }
}
