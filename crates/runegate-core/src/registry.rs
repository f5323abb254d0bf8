#![forbid(unsafe_code)]

//! The ordered screen set.
//!
//! The registry is built once at startup from a configuration list and then
//! mutated only through [`ScreenRegistry::activate_only`] and
//! [`ScreenRegistry::hide_all`]. It maintains the central invariant of the
//! flow: **at most one screen is active at any observable point**, and a
//! completed activation leaves exactly one.
//!
//! `activate_only` marks the target active *before* hiding the others, so a
//! reader interleaved mid-operation can observe two active screens for the
//! duration of the call but never zero. The stricter direction matters: a
//! zero-active window is what leaves the user with a blank view.

use crate::error::{ScreenError, ScreenResult};
use crate::screen::{Screen, ScreenId, Visibility};

/// Ordered collection of registered screens, at most one active.
#[derive(Debug, Clone)]
pub struct ScreenRegistry {
    screens: Vec<Screen>,
}

impl ScreenRegistry {
    /// Build a registry from the startup configuration list.
    ///
    /// Order is preserved; the first entry doubles as the last-resort
    /// restore target. Fails on duplicates or an empty list.
    pub fn from_ids<I, T>(ids: I) -> ScreenResult<Self>
    where
        I: IntoIterator<Item = T>,
        T: Into<ScreenId>,
    {
        let mut screens: Vec<Screen> = Vec::new();
        for id in ids {
            let id = id.into();
            if screens.iter().any(|s| s.id == id) {
                return Err(ScreenError::DuplicateScreen(id));
            }
            screens.push(Screen::hidden(id));
        }
        if screens.is_empty() {
            return Err(ScreenError::EmptyRegistry);
        }
        Ok(Self { screens })
    }

    /// True if `id` names a registered screen.
    pub fn contains(&self, id: &str) -> bool {
        self.screens.iter().any(|s| s.id == *id)
    }

    /// Look up a screen by id.
    pub fn get(&self, id: &str) -> Option<&Screen> {
        self.screens.iter().find(|s| s.id == *id)
    }

    /// The single active screen, if any.
    pub fn active(&self) -> Option<&Screen> {
        self.screens.iter().find(|s| s.is_active())
    }

    /// Make `id` the only active screen.
    ///
    /// The target is marked active first, then every other screen is
    /// hidden. Returns the previously active id (if it was a different
    /// screen) so the caller can record it for back-navigation.
    pub fn activate_only(&mut self, id: &str) -> ScreenResult<Option<ScreenId>> {
        if !self.contains(id) {
            return Err(ScreenError::UnknownScreen(ScreenId::new(id)));
        }
        let previous = self
            .active()
            .filter(|s| s.id != *id)
            .map(|s| s.id.clone());

        for screen in &mut self.screens {
            if screen.id == *id {
                screen.visibility = Visibility::Active;
            }
        }
        for screen in &mut self.screens {
            if screen.id != *id {
                screen.visibility = Visibility::Hidden;
            }
        }
        Ok(previous)
    }

    /// Hide every screen. Used only by recovery paths that are about to
    /// re-assert a known-good active screen.
    pub fn hide_all(&mut self) {
        for screen in &mut self.screens {
            screen.visibility = Visibility::Hidden;
        }
    }

    /// The first registered screen (last-resort restore target).
    pub fn first_id(&self) -> ScreenId {
        self.screens[0].id.clone()
    }

    /// Registered ids in configuration order.
    pub fn ids(&self) -> impl Iterator<Item = &ScreenId> {
        self.screens.iter().map(|s| &s.id)
    }

    /// Number of registered screens.
    pub fn len(&self) -> usize {
        self.screens.len()
    }

    /// Always false: construction rejects empty configurations.
    pub fn is_empty(&self) -> bool {
        self.screens.is_empty()
    }

    /// Number of screens currently marked active (0 or 1 in steady state).
    pub fn active_count(&self) -> usize {
        self.screens.iter().filter(|s| s.is_active()).count()
    }
}
