#![forbid(unsafe_code)]

//! Screen identity and visibility.
//!
//! A screen is a mutually-exclusive top-level view (rune selection, main
//! play, area selection, ...). The set of screens is fixed at startup from
//! a configuration list, so identifiers are strings rather than a closed
//! enum; `ScreenId` wraps an `Arc<str>` to keep clones cheap as ids travel
//! through transition records and logs.

use std::fmt;
use std::sync::Arc;

/// Identifier for a registered screen.
///
/// Ids compare by value and hash cheaply; cloning is a refcount bump.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ScreenId(Arc<str>);

impl ScreenId {
    /// Create an id from any string-ish value.
    pub fn new(id: impl Into<Arc<str>>) -> Self {
        Self(id.into())
    }

    /// The id as a plain string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ScreenId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Debug for ScreenId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ScreenId({:?})", &*self.0)
    }
}

impl From<&str> for ScreenId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for ScreenId {
    fn from(id: String) -> Self {
        Self::new(id)
    }
}

impl PartialEq<str> for ScreenId {
    fn eq(&self, other: &str) -> bool {
        self.as_str() == other
    }
}

impl PartialEq<&str> for ScreenId {
    fn eq(&self, other: &&str) -> bool {
        self.as_str() == *other
    }
}

/// Whether a screen is currently presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    /// Not presented.
    Hidden,
    /// The one screen the user is looking at.
    Active,
}

/// An abstract screen record, independent of any presentation layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Screen {
    /// Registered identifier.
    pub id: ScreenId,
    /// Current visibility state.
    pub visibility: Visibility,
}

impl Screen {
    /// A freshly registered, hidden screen.
    pub fn hidden(id: ScreenId) -> Self {
        Self {
            id,
            visibility: Visibility::Hidden,
        }
    }

    /// True if this screen is the active one.
    pub fn is_active(&self) -> bool {
        self.visibility == Visibility::Active
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn id_equality_is_by_value() {
        let a = ScreenId::new("game");
        let b = ScreenId::from("game");
        assert_eq!(a, b);
        assert_eq!(a, "game");
    }

    #[test]
    fn id_clone_is_cheap_and_equal() {
        let a = ScreenId::new(String::from("areaSelect"));
        let b = a.clone();
        assert_eq!(a, b);
        assert_eq!(b.as_str(), "areaSelect");
    }

    #[test]
    fn display_is_bare_id() {
        assert_eq!(ScreenId::new("battle").to_string(), "battle");
    }

    #[test]
    fn new_screen_starts_hidden() {
        let screen = Screen::hidden(ScreenId::new("game"));
        assert!(!screen.is_active());
        assert_eq!(screen.visibility, Visibility::Hidden);
    }
}
