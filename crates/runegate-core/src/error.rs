#![forbid(unsafe_code)]

//! Error taxonomy for screen-flow operations.
//!
//! Failures are contained at component boundaries: operations return these
//! errors to their immediate caller, log, and leave state unchanged. Nothing
//! in the flow panics past its boundary, and coordinator-internal conditions
//! (attempt timeouts, late acknowledgements) are events rather than errors.

use std::fmt;

use crate::screen::ScreenId;

/// Errors surfaced by screen-flow operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScreenError {
    /// The requested screen id is not registered.
    UnknownScreen(ScreenId),
    /// A transition is still settling; re-entrant activation is rejected.
    TransitionInProgress {
        /// The screen that was active when the pending transition began.
        current: Option<ScreenId>,
    },
    /// The startup configuration listed the same screen twice.
    DuplicateScreen(ScreenId),
    /// The startup configuration listed no screens at all.
    EmptyRegistry,
}

impl fmt::Display for ScreenError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScreenError::UnknownScreen(id) => write!(f, "unknown screen {id:?}"),
            ScreenError::TransitionInProgress { current } => match current {
                Some(id) => write!(f, "transition already in progress (from {id})"),
                None => write!(f, "transition already in progress"),
            },
            ScreenError::DuplicateScreen(id) => {
                write!(f, "screen {id:?} registered more than once")
            }
            ScreenError::EmptyRegistry => write!(f, "screen registry configured empty"),
        }
    }
}

impl std::error::Error for ScreenError {}

/// Result type for screen-flow operations.
pub type ScreenResult<T> = Result<T, ScreenError>;
