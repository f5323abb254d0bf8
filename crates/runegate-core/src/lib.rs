#![forbid(unsafe_code)]

//! Runegate Core
//!
//! Data model and collaborator seams for the Runegate screen flow. This
//! crate is deliberately free of clocks, I/O, and presentation concerns:
//! it models screens as abstract `{id, visibility}` records and leaves
//! rendering to a [`ViewBackend`] implementation supplied by the host.
//!
//! # Key Components
//!
//! - [`ScreenId`] - cheap-to-clone screen identifier
//! - [`Screen`] / [`Visibility`] - abstract screen record
//! - [`ScreenRegistry`] - the ordered screen set with at-most-one-active
//! - [`ScreenError`] - error taxonomy for flow operations
//! - [`ViewBackend`] / [`GameHooks`] - seams to the presentation and
//!   game-state layers
//!
//! # Role in Runegate
//! `runegate-core` is consumed by `runegate-runtime`, which layers the
//! transition guard, init coordinator, and health monitor on top of the
//! registry defined here.

pub mod error;
pub mod registry;
pub mod screen;
pub mod view;

pub use error::{ScreenError, ScreenResult};
pub use registry::ScreenRegistry;
pub use screen::{Screen, ScreenId, Visibility};
pub use view::{GameHooks, HeadlessView, NoopHooks, ViewBackend};
