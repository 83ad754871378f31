#![forbid(unsafe_code)]

//! retrace core: declarative undo/redo components.
//!
//! Callers describe a forward mutation and, inline, the inverse that
//! reverses it. The runner performs the mutation and records the inverse on
//! a host history stack; when the host undoes the entry, the inverse runs
//! through the same runner and records its own inverse, which becomes the
//! redo entry.
//!
//! # Key Components
//!
//! - [`Component`] - target + action + optional name + animate flag
//! - [`UndoTracker`] / [`perform_with_tracking`] - the tracking runner
//! - [`RegisterUndo`] - capability an action uses to register its inverse
//! - [`HistoryStack`] - contract for the host undo/redo stack
//! - [`Transition`] / [`Animation`] - optional transition scope for mutations
//! - [`Tracked`] - shared handle for targets, with ready-made mutators
//!
//! # Role in retrace
//! This crate owns the composition and inverse-registration protocol and
//! nothing else. History storage lives in `retrace-history`, display-string
//! localization in `retrace-i18n`.
//!
//! # Threading
//! Everything here is single-threaded (`Rc`/`RefCell`); components, targets
//! and trackers are neither `Send` nor `Sync`.

pub mod component;
pub mod mutators;
pub mod name;
pub mod runner;
pub mod stack;
pub mod target;
pub mod transition;

pub use component::{Action, Component};
pub use mutators::{Field, Identifiable, whole};
pub use name::{ActionName, LocalizedName};
pub use runner::{RegisterUndo, UndoTracker, perform_with_tracking};
pub use stack::{HistoryStack, Inverse};
pub use target::{TargetId, Tracked, UndoTarget};
pub use transition::{Animation, Immediate, Transition};
