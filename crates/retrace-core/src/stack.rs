#![forbid(unsafe_code)]

//! Host history-stack contract.
//!
//! The core never stores history itself. It talks to a host stack through
//! [`HistoryStack`], which records inverse callbacks and replays them on
//! undo/redo.
//!
//! # Re-entrancy
//!
//! Running an inverse re-enters the runner, which registers the inverse of
//! the inverse on the same stack. All methods therefore take `&self`;
//! implementations keep their state behind `Cell`/`RefCell` and must not
//! hold a borrow while an [`Inverse`] runs.
//!
//! # Ownership
//!
//! An [`Inverse`] receives the stack that runs it, so registered callbacks
//! never capture the stack and no reference cycle is formed between the
//! stack and its entries.

use crate::name::ActionName;
use crate::target::TargetId;

/// A recorded inverse: runs once, against the stack that triggered it.
pub type Inverse = Box<dyn FnOnce(&dyn HistoryStack)>;

/// An undo/redo history that the tracking runner records into.
pub trait HistoryStack {
    /// Record `inverse` to run on the next undo (or redo, while undoing).
    ///
    /// The most recently registered inverse runs first.
    fn register_inverse(&self, target: TargetId, inverse: Inverse);

    /// Label the operation being recorded, for menu titles.
    fn set_action_name(&self, name: &str);

    /// Whether an entry is available to undo.
    fn can_undo(&self) -> bool;

    /// Whether an entry is available to redo.
    fn can_redo(&self) -> bool;

    /// Run the most recent undo entry. Returns `true` if an entry ran.
    fn undo(&self) -> bool;

    /// Run the most recent redo entry. Returns `true` if an entry ran.
    fn redo(&self) -> bool;

    /// Resolve an action name to display text in the current locale.
    ///
    /// The default renders the name's fallback text.
    fn localize(&self, name: &ActionName) -> String {
        name.fallback_text()
    }
}
