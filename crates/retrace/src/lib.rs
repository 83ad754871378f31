#![forbid(unsafe_code)]

//! retrace public facade crate.
//!
//! Re-exports the component model, the tracking runner, the undo manager
//! and the string catalog, plus a prelude for day-to-day usage.
//!
//! ```
//! use retrace::prelude::*;
//!
//! fn increment(counter: &Tracked<i64>) -> Component<Tracked<i64>> {
//!     Component::new(counter.clone(), |target, animation, register| {
//!         animation.run(|| target.update(|n| *n += 1));
//!         register.register(decrement);
//!     })
//!     .named("Increment")
//! }
//!
//! fn decrement(counter: &Tracked<i64>) -> Component<Tracked<i64>> {
//!     Component::new(counter.clone(), |target, animation, register| {
//!         animation.run(|| target.update(|n| *n -= 1));
//!         register.register(increment);
//!     })
//!     .named("Decrement")
//! }
//!
//! let manager = UndoManager::default();
//! let counter = Tracked::new(0);
//! perform_with_tracking(Some(&manager), || increment(&counter));
//! assert_eq!(counter.get(), 1);
//!
//! manager.undo();
//! assert_eq!(counter.get(), 0);
//! // The redo entry keeps the name of the operation that was undone.
//! assert_eq!(manager.redo_menu_item_title(), "Redo Increment");
//! ```

// --- Core re-exports -------------------------------------------------------

pub use retrace_core::{
    Action, ActionName, Animation, Component, Field, HistoryStack, Identifiable, Immediate,
    Inverse, LocalizedName, RegisterUndo, TargetId, Tracked, Transition, UndoTarget, UndoTracker,
    perform_with_tracking, whole,
};

// --- History re-exports ----------------------------------------------------

pub use retrace_history::{ConfigError, EntryInfo, HistoryConfig, Mode, UndoManager};

// --- I18n re-exports -------------------------------------------------------

pub use retrace_i18n::{I18nError, LocaleStrings, StringCatalog};

// --- Prelude --------------------------------------------------------------

pub mod prelude {
    pub use crate::{
        ActionName, Animation, Component, HistoryConfig, HistoryStack, LocalizedName,
        RegisterUndo, Tracked, UndoManager, UndoTarget, UndoTracker, perform_with_tracking, whole,
    };

    pub use crate::{core, history, i18n};
}

pub use retrace_core as core;
pub use retrace_history as history;
pub use retrace_i18n as i18n;
