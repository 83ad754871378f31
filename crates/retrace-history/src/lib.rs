#![forbid(unsafe_code)]

//! Host undo manager for retrace.
//!
//! [`UndoManager`] is a ready-made [`HistoryStack`](retrace_core::HistoryStack):
//! bounded dual stacks, entry naming, localized menu titles and
//! per-target cleanup. Hosts that already own an undo stack can implement
//! the trait themselves and skip this crate.
//!
//! # Quick Start
//!
//! ```
//! use retrace_core::{Component, Tracked, perform_with_tracking};
//! use retrace_history::{HistoryConfig, UndoManager};
//!
//! fn toggle(flag: &Tracked<bool>) -> Component<Tracked<bool>> {
//!     Component::new(flag.clone(), |target, animation, register| {
//!         animation.run(|| target.update(|on| *on = !*on));
//!         register.register(toggle);
//!     })
//!     .named("Toggle")
//! }
//!
//! let manager = UndoManager::new(HistoryConfig::new(50));
//! let flag = Tracked::new(false);
//! perform_with_tracking(Some(&manager), || toggle(&flag));
//!
//! assert!(flag.get());
//! assert_eq!(manager.undo_menu_item_title(), "Undo Toggle");
//! manager.undo();
//! assert!(!flag.get());
//! assert_eq!(manager.redo_menu_item_title(), "Redo Toggle");
//! ```

pub mod config;
pub mod manager;

pub use config::{ConfigError, HistoryConfig};
pub use manager::{EntryInfo, Mode, UndoManager};
