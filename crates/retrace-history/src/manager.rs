#![forbid(unsafe_code)]

//! In-process undo manager.
//!
//! [`UndoManager`] keeps dual stacks of recorded inverses and implements
//! [`HistoryStack`], so the tracking runner can record into it directly.
//!
//! # Recording rules
//!
//! Where a registered inverse lands depends on what the manager is doing:
//!
//! | mode      | `register_inverse` pushes onto | redo stack |
//! |-----------|--------------------------------|------------|
//! | idle      | undo stack                     | cleared    |
//! | undoing   | redo stack                     | kept       |
//! | redoing   | undo stack                     | kept       |
//!
//! ```text
//! perform(op)                 undo: [op⁻¹]        redo: []
//! undo()  runs op⁻¹ ──►       undo: []            redo: [op]
//! redo()  runs op   ──►       undo: [op⁻¹]        redo: []
//! perform(op2)  <-- idle, clears redo
//! ```
//!
//! # Invariants
//!
//! 1. Each stack holds at most `config.max_depth` entries (after any operation).
//! 2. The most recently registered entry runs first (LIFO).
//! 3. A registration in idle mode clears the redo stack.
//! 4. The manager never holds a `RefCell` borrow while an inverse runs.
//! 5. The mode is restored after an inverse runs, even if it panics.
//!
//! # Naming
//!
//! [`set_action_name`](HistoryStack::set_action_name) labels the most
//! recently recorded entry of the stack the current mode writes to: the redo
//! stack while undoing, the undo stack otherwise. The runner calls it right
//! after a named action registers, so a name never outlives its operation.
//! Entries start unnamed; while registration is disabled naming is ignored.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::fmt;

use retrace_core::{ActionName, HistoryStack, Inverse, TargetId};
use retrace_i18n::{StringCatalog, keys};
use tracing::{debug, trace, warn};
use web_time::Instant;

use crate::config::HistoryConfig;

/// What the manager is currently doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// Not running an entry; registrations start a new branch.
    #[default]
    Idle,
    /// Running an undo entry; registrations become redo entries.
    Undoing,
    /// Running a redo entry; registrations become undo entries.
    Redoing,
}

struct Entry {
    target: TargetId,
    inverse: Inverse,
    action_name: String,
    recorded_at: Instant,
}

impl Entry {
    fn info(&self) -> EntryInfo {
        EntryInfo {
            action_name: self.action_name.clone(),
            target: self.target,
            recorded_at: self.recorded_at,
        }
    }
}

/// Snapshot of a recorded entry, for history panels and debugging.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryInfo {
    /// Display name (empty when unnamed).
    pub action_name: String,
    /// Target the entry was registered against.
    pub target: TargetId,
    /// When the entry was registered.
    pub recorded_at: Instant,
}

/// Restores the previous mode when dropped.
struct ModeGuard<'a> {
    mode: &'a Cell<Mode>,
    previous: Mode,
}

impl<'a> ModeGuard<'a> {
    fn enter(mode: &'a Cell<Mode>, next: Mode) -> Self {
        let previous = mode.replace(next);
        Self { mode, previous }
    }
}

impl Drop for ModeGuard<'_> {
    fn drop(&mut self) {
        self.mode.set(self.previous);
    }
}

/// Undo/redo history that records inverses from the tracking runner.
///
/// All operations take `&self`: running an entry re-enters the manager to
/// record the opposite entry.
pub struct UndoManager {
    /// Entries available for undo (newest at back).
    undo_stack: RefCell<VecDeque<Entry>>,
    /// Entries available for redo (newest at back).
    redo_stack: RefCell<VecDeque<Entry>>,
    config: HistoryConfig,
    catalog: StringCatalog,
    mode: Cell<Mode>,
    /// Nesting depth of `disable_registration` calls.
    disabled: Cell<u32>,
}

impl fmt::Debug for UndoManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UndoManager")
            .field("undo_depth", &self.undo_depth())
            .field("redo_depth", &self.redo_depth())
            .field("mode", &self.mode.get())
            .field("config", &self.config)
            .finish()
    }
}

impl Default for UndoManager {
    fn default() -> Self {
        Self::new(HistoryConfig::default())
    }
}

impl UndoManager {
    /// Create a manager with the English menu templates.
    #[must_use]
    pub fn new(config: HistoryConfig) -> Self {
        Self {
            undo_stack: RefCell::new(VecDeque::new()),
            redo_stack: RefCell::new(VecDeque::new()),
            config,
            catalog: StringCatalog::with_defaults(),
            mode: Cell::new(Mode::Idle),
            disabled: Cell::new(0),
        }
    }

    /// Replace the catalog used for names and menu titles.
    #[must_use]
    pub fn with_catalog(mut self, catalog: StringCatalog) -> Self {
        self.catalog = catalog;
        self
    }

    /// The current configuration.
    #[must_use]
    pub fn config(&self) -> &HistoryConfig {
        &self.config
    }

    /// The localization catalog.
    #[must_use]
    pub fn catalog(&self) -> &StringCatalog {
        &self.catalog
    }

    // ========================================================================
    // Core Operations
    // ========================================================================

    /// Undo the most recent entry. Returns `true` if an entry ran.
    pub fn undo(&self) -> bool {
        <Self as HistoryStack>::undo(self)
    }

    /// Redo the most recently undone entry. Returns `true` if an entry ran.
    pub fn redo(&self) -> bool {
        <Self as HistoryStack>::redo(self)
    }

    /// Check if undo is available.
    #[must_use]
    pub fn can_undo(&self) -> bool {
        !self.undo_stack.borrow().is_empty()
    }

    /// Check if redo is available.
    #[must_use]
    pub fn can_redo(&self) -> bool {
        !self.redo_stack.borrow().is_empty()
    }

    /// Label the most recently completed operation.
    pub fn set_action_name(&self, name: &str) {
        <Self as HistoryStack>::set_action_name(self, name);
    }

    /// Rename the entry on top of the undo stack.
    ///
    /// Returns `false` when the undo stack is empty.
    pub fn rename_top(&self, name: &str) -> bool {
        match self.undo_stack.borrow_mut().back_mut() {
            Some(entry) => {
                entry.action_name = name.to_owned();
                true
            }
            None => false,
        }
    }

    /// The mode the manager is in.
    #[must_use]
    pub fn mode(&self) -> Mode {
        self.mode.get()
    }

    /// Whether an undo entry is running.
    #[must_use]
    pub fn is_undoing(&self) -> bool {
        self.mode.get() == Mode::Undoing
    }

    /// Whether a redo entry is running.
    #[must_use]
    pub fn is_redoing(&self) -> bool {
        self.mode.get() == Mode::Redoing
    }

    // ========================================================================
    // Registration control
    // ========================================================================

    /// Ignore registrations until a matching [`enable_registration`](Self::enable_registration).
    ///
    /// Calls nest.
    pub fn disable_registration(&self) {
        self.disabled.set(self.disabled.get().saturating_add(1));
    }

    /// Undo one [`disable_registration`](Self::disable_registration).
    pub fn enable_registration(&self) {
        self.disabled.set(self.disabled.get().saturating_sub(1));
    }

    /// Whether registrations are currently recorded.
    #[must_use]
    pub fn is_registration_enabled(&self) -> bool {
        self.disabled.get() == 0
    }

    // ========================================================================
    // Info
    // ========================================================================

    /// Get the undo stack depth.
    #[must_use]
    pub fn undo_depth(&self) -> usize {
        self.undo_stack.borrow().len()
    }

    /// Get the redo stack depth.
    #[must_use]
    pub fn redo_depth(&self) -> usize {
        self.redo_stack.borrow().len()
    }

    /// Name of the next undo entry.
    #[must_use]
    pub fn undo_action_name(&self) -> Option<String> {
        self.undo_stack
            .borrow()
            .back()
            .map(|e| e.action_name.clone())
    }

    /// Name of the next redo entry.
    #[must_use]
    pub fn redo_action_name(&self) -> Option<String> {
        self.redo_stack
            .borrow()
            .back()
            .map(|e| e.action_name.clone())
    }

    /// Title for an "Undo" menu item, e.g. `"Undo Increment"`.
    ///
    /// Falls back to the bare verb when the next entry is unnamed or there
    /// is nothing to undo.
    #[must_use]
    pub fn undo_menu_item_title(&self) -> String {
        let name = self.undo_action_name().unwrap_or_default();
        self.menu_title(keys::UNDO_MENU, keys::UNDO_MENU_BARE, "Undo", &name)
    }

    /// Title for a "Redo" menu item, e.g. `"Redo Increment"`.
    #[must_use]
    pub fn redo_menu_item_title(&self) -> String {
        let name = self.redo_action_name().unwrap_or_default();
        self.menu_title(keys::REDO_MENU, keys::REDO_MENU_BARE, "Redo", &name)
    }

    /// Get names for undo entries (most recent first).
    #[must_use]
    pub fn undo_descriptions(&self, limit: usize) -> Vec<String> {
        Self::descriptions(&self.undo_stack.borrow(), limit)
    }

    /// Get names for redo entries (most recent first).
    #[must_use]
    pub fn redo_descriptions(&self, limit: usize) -> Vec<String> {
        Self::descriptions(&self.redo_stack.borrow(), limit)
    }

    /// Snapshots of the undo entries (most recent first).
    #[must_use]
    pub fn undo_entries(&self) -> Vec<EntryInfo> {
        self.undo_stack.borrow().iter().rev().map(Entry::info).collect()
    }

    /// Snapshots of the redo entries (most recent first).
    #[must_use]
    pub fn redo_entries(&self) -> Vec<EntryInfo> {
        self.redo_stack.borrow().iter().rev().map(Entry::info).collect()
    }

    // ========================================================================
    // Maintenance
    // ========================================================================

    /// Remove every entry registered against `target`.
    ///
    /// Returns the number of entries removed.
    pub fn remove_all_actions(&self, target: TargetId) -> usize {
        // Collect first so dropped entries never run under a borrow.
        let mut removed = Vec::new();
        for stack in [&self.undo_stack, &self.redo_stack] {
            let mut stack = stack.borrow_mut();
            let mut kept = VecDeque::with_capacity(stack.len());
            for entry in stack.drain(..) {
                if entry.target == target {
                    removed.push(entry);
                } else {
                    kept.push_back(entry);
                }
            }
            *stack = kept;
        }
        debug!(
            target_id = target.raw(),
            removed = removed.len(),
            "undo.manager.remove_all_actions"
        );
        removed.len()
    }

    /// Clear all history (both undo and redo).
    pub fn clear(&self) {
        let undo = std::mem::take(&mut *self.undo_stack.borrow_mut());
        let redo = std::mem::take(&mut *self.redo_stack.borrow_mut());
        debug!(undo = undo.len(), redo = redo.len(), "undo.manager.clear");
    }

    fn descriptions(stack: &VecDeque<Entry>, limit: usize) -> Vec<String> {
        stack
            .iter()
            .rev()
            .take(limit)
            .map(|e| e.action_name.clone())
            .collect()
    }

    fn menu_title(&self, key: &str, bare_key: &str, verb: &str, name: &str) -> String {
        let locale = &self.config.locale;
        if name.is_empty() {
            return self
                .catalog
                .get(locale, bare_key)
                .unwrap_or(verb)
                .to_owned();
        }
        self.catalog
            .format(locale, key, &[("action", name)])
            .unwrap_or_else(|| format!("{verb} {name}"))
    }

    /// Push onto one stack, evicting the oldest entries past `max_depth`.
    fn push_bounded(&self, stack: &RefCell<VecDeque<Entry>>, entry: Entry) {
        let evicted = {
            let mut stack = stack.borrow_mut();
            stack.push_back(entry);
            let excess = stack.len().saturating_sub(self.config.max_depth);
            stack.drain(..excess).collect::<Vec<_>>()
        };
        if !evicted.is_empty() {
            trace!(evicted = evicted.len(), max_depth = self.config.max_depth, "undo.manager.evict");
        }
    }

    /// Pop and run the newest entry of `from` in `mode`.
    fn run_top(&self, from: &RefCell<VecDeque<Entry>>, mode: Mode) -> bool {
        if self.mode.get() != Mode::Idle {
            warn!(
                current = ?self.mode.get(),
                requested = ?mode,
                "undo.manager: ignoring re-entrant undo/redo"
            );
            return false;
        }
        let Some(entry) = from.borrow_mut().pop_back() else {
            return false;
        };

        debug!(
            mode = ?mode,
            target_id = entry.target.raw(),
            name = %entry.action_name,
            "undo.manager.run"
        );
        let _guard = ModeGuard::enter(&self.mode, mode);
        (entry.inverse)(self);
        true
    }
}

impl HistoryStack for UndoManager {
    fn register_inverse(&self, target: TargetId, inverse: Inverse) {
        if !self.is_registration_enabled() {
            debug!(target_id = target.raw(), "undo.manager.register skipped: disabled");
            return;
        }

        let entry = Entry {
            target,
            inverse,
            action_name: String::new(),
            recorded_at: Instant::now(),
        };
        let mode = self.mode.get();
        match mode {
            Mode::Undoing => self.push_bounded(&self.redo_stack, entry),
            Mode::Redoing => self.push_bounded(&self.undo_stack, entry),
            Mode::Idle => {
                // New branch: forget the redo history.
                let dropped = std::mem::take(&mut *self.redo_stack.borrow_mut());
                drop(dropped);
                self.push_bounded(&self.undo_stack, entry);
            }
        }

        debug!(
            target_id = target.raw(),
            mode = ?mode,
            undo_depth = self.undo_depth(),
            redo_depth = self.redo_depth(),
            "undo.manager.register"
        );
    }

    fn set_action_name(&self, name: &str) {
        if !self.is_registration_enabled() {
            return;
        }
        let stack = match self.mode.get() {
            Mode::Undoing => &self.redo_stack,
            Mode::Idle | Mode::Redoing => &self.undo_stack,
        };
        if let Some(entry) = stack.borrow_mut().back_mut() {
            entry.action_name = name.to_owned();
        }
    }

    fn can_undo(&self) -> bool {
        UndoManager::can_undo(self)
    }

    fn can_redo(&self) -> bool {
        UndoManager::can_redo(self)
    }

    fn undo(&self) -> bool {
        self.run_top(&self.undo_stack, Mode::Undoing)
    }

    fn redo(&self) -> bool {
        self.run_top(&self.redo_stack, Mode::Redoing)
    }

    fn localize(&self, name: &ActionName) -> String {
        match name {
            ActionName::Text(text) => text.to_string(),
            ActionName::Localized(name) => match self.catalog.get(&self.config.locale, name.key()) {
                Some(template) => name.render(template),
                None => name.render(name.fallback()),
            },
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
