#![forbid(unsafe_code)]

//! End-to-end behavior of the tracking runner against `UndoManager`.
//!
//! Run:
//!   cargo test -p retrace --test essentials

use std::cell::Cell;
use std::rc::Rc;

use retrace::prelude::*;
use retrace::{LocaleStrings, StringCatalog, Transition};

// ============================================================================
// Fixtures
// ============================================================================

#[derive(Debug, Default)]
struct Pager {
    index: i64,
}

fn increment(pager: &Tracked<Pager>) -> Component<Tracked<Pager>> {
    Component::new(pager.clone(), |target, animation, register| {
        animation.run(|| target.update(|p| p.index += 1));
        register.register(decrement);
    })
}

fn decrement(pager: &Tracked<Pager>) -> Component<Tracked<Pager>> {
    Component::new(pager.clone(), |target, animation, register| {
        animation.run(|| target.update(|p| p.index -= 1));
        register.register(increment);
    })
}

fn index(pager: &Tracked<Pager>) -> i64 {
    pager.with(|p| p.index)
}

/// Counts how many blocks ran inside the transition.
#[derive(Clone, Default)]
struct CountingTransition {
    scopes: Rc<Cell<usize>>,
}

impl Transition for CountingTransition {
    fn run(&self, block: &mut dyn FnMut()) {
        self.scopes.set(self.scopes.get() + 1);
        block();
    }
}

// ============================================================================
// Concrete scenario
// ============================================================================

#[test]
fn increment_undo_redo_scenario() {
    let manager = UndoManager::default();
    let pager = Tracked::new(Pager::default());
    assert_eq!(index(&pager), 0);

    perform_with_tracking(Some(&manager), || increment(&pager).named("Increment"));
    assert_eq!(index(&pager), 1);
    assert!(manager.can_undo());
    assert!(!manager.can_redo());
    assert_eq!(manager.undo_menu_item_title(), "Undo Increment");

    assert!(manager.undo());
    assert_eq!(index(&pager), 0);
    assert!(!manager.can_undo());
    assert!(manager.can_redo());
    assert_eq!(manager.redo_menu_item_title(), "Redo Increment");

    assert!(manager.redo());
    assert_eq!(index(&pager), 1);
    assert!(manager.can_undo());
    assert!(!manager.can_redo());
    assert_eq!(manager.undo_menu_item_title(), "Undo Increment");
}

#[test]
fn two_forward_calls_undo_lifo() {
    let manager = UndoManager::default();
    let pager = Tracked::new(Pager::default());

    perform_with_tracking(Some(&manager), || increment(&pager).named("First"));
    perform_with_tracking(Some(&manager), || decrement(&pager).named("Second"));
    perform_with_tracking(Some(&manager), || decrement(&pager).named("Third"));
    assert_eq!(index(&pager), -1);
    assert_eq!(manager.undo_depth(), 3);

    let mut undone = Vec::new();
    while manager.can_undo() {
        undone.push(manager.undo_action_name().unwrap_or_default());
        manager.undo();
    }
    assert_eq!(undone, vec!["Third", "Second", "First"]);
    assert_eq!(index(&pager), 0);
    assert_eq!(manager.redo_descriptions(5), vec!["First", "Second", "Third"]);
}

#[test]
fn name_survives_many_rotations() {
    let manager = UndoManager::default();
    let pager = Tracked::new(Pager::default());
    perform_with_tracking(Some(&manager), || increment(&pager).named("Next Page"));

    for _ in 0..10 {
        assert!(manager.undo());
        assert_eq!(manager.redo_action_name().as_deref(), Some("Next Page"));
        assert!(manager.redo());
        assert_eq!(manager.undo_action_name().as_deref(), Some("Next Page"));
    }
    assert_eq!(index(&pager), 1);
    assert_eq!(manager.undo_depth(), 1);
    assert_eq!(manager.redo_depth(), 0);
}

#[test]
fn animate_flag_survives_rotations() {
    let transition = CountingTransition::default();
    let tracker = UndoTracker::new(transition.clone());
    let manager = UndoManager::default();
    let pager = Tracked::new(Pager::default());

    tracker.perform(Some(&manager), || increment(&pager).animated());
    manager.undo();
    manager.redo();
    manager.undo();
    assert_eq!(index(&pager), 0);
    assert_eq!(transition.scopes.get(), 4);

    // A plain component never enters the transition.
    tracker.perform(Some(&manager), || increment(&pager));
    assert_eq!(transition.scopes.get(), 4);
}

#[test]
fn new_operation_discards_redo_branch() {
    let manager = UndoManager::default();
    let pager = Tracked::new(Pager::default());
    perform_with_tracking(Some(&manager), || increment(&pager).named("A"));
    manager.undo();
    assert!(manager.can_redo());

    perform_with_tracking(Some(&manager), || decrement(&pager).named("B"));
    assert!(!manager.can_redo());
    assert!(!manager.redo());
    assert_eq!(index(&pager), -1);
}

#[test]
fn untracked_perform_mutates_without_history() {
    let manager = UndoManager::default();
    let pager = Tracked::new(Pager::default());
    perform_with_tracking(None, || increment(&pager).named("Silent"));
    assert_eq!(index(&pager), 1);
    assert!(!manager.can_undo());
    assert_eq!(pager.handle_count(), 1);
}

#[test]
fn localized_titles_follow_manager_locale() {
    let mut catalog = StringCatalog::with_defaults();
    catalog
        .add_locale(
            "fr",
            LocaleStrings::new()
                .with("undo.menu.undo", "Annuler {action}")
                .with("undo.menu.redo", "Rétablir {action}")
                .with("undo.menu.undo.bare", "Annuler")
                .with("pager.next", "Page suivante"),
        )
        .unwrap();
    let manager = UndoManager::new(HistoryConfig::default().with_locale("fr")).with_catalog(catalog);
    let pager = Tracked::new(Pager::default());

    perform_with_tracking(Some(&manager), || {
        increment(&pager).named(LocalizedName::new("pager.next", "Next Page"))
    });
    assert_eq!(manager.undo_menu_item_title(), "Annuler Page suivante");
    manager.undo();
    assert_eq!(manager.undo_menu_item_title(), "Annuler");
    assert_eq!(manager.redo_menu_item_title(), "Rétablir Page suivante");
}

#[test]
fn purging_a_target_keeps_other_history() {
    let manager = UndoManager::default();
    let left = Tracked::new(Pager::default());
    let right = Tracked::new(Pager::default());
    perform_with_tracking(Some(&manager), || increment(&left));
    perform_with_tracking(Some(&manager), || increment(&right));

    assert_eq!(manager.remove_all_actions(left.target_id()), 1);
    assert!(manager.undo());
    assert_eq!(index(&right), 0);
    assert_eq!(index(&left), 1);
    assert!(!manager.can_undo());
    // Nothing holds the purged target any more.
    assert_eq!(left.handle_count(), 1);
}
