#![forbid(unsafe_code)]

//! The tracking runner.
//!
//! [`UndoTracker::perform`] invokes a component against a host stack and
//! hands the action a [`RegisterUndo`] capability. Registering an inverse
//! does not build it: the runner records a callback that, when the host
//! later undoes the slot, re-enters `perform` with the inverse component.
//! That re-entry registers the inverse of the inverse, so redo is simply
//! the undo of an undo.
//!
//! ```text
//! perform(increment)        ── registers ──►  undo slot: decrement
//! stack.undo()  → perform(decrement) ── registers ──►  redo slot: increment
//! stack.redo()  → perform(increment) ── registers ──►  undo slot: decrement
//! ```
//!
//! The component's name and animate flag are captured with each
//! registration and re-applied on replay (via
//! [`Component::replacing_action`]), so decorations made at the first call
//! site persist through every undo/redo rotation.
//!
//! # Invariants
//!
//! 1. The builder passed to `perform` is called exactly once per entry.
//! 2. The action is called exactly once per entry.
//! 3. At most one inverse is registered per entry.
//! 4. Nothing is registered or named when no stack is supplied.
//! 5. A named component labels its entry with `set_action_name` right after
//!    registering it; an action that registers nothing names nothing.

use std::fmt;
use std::rc::Rc;

use tracing::{debug, debug_span};

use crate::component::Component;
use crate::stack::HistoryStack;
use crate::target::UndoTarget;
use crate::transition::{Animation, Immediate, Transition};

/// Capability to register the inverse of the running action.
///
/// Consumed by [`register`](Self::register), so an action can register at
/// most once. Dropping it unused leaves the operation unreversable; the
/// runner reports this as a debug event unless the action is panicking.
pub struct RegisterUndo<'a, T> {
    stack: Option<&'a dyn HistoryStack>,
    tracker: &'a UndoTracker,
    component: &'a Component<T>,
    registered: bool,
}

impl<T> fmt::Debug for RegisterUndo<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegisterUndo")
            .field("tracked", &self.stack.is_some())
            .field("registered", &self.registered)
            .finish()
    }
}

impl<T: UndoTarget> RegisterUndo<'_, T> {
    /// Record `inverse` as the way to reverse the running action.
    ///
    /// `inverse` is not called now. When the host stack triggers the entry,
    /// it is called with the target and the component it returns is
    /// performed, carrying this component's name and animate flag.
    ///
    /// A named component labels the new entry with `set_action_name`.
    pub fn register<F>(mut self, inverse: F)
    where
        F: FnOnce(&T) -> Component<T> + 'static,
    {
        self.registered = true;
        let Some(stack) = self.stack else {
            return;
        };

        let tracker = self.tracker.clone();
        let component = self.component.clone();
        let target = component.target.target_id();
        debug!(target_id = target.raw(), name = ?component.name, "undo.register");

        let label = component.name.as_ref().map(|name| stack.localize(name));
        stack.register_inverse(
            target,
            Box::new(move |stack: &dyn HistoryStack| {
                tracker.perform(Some(stack), move || {
                    let next = inverse(&component.target);
                    component.replacing_action(next)
                });
            }),
        );
        // Label the entry just recorded; an unregistered action names nothing.
        if let Some(label) = label {
            stack.set_action_name(&label);
        }
    }
}

impl<T> RegisterUndo<'_, T> {
    /// Whether a host stack is recording this action.
    #[must_use]
    pub fn is_tracked(&self) -> bool {
        self.stack.is_some()
    }
}

impl<T> Drop for RegisterUndo<'_, T> {
    fn drop(&mut self) {
        if !self.registered && self.stack.is_some() && !std::thread::panicking() {
            debug!(
                name = ?self.component.name,
                "undo.unregistered: action finished without registering an inverse"
            );
        }
    }
}

/// Runs components against a host stack, using an injected [`Transition`]
/// for animated components.
///
/// Cloning is cheap; every registered inverse holds a clone so replays use
/// the same transition.
#[derive(Clone)]
pub struct UndoTracker {
    transition: Rc<dyn Transition>,
}

impl fmt::Debug for UndoTracker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UndoTracker").finish_non_exhaustive()
    }
}

impl Default for UndoTracker {
    fn default() -> Self {
        Self::new(Immediate)
    }
}

impl UndoTracker {
    /// Create a tracker that animates through `transition`.
    #[must_use]
    pub fn new(transition: impl Transition + 'static) -> Self {
        Self {
            transition: Rc::new(transition),
        }
    }

    /// Create a tracker sharing an existing transition.
    #[must_use]
    pub fn with_shared(transition: Rc<dyn Transition>) -> Self {
        Self { transition }
    }

    /// Build a component and perform it, recording its inverse on `stack`.
    ///
    /// With `stack == None` the action still runs but nothing is named or
    /// registered.
    pub fn perform<T, B>(&self, stack: Option<&dyn HistoryStack>, builder: B)
    where
        T: UndoTarget,
        B: FnOnce() -> Component<T>,
    {
        let component = builder();
        let _span = debug_span!(
            "undo.perform",
            target_id = component.target.target_id().raw(),
            name = ?component.name,
            animate = component.animate,
            tracked = stack.is_some(),
        )
        .entered();

        let animation = if component.animate {
            Animation::animated(&*self.transition)
        } else {
            Animation::immediate()
        };
        let register = RegisterUndo {
            stack,
            tracker: self,
            component: &component,
            registered: false,
        };

        (component.action)(&component.target, &animation, register);
    }
}

/// Build a component and perform it with an immediate transition.
///
/// ```
/// use retrace_core::{Component, Tracked, perform_with_tracking};
///
/// let flag = Tracked::new(false);
/// perform_with_tracking(None, || {
///     Component::new(flag.clone(), |target, animation, register| {
///         let previous = animation.run(|| target.replace(true));
///         register.register(move |target| {
///             Component::new(target.clone(), move |target, _, _| {
///                 target.replace(previous);
///             })
///         });
///     })
/// });
/// assert!(flag.get());
/// ```
pub fn perform_with_tracking<T, B>(stack: Option<&dyn HistoryStack>, builder: B)
where
    T: UndoTarget,
    B: FnOnce() -> Component<T>,
{
    UndoTracker::default().perform(stack, builder);
}

#[cfg(test)]
mod tests {
    use std::cell::{Cell, RefCell};

    use super::*;
    use crate::name::ActionName;
    use crate::stack::Inverse;
    use crate::target::{TargetId, Tracked};

    /// Minimal host stack: two LIFO vectors and every name set.
    #[derive(Default)]
    struct TestStack {
        undo: RefCell<Vec<(TargetId, Inverse, String)>>,
        redo: RefCell<Vec<(TargetId, Inverse, String)>>,
        undoing: Cell<bool>,
        names_set: RefCell<Vec<String>>,
    }

    impl TestStack {
        fn top_undo_name(&self) -> Option<String> {
            self.undo.borrow().last().map(|(_, _, n)| n.clone())
        }

        fn top_redo_name(&self) -> Option<String> {
            self.redo.borrow().last().map(|(_, _, n)| n.clone())
        }
    }

    impl HistoryStack for TestStack {
        fn register_inverse(&self, target: TargetId, inverse: Inverse) {
            let entry = (target, inverse, String::new());
            if self.undoing.get() {
                self.redo.borrow_mut().push(entry);
            } else {
                self.undo.borrow_mut().push(entry);
            }
        }

        fn set_action_name(&self, name: &str) {
            self.names_set.borrow_mut().push(name.to_owned());
            let stack = if self.undoing.get() { &self.redo } else { &self.undo };
            if let Some((_, _, label)) = stack.borrow_mut().last_mut() {
                *label = name.to_owned();
            }
        }

        fn can_undo(&self) -> bool {
            !self.undo.borrow().is_empty()
        }

        fn can_redo(&self) -> bool {
            !self.redo.borrow().is_empty()
        }

        fn undo(&self) -> bool {
            let Some((_, inverse, _)) = self.undo.borrow_mut().pop() else {
                return false;
            };
            self.undoing.set(true);
            inverse(self);
            self.undoing.set(false);
            true
        }

        fn redo(&self) -> bool {
            let Some((_, inverse, _)) = self.redo.borrow_mut().pop() else {
                return false;
            };
            inverse(self);
            true
        }
    }

    fn increment(counter: &Tracked<i64>) -> Component<Tracked<i64>> {
        Component::new(counter.clone(), |target, animation, register| {
            animation.run(|| target.update(|n| *n += 1));
            register.register(decrement);
        })
    }

    fn decrement(counter: &Tracked<i64>) -> Component<Tracked<i64>> {
        Component::new(counter.clone(), |target, animation, register| {
            animation.run(|| target.update(|n| *n -= 1));
            register.register(increment);
        })
    }

    #[test]
    fn forward_registers_one_inverse() {
        let stack = TestStack::default();
        let counter = Tracked::new(0);
        perform_with_tracking(Some(&stack), || increment(&counter));
        assert_eq!(counter.get(), 1);
        assert!(stack.can_undo());
        assert!(!stack.can_redo());
        assert_eq!(stack.undo.borrow().len(), 1);
    }

    #[test]
    fn undo_registers_redo_and_back() {
        let stack = TestStack::default();
        let counter = Tracked::new(0);
        perform_with_tracking(Some(&stack), || increment(&counter).named("Increment"));

        assert!(stack.undo());
        assert_eq!(counter.get(), 0);
        assert!(!stack.can_undo());
        assert_eq!(stack.top_redo_name().as_deref(), Some("Increment"));

        assert!(stack.redo());
        assert_eq!(counter.get(), 1);
        assert!(!stack.can_redo());
        assert_eq!(stack.top_undo_name().as_deref(), Some("Increment"));
    }

    #[test]
    fn builder_called_once_per_entry() {
        let stack = TestStack::default();
        let counter = Tracked::new(0);
        let calls = Cell::new(0);
        perform_with_tracking(Some(&stack), || {
            calls.set(calls.get() + 1);
            increment(&counter)
        });
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn without_stack_nothing_is_recorded() {
        let counter = Tracked::new(0);
        perform_with_tracking(None, || increment(&counter).named("Increment"));
        assert_eq!(counter.get(), 1);
        // Only the caller's handle remains: no pending inverse holds a clone.
        assert_eq!(counter.handle_count(), 1);
    }

    #[test]
    fn pending_inverse_keeps_target_alive() {
        let stack = TestStack::default();
        let counter = Tracked::new(0);
        perform_with_tracking(Some(&stack), || increment(&counter));
        assert!(counter.handle_count() > 1);
    }

    #[test]
    fn name_is_applied_on_every_entry() {
        let stack = TestStack::default();
        let counter = Tracked::new(0);
        perform_with_tracking(Some(&stack), || increment(&counter).named("Increment"));
        stack.undo();
        stack.redo();
        assert_eq!(
            *stack.names_set.borrow(),
            vec!["Increment", "Increment", "Increment"]
        );
    }

    #[test]
    fn localized_names_go_through_the_stack() {
        let stack = TestStack::default();
        let counter = Tracked::new(0);
        perform_with_tracking(Some(&stack), || {
            increment(&counter).named(ActionName::localized("action.increment", "Add One"))
        });
        assert_eq!(*stack.names_set.borrow(), vec!["Add One"]);
    }

    #[test]
    fn animated_components_run_inside_transition() {
        let stack = TestStack::default();
        let counter = Tracked::new(0);
        let scopes = Rc::new(Cell::new(0));
        let tracker = UndoTracker::new({
            let scopes = Rc::clone(&scopes);
            move |block: &mut dyn FnMut()| {
                scopes.set(scopes.get() + 1);
                block();
            }
        });

        tracker.perform(Some(&stack), || increment(&counter).animated());
        assert_eq!(scopes.get(), 1);

        // The flag survives the rotation even though the action changes.
        stack.undo();
        stack.redo();
        stack.undo();
        assert_eq!(scopes.get(), 4);
        assert_eq!(counter.get(), 0);
    }

    #[test]
    fn plain_components_skip_transition() {
        let scopes = Rc::new(Cell::new(0));
        let tracker = UndoTracker::new({
            let scopes = Rc::clone(&scopes);
            move |block: &mut dyn FnMut()| {
                scopes.set(scopes.get() + 1);
                block();
            }
        });
        let counter = Tracked::new(0);
        tracker.perform(None, || increment(&counter));
        assert_eq!(scopes.get(), 0);
        assert_eq!(counter.get(), 1);
    }

    #[test]
    fn unregistered_action_leaves_no_entry() {
        let stack = TestStack::default();
        let counter = Tracked::new(0);
        perform_with_tracking(Some(&stack), || {
            Component::new(counter.clone(), |target, _, _register| {
                target.update(|n| *n = 10);
            })
        });
        assert_eq!(counter.get(), 10);
        assert!(!stack.can_undo());
    }

    #[test]
    fn register_reports_tracking() {
        let stack = TestStack::default();
        let counter = Tracked::new(0);
        let seen = Rc::new(Cell::new(None));
        for tracked in [true, false] {
            let seen_in = Rc::clone(&seen);
            let host = if tracked {
                Some(&stack as &dyn HistoryStack)
            } else {
                None
            };
            perform_with_tracking(host, || {
                Component::new(counter.clone(), move |_, _, register| {
                    seen_in.set(Some(register.is_tracked()));
                })
            });
            assert_eq!(seen.get(), Some(tracked));
        }
    }

    #[test]
    fn unregistered_named_action_sets_no_name() {
        let stack = TestStack::default();
        let counter = Tracked::new(0);
        perform_with_tracking(Some(&stack), || {
            Component::new(counter.clone(), |target, _, _register| {
                target.update(|n| *n = 5);
            })
            .named("Reset")
        });
        perform_with_tracking(Some(&stack), || increment(&counter));

        assert!(stack.names_set.borrow().is_empty());
        assert_eq!(stack.top_undo_name().as_deref(), Some(""));
    }

    #[test]
    fn name_follows_registration() {
        let stack = TestStack::default();
        let counter = Tracked::new(0);
        let order = Rc::new(RefCell::new(Vec::new()));
        let seen = Rc::clone(&order);
        perform_with_tracking(Some(&stack), || {
            Component::new(counter.clone(), move |target, _, register| {
                target.update(|n| *n += 1);
                seen.borrow_mut().push("mutated");
                register.register(decrement);
                seen.borrow_mut().push("registered");
            })
            .named("Bump")
        });
        assert_eq!(*order.borrow(), vec!["mutated", "registered"]);
        assert_eq!(stack.top_undo_name().as_deref(), Some("Bump"));
    }

    #[test]
    fn lifo_order_across_slots() {
        let stack = TestStack::default();
        let log = Tracked::new(Vec::<&'static str>::new());

        type Log = Tracked<Vec<&'static str>>;

        fn push(log: &Log, item: &'static str) -> Component<Log> {
            Component::new(log.clone(), move |target, _, register| {
                target.update(|v| v.push(item));
                register.register(move |target| pop(target, item));
            })
        }

        fn pop(log: &Log, item: &'static str) -> Component<Log> {
            Component::new(log.clone(), move |target, _, register| {
                let popped = target.update(Vec::pop);
                assert_eq!(popped, Some(item));
                register.register(move |target| push(target, item));
            })
        }

        perform_with_tracking(Some(&stack), || push(&log, "a"));
        perform_with_tracking(Some(&stack), || push(&log, "b"));
        assert_eq!(log.get(), vec!["a", "b"]);

        stack.undo();
        assert_eq!(log.get(), vec!["a"]);
        stack.undo();
        assert!(log.get().is_empty());
        stack.redo();
        stack.redo();
        assert_eq!(log.get(), vec!["a", "b"]);
    }
}
