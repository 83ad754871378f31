#![forbid(unsafe_code)]

//! Undo components.
//!
//! A [`Component`] bundles a target, an action that mutates it, an optional
//! display name and an animate flag. The action performs the forward
//! mutation and, through [`RegisterUndo`], hands back a builder for the
//! component that reverses it.
//!
//! # Invariants
//!
//! 1. Components are immutable: [`named`](Component::named),
//!    [`animated`](Component::animated) and
//!    [`replacing_action`](Component::replacing_action) return new values
//!    sharing the target and action `Rc`s.
//! 2. The runner calls a component's action exactly once.
//! 3. An action registers at most one inverse (`RegisterUndo` is consumed).
//!
//! # Example
//!
//! ```
//! use retrace_core::{Component, Tracked};
//!
//! fn increment(counter: &Tracked<i64>) -> Component<Tracked<i64>> {
//!     Component::new(counter.clone(), |target, animation, register| {
//!         animation.run(|| target.update(|n| *n += 1));
//!         register.register(decrement);
//!     })
//! }
//!
//! fn decrement(counter: &Tracked<i64>) -> Component<Tracked<i64>> {
//!     Component::new(counter.clone(), |target, animation, register| {
//!         animation.run(|| target.update(|n| *n -= 1));
//!         register.register(increment);
//!     })
//! }
//!
//! let counter = Tracked::new(0);
//! retrace_core::perform_with_tracking(None, || increment(&counter).named("Increment"));
//! assert_eq!(counter.get(), 1);
//! ```

use std::fmt;
use std::rc::Rc;

use crate::name::ActionName;
use crate::runner::RegisterUndo;
use crate::target::UndoTarget;
use crate::transition::Animation;

/// The mutation a component performs.
///
/// Arguments: the target, the animation wrapper, and the capability used to
/// register the inverse.
pub type Action<T> = Rc<dyn Fn(&T, &Animation<'_>, RegisterUndo<'_, T>)>;

/// An undoable unit of work against a target.
pub struct Component<T> {
    pub(crate) target: T,
    pub(crate) action: Action<T>,
    pub(crate) name: Option<ActionName>,
    pub(crate) animate: bool,
}

impl<T: Clone> Clone for Component<T> {
    fn clone(&self) -> Self {
        Self {
            target: self.target.clone(),
            action: Rc::clone(&self.action),
            name: self.name.clone(),
            animate: self.animate,
        }
    }
}

impl<T: UndoTarget> fmt::Debug for Component<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Component")
            .field("target", &self.target.target_id())
            .field("name", &self.name)
            .field("animate", &self.animate)
            .finish()
    }
}

impl<T: UndoTarget> Component<T> {
    /// Create an unnamed, non-animated component.
    ///
    /// `action` receives the target, the animation wrapper and the
    /// [`RegisterUndo`] capability. It should mutate the target inside
    /// [`Animation::run`] and call [`RegisterUndo::register`] with a builder
    /// for the inverse component.
    #[must_use]
    pub fn new<F>(target: T, action: F) -> Self
    where
        F: Fn(&T, &Animation<'_>, RegisterUndo<'_, T>) + 'static,
    {
        Self {
            target,
            action: Rc::new(action),
            name: None,
            animate: false,
        }
    }

    /// Name the action shown by the undo and redo menu items.
    ///
    /// The name is kept for every later undo and redo of this operation.
    #[must_use]
    pub fn named(mut self, name: impl Into<ActionName>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Run the mutation inside the tracker's transition scope.
    ///
    /// Like the name, the flag carries over to every undo and redo.
    #[must_use]
    pub fn animated(mut self) -> Self {
        self.animate = true;
        self
    }

    /// Keep this component's target, name and animate flag but take the
    /// action of `other`.
    #[must_use]
    pub fn replacing_action(mut self, other: Component<T>) -> Self {
        self.action = other.action;
        self
    }

    /// The target handle.
    #[must_use]
    pub fn target(&self) -> &T {
        &self.target
    }

    /// The display name, if any.
    #[must_use]
    pub fn name(&self) -> Option<&ActionName> {
        self.name.as_ref()
    }

    /// Whether the mutation runs inside a transition scope.
    #[must_use]
    pub fn is_animated(&self) -> bool {
        self.animate
    }

    /// Whether both components share the same action.
    #[must_use]
    pub fn shares_action(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.action, &other.action)
    }
}
