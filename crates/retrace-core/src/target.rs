#![forbid(unsafe_code)]

//! Mutation targets: identity and the shared [`Tracked`] handle.
//!
//! # Design
//!
//! Undo entries outlive the call that created them, so a target must be a
//! handle that pending inverses can hold on to. [`Tracked<M>`] wraps the
//! model in shared, reference-counted storage (`Rc<RefCell<..>>`); cloning
//! the handle never clones the model.
//!
//! # Failure Modes
//!
//! - **Re-entrant update**: calling [`Tracked::update`] on a target from
//!   inside another `update` closure of the same target panics (RefCell
//!   borrow rules).

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

/// Opaque identity of an undo target.
///
/// Host stacks key their entries by this so they can purge every entry
/// belonging to one target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TargetId(usize);

impl TargetId {
    /// Create an id from a raw value.
    #[must_use]
    pub const fn new(raw: usize) -> Self {
        Self(raw)
    }

    /// Identity of the allocation behind an `Rc`.
    #[must_use]
    pub fn of_rc<T: ?Sized>(rc: &Rc<T>) -> Self {
        Self(Rc::as_ptr(rc).cast::<()>() as usize)
    }

    /// Get the raw value.
    #[must_use]
    pub const fn raw(self) -> usize {
        self.0
    }
}

/// A handle to an object that undoable actions mutate.
///
/// Implementors are cheap to clone and every clone refers to the same
/// object, so [`target_id`](Self::target_id) is equal across clones.
pub trait UndoTarget: Clone + 'static {
    /// Identity shared by all clones of this handle.
    fn target_id(&self) -> TargetId;
}

impl<T: ?Sized + 'static> UndoTarget for Rc<T> {
    fn target_id(&self) -> TargetId {
        TargetId::of_rc(self)
    }
}

/// Shared, single-threaded handle to a mutable model.
///
/// Cloning a `Tracked` creates a new handle to the **same** model.
pub struct Tracked<M> {
    inner: Rc<RefCell<M>>,
}

impl<M> Clone for Tracked<M> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<M: fmt::Debug> fmt::Debug for Tracked<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tracked")
            .field("model", &self.inner.borrow())
            .field("handles", &Rc::strong_count(&self.inner))
            .finish()
    }
}

impl<M: Default> Default for Tracked<M> {
    fn default() -> Self {
        Self::new(M::default())
    }
}

impl<M> Tracked<M> {
    /// Wrap a model.
    #[must_use]
    pub fn new(model: M) -> Self {
        Self {
            inner: Rc::new(RefCell::new(model)),
        }
    }

    /// Get a clone of the model.
    #[must_use]
    pub fn get(&self) -> M
    where
        M: Clone,
    {
        self.inner.borrow().clone()
    }

    /// Read the model through a closure.
    pub fn with<R>(&self, f: impl FnOnce(&M) -> R) -> R {
        f(&self.inner.borrow())
    }

    /// Mutate the model through a closure.
    pub fn update<R>(&self, f: impl FnOnce(&mut M) -> R) -> R {
        f(&mut self.inner.borrow_mut())
    }

    /// Swap in a new model, returning the old one.
    pub fn replace(&self, model: M) -> M {
        self.inner.replace(model)
    }

    /// Whether both handles refer to the same model.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    /// Number of live handles, including those held by pending undo entries.
    #[must_use]
    pub fn handle_count(&self) -> usize {
        Rc::strong_count(&self.inner)
    }
}

impl<M: 'static> UndoTarget for Tracked<M> {
    fn target_id(&self) -> TargetId {
        TargetId::of_rc(&self.inner)
    }
}
