#![forbid(unsafe_code)]

//! Ready-made undoable mutations for fields of a [`Tracked`] model.
//!
//! Each method returns a [`Component`] whose action mutates one field inside
//! the animation wrapper and registers the matching inverse:
//!
//! | forward          | inverse                                    |
//! |------------------|--------------------------------------------|
//! | `append`         | `remove_at(old_len)`                       |
//! | `append_all`     | `truncate(old_len)`                        |
//! | `truncate`       | `append_all(tail)`                         |
//! | `insert`         | `remove_at(index)`                         |
//! | `remove_at`      | `insert(removed, index)`                   |
//! | `remove_all`     | reinsert removed elements at their indices |
//! | `remove_last`    | `append_all(removed)`                      |
//! | `replace_field`  | `replace_field(previous)`                  |
//!
//! Fields are addressed with a [`Field`] accessor. Plain functions and
//! non-capturing closures both coerce to it:
//!
//! ```
//! use retrace_core::{Tracked, perform_with_tracking};
//!
//! #[derive(Default)]
//! struct Doc {
//!     notes: Vec<String>,
//! }
//!
//! let doc = Tracked::new(Doc::default());
//! perform_with_tracking(None, || {
//!     doc.append("first".to_owned(), |d: &mut Doc| &mut d.notes)
//!         .named("Add Note")
//! });
//! assert_eq!(doc.with(|d| d.notes.len()), 1);
//! ```
//!
//! # Panics
//!
//! Index preconditions are the caller's responsibility: out-of-range
//! indices panic exactly like the underlying `Vec` operation.

use std::rc::Rc;

use crate::component::Component;
use crate::target::Tracked;

/// Accessor from a model to one of its fields.
pub type Field<M, V> = fn(&mut M) -> &mut V;

/// Accessor for a model that is itself the field.
pub fn whole<V>(value: &mut V) -> &mut V {
    value
}

/// Elements with a stable identity, for [`Tracked::remove_item`].
pub trait Identifiable {
    /// Identity type.
    type Id: PartialEq;

    /// The element's identity.
    fn id(&self) -> Self::Id;
}

type Predicate<E> = Rc<dyn Fn(&E) -> bool>;

impl<M: 'static> Tracked<M> {
    /// Append `value` to the end of the vector at `field`.
    #[must_use]
    pub fn append<E>(&self, value: E, field: Field<M, Vec<E>>) -> Component<Self>
    where
        E: Clone + 'static,
    {
        Component::new(self.clone(), move |target, animation, register| {
            let index = animation.run(|| {
                target.update(|model| {
                    let items = field(model);
                    items.push(value.clone());
                    items.len() - 1
                })
            });
            register.register(move |target| target.remove_at(index, field));
        })
    }

    /// Append every element of `values` to the vector at `field`.
    #[must_use]
    pub fn append_all<E, I>(&self, values: I, field: Field<M, Vec<E>>) -> Component<Self>
    where
        E: Clone + 'static,
        I: IntoIterator<Item = E>,
    {
        let values: Vec<E> = values.into_iter().collect();
        Component::new(self.clone(), move |target, animation, register| {
            let start = animation.run(|| {
                target.update(|model| {
                    let items = field(model);
                    let start = items.len();
                    items.extend(values.iter().cloned());
                    start
                })
            });
            register.register(move |target| target.truncate(start, field));
        })
    }

    /// Shorten the vector at `field` to `len` elements.
    ///
    /// Does nothing to the vector when it is already `len` or shorter; the
    /// inverse then re-appends nothing.
    #[must_use]
    pub fn truncate<E>(&self, len: usize, field: Field<M, Vec<E>>) -> Component<Self>
    where
        E: Clone + 'static,
    {
        Component::new(self.clone(), move |target, animation, register| {
            let tail = animation.run(|| {
                target.update(|model| {
                    let items = field(model);
                    if len < items.len() {
                        items.split_off(len)
                    } else {
                        Vec::new()
                    }
                })
            });
            register.register(move |target| target.append_all(tail, field));
        })
    }

    /// Insert `value` at `index` in the vector at `field`.
    ///
    /// # Panics
    ///
    /// The action panics if `index` is greater than the vector's length.
    #[must_use]
    pub fn insert<E>(&self, value: E, index: usize, field: Field<M, Vec<E>>) -> Component<Self>
    where
        E: Clone + 'static,
    {
        Component::new(self.clone(), move |target, animation, register| {
            animation.run(|| target.update(|model| field(model).insert(index, value.clone())));
            register.register(move |target| target.remove_at(index, field));
        })
    }

    /// Remove the element at `index` from the vector at `field`.
    ///
    /// # Panics
    ///
    /// The action panics if `index` is out of bounds.
    #[must_use]
    pub fn remove_at<E>(&self, index: usize, field: Field<M, Vec<E>>) -> Component<Self>
    where
        E: Clone + 'static,
    {
        Component::new(self.clone(), move |target, animation, register| {
            let removed = animation.run(|| target.update(|model| field(model).remove(index)));
            register.register(move |target| target.insert(removed, index, field));
        })
    }

    /// Remove every element of the vector at `field` matching `predicate`.
    ///
    /// The order of the remaining elements is preserved. Undo puts the
    /// removed elements back at their original indices.
    #[must_use]
    pub fn remove_all<E, P>(&self, field: Field<M, Vec<E>>, predicate: P) -> Component<Self>
    where
        E: Clone + 'static,
        P: Fn(&E) -> bool + 'static,
    {
        self.remove_where(field, Rc::new(predicate))
    }

    /// Remove every element sharing `item`'s identity.
    ///
    /// All elements whose [`Identifiable::id`] equals `item.id()` are removed.
    #[must_use]
    pub fn remove_item<E>(&self, item: &E, field: Field<M, Vec<E>>) -> Component<Self>
    where
        E: Identifiable + Clone + 'static,
        E::Id: 'static,
    {
        let id = item.id();
        self.remove_all(field, move |candidate: &E| candidate.id() == id)
    }

    /// Remove the last `count` elements of the vector at `field`.
    ///
    /// # Panics
    ///
    /// The action panics if `count` exceeds the vector's length.
    #[must_use]
    pub fn remove_last<E>(&self, count: usize, field: Field<M, Vec<E>>) -> Component<Self>
    where
        E: Clone + 'static,
    {
        Component::new(self.clone(), move |target, animation, register| {
            let removed = animation.run(|| {
                target.update(|model| {
                    let items = field(model);
                    assert!(
                        count <= items.len(),
                        "cannot remove {count} elements from a vector of length {}",
                        items.len()
                    );
                    let at = items.len() - count;
                    items.split_off(at)
                })
            });
            register.register(move |target| target.append_all(removed, field));
        })
    }

    /// Replace the value at `field` with `value`.
    #[must_use]
    pub fn replace_field<V>(&self, field: Field<M, V>, value: V) -> Component<Self>
    where
        V: Clone + 'static,
    {
        Component::new(self.clone(), move |target, animation, register| {
            let previous = animation.run(|| {
                target.update(|model| std::mem::replace(field(model), value.clone()))
            });
            register.register(move |target| target.replace_field(field, previous));
        })
    }

    fn remove_where<E>(&self, field: Field<M, Vec<E>>, predicate: Predicate<E>) -> Component<Self>
    where
        E: Clone + 'static,
    {
        Component::new(self.clone(), move |target, animation, register| {
            let removed = animation.run(|| {
                target.update(|model| {
                    let mut removed = Vec::new();
                    let mut index = 0;
                    field(model).retain(|item| {
                        let keep = !predicate(item);
                        if !keep {
                            removed.push((index, item.clone()));
                        }
                        index += 1;
                        keep
                    });
                    removed
                })
            });
            let predicate = Rc::clone(&predicate);
            register.register(move |target| target.reinsert(removed, field, predicate));
        })
    }

    fn reinsert<E>(
        &self,
        removed: Vec<(usize, E)>,
        field: Field<M, Vec<E>>,
        predicate: Predicate<E>,
    ) -> Component<Self>
    where
        E: Clone + 'static,
    {
        Component::new(self.clone(), move |target, animation, register| {
            animation.run(|| {
                target.update(|model| {
                    let items = field(model);
                    // Ascending original indices rebuild the original order.
                    for (index, item) in &removed {
                        items.insert(*index, item.clone());
                    }
                })
            });
            let predicate = Rc::clone(&predicate);
            register.register(move |target| target.remove_where(field, predicate));
        })
    }
}
