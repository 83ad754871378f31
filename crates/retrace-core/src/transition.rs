#![forbid(unsafe_code)]

//! Transition scopes for animated mutations.
//!
//! A [`Transition`] runs a block synchronously, optionally inside a visual
//! transition scope owned by the UI layer. The core never inspects timing
//! or completion; it only decides whether a mutation runs inside the scope.

/// Runs blocks inside a visual transition scope.
pub trait Transition {
    /// Execute `block` exactly once before returning.
    fn run(&self, block: &mut dyn FnMut());
}

impl<F> Transition for F
where
    F: Fn(&mut dyn FnMut()),
{
    fn run(&self, block: &mut dyn FnMut()) {
        self(block);
    }
}

/// Identity transition: runs the block directly.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Immediate;

impl Transition for Immediate {
    fn run(&self, block: &mut dyn FnMut()) {
        block();
    }
}

/// The animation wrapper handed to an action.
///
/// When the component is animated, [`run`](Self::run) routes the block
/// through the tracker's [`Transition`]; otherwise the block is called
/// directly.
pub struct Animation<'a> {
    transition: Option<&'a dyn Transition>,
}

impl std::fmt::Debug for Animation<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Animation")
            .field("animated", &self.is_animated())
            .finish()
    }
}

impl<'a> Animation<'a> {
    /// Wrapper that runs blocks inside `transition`.
    #[must_use]
    pub fn animated(transition: &'a dyn Transition) -> Self {
        Self {
            transition: Some(transition),
        }
    }

    /// Wrapper that runs blocks directly.
    #[must_use]
    pub fn immediate() -> Self {
        Self { transition: None }
    }

    /// Whether blocks run inside a transition scope.
    #[must_use]
    pub fn is_animated(&self) -> bool {
        self.transition.is_some()
    }

    /// Run `f`, inside the transition scope if animated.
    ///
    /// A transition that skips its block still gets the mutation: `f` then
    /// runs directly after the transition returns.
    ///
    /// # Panics
    ///
    /// Panics if `f` panicked and the transition caught the unwind instead
    /// of letting it propagate.
    pub fn run<R>(&self, f: impl FnOnce() -> R) -> R {
        let Some(transition) = self.transition else {
            return f();
        };

        let mut f = Some(f);
        let mut out = None;
        transition.run(&mut || {
            if let Some(f) = f.take() {
                out = Some(f());
            }
        });
        match (out, f) {
            (Some(out), _) => out,
            (None, Some(f)) => f(),
            (None, None) => {
                panic!("mutation panicked inside a transition that swallowed the unwind")
            }
        }
    }
}
