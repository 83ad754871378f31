#![forbid(unsafe_code)]

//! Display names for undoable actions.

use std::borrow::Cow;
use std::fmt;

use retrace_i18n::interpolate;

/// A localizable action name: catalog key, fallback text and arguments.
///
/// The fallback text is a template; `{name}` tokens are filled from
/// [`args`](Self::args) both when the catalog has a translation and when it
/// does not.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalizedName {
    key: Cow<'static, str>,
    fallback: Cow<'static, str>,
    args: Vec<(Cow<'static, str>, String)>,
}

impl LocalizedName {
    /// Create a localized name for `key` that renders as `fallback` when no
    /// translation exists.
    #[must_use]
    pub fn new(key: impl Into<Cow<'static, str>>, fallback: impl Into<Cow<'static, str>>) -> Self {
        Self {
            key: key.into(),
            fallback: fallback.into(),
            args: Vec::new(),
        }
    }

    /// Add an interpolation argument.
    #[must_use]
    pub fn with_arg(mut self, name: impl Into<Cow<'static, str>>, value: impl ToString) -> Self {
        self.args.push((name.into(), value.to_string()));
        self
    }

    /// Catalog key.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Fallback template.
    #[must_use]
    pub fn fallback(&self) -> &str {
        &self.fallback
    }

    /// Interpolation arguments as borrowed pairs.
    #[must_use]
    pub fn args(&self) -> Vec<(&str, &str)> {
        self.args
            .iter()
            .map(|(name, value)| (name.as_ref(), value.as_str()))
            .collect()
    }

    /// Render `template` with this name's arguments.
    #[must_use]
    pub fn render(&self, template: &str) -> String {
        interpolate(template, &self.args())
    }
}

/// Name shown for an action in undo/redo menus.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionName {
    /// Already-final display text.
    Text(Cow<'static, str>),
    /// Text resolved through the host's localization catalog.
    Localized(LocalizedName),
}

impl ActionName {
    /// Shorthand for [`LocalizedName::new`].
    #[must_use]
    pub fn localized(
        key: impl Into<Cow<'static, str>>,
        fallback: impl Into<Cow<'static, str>>,
    ) -> Self {
        Self::Localized(LocalizedName::new(key, fallback))
    }

    /// Render the name without a catalog.
    #[must_use]
    pub fn fallback_text(&self) -> String {
        match self {
            Self::Text(text) => text.to_string(),
            Self::Localized(name) => name.render(name.fallback()),
        }
    }
}

impl fmt::Display for ActionName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(text) => f.write_str(text),
            Self::Localized(name) => f.write_str(&name.render(name.fallback())),
        }
    }
}

impl From<&'static str> for ActionName {
    fn from(text: &'static str) -> Self {
        Self::Text(Cow::Borrowed(text))
    }
}

impl From<String> for ActionName {
    fn from(text: String) -> Self {
        Self::Text(Cow::Owned(text))
    }
}

impl From<LocalizedName> for ActionName {
    fn from(name: LocalizedName) -> Self {
        Self::Localized(name)
    }
}
