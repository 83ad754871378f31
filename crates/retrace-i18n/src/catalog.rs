#![forbid(unsafe_code)]

//! Localized string catalog with locale fallback.
//!
//! # Lookup order
//!
//! For a request `get("fr-CA", key)` the catalog tries, in order:
//!
//! 1. the exact locale (`fr-CA`),
//! 2. its language subtag (`fr`),
//! 3. each locale of the fallback chain (default `["en"]`).
//!
//! The first locale that both exists and defines `key` wins. Locales are
//! matched case-sensitively after normalizing `_` to `-`.
//!
//! # Invariants
//!
//! 1. Every stored locale tag passed [`validate_locale`].
//! 2. A missing key yields `None`, never a placeholder string.
//! 3. The resolution chain never visits the same locale twice.

use std::collections::HashMap;
use std::fmt;

use crate::interpolate::interpolate;

/// Well-known catalog keys used by the history menu titles.
pub mod keys {
    /// Template for the undo menu title; `{action}` is the action name.
    pub const UNDO_MENU: &str = "undo.menu.undo";
    /// Template for the redo menu title; `{action}` is the action name.
    pub const REDO_MENU: &str = "undo.menu.redo";
    /// Undo menu title used when the action has no name.
    pub const UNDO_MENU_BARE: &str = "undo.menu.undo.bare";
    /// Redo menu title used when the action has no name.
    pub const REDO_MENU_BARE: &str = "undo.menu.redo.bare";
}

/// Errors raised while populating a catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum I18nError {
    /// The locale tag is empty or malformed.
    InvalidLocale(String),
}

impl fmt::Display for I18nError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidLocale(tag) => write!(f, "invalid locale tag '{tag}'"),
        }
    }
}

impl std::error::Error for I18nError {}

/// Check that `tag` looks like a BCP-47 style locale (`en`, `pt-BR`, `zh_Hant`).
///
/// Subtags are separated by `-` or `_`, must be ASCII alphanumeric and
/// 1..=8 characters long; the first subtag is alphabetic with 2..=8
/// characters.
pub fn validate_locale(tag: &str) -> Result<(), I18nError> {
    let invalid = || I18nError::InvalidLocale(tag.to_owned());
    let mut subtags = tag.split(['-', '_']);

    let language = subtags.next().ok_or_else(invalid)?;
    if !(2..=8).contains(&language.len()) || !language.bytes().all(|b| b.is_ascii_alphabetic())
    {
        return Err(invalid());
    }

    for subtag in subtags {
        if !(1..=8).contains(&subtag.len()) || !subtag.bytes().all(|b| b.is_ascii_alphanumeric()) {
            return Err(invalid());
        }
    }
    Ok(())
}

fn normalize(tag: &str) -> String {
    tag.replace('_', "-")
}

/// Strings for a single locale, keyed by catalog key.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LocaleStrings {
    entries: HashMap<String, String>,
}

impl LocaleStrings {
    /// Create an empty string table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, text: impl Into<String>) -> Self {
        self.insert(key, text);
        self
    }

    /// Insert or overwrite a string, returning the previous text.
    pub fn insert(&mut self, key: impl Into<String>, text: impl Into<String>) -> Option<String> {
        self.entries.insert(key.into(), text.into())
    }

    /// Look up a key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// Number of keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the table has no keys.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Keys in sorted order.
    #[must_use]
    pub fn keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self.entries.keys().map(String::as_str).collect();
        keys.sort_unstable();
        keys
    }
}

/// Multi-locale string catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StringCatalog {
    locales: HashMap<String, LocaleStrings>,
    fallback_chain: Vec<String>,
}

impl Default for StringCatalog {
    fn default() -> Self {
        Self::new()
    }
}

impl StringCatalog {
    /// Create an empty catalog whose fallback chain is `["en"]`.
    #[must_use]
    pub fn new() -> Self {
        Self {
            locales: HashMap::new(),
            fallback_chain: vec!["en".to_owned()],
        }
    }

    /// Create a catalog preloaded with the English menu templates.
    #[must_use]
    pub fn with_defaults() -> Self {
        let mut catalog = Self::new();
        catalog.locales.insert(
            "en".to_owned(),
            LocaleStrings::new()
                .with(keys::UNDO_MENU, "Undo {action}")
                .with(keys::REDO_MENU, "Redo {action}")
                .with(keys::UNDO_MENU_BARE, "Undo")
                .with(keys::REDO_MENU_BARE, "Redo"),
        );
        catalog
    }

    /// Add (or merge into) a locale's string table.
    pub fn add_locale(
        &mut self,
        locale: &str,
        strings: LocaleStrings,
    ) -> Result<(), I18nError> {
        validate_locale(locale)?;
        let table = self.locales.entry(normalize(locale)).or_default();
        table.entries.extend(strings.entries);
        Ok(())
    }

    /// Insert a single string.
    pub fn insert(
        &mut self,
        locale: &str,
        key: impl Into<String>,
        text: impl Into<String>,
    ) -> Result<(), I18nError> {
        validate_locale(locale)?;
        self.locales
            .entry(normalize(locale))
            .or_default()
            .insert(key, text);
        Ok(())
    }

    /// Replace the fallback chain consulted after the requested locale.
    pub fn set_fallback_chain<I, S>(&mut self, chain: I) -> Result<(), I18nError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut normalized = Vec::new();
        for tag in chain {
            let tag = tag.as_ref();
            validate_locale(tag)?;
            normalized.push(normalize(tag));
        }
        self.fallback_chain = normalized;
        Ok(())
    }

    /// The fallback chain.
    #[must_use]
    pub fn fallback_chain(&self) -> &[String] {
        &self.fallback_chain
    }

    /// Whether the catalog has a table for exactly this locale.
    #[must_use]
    pub fn contains_locale(&self, locale: &str) -> bool {
        self.locales.contains_key(&normalize(locale))
    }

    /// Registered locales in sorted order.
    #[must_use]
    pub fn locales(&self) -> Vec<&str> {
        let mut locales: Vec<&str> = self.locales.keys().map(String::as_str).collect();
        locales.sort_unstable();
        locales
    }

    /// Locales visited when resolving a key for `locale`.
    #[must_use]
    pub fn resolution_chain(&self, locale: &str) -> Vec<String> {
        let requested = normalize(locale);
        let mut chain = Vec::with_capacity(2 + self.fallback_chain.len());
        let mut push = |tag: &str| {
            if !tag.is_empty() && !chain.iter().any(|t: &String| t == tag) {
                chain.push(tag.to_owned());
            }
        };

        push(&requested);
        if let Some((language, _)) = requested.split_once('-') {
            push(language);
        }
        for tag in &self.fallback_chain {
            push(tag);
        }
        chain
    }

    /// Resolve `key` for `locale`, walking the fallback chain.
    #[must_use]
    pub fn get(&self, locale: &str, key: &str) -> Option<&str> {
        self.resolution_chain(locale)
            .iter()
            .filter_map(|tag| self.locales.get(tag))
            .find_map(|table| table.get(key))
    }

    /// Resolve `key` for `locale` and interpolate `args` into it.
    #[must_use]
    pub fn format(&self, locale: &str, key: &str, args: &[(&str, &str)]) -> Option<String> {
        self.get(locale, key).map(|template| interpolate(template, args))
    }
}
