#![forbid(unsafe_code)]

//! Localization foundation for retrace.
//!
//! Provides key-based string lookup with locale fallback chains and
//! `{name}` variable interpolation.
//!
//! # Role in retrace
//! Undo/redo action names and the "Undo …"/"Redo …" menu titles are display
//! strings. `retrace-i18n` resolves them for the active locale so the core
//! can stay locale-agnostic.
//!
//! # How it fits in the system
//! `retrace-core` uses [`interpolate`] to render fallback names, and
//! `retrace-history` owns a [`StringCatalog`] to localize names and menu
//! titles. This crate has no dependencies of its own.

pub mod catalog;
pub mod interpolate;

pub use catalog::{I18nError, LocaleStrings, StringCatalog, keys, validate_locale};
pub use interpolate::interpolate;
