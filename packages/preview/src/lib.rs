//! # Folio Preview
//!
//! Builds the render bundle handed to portfolio templates.
//!
//! Templates themselves are external: they receive a [`RenderBundle`]
//! (section content in registry order, a fully resolved theme, and a
//! `has_data` answer per section) and never look at editing state directly.

mod bundle;
mod composer;

pub use bundle::{RenderBundle, RenderMode, RenderedSection, ResolvedTheme};
pub use composer::{compose, has_data, resolve_theme, ContentLookup};
