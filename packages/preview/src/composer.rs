//! # Preview Composer
//!
//! Turns editing state into a [`RenderBundle`].
//!
//! Composition is a pure function of its inputs:
//!
//! ```text
//! visible sections ─┐
//! section content ──┼──→ compose(mode) ──→ RenderBundle
//! theme ────────────┤
//! template id ──────┘
//! ```
//!
//! The caller decides which sections are visible (enabled); the composer
//! decides which of those are renderable under the requested mode.

use crate::bundle::{RenderBundle, RenderMode, RenderedSection, ResolvedTheme};
use folio_model::{ContentKind, Section, SectionContent, ThemeConfig};
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};

/// Read-only access to section content, keyed by section id
pub trait ContentLookup {
    fn section_content(&self, id: &str) -> Option<&SectionContent>;
}

impl ContentLookup for HashMap<String, SectionContent> {
    fn section_content(&self, id: &str) -> Option<&SectionContent> {
        self.get(id)
    }
}

impl ContentLookup for BTreeMap<String, SectionContent> {
    fn section_content(&self, id: &str) -> Option<&SectionContent> {
        self.get(id)
    }
}

/// Whether a section's content would show anything to a visitor.
///
/// Records need at least one non-blank string or non-empty array field.
/// Lists need at least one entry; a record wrapping a list is accepted too.
pub fn has_data(kind: ContentKind, content: &Value) -> bool {
    match (kind, content) {
        (_, Value::Null) => false,
        (ContentKind::List, Value::Array(items)) => !items.is_empty(),
        (_, Value::Object(fields)) => fields.values().any(shows_something),
        (_, other) => shows_something(other),
    }
}

fn shows_something(value: &Value) -> bool {
    match value {
        Value::String(s) => !s.trim().is_empty(),
        Value::Array(items) => !items.is_empty(),
        _ => false,
    }
}

pub fn resolve_theme(theme: &ThemeConfig) -> ResolvedTheme {
    ResolvedTheme {
        font_style: theme.resolved_font().to_string(),
        color_mode: theme.resolved_color_mode().to_string(),
        preset_theme: theme.preset_theme,
        navigation_bar: theme.navigation_bar.clone(),
        footer: theme.footer.clone(),
    }
}

/// Compose the bundle a template renders.
///
/// `visible` must already be filtered by effective visibility and sorted.
/// Sections without loaded content render with their kind's empty value.
pub fn compose<C>(
    visible: &[Section],
    content: &C,
    theme: &ThemeConfig,
    template_id: Option<&str>,
    mode: RenderMode,
) -> RenderBundle
where
    C: ContentLookup + ?Sized,
{
    let sections: Vec<RenderedSection> = visible
        .iter()
        .filter_map(|section| {
            let content = content
                .section_content(&section.id)
                .cloned()
                .unwrap_or_else(|| section.kind.empty());
            let has_data = has_data(section.kind, &content);

            if !mode.admits(has_data) {
                tracing::debug!("Skipping empty section '{}' in {:?} mode", section.id, mode);
                return None;
            }

            Some(RenderedSection {
                id: section.id.clone(),
                label: section.label.clone(),
                content,
                has_data,
            })
        })
        .collect();

    RenderBundle::new(
        template_id.map(str::to_string),
        mode,
        resolve_theme(theme),
        sections,
    )
}
