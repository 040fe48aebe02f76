//! Render bundle handed to templates

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Which sections a template is allowed to show
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RenderMode {
    /// Author-facing: every enabled section, empty ones as placeholders
    Preview,
    /// Visitor-facing: enabled sections that actually have content
    Public,
}

impl RenderMode {
    pub fn admits(self, has_data: bool) -> bool {
        match self {
            RenderMode::Preview => true,
            RenderMode::Public => has_data,
        }
    }
}

/// Theme values with every fallback already applied
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedTheme {
    pub font_style: String,
    pub color_mode: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preset_theme: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub navigation_bar: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub footer: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderedSection {
    pub id: String,
    pub label: String,
    pub content: Value,
    pub has_data: bool,
}

/// Everything a template renderer consumes for one render.
///
/// Sections keep registry order. A bundle is never mutated after
/// composition; recompose to reflect new state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderBundle {
    template_id: Option<String>,
    mode: RenderMode,
    theme: ResolvedTheme,
    sections: Vec<RenderedSection>,
}

impl RenderBundle {
    pub(crate) fn new(
        template_id: Option<String>,
        mode: RenderMode,
        theme: ResolvedTheme,
        sections: Vec<RenderedSection>,
    ) -> Self {
        Self {
            template_id,
            mode,
            theme,
            sections,
        }
    }

    pub fn template_id(&self) -> Option<&str> {
        self.template_id.as_deref()
    }

    pub fn mode(&self) -> RenderMode {
        self.mode
    }

    pub fn theme(&self) -> &ResolvedTheme {
        &self.theme
    }

    pub fn sections(&self) -> &[RenderedSection] {
        &self.sections
    }

    pub fn section_ids(&self) -> Vec<&str> {
        self.sections.iter().map(|s| s.id.as_str()).collect()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.section(id).is_some()
    }

    pub fn section(&self, id: &str) -> Option<&RenderedSection> {
        self.sections.iter().find(|s| s.id == id)
    }

    pub fn content(&self, id: &str) -> Option<&Value> {
        self.section(id).map(|s| &s.content)
    }

    /// False for sections that are not part of the bundle
    pub fn has_data(&self, id: &str) -> bool {
        self.section(id).map(|s| s.has_data).unwrap_or(false)
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// `{ sectionId: content }` map in the shape templates take as props
    pub fn data(&self) -> Map<String, Value> {
        self.sections
            .iter()
            .map(|s| (s.id.clone(), s.content.clone()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_mode_admission() {
        assert!(RenderMode::Preview.admits(false));
        assert!(RenderMode::Public.admits(true));
        assert!(!RenderMode::Public.admits(false));
    }
}
