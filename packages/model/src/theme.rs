use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const DEFAULT_FONT: &str = "Poppins";
pub const DEFAULT_COLOR_MODE: &str = "default";

/// Presentation settings for a portfolio
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThemeConfig {
    #[serde(default = "default_color_mode")]
    pub color_mode: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preset_theme: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_style: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub navigation_bar: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub footer: Option<String>,

    /// Denormalized copy of the visibility map, only good for first paint
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled_sections: Option<BTreeMap<String, bool>>,
}

fn default_color_mode() -> String {
    DEFAULT_COLOR_MODE.to_string()
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            color_mode: default_color_mode(),
            preset_theme: None,
            font_style: Some(DEFAULT_FONT.to_string()),
            navigation_bar: None,
            footer: None,
            enabled_sections: None,
        }
    }
}

impl ThemeConfig {
    /// Font to render with, falling back when unset or blank
    pub fn resolved_font(&self) -> &str {
        self.font_style
            .as_deref()
            .filter(|f| !f.trim().is_empty())
            .unwrap_or(DEFAULT_FONT)
    }

    pub fn resolved_color_mode(&self) -> &str {
        if self.color_mode.trim().is_empty() {
            DEFAULT_COLOR_MODE
        } else {
            &self.color_mode
        }
    }

    /// Merge a partial update, leaving untouched fields as they are
    pub fn merge(&mut self, patch: &ThemePatch) {
        if let Some(color_mode) = &patch.color_mode {
            self.color_mode = color_mode.clone();
        }
        if let Some(preset) = patch.preset_theme {
            self.preset_theme = Some(preset);
        }
        if let Some(font) = &patch.font_style {
            self.font_style = Some(font.clone());
        }
        if let Some(nav) = &patch.navigation_bar {
            self.navigation_bar = Some(nav.clone());
        }
        if let Some(footer) = &patch.footer {
            self.footer = Some(footer.clone());
        }
        if let Some(sections) = &patch.enabled_sections {
            self.enabled_sections = Some(sections.clone());
        }
    }
}

/// Partial theme update
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThemePatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color_mode: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preset_theme: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_style: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub navigation_bar: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub footer: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled_sections: Option<BTreeMap<String, bool>>,
}

impl ThemePatch {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_theme() {
        let theme = ThemeConfig::default();
        assert_eq!(theme.resolved_font(), "Poppins");
        assert_eq!(theme.resolved_color_mode(), "default");
    }

    #[test]
    fn test_blank_font_falls_back() {
        let theme = ThemeConfig {
            font_style: Some("  ".to_string()),
            ..ThemeConfig::default()
        };
        assert_eq!(theme.resolved_font(), DEFAULT_FONT);
    }

    #[test]
    fn test_deserialize_sparse_theme() {
        let theme: ThemeConfig = serde_json::from_str(r#"{ "fontStyle": "Inter" }"#).unwrap();
        assert_eq!(theme.color_mode, "default");
        assert_eq!(theme.resolved_font(), "Inter");
        assert!(theme.enabled_sections.is_none());
    }

    #[test]
    fn test_merge_keeps_untouched_fields() {
        let mut theme = ThemeConfig {
            footer: Some("minimal".to_string()),
            ..ThemeConfig::default()
        };

        theme.merge(&ThemePatch {
            color_mode: Some("dark".to_string()),
            ..ThemePatch::default()
        });

        assert_eq!(theme.color_mode, "dark");
        assert_eq!(theme.footer.as_deref(), Some("minimal"));
        assert_eq!(theme.resolved_font(), "Poppins");
    }
}
