use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Which template a user has active, as persisted by the backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActiveTemplateBinding {
    pub template_id: String,

    /// Template category, used to pick default-enabled sections
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,

    /// Legacy aggregate blob of section content, keyed by section id
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub data: Value,
}

impl ActiveTemplateBinding {
    pub fn new(template_id: impl Into<String>) -> Self {
        Self {
            template_id: template_id.into(),
            category: None,
            data: Value::Null,
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_data(mut self, data: Value) -> Self {
        self.data = data;
        self
    }

    /// Content the legacy blob holds for one section, if any
    pub fn legacy_content(&self, section_id: &str) -> Option<&Value> {
        self.data.get(section_id).filter(|v| !v.is_null())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_deserialize_binding_without_blob() {
        let binding: ActiveTemplateBinding =
            serde_json::from_value(json!({ "templateId": "aurora" })).unwrap();

        assert_eq!(binding.template_id, "aurora");
        assert!(binding.category.is_none());
        assert!(binding.legacy_content("basics").is_none());
    }

    #[test]
    fn test_legacy_content_lookup() {
        let binding = ActiveTemplateBinding::new("aurora")
            .with_data(json!({ "skills": [{ "name": "Rust" }], "about": null }));

        assert!(binding.legacy_content("skills").is_some());
        assert!(binding.legacy_content("about").is_none());
    }
}
