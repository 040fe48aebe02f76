//! Per-user map of which sections are switched on

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Mapping from section id to its `isEnabled` flag
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SectionVisibilityConfig {
    entries: BTreeMap<String, bool>,
}

impl SectionVisibilityConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stored value for a section, if any
    pub fn get(&self, id: &str) -> Option<bool> {
        self.entries.get(id).copied()
    }

    pub fn set(&mut self, id: impl Into<String>, enabled: bool) {
        self.entries.insert(id.into(), enabled);
    }

    pub fn contains(&self, id: &str) -> bool {
        self.entries.contains_key(id)
    }

    pub fn remove(&mut self, id: &str) -> Option<bool> {
        self.entries.remove(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, bool)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), *v))
    }

    pub fn enabled_ids(&self) -> impl Iterator<Item = &str> {
        self.iter().filter(|(_, enabled)| *enabled).map(|(id, _)| id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn as_map(&self) -> &BTreeMap<String, bool> {
        &self.entries
    }
}

impl From<BTreeMap<String, bool>> for SectionVisibilityConfig {
    fn from(entries: BTreeMap<String, bool>) -> Self {
        Self { entries }
    }
}

impl<S: Into<String>> FromIterator<(S, bool)> for SectionVisibilityConfig {
    fn from_iter<I: IntoIterator<Item = (S, bool)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serializes_as_plain_map() {
        let config: SectionVisibilityConfig = [("skills", true), ("projects", false)].into_iter().collect();
        let json = serde_json::to_value(&config).unwrap();

        assert_eq!(json, serde_json::json!({ "projects": false, "skills": true }));
    }

    #[test]
    fn test_enabled_ids() {
        let config: SectionVisibilityConfig =
            [("about", true), ("skills", false), ("basics", true)].into_iter().collect();
        let enabled: Vec<_> = config.enabled_ids().collect();

        assert_eq!(enabled, vec!["about", "basics"]);
    }
}
