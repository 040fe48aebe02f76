//! # Section Registry
//!
//! Static catalog of the portfolio sections an editor knows about.
//!
//! The registry answers three questions and never performs I/O:
//! - which sections exist, and in what order they are presented
//! - which sections are required (cannot be disabled)
//! - which sections a template category enables by default
//!
//! Unknown categories fall back to the minimal set of required sections.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};

pub const BASICS: &str = "basics";
pub const ABOUT: &str = "about";
pub const SKILLS: &str = "skills";
pub const EXPERIENCE: &str = "experience";
pub const EDUCATION: &str = "education";
pub const PROJECTS: &str = "projects";
pub const PUBLICATIONS: &str = "publications";
pub const CERTIFICATIONS: &str = "certifications";
pub const AWARDS: &str = "awards";
pub const SERVICES: &str = "services";

/// Default set used for categories the registry has never heard of
const FALLBACK_DEFAULTS: [&str; 2] = [BASICS, ABOUT];

/// Shape of a section's content payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ContentKind {
    /// Single object of named fields (basics, about)
    Record,
    /// Array of records (skills, experience, ...)
    List,
}

impl ContentKind {
    /// Empty payload used before a section has any content
    pub fn empty(self) -> Value {
        match self {
            ContentKind::Record => Value::Object(Default::default()),
            ContentKind::List => Value::Array(Vec::new()),
        }
    }
}

/// Immutable catalog entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Section {
    pub id: String,
    pub label: String,
    pub required: bool,
    pub ordinal: u32,
    pub kind: ContentKind,

    /// Fields that must be non-blank before a full save is allowed
    #[serde(default)]
    pub mandatory_fields: Vec<String>,
}

impl Section {
    pub fn new(id: impl Into<String>, label: impl Into<String>, ordinal: u32, kind: ContentKind) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            required: false,
            ordinal,
            kind,
            mandatory_fields: Vec::new(),
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn with_mandatory_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.mandatory_fields = fields.into_iter().map(Into::into).collect();
        self
    }
}

/// Catalog of known sections plus per-category defaults
#[derive(Debug, Clone, PartialEq)]
pub struct SectionRegistry {
    /// Sorted by ordinal
    sections: Vec<Section>,
    categories: BTreeMap<String, BTreeSet<String>>,
}

impl SectionRegistry {
    pub fn builder() -> SectionRegistryBuilder {
        SectionRegistryBuilder::default()
    }

    /// The catalog shipped with the editor
    pub fn standard() -> Self {
        use ContentKind::{List, Record};

        Self::builder()
            .section(
                Section::new(BASICS, "Basics", 0, Record)
                    .required()
                    .with_mandatory_fields(["name", "email"]),
            )
            .section(
                Section::new(ABOUT, "About", 1, Record)
                    .required()
                    .with_mandatory_fields(["description"]),
            )
            .section(Section::new(SKILLS, "Skills", 2, List))
            .section(Section::new(EXPERIENCE, "Experience", 3, List))
            .section(Section::new(EDUCATION, "Education", 4, List))
            .section(Section::new(PROJECTS, "Projects", 5, List))
            .section(Section::new(PUBLICATIONS, "Publications", 6, List))
            .section(Section::new(CERTIFICATIONS, "Certifications", 7, List))
            .section(Section::new(AWARDS, "Awards", 8, List))
            .section(Section::new(SERVICES, "Services", 9, List))
            .category(
                "developer",
                [BASICS, ABOUT, SKILLS, EXPERIENCE, EDUCATION, PROJECTS],
            )
            .category(
                "designer",
                [BASICS, ABOUT, SKILLS, EXPERIENCE, PROJECTS, SERVICES],
            )
            .category(
                "academic",
                [BASICS, ABOUT, EDUCATION, EXPERIENCE, PUBLICATIONS, AWARDS],
            )
            .category(
                "professional",
                [BASICS, ABOUT, EXPERIENCE, EDUCATION, SKILLS, CERTIFICATIONS, AWARDS],
            )
            .category("minimal", [BASICS, ABOUT])
            .build()
    }

    /// All sections in stable ordinal order
    pub fn list_sections(&self) -> &[Section] {
        &self.sections
    }

    pub fn get(&self, id: &str) -> Option<&Section> {
        self.sections.iter().find(|s| s.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    pub fn is_required(&self, id: &str) -> bool {
        self.get(id).map(|s| s.required).unwrap_or(false)
    }

    /// Content shape for a section (unknown ids are treated as records)
    pub fn content_kind(&self, id: &str) -> ContentKind {
        self.get(id).map(|s| s.kind).unwrap_or(ContentKind::Record)
    }

    pub fn mandatory_fields(&self, id: &str) -> &[String] {
        self.get(id).map(|s| s.mandatory_fields.as_slice()).unwrap_or(&[])
    }

    pub fn required_ids(&self) -> impl Iterator<Item = &str> {
        self.sections.iter().filter(|s| s.required).map(|s| s.id.as_str())
    }

    /// Sections a category enables out of the box.
    ///
    /// Required sections are always part of the set.
    pub fn default_enabled_ids(&self, category: &str) -> BTreeSet<String> {
        let mut ids = match self.categories.get(category) {
            Some(ids) => ids.clone(),
            None => FALLBACK_DEFAULTS
                .iter()
                .filter(|id| self.contains(id))
                .map(|id| id.to_string())
                .collect(),
        };
        ids.extend(self.required_ids().map(str::to_string));
        ids
    }

    pub fn is_default_enabled(&self, category: &str, id: &str) -> bool {
        self.is_required(id)
            || match self.categories.get(category) {
                Some(ids) => ids.contains(id),
                None => FALLBACK_DEFAULTS.contains(&id),
            }
    }

    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.categories.keys().map(String::as_str)
    }
}

impl Default for SectionRegistry {
    fn default() -> Self {
        Self::standard()
    }
}

#[derive(Debug, Default)]
pub struct SectionRegistryBuilder {
    sections: Vec<Section>,
    categories: BTreeMap<String, BTreeSet<String>>,
}

impl SectionRegistryBuilder {
    /// Add a section; a later entry with the same id replaces the earlier one
    pub fn section(mut self, section: Section) -> Self {
        self.sections.retain(|s| s.id != section.id);
        self.sections.push(section);
        self
    }

    pub fn category<I, S>(mut self, key: impl Into<String>, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.categories
            .insert(key.into(), ids.into_iter().map(Into::into).collect());
        self
    }

    pub fn build(mut self) -> SectionRegistry {
        self.sections.sort_by(|a, b| a.ordinal.cmp(&b.ordinal).then_with(|| a.id.cmp(&b.id)));

        // Category defaults may only name sections that exist
        let known: BTreeSet<String> = self.sections.iter().map(|s| s.id.clone()).collect();
        for ids in self.categories.values_mut() {
            ids.retain(|id| known.contains(id));
        }

        SectionRegistry {
            sections: self.sections,
            categories: self.categories,
        }
    }
}
