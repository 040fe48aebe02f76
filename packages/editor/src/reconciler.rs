//! # Visibility Reconciler
//!
//! Holds the two visibility maps of an editing session and derives the
//! effective one.
//!
//! ```text
//!   fetch ──→ hydrate ──→ authoritative ══ local
//!                                           │ toggle (unsaved intent)
//!   save ok ──→ commit ──→ authoritative = local
//!                                           │
//!                         effective() ←─────┘  (required forced on,
//!                                              gaps filled by category)
//! ```
//!
//! `local` always drives the live preview, so toggles show up immediately
//! and a failed save never loses them.

use folio_model::{
    Section, SectionRegistry, SectionVisibilityConfig, ValidationError, ValidationResult,
};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Where the current maps came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VisibilitySource {
    /// Nothing loaded; category defaults only
    Defaults,
    /// Seeded from the theme's denormalized copy for first paint
    ThemeFallback,
    /// Hydrated from the visibility endpoint
    Server,
}

#[derive(Debug, Clone)]
pub struct VisibilityReconciler {
    registry: Arc<SectionRegistry>,
    category: String,
    authoritative: SectionVisibilityConfig,
    local: SectionVisibilityConfig,
    source: VisibilitySource,
}

impl VisibilityReconciler {
    pub fn new(registry: Arc<SectionRegistry>, category: impl Into<String>) -> Self {
        let mut reconciler = Self {
            registry,
            category: category.into(),
            authoritative: SectionVisibilityConfig::new(),
            local: SectionVisibilityConfig::new(),
            source: VisibilitySource::Defaults,
        };
        let initial = reconciler.force_required(SectionVisibilityConfig::new());
        reconciler.authoritative = initial.clone();
        reconciler.local = initial;
        reconciler
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    /// Switch template category.
    ///
    /// Explicit entries are kept; sections the user never toggled follow
    /// the new category's defaults.
    pub fn set_category(&mut self, category: impl Into<String>) {
        self.category = category.into();
    }

    pub fn source(&self) -> VisibilitySource {
        self.source
    }

    /// Adopt a persisted config as both authoritative and local state.
    ///
    /// Missing entries are left missing: they resolve through the category
    /// defaults, so a section introduced after the user's data was created
    /// follows its category instead of disappearing.
    pub fn hydrate(&mut self, config: SectionVisibilityConfig) {
        let config = self.force_required(config);
        self.authoritative = config.clone();
        self.local = config;
        self.source = VisibilitySource::Server;
    }

    /// First-paint seed from the theme's copy of the enabled map.
    ///
    /// Ignored once the visibility endpoint has been hydrated.
    pub fn seed_from_theme(&mut self, enabled_sections: &BTreeMap<String, bool>) -> bool {
        if self.source == VisibilitySource::Server {
            tracing::debug!("Ignoring theme visibility copy, server state already loaded");
            return false;
        }

        let seeded = self.force_required(enabled_sections.clone().into());
        self.authoritative = seeded.clone();
        self.local = seeded;
        self.source = VisibilitySource::ThemeFallback;
        true
    }

    /// Record an unsaved toggle. Required and unknown sections are rejected.
    pub fn toggle(&mut self, section_id: &str, enabled: bool) -> ValidationResult<()> {
        if !self.registry.contains(section_id) {
            return Err(ValidationError::unknown_section(section_id));
        }
        if self.registry.is_required(section_id) {
            return Err(ValidationError::required_section(section_id));
        }

        self.local.set(section_id, enabled);
        Ok(())
    }

    /// Local state was persisted: make it authoritative
    pub fn commit(&mut self) {
        self.authoritative = self.local.clone();
    }

    /// Commit exactly what was persisted, keeping toggles made since
    pub fn commit_snapshot(&mut self, persisted: SectionVisibilityConfig) {
        self.authoritative = persisted;
    }

    /// Drop unsaved toggles
    pub fn revert(&mut self) {
        self.local = self.authoritative.clone();
    }

    /// Local differs from what was last persisted
    pub fn is_dirty(&self) -> bool {
        self.local != self.authoritative
    }

    pub fn authoritative(&self) -> &SectionVisibilityConfig {
        &self.authoritative
    }

    pub fn local(&self) -> &SectionVisibilityConfig {
        &self.local
    }

    pub fn is_enabled(&self, section_id: &str) -> bool {
        self.effective_value(&self.category, section_id)
    }

    /// The map that drives navigation and preview
    pub fn effective(&self) -> SectionVisibilityConfig {
        self.registry
            .list_sections()
            .iter()
            .map(|s| (s.id.clone(), self.effective_value(&self.category, &s.id)))
            .collect()
    }

    pub fn visible_sections(&self) -> Vec<Section> {
        self.visible_sections_for(&self.category)
    }

    /// Registry sections enabled under `category`, in ordinal order
    pub fn visible_sections_for(&self, category: &str) -> Vec<Section> {
        self.registry
            .list_sections()
            .iter()
            .filter(|s| self.effective_value(category, &s.id))
            .cloned()
            .collect()
    }

    pub fn visible_ids(&self) -> Vec<String> {
        self.visible_sections().into_iter().map(|s| s.id).collect()
    }

    fn effective_value(&self, category: &str, section_id: &str) -> bool {
        if self.registry.is_required(section_id) {
            return true;
        }
        match self.local.get(section_id) {
            Some(enabled) => enabled,
            None => self.registry.is_default_enabled(category, section_id),
        }
    }

    fn force_required(&self, mut config: SectionVisibilityConfig) -> SectionVisibilityConfig {
        for id in self.registry.required_ids() {
            config.set(id, true);
        }
        config
    }
}
