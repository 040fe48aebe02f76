//! # Editor Session
//!
//! Orchestrates one user's editing session.
//!
//! ```text
//! Idle ──start()──→ Loading ──→ Ready ──switch_template()──→ Loading ──→ Ready
//!                      │
//!                      └──(template or visibility fetch fails)──→ FatalError
//!                                                                   │
//!                                               retry() ←───────────┘
//! ```
//!
//! The session owns the reconciler and the section store; nothing else
//! writes visibility or section content. Forms, navigation and the preview
//! panel read derived state (`visible_sections`, `render_bundle`) and push
//! edits back through `toggle_section` / `update_section_content`.
//!
//! Nothing is retried automatically and nothing is auto-saved.

use crate::{
    EditorConfig, EditorError, LoadOutcome, LoadTicket, SectionDataStore, SlotStatus,
    VisibilityReconciler,
};
use folio_gateway::{GatewayError, PersistenceGateway};
use folio_model::{
    field_is_filled, ActiveTemplateBinding, Section, SectionContent, SectionRegistry,
    ThemeConfig, ThemePatch, ValidationError,
};
use folio_preview::{compose, RenderBundle, RenderMode};
use futures::future::join_all;
use std::collections::BTreeMap;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    Idle,
    Loading,
    Ready,
    /// Bootstrap failed; only `retry()` leaves this state
    FatalError,
}

/// Per-section flags exposed to forms and navigation
#[derive(Debug, Clone, PartialEq)]
pub struct SectionState {
    pub status: SlotStatus,
    pub dirty: bool,
    pub error: Option<GatewayError>,
}

/// Read-only snapshot of everything the UI derives its chrome from
#[derive(Debug, Clone, PartialEq)]
pub struct EditorSessionState {
    pub status: SessionStatus,
    pub settings_generation: u64,
    pub visible_sections: Vec<Section>,
    pub sections: BTreeMap<String, SectionState>,
    pub focused_section: Option<String>,
    pub fatal_error: Option<GatewayError>,
}

/// Outcome of `save_all`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SaveReport {
    pub saved: Vec<String>,
    pub failed: Vec<(String, GatewayError)>,
    pub settings_saved: bool,
    pub settings_error: Option<GatewayError>,
}

impl SaveReport {
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty() && self.settings_error.is_none()
    }
}

pub struct EditorSession {
    user_id: String,
    gateway: Arc<dyn PersistenceGateway>,
    registry: Arc<SectionRegistry>,
    config: EditorConfig,

    reconciler: VisibilityReconciler,
    store: SectionDataStore,
    theme: ThemeConfig,
    template: Option<ActiveTemplateBinding>,

    status: SessionStatus,
    fatal_error: Option<GatewayError>,
    /// Theme fetch failure (non-fatal; defaults are in use)
    theme_error: Option<GatewayError>,
    /// Bumped on every committed settings save and template switch
    settings_generation: u64,
    /// Section the UI should scroll to after a validation failure
    focused_section: Option<String>,
}

impl EditorSession {
    pub fn new(
        user_id: impl Into<String>,
        gateway: Arc<dyn PersistenceGateway>,
        registry: Arc<SectionRegistry>,
        config: EditorConfig,
    ) -> Self {
        let reconciler = VisibilityReconciler::new(registry.clone(), config.default_category.clone());
        let store = SectionDataStore::new(registry.clone());

        Self {
            user_id: user_id.into(),
            gateway,
            registry,
            config,
            reconciler,
            store,
            theme: ThemeConfig::default(),
            template: None,
            status: SessionStatus::Idle,
            fatal_error: None,
            theme_error: None,
            settings_generation: 0,
            focused_section: None,
        }
    }

    /// Session over the standard section catalog and default config
    pub fn with_defaults(user_id: impl Into<String>, gateway: Arc<dyn PersistenceGateway>) -> Self {
        Self::new(
            user_id,
            gateway,
            Arc::new(SectionRegistry::standard()),
            EditorConfig::default(),
        )
    }

    /// Bootstrap: template, then visibility + theme, then enabled sections.
    ///
    /// Template and visibility failures are fatal. Theme and individual
    /// section failures degrade to defaults.
    pub async fn start(&mut self) -> Result<(), EditorError> {
        tracing::info!("Starting editor session for user {}", self.user_id);
        self.status = SessionStatus::Loading;
        self.fatal_error = None;
        self.theme_error = None;

        let gateway = Arc::clone(&self.gateway);
        let user_id = self.user_id.clone();

        let binding = match gateway.fetch_active_template(&user_id).await {
            Ok(binding) => binding,
            Err(e) => return Err(self.fail(e)),
        };
        self.apply_binding(binding);

        let (visibility, theme) = futures::join!(
            gateway.fetch_visibility(&user_id),
            gateway.fetch_theme(&user_id)
        );

        match theme {
            Ok(theme) => {
                if let Some(copy) = &theme.enabled_sections {
                    self.reconciler.seed_from_theme(copy);
                }
                self.theme = theme;
            }
            Err(GatewayError::NotFound) => {
                tracing::debug!("No theme stored for user {}, using defaults", user_id);
                self.theme = ThemeConfig::default();
            }
            Err(e) => {
                tracing::warn!("Failed to load theme, using defaults: {}", e);
                self.theme = ThemeConfig::default();
                self.theme_error = Some(e);
            }
        }

        let visibility = match visibility {
            Ok(visibility) => visibility,
            Err(e) => return Err(self.fail(e)),
        };
        self.reconciler.hydrate(visibility);

        let enabled = self.reconciler.visible_ids();
        self.load_sections(&enabled).await;

        self.status = SessionStatus::Ready;
        tracing::info!(
            "Editor session ready with {} visible sections",
            self.reconciler.visible_ids().len()
        );
        Ok(())
    }

    /// User-initiated retry after a fatal bootstrap error
    pub async fn retry(&mut self) -> Result<(), EditorError> {
        self.start().await
    }

    fn fail(&mut self, error: GatewayError) -> EditorError {
        tracing::error!("Editor session failed to bootstrap: {}", error);
        self.status = SessionStatus::FatalError;
        self.fatal_error = Some(error.clone());
        EditorError::FatalBootstrap(error)
    }

    fn ensure_ready(&self) -> Result<(), EditorError> {
        match self.status {
            SessionStatus::Ready => Ok(()),
            _ => Err(EditorError::NotReady),
        }
    }

    fn apply_binding(&mut self, binding: Option<ActiveTemplateBinding>) {
        let category = binding
            .as_ref()
            .and_then(|b| b.category.clone())
            .unwrap_or_else(|| self.config.default_category.clone());
        self.reconciler.set_category(category);
        self.template = binding;
    }

    /// Fetch several sections concurrently; each result only touches its slot
    async fn load_sections(&mut self, section_ids: &[String]) -> Vec<(String, LoadOutcome)> {
        if section_ids.is_empty() {
            return Vec::new();
        }

        let tickets: Vec<LoadTicket> = section_ids
            .iter()
            .map(|id| self.store.begin_load(id))
            .collect();

        let gateway = Arc::clone(&self.gateway);
        let user_id = self.user_id.clone();
        let results = join_all(
            tickets
                .iter()
                .map(|t| gateway.fetch_section_content(&user_id, &t.section_id)),
        )
        .await;

        let mut outcomes = Vec::with_capacity(tickets.len());
        for (ticket, result) in tickets.into_iter().zip(results) {
            let fallback = match &result {
                Err(GatewayError::NotFound) => self
                    .template
                    .as_ref()
                    .and_then(|b| b.legacy_content(&ticket.section_id))
                    .cloned(),
                _ => None,
            };
            let section_id = ticket.section_id.clone();
            let outcome = self.store.complete_load(ticket, result, fallback);
            outcomes.push((section_id, outcome));
        }
        outcomes
    }

    /// Visible sections whose content has never been fetched or edited
    fn unpopulated_visible_ids(&self) -> Vec<String> {
        self.reconciler
            .visible_ids()
            .into_iter()
            .filter(|id| !self.store.is_populated(id))
            .collect()
    }

    /// Local visibility toggle; shows in the preview immediately
    pub fn toggle_section(&mut self, section_id: &str, enabled: bool) -> Result<(), EditorError> {
        if let Err(e) = self.reconciler.toggle(section_id, enabled) {
            tracing::debug!("Rejected toggle of '{}': {}", section_id, e);
            return Err(e.into());
        }
        Ok(())
    }

    /// Discard unsaved visibility toggles
    pub fn revert_settings(&mut self) {
        self.reconciler.revert();
    }

    /// Persist visibility, then fetch sections that just became visible.
    ///
    /// Returns the ids that were lazily loaded. On failure the local toggles
    /// stay in place so the user can retry.
    pub async fn save_settings(&mut self) -> Result<Vec<String>, EditorError> {
        self.ensure_ready()?;

        let snapshot = self.reconciler.local().clone();
        if let Err(e) = self.gateway.save_visibility(&self.user_id, &snapshot).await {
            tracing::warn!("Failed to save section visibility: {}", e);
            return Err(e.into());
        }

        self.reconciler.commit_snapshot(snapshot.clone());
        self.settings_generation += 1;
        tracing::info!(
            "Section visibility saved (generation {})",
            self.settings_generation
        );

        // Keep the theme's first-paint copy in step; never read back as truth
        let patch = ThemePatch {
            enabled_sections: Some(snapshot.as_map().clone()),
            ..ThemePatch::default()
        };
        match self.gateway.save_theme(&self.user_id, &patch).await {
            Ok(()) => self.theme.merge(&patch),
            Err(e) => tracing::warn!("Failed to mirror visibility into theme: {}", e),
        }

        let newly_visible = self.unpopulated_visible_ids();
        self.load_sections(&newly_visible).await;
        Ok(newly_visible)
    }

    pub fn section_content(&self, section_id: &str) -> Option<&SectionContent> {
        self.store.content(section_id)
    }

    /// Local edit from a form; never touches the network
    pub fn update_section_content(
        &mut self,
        section_id: &str,
        content: SectionContent,
    ) -> Result<(), EditorError> {
        if !self.registry.contains(section_id) {
            return Err(ValidationError::unknown_section(section_id).into());
        }
        self.store.update(section_id, content);
        Ok(())
    }

    pub async fn save_section(&mut self, section_id: &str) -> Result<(), EditorError> {
        self.ensure_ready()?;
        self.store
            .save(self.gateway.as_ref(), &self.user_id, section_id)
            .await
    }

    /// Re-fetch one section after a failed load
    pub async fn retry_section(&mut self, section_id: &str) -> Result<LoadOutcome, EditorError> {
        self.ensure_ready()?;
        if !self.registry.contains(section_id) {
            return Err(ValidationError::unknown_section(section_id).into());
        }

        let ids = [section_id.to_string()];
        let outcome = self
            .load_sections(&ids)
            .await
            .into_iter()
            .next()
            .map(|(_, outcome)| outcome)
            .unwrap_or(LoadOutcome::Stale);
        Ok(outcome)
    }

    /// Mandatory fields of every required section must be filled
    pub fn validate_required(&self) -> Result<(), ValidationError> {
        for section in self.registry.list_sections().iter().filter(|s| s.required) {
            let empty = section.kind.empty();
            let content = self.store.content(&section.id).unwrap_or(&empty);

            if let Some(field) = section
                .mandatory_fields
                .iter()
                .find(|field| !field_is_filled(content, field))
            {
                return Err(ValidationError::missing_field(&section.id, field));
            }
        }
        Ok(())
    }

    /// Save every dirty section, then unsaved visibility.
    ///
    /// Blocks before any network call if a required section is incomplete
    /// and moves focus to it.
    pub async fn save_all(&mut self) -> Result<SaveReport, EditorError> {
        self.ensure_ready()?;

        if let Err(e) = self.validate_required() {
            tracing::debug!("Save blocked: {}", e);
            self.focused_section = Some(e.section_id().to_string());
            return Err(e.into());
        }
        self.focused_section = None;

        let tickets = self
            .store
            .dirty_ids()
            .iter()
            .map(|id| self.store.begin_save(id))
            .collect::<Result<Vec<_>, _>>()?;

        let gateway = Arc::clone(&self.gateway);
        let user_id = self.user_id.clone();
        let results = join_all(
            tickets
                .iter()
                .map(|t| gateway.save_section_content(&user_id, &t.section_id, &t.content)),
        )
        .await;

        let mut report = SaveReport::default();
        for (ticket, result) in tickets.into_iter().zip(results) {
            let section_id = ticket.section_id.clone();
            match self.store.complete_save(ticket, result) {
                Ok(()) => report.saved.push(section_id),
                Err(e) => report.failed.push((section_id, e)),
            }
        }

        if self.reconciler.is_dirty() {
            match self.save_settings().await {
                Ok(_) => report.settings_saved = true,
                Err(EditorError::Gateway(e)) => report.settings_error = Some(e),
                Err(e) => return Err(e),
            }
        }

        tracing::info!(
            "Saved {} sections, {} failed",
            report.saved.len(),
            report.failed.len()
        );
        Ok(report)
    }

    /// Persist a partial theme change and merge it on acknowledgement.
    ///
    /// The enabled-sections copy is owned by settings saves and is ignored here.
    pub async fn update_theme(&mut self, mut patch: ThemePatch) -> Result<(), EditorError> {
        self.ensure_ready()?;
        patch.enabled_sections = None;
        if patch.is_empty() {
            return Ok(());
        }

        self.gateway.save_theme(&self.user_id, &patch).await?;
        self.theme.merge(&patch);
        self.theme_error = None;
        Ok(())
    }

    /// Activate another template and load whatever it newly shows
    pub async fn switch_template(&mut self, binding: ActiveTemplateBinding) -> Result<(), EditorError> {
        self.ensure_ready()?;
        tracing::info!("Switching template to {}", binding.template_id);

        self.status = SessionStatus::Loading;
        self.apply_binding(Some(binding));
        self.settings_generation += 1;

        let missing = self.unpopulated_visible_ids();
        self.load_sections(&missing).await;

        self.status = SessionStatus::Ready;
        Ok(())
    }

    /// Compose what the active template renders right now
    pub fn render_bundle(&self, mode: RenderMode) -> RenderBundle {
        let visible = self.reconciler.visible_sections();
        let template_id = self.template.as_ref().map(|b| b.template_id.as_str());

        let has_font = self
            .theme
            .font_style
            .as_deref()
            .map_or(false, |f| !f.trim().is_empty());
        if has_font {
            compose(&visible, &self.store, &self.theme, template_id, mode)
        } else {
            let theme = ThemeConfig {
                font_style: Some(self.config.fallback_font.clone()),
                ..self.theme.clone()
            };
            compose(&visible, &self.store, &theme, template_id, mode)
        }
    }

    pub fn state(&self) -> EditorSessionState {
        let sections = self
            .store
            .slots()
            .map(|(id, slot)| {
                (
                    id.to_string(),
                    SectionState {
                        status: slot.status,
                        dirty: slot.is_dirty(),
                        error: slot.error.clone(),
                    },
                )
            })
            .collect();

        EditorSessionState {
            status: self.status,
            settings_generation: self.settings_generation,
            visible_sections: self.reconciler.visible_sections(),
            sections,
            focused_section: self.focused_section.clone(),
            fatal_error: self.fatal_error.clone(),
        }
    }

    pub fn visible_sections(&self) -> Vec<Section> {
        self.reconciler.visible_sections()
    }

    pub fn is_section_enabled(&self, section_id: &str) -> bool {
        self.reconciler.is_enabled(section_id)
    }

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    pub fn registry(&self) -> &SectionRegistry {
        &self.registry
    }

    pub fn reconciler(&self) -> &VisibilityReconciler {
        &self.reconciler
    }

    pub fn store(&self) -> &SectionDataStore {
        &self.store
    }

    pub fn theme(&self) -> &ThemeConfig {
        &self.theme
    }

    pub fn theme_error(&self) -> Option<&GatewayError> {
        self.theme_error.as_ref()
    }

    pub fn active_template(&self) -> Option<&ActiveTemplateBinding> {
        self.template.as_ref()
    }

    pub fn settings_generation(&self) -> u64 {
        self.settings_generation
    }

    pub fn focused_section(&self) -> Option<&str> {
        self.focused_section.as_deref()
    }

    pub fn fatal_error(&self) -> Option<&GatewayError> {
        self.fatal_error.as_ref()
    }
}
