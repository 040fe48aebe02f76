//! # In-Memory Gateway
//!
//! Document store that lives in process memory. Behaves like the REST
//! backend (dates are normalized on save, visibility updates merge, theme
//! updates are partial) and adds two test hooks:
//! - **failure injection** per operation, optionally scoped to one section
//! - **call recording**, so callers can assert that no request was made

use crate::{GatewayError, GatewayResult, PersistenceGateway};
use async_trait::async_trait;
use folio_model::{
    normalize_dates, ActiveTemplateBinding, SectionContent, SectionVisibilityConfig, ThemeConfig,
    ThemePatch,
};
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Gateway operations, used to target failures and inspect calls
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    FetchSection,
    SaveSection,
    FetchVisibility,
    SaveVisibility,
    FetchTheme,
    SaveTheme,
    FetchActiveTemplate,
}

/// One recorded gateway call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedCall {
    pub operation: Operation,
    pub user_id: String,
    pub section_id: Option<String>,
}

#[derive(Debug, Default)]
struct MemoryState {
    sections: HashMap<(String, String), SectionContent>,
    visibility: HashMap<String, SectionVisibilityConfig>,
    themes: HashMap<String, ThemeConfig>,
    templates: HashMap<String, ActiveTemplateBinding>,

    /// Keyed by operation and optional section id (None = every section)
    failures: HashMap<(Operation, Option<String>), GatewayError>,
    calls: Vec<RecordedCall>,
}

impl MemoryState {
    fn record(&mut self, operation: Operation, user_id: &str, section_id: Option<&str>) -> GatewayResult<()> {
        self.calls.push(RecordedCall {
            operation,
            user_id: user_id.to_string(),
            section_id: section_id.map(str::to_string),
        });

        let scoped = section_id.and_then(|id| self.failures.get(&(operation, Some(id.to_string()))));
        match scoped.or_else(|| self.failures.get(&(operation, None))) {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }
}

#[derive(Debug, Default)]
pub struct MemoryGateway {
    state: Mutex<MemoryState>,
}

impl MemoryGateway {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, MemoryState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn seed_section(&self, user_id: &str, section_id: &str, content: SectionContent) {
        self.state()
            .sections
            .insert((user_id.to_string(), section_id.to_string()), content);
    }

    pub fn seed_visibility(&self, user_id: &str, config: SectionVisibilityConfig) {
        self.state().visibility.insert(user_id.to_string(), config);
    }

    pub fn seed_theme(&self, user_id: &str, theme: ThemeConfig) {
        self.state().themes.insert(user_id.to_string(), theme);
    }

    pub fn seed_active_template(&self, user_id: &str, binding: ActiveTemplateBinding) {
        self.state().templates.insert(user_id.to_string(), binding);
    }

    /// Make every call of `operation` fail until cleared
    pub fn fail(&self, operation: Operation, error: GatewayError) {
        self.state().failures.insert((operation, None), error);
    }

    /// Make `operation` fail for one section only
    pub fn fail_section(&self, operation: Operation, section_id: &str, error: GatewayError) {
        self.state()
            .failures
            .insert((operation, Some(section_id.to_string())), error);
    }

    pub fn clear_failures(&self) {
        self.state().failures.clear();
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.state().calls.clone()
    }

    pub fn call_count(&self, operation: Operation) -> usize {
        self.state()
            .calls
            .iter()
            .filter(|c| c.operation == operation)
            .count()
    }

    pub fn clear_calls(&self) {
        self.state().calls.clear();
    }

    /// Stored content, bypassing call recording and failure injection
    pub fn stored_section(&self, user_id: &str, section_id: &str) -> Option<SectionContent> {
        self.state()
            .sections
            .get(&(user_id.to_string(), section_id.to_string()))
            .cloned()
    }

    pub fn stored_visibility(&self, user_id: &str) -> Option<SectionVisibilityConfig> {
        self.state().visibility.get(user_id).cloned()
    }

    pub fn stored_theme(&self, user_id: &str) -> Option<ThemeConfig> {
        self.state().themes.get(user_id).cloned()
    }
}

#[async_trait]
impl PersistenceGateway for MemoryGateway {
    async fn fetch_section_content(
        &self,
        user_id: &str,
        section_id: &str,
    ) -> GatewayResult<SectionContent> {
        let mut state = self.state();
        state.record(Operation::FetchSection, user_id, Some(section_id))?;

        state
            .sections
            .get(&(user_id.to_string(), section_id.to_string()))
            .cloned()
            .ok_or(GatewayError::NotFound)
    }

    async fn save_section_content(
        &self,
        user_id: &str,
        section_id: &str,
        content: &SectionContent,
    ) -> GatewayResult<SectionContent> {
        let mut state = self.state();
        state.record(Operation::SaveSection, user_id, Some(section_id))?;

        let stored = normalize_dates(content);
        state
            .sections
            .insert((user_id.to_string(), section_id.to_string()), stored.clone());
        Ok(stored)
    }

    async fn fetch_visibility(&self, user_id: &str) -> GatewayResult<SectionVisibilityConfig> {
        let mut state = self.state();
        state.record(Operation::FetchVisibility, user_id, None)?;

        Ok(state.visibility.get(user_id).cloned().unwrap_or_default())
    }

    async fn save_visibility(
        &self,
        user_id: &str,
        config: &SectionVisibilityConfig,
    ) -> GatewayResult<()> {
        let mut state = self.state();
        state.record(Operation::SaveVisibility, user_id, None)?;

        let stored = state.visibility.entry(user_id.to_string()).or_default();
        for (id, enabled) in config.iter() {
            stored.set(id, enabled);
        }
        Ok(())
    }

    async fn fetch_theme(&self, user_id: &str) -> GatewayResult<ThemeConfig> {
        let mut state = self.state();
        state.record(Operation::FetchTheme, user_id, None)?;

        state.themes.get(user_id).cloned().ok_or(GatewayError::NotFound)
    }

    async fn save_theme(&self, user_id: &str, patch: &ThemePatch) -> GatewayResult<()> {
        let mut state = self.state();
        state.record(Operation::SaveTheme, user_id, None)?;

        state
            .themes
            .entry(user_id.to_string())
            .or_default()
            .merge(patch);
        Ok(())
    }

    async fn fetch_active_template(
        &self,
        user_id: &str,
    ) -> GatewayResult<Option<ActiveTemplateBinding>> {
        let mut state = self.state();
        state.record(Operation::FetchActiveTemplate, user_id, None)?;

        Ok(state.templates.get(user_id).cloned())
    }
}
