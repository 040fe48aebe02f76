use crate::GatewayResult;
use async_trait::async_trait;
use folio_model::{
    ActiveTemplateBinding, SectionContent, SectionVisibilityConfig, ThemeConfig, ThemePatch,
};

/// Read/write access to everything an editing session persists.
///
/// One call per resource, no business logic and no retries. A missing
/// section or theme is reported as [`GatewayError::NotFound`]; callers decide
/// what that means.
///
/// [`GatewayError::NotFound`]: crate::GatewayError::NotFound
#[async_trait]
pub trait PersistenceGateway: Send + Sync {
    async fn fetch_section_content(
        &self,
        user_id: &str,
        section_id: &str,
    ) -> GatewayResult<SectionContent>;

    /// Persist section content; returns the server's (possibly normalized) echo
    async fn save_section_content(
        &self,
        user_id: &str,
        section_id: &str,
        content: &SectionContent,
    ) -> GatewayResult<SectionContent>;

    async fn fetch_visibility(&self, user_id: &str) -> GatewayResult<SectionVisibilityConfig>;

    async fn save_visibility(
        &self,
        user_id: &str,
        config: &SectionVisibilityConfig,
    ) -> GatewayResult<()>;

    async fn fetch_theme(&self, user_id: &str) -> GatewayResult<ThemeConfig>;

    async fn save_theme(&self, user_id: &str, patch: &ThemePatch) -> GatewayResult<()>;

    async fn fetch_active_template(
        &self,
        user_id: &str,
    ) -> GatewayResult<Option<ActiveTemplateBinding>>;
}
