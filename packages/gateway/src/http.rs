//! # REST Gateway
//!
//! [`PersistenceGateway`] over the portfolio backend's HTTP API.
//!
//! Status mapping:
//! - `404` → [`GatewayError::NotFound`]
//! - other non-2xx → [`GatewayError::Server`]
//! - transport failures and timeouts → [`GatewayError::Network`]
//! - bodies that do not match the expected envelope → [`GatewayError::Decode`]

use crate::wire::{
    DataEnvelope, SectionEnvelope, ThemeResponse, ThemeUpdate, VisibilityResponse,
    VisibilityUpdate,
};
use crate::{GatewayError, GatewayResult, PersistenceGateway};
use async_trait::async_trait;
use folio_model::{
    ActiveTemplateBinding, SectionContent, SectionVisibilityConfig, ThemeConfig, ThemePatch,
};
use reqwest::{Client, RequestBuilder, Response, StatusCode, Url};
use serde::de::DeserializeOwned;
use std::time::Duration;

pub struct HttpGateway {
    client: Client,
    base_url: Url,
}

impl HttpGateway {
    pub fn new(base_url: &str, timeout: Duration) -> GatewayResult<Self> {
        let base_url = Url::parse(base_url)
            .map_err(|e| GatewayError::network(format!("invalid base url '{}': {}", base_url, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(GatewayError::network(format!("'{}' cannot be a base url", base_url)));
        }

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| GatewayError::network(e.to_string()))?;

        Ok(Self { client, base_url })
    }

    /// Build `base/<segments...>` with each segment percent-encoded
    fn url(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    fn url_with_user(&self, segments: &[&str], user_id: &str) -> Url {
        let mut url = self.url(segments);
        url.query_pairs_mut().append_pair("userId", user_id);
        url
    }

    async fn send(&self, request: RequestBuilder) -> GatewayResult<Response> {
        let response = request
            .send()
            .await
            .map_err(|e| GatewayError::network(e.to_string()))?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(GatewayError::NotFound);
        }
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            tracing::warn!("Backend returned {}: {}", status, message);
            return Err(GatewayError::server(status.as_u16(), message));
        }

        Ok(response)
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> GatewayResult<T> {
        let bytes = response
            .bytes()
            .await
            .map_err(|e| GatewayError::network(e.to_string()))?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}

#[async_trait]
impl PersistenceGateway for HttpGateway {
    async fn fetch_section_content(
        &self,
        user_id: &str,
        section_id: &str,
    ) -> GatewayResult<SectionContent> {
        let url = self.url(&["sections", section_id, user_id]);
        tracing::debug!("GET {}", url);

        let response = self.send(self.client.get(url)).await?;
        let envelope: SectionEnvelope = Self::decode(response).await?;
        Ok(envelope.data)
    }

    async fn save_section_content(
        &self,
        user_id: &str,
        section_id: &str,
        content: &SectionContent,
    ) -> GatewayResult<SectionContent> {
        let url = self.url(&["sections", section_id, user_id]);
        tracing::debug!("PUT {}", url);

        let body = DataEnvelope { data: content };
        let response = self.send(self.client.put(url).json(&body)).await?;
        let envelope: SectionEnvelope = Self::decode(response).await?;
        Ok(envelope.data)
    }

    async fn fetch_visibility(&self, user_id: &str) -> GatewayResult<SectionVisibilityConfig> {
        let url = self.url(&["section-visibility", user_id]);
        tracing::debug!("GET {}", url);

        let response = self.send(self.client.get(url)).await?;
        let body: VisibilityResponse = Self::decode(response).await?;
        Ok(body.into())
    }

    async fn save_visibility(
        &self,
        user_id: &str,
        config: &SectionVisibilityConfig,
    ) -> GatewayResult<()> {
        let url = self.url(&["section-visibility", user_id]);
        tracing::debug!("PUT {}", url);

        self.send(self.client.put(url).json(&VisibilityUpdate::from(config)))
            .await?;
        Ok(())
    }

    async fn fetch_theme(&self, user_id: &str) -> GatewayResult<ThemeConfig> {
        let url = self.url_with_user(&["theme"], user_id);
        tracing::debug!("GET {}", url);

        let response = self.send(self.client.get(url)).await?;
        let body: ThemeResponse = Self::decode(response).await?;
        Ok(body.theme)
    }

    async fn save_theme(&self, user_id: &str, patch: &ThemePatch) -> GatewayResult<()> {
        let url = self.url(&["theme"]);
        tracing::debug!("POST {}", url);

        let body = ThemeUpdate {
            user_id,
            theme: patch,
        };
        self.send(self.client.post(url).json(&body)).await?;
        Ok(())
    }

    async fn fetch_active_template(
        &self,
        user_id: &str,
    ) -> GatewayResult<Option<ActiveTemplateBinding>> {
        let url = self.url_with_user(&["activetemplate"], user_id);
        tracing::debug!("GET {}", url);

        match self.send(self.client.get(url)).await {
            Ok(response) => Self::decode(response).await,
            Err(GatewayError::NotFound) => Ok(None),
            Err(e) => Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gateway() -> HttpGateway {
        HttpGateway::new("https://api.example.com/v1/", Duration::from_secs(5)).unwrap()
    }

    #[test]
    fn test_section_url_encodes_segments() {
        let url = gateway().url(&["sections", "skills", "user 42"]);
        assert_eq!(url.as_str(), "https://api.example.com/v1/sections/skills/user%2042");
    }

    #[test]
    fn test_query_urls() {
        let url = gateway().url_with_user(&["theme"], "u-1");
        assert_eq!(url.as_str(), "https://api.example.com/v1/theme?userId=u-1");
    }

    #[test]
    fn test_rejects_invalid_base_url() {
        assert!(HttpGateway::new("not a url", Duration::from_secs(1)).is_err());
    }
}
