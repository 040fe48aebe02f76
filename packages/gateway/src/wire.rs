//! Request/response envelopes of the REST backend

use folio_model::{SectionContent, SectionVisibilityConfig, ThemeConfig, ThemePatch};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// `{ "data": ... }` wrapper used by section and visibility endpoints
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataEnvelope<T> {
    pub data: T,
}

pub type SectionEnvelope = DataEnvelope<SectionContent>;

/// Per-section entry of `GET /section-visibility/{userId}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisibilityEntry {
    pub is_enabled: bool,

    /// Server-side ordering; the registry ordinal takes precedence
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<i64>,
}

pub type VisibilityResponse = DataEnvelope<BTreeMap<String, VisibilityEntry>>;

impl From<VisibilityResponse> for SectionVisibilityConfig {
    fn from(response: VisibilityResponse) -> Self {
        response
            .data
            .into_iter()
            .map(|(id, entry)| (id, entry.is_enabled))
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisibilityFlag {
    pub is_enabled: bool,
}

/// Body of `PUT /section-visibility/{userId}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisibilityUpdate {
    pub section_configuration: BTreeMap<String, VisibilityFlag>,
}

impl From<&SectionVisibilityConfig> for VisibilityUpdate {
    fn from(config: &SectionVisibilityConfig) -> Self {
        Self {
            section_configuration: config
                .iter()
                .map(|(id, is_enabled)| (id.to_string(), VisibilityFlag { is_enabled }))
                .collect(),
        }
    }
}

/// Body of `GET /theme?userId=`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThemeResponse {
    pub theme: ThemeConfig,
}

/// Body of `POST /theme`
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ThemeUpdate<'a> {
    pub user_id: &'a str,
    pub theme: &'a ThemePatch,
}
