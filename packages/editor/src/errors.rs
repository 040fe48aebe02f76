//! Error types for the editor

use folio_gateway::GatewayError;
use folio_model::ValidationError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EditorError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Gateway error: {0}")]
    Gateway(#[from] GatewayError),

    /// Visibility or active template could not be loaded
    #[error("Session could not start: {0}")]
    FatalBootstrap(GatewayError),

    #[error("Session is not ready")]
    NotReady,

    #[error("Section '{0}' has no slot")]
    UnknownSlot(String),

    /// Only a placeholder is held; saving would overwrite backend data
    #[error("Section '{0}' was never loaded")]
    NotLoaded(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config error: {0}")]
    Json(#[from] serde_json::Error),
}

impl EditorError {
    /// Section the error should be shown next to, if any
    pub fn section_id(&self) -> Option<&str> {
        match self {
            EditorError::Validation(e) => Some(e.section_id()),
            EditorError::UnknownSlot(id) | EditorError::NotLoaded(id) => Some(id),
            _ => None,
        }
    }

    pub fn is_retryable(&self) -> bool {
        match self {
            EditorError::Gateway(e) | EditorError::FatalBootstrap(e) => e.is_retryable(),
            _ => false,
        }
    }
}
