use thiserror::Error;

pub type ValidationResult<T> = Result<T, ValidationError>;

/// Rejections raised before any network call is made
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Section '{section_id}' is required and cannot be disabled")]
    RequiredSection { section_id: String },

    #[error("Unknown section '{section_id}'")]
    UnknownSection { section_id: String },

    #[error("Section '{section_id}' is missing mandatory field '{field}'")]
    MissingField { section_id: String, field: String },
}

impl ValidationError {
    pub fn required_section(section_id: impl Into<String>) -> Self {
        Self::RequiredSection {
            section_id: section_id.into(),
        }
    }

    pub fn unknown_section(section_id: impl Into<String>) -> Self {
        Self::UnknownSection {
            section_id: section_id.into(),
        }
    }

    pub fn missing_field(section_id: impl Into<String>, field: impl Into<String>) -> Self {
        Self::MissingField {
            section_id: section_id.into(),
            field: field.into(),
        }
    }

    /// Section the offending control belongs to
    pub fn section_id(&self) -> &str {
        match self {
            Self::RequiredSection { section_id }
            | Self::UnknownSection { section_id }
            | Self::MissingField { section_id, .. } => section_id,
        }
    }
}
