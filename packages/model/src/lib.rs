//! # Folio Model
//!
//! Shared data model for the portfolio editor: the section catalog,
//! visibility maps, theme settings, the active template binding, and the
//! content normalization rules the backend applies.
//!
//! Everything here is plain data. I/O lives in `folio-gateway`, editing
//! state in `folio-editor`.

pub mod content;
pub mod error;
pub mod registry;
pub mod template;
pub mod theme;
pub mod visibility;

pub use content::{field_is_filled, normalize_dates, value_is_filled, SectionContent};
pub use error::{ValidationError, ValidationResult};
pub use registry::{ContentKind, Section, SectionRegistry, SectionRegistryBuilder};
pub use template::ActiveTemplateBinding;
pub use theme::{ThemeConfig, ThemePatch, DEFAULT_COLOR_MODE, DEFAULT_FONT};
pub use visibility::SectionVisibilityConfig;
