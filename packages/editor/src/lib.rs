//! # Folio Editor
//!
//! Editing session for a user's portfolio.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ gateway: PersistenceGateway (REST / memory) │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ editor: EditorSession                       │
//! │  - VisibilityReconciler (local vs saved)    │
//! │  - SectionDataStore (per-section slots)     │
//! │  - theme + active template binding          │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ preview: visible sections → RenderBundle    │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Core Principles
//!
//! 1. **Visibility has one owner**: the reconciler; the theme copy only seeds first paint
//! 2. **Sections fail alone**: one slot's error never blocks another
//! 3. **Newest write wins**: results are ordered by sequence, not arrival
//! 4. **Local until confirmed**: a failed save never discards edits
//!
//! ## Usage
//!
//! ```rust,ignore
//! use folio_editor::EditorSession;
//! use folio_gateway::MemoryGateway;
//! use folio_preview::RenderMode;
//!
//! let mut session = EditorSession::with_defaults("user-1", Arc::new(MemoryGateway::new()));
//! session.start().await?;
//!
//! session.toggle_section("projects", true)?;
//! session.save_settings().await?;
//!
//! let bundle = session.render_bundle(RenderMode::Preview);
//! ```

mod config;
mod errors;
mod reconciler;
mod session;
mod store;

pub use config::{EditorConfig, DEFAULT_CONFIG_NAME};
pub use errors::EditorError;
pub use reconciler::{VisibilityReconciler, VisibilitySource};
pub use session::{EditorSession, EditorSessionState, SaveReport, SectionState, SessionStatus};
pub use store::{LoadOutcome, LoadTicket, SaveTicket, SectionDataStore, SectionSlot, SlotStatus};

// Re-export common types for convenience
pub use folio_gateway::{GatewayError, PersistenceGateway};
pub use folio_model::{ActiveTemplateBinding, SectionRegistry, SectionVisibilityConfig};
pub use folio_preview::{RenderBundle, RenderMode};
