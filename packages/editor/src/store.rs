//! # Section Data Store
//!
//! In-memory form data for every section of an editing session.
//!
//! Each section owns one slot. Slots never affect each other: a failed
//! fetch or save for `skills` leaves `projects` untouched.
//!
//! ## Staleness
//!
//! Every write path takes a number from the slot's monotonic sequence:
//!
//! ```text
//! begin_load(skills)  → seq 1 ─────────────────────┐
//! begin_load(skills)  → seq 2 ──────┐              │
//!                                   ↓ complete     ↓ complete
//!                               applied (2 > 0)   stale (1 < 2), dropped
//! ```
//!
//! `update` also takes a number, so a slow fetch started before a local
//! edit can never clobber it. Results are compared by sequence, never by
//! arrival time.

use crate::EditorError;
use folio_gateway::{GatewayError, PersistenceGateway};
use folio_model::{SectionContent, SectionRegistry};
use folio_preview::ContentLookup;
use std::collections::BTreeMap;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotStatus {
    Loading,
    Ready,
    /// The most recent fetch failed; content holds the last-known-good value
    Failed,
}

#[derive(Debug, Clone)]
pub struct SectionSlot {
    pub status: SlotStatus,
    pub content: SectionContent,

    /// Last value confirmed by the backend (None until a fetch or save lands)
    pub last_saved: Option<SectionContent>,

    /// Most recent fetch or save failure, cleared on success or local edit
    pub error: Option<GatewayError>,

    /// Content came from the user (or the legacy blob), not from a fetch
    edited: bool,

    /// Highest sequence issued for this slot
    next_seq: u64,
    /// Sequence of the write currently reflected in `content`
    applied_seq: u64,
    /// Sequence of the newest load still waiting for its response
    pending_load: Option<u64>,
}

impl SectionSlot {
    fn new(content: SectionContent) -> Self {
        Self {
            status: SlotStatus::Loading,
            content,
            last_saved: None,
            error: None,
            edited: false,
            next_seq: 0,
            applied_seq: 0,
            pending_load: None,
        }
    }

    fn issue(&mut self) -> u64 {
        self.next_seq += 1;
        self.next_seq
    }

    /// Holds local content the backend has not confirmed.
    ///
    /// A slot whose fetch failed or is still pending only holds a
    /// placeholder and is never dirty until the user writes to it.
    pub fn is_dirty(&self) -> bool {
        self.edited && self.last_saved.as_ref() != Some(&self.content)
    }

    /// A fetch has landed or the user has written something
    pub fn is_populated(&self) -> bool {
        self.applied_seq > 0
    }
}

/// Handle for an in-flight fetch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadTicket {
    pub section_id: String,
    pub seq: u64,
}

/// Handle for an in-flight save, carrying the content being persisted
#[derive(Debug, Clone, PartialEq)]
pub struct SaveTicket {
    pub section_id: String,
    pub seq: u64,
    pub content: SectionContent,
}

/// What happened to a completed fetch
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    Applied,
    /// Backend had nothing; slot holds the empty (or fallback) value
    Defaulted,
    /// A newer fetch or local edit already wrote the slot
    Stale,
    Failed(GatewayError),
}

#[derive(Debug, Clone)]
pub struct SectionDataStore {
    registry: Arc<SectionRegistry>,
    slots: BTreeMap<String, SectionSlot>,
}

impl SectionDataStore {
    pub fn new(registry: Arc<SectionRegistry>) -> Self {
        Self {
            registry,
            slots: BTreeMap::new(),
        }
    }

    pub fn slot(&self, section_id: &str) -> Option<&SectionSlot> {
        self.slots.get(section_id)
    }

    pub fn slots(&self) -> impl Iterator<Item = (&str, &SectionSlot)> {
        self.slots.iter().map(|(id, slot)| (id.as_str(), slot))
    }

    pub fn status(&self, section_id: &str) -> Option<SlotStatus> {
        self.slots.get(section_id).map(|s| s.status)
    }

    pub fn content(&self, section_id: &str) -> Option<&SectionContent> {
        self.slots.get(section_id).map(|s| &s.content)
    }

    pub fn is_dirty(&self, section_id: &str) -> bool {
        self.slots.get(section_id).map(SectionSlot::is_dirty).unwrap_or(false)
    }

    pub fn dirty_ids(&self) -> Vec<String> {
        self.slots
            .iter()
            .filter(|(_, slot)| slot.is_dirty())
            .map(|(id, _)| id.clone())
            .collect()
    }

    pub fn is_populated(&self, section_id: &str) -> bool {
        self.slots
            .get(section_id)
            .map(SectionSlot::is_populated)
            .unwrap_or(false)
    }

    pub fn is_loading(&self, section_id: &str) -> bool {
        self.status(section_id) == Some(SlotStatus::Loading)
    }

    fn slot_mut(&mut self, section_id: &str) -> &mut SectionSlot {
        let empty = self.registry.content_kind(section_id).empty();
        self.slots
            .entry(section_id.to_string())
            .or_insert_with(|| SectionSlot::new(empty))
    }

    /// Register an outgoing fetch and mark the slot loading
    pub fn begin_load(&mut self, section_id: &str) -> LoadTicket {
        let slot = self.slot_mut(section_id);
        let seq = slot.issue();
        slot.pending_load = Some(seq);
        slot.status = SlotStatus::Loading;

        LoadTicket {
            section_id: section_id.to_string(),
            seq,
        }
    }

    /// Apply a fetch result unless something newer already wrote the slot.
    ///
    /// `fallback` is used instead of the empty value when the backend has
    /// nothing for this section; it is adopted as unsaved content.
    pub fn complete_load(
        &mut self,
        ticket: LoadTicket,
        result: Result<SectionContent, GatewayError>,
        fallback: Option<SectionContent>,
    ) -> LoadOutcome {
        let empty = self.registry.content_kind(&ticket.section_id).empty();
        let Some(slot) = self.slots.get_mut(&ticket.section_id) else {
            tracing::warn!("Load completed for unknown slot '{}'", ticket.section_id);
            return LoadOutcome::Stale;
        };

        if slot.pending_load == Some(ticket.seq) {
            slot.pending_load = None;
        }

        if ticket.seq <= slot.applied_seq {
            tracing::debug!(
                "Discarding stale load of '{}' (seq {} <= {})",
                ticket.section_id,
                ticket.seq,
                slot.applied_seq
            );
            if slot.pending_load.is_none() && slot.status == SlotStatus::Loading {
                slot.status = SlotStatus::Ready;
            }
            return LoadOutcome::Stale;
        }

        // A newer load is still in flight: it will settle the status
        let superseded = slot.pending_load.map_or(false, |p| p > ticket.seq);

        match result {
            Ok(content) => {
                slot.content = content.clone();
                slot.last_saved = Some(content);
                slot.edited = false;
                slot.error = None;
                slot.applied_seq = ticket.seq;
                if !superseded {
                    slot.status = SlotStatus::Ready;
                }
                LoadOutcome::Applied
            }
            Err(GatewayError::NotFound) => {
                slot.edited = fallback.is_some();
                match fallback {
                    Some(legacy) => {
                        slot.content = legacy;
                        slot.last_saved = Some(empty);
                    }
                    None => {
                        slot.content = empty.clone();
                        slot.last_saved = Some(empty);
                    }
                }
                slot.error = None;
                slot.applied_seq = ticket.seq;
                if !superseded {
                    slot.status = SlotStatus::Ready;
                }
                LoadOutcome::Defaulted
            }
            Err(err) => {
                tracing::warn!("Failed to load section '{}': {}", ticket.section_id, err);
                // Content keeps its last-known-good value
                slot.error = Some(err.clone());
                if !superseded {
                    slot.status = SlotStatus::Failed;
                }
                LoadOutcome::Failed(err)
            }
        }
    }

    /// Local edit; never touches the network
    pub fn update(&mut self, section_id: &str, content: SectionContent) {
        let slot = self.slot_mut(section_id);
        let seq = slot.issue();
        slot.content = content;
        slot.edited = true;
        slot.error = None;
        slot.applied_seq = seq;
        slot.pending_load = None;
        slot.status = SlotStatus::Ready;
    }

    /// Snapshot the slot's content for persistence.
    ///
    /// Refuses a slot holding only a placeholder (fetch failed or pending,
    /// nothing typed) so it can never overwrite real backend data.
    pub fn begin_save(&self, section_id: &str) -> Result<SaveTicket, EditorError> {
        let slot = self
            .slots
            .get(section_id)
            .ok_or_else(|| EditorError::UnknownSlot(section_id.to_string()))?;
        if !slot.edited && slot.status != SlotStatus::Ready {
            return Err(EditorError::NotLoaded(section_id.to_string()));
        }

        Ok(SaveTicket {
            section_id: section_id.to_string(),
            seq: slot.applied_seq,
            content: slot.content.clone(),
        })
    }

    /// Adopt the server echo, or keep content untouched on failure.
    ///
    /// Edits made while the save was in flight are kept; only
    /// `last_saved` moves in that case.
    pub fn complete_save(
        &mut self,
        ticket: SaveTicket,
        result: Result<SectionContent, GatewayError>,
    ) -> Result<(), GatewayError> {
        let Some(slot) = self.slots.get_mut(&ticket.section_id) else {
            return Ok(());
        };

        match result {
            Ok(echo) => {
                if slot.applied_seq == ticket.seq {
                    slot.content = echo.clone();
                    slot.edited = false;
                }
                slot.last_saved = Some(echo);
                slot.error = None;
                Ok(())
            }
            Err(err) => {
                tracing::warn!("Failed to save section '{}': {}", ticket.section_id, err);
                slot.error = Some(err.clone());
                Err(err)
            }
        }
    }

    /// Fetch one section and apply the result
    pub async fn load(
        &mut self,
        gateway: &dyn PersistenceGateway,
        user_id: &str,
        section_id: &str,
    ) -> LoadOutcome {
        let ticket = self.begin_load(section_id);
        let result = gateway.fetch_section_content(user_id, section_id).await;
        self.complete_load(ticket, result, None)
    }

    /// Persist one section's current content
    pub async fn save(
        &mut self,
        gateway: &dyn PersistenceGateway,
        user_id: &str,
        section_id: &str,
    ) -> Result<(), EditorError> {
        let ticket = self.begin_save(section_id)?;
        let result = gateway
            .save_section_content(user_id, section_id, &ticket.content)
            .await;
        Ok(self.complete_save(ticket, result)?)
    }

    /// Drop every slot (template switch keeps nothing cached)
    pub fn clear(&mut self) {
        self.slots.clear();
    }
}

impl ContentLookup for SectionDataStore {
    fn section_content(&self, id: &str) -> Option<&SectionContent> {
        self.content(id)
    }
}
