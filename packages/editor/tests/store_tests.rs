//! Section store driven through a gateway

use folio_editor::{EditorError, LoadOutcome, SectionDataStore, SlotStatus};
use folio_gateway::{GatewayError, MemoryGateway, Operation, PersistenceGateway};
use folio_model::SectionRegistry;
use serde_json::json;
use std::sync::Arc;

const USER: &str = "user-1";

fn store() -> SectionDataStore {
    SectionDataStore::new(Arc::new(SectionRegistry::standard()))
}

#[tokio::test]
async fn test_load_applies_stored_content() {
    let gateway = MemoryGateway::new();
    gateway.seed_section(USER, "skills", json!([{ "name": "Rust" }]));
    let mut store = store();

    let outcome = store.load(&gateway, USER, "skills").await;

    assert_eq!(outcome, LoadOutcome::Applied);
    assert_eq!(store.status("skills"), Some(SlotStatus::Ready));
    assert!(!store.is_dirty("skills"));
}

#[tokio::test]
async fn test_load_missing_section_defaults_by_kind() {
    let gateway = MemoryGateway::new();
    let mut store = store();

    assert_eq!(store.load(&gateway, USER, "about").await, LoadOutcome::Defaulted);
    assert_eq!(store.load(&gateway, USER, "projects").await, LoadOutcome::Defaulted);

    assert_eq!(store.content("about"), Some(&json!({})));
    assert_eq!(store.content("projects"), Some(&json!([])));
}

#[tokio::test]
async fn test_slow_response_for_older_fetch_is_discarded() -> anyhow::Result<()> {
    let gateway = MemoryGateway::new();
    gateway.seed_section(USER, "projects", json!([{ "name": "v1" }]));
    let mut store = store();

    let first = store.begin_load("projects");
    let first_response = gateway.fetch_section_content(USER, "projects").await;

    gateway.seed_section(USER, "projects", json!([{ "name": "v2" }]));
    let second = store.begin_load("projects");
    let second_response = gateway.fetch_section_content(USER, "projects").await;

    // Responses land in reverse order
    assert_eq!(
        store.complete_load(second, second_response, None),
        LoadOutcome::Applied
    );
    assert_eq!(
        store.complete_load(first, first_response, None),
        LoadOutcome::Stale
    );

    assert_eq!(store.content("projects"), Some(&json!([{ "name": "v2" }])));
    assert_eq!(store.status("projects"), Some(SlotStatus::Ready));
    Ok(())
}

#[tokio::test]
async fn test_failed_fetch_does_not_touch_other_sections() {
    let gateway = MemoryGateway::new();
    gateway.seed_section(USER, "skills", json!(["Rust"]));
    gateway.seed_section(USER, "projects", json!([{ "name": "Engine" }]));
    gateway.fail_section(Operation::FetchSection, "skills", GatewayError::network("reset"));
    let mut store = store();

    let skills = store.load(&gateway, USER, "skills").await;
    let projects = store.load(&gateway, USER, "projects").await;

    assert!(matches!(skills, LoadOutcome::Failed(GatewayError::Network(_))));
    assert_eq!(projects, LoadOutcome::Applied);
    assert_eq!(store.status("skills"), Some(SlotStatus::Failed));
    assert_eq!(store.status("projects"), Some(SlotStatus::Ready));
}

#[tokio::test]
async fn test_save_persists_normalized_echo() -> anyhow::Result<()> {
    let gateway = MemoryGateway::new();
    let mut store = store();

    store.update(
        "education",
        json!([{ "school": "MIT", "startDate": "2015-09-01T12:30:00Z" }]),
    );
    store.save(&gateway, USER, "education").await?;

    assert_eq!(
        store.content("education"),
        Some(&json!([{ "school": "MIT", "startDate": "2015-09-01" }]))
    );
    assert!(!store.is_dirty("education"));
    assert_eq!(
        gateway.stored_section(USER, "education"),
        store.content("education").cloned()
    );
    Ok(())
}

#[tokio::test]
async fn test_failed_save_keeps_local_edit() {
    let gateway = MemoryGateway::new();
    gateway.fail(Operation::SaveSection, GatewayError::server(502, "bad gateway"));
    let mut store = store();

    store.update("about", json!({ "description": "Unsaved" }));
    let result = store.save(&gateway, USER, "about").await;

    assert!(matches!(result, Err(EditorError::Gateway(_))));
    assert_eq!(store.content("about"), Some(&json!({ "description": "Unsaved" })));
    assert!(store.is_dirty("about"));
    assert!(store.slot("about").and_then(|s| s.error.clone()).is_some());
}

#[tokio::test]
async fn test_save_of_never_touched_section_is_rejected() {
    let gateway = MemoryGateway::new();
    let mut store = store();

    let result = store.save(&gateway, USER, "awards").await;

    assert!(matches!(result, Err(EditorError::UnknownSlot(id)) if id == "awards"));
    assert_eq!(gateway.call_count(Operation::SaveSection), 0);
}
