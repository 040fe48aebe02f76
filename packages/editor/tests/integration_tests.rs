//! Integration tests for editor crate

use folio_editor::{EditorConfig, EditorSession, RenderMode, SessionStatus};
use folio_gateway::{GatewayError, MemoryGateway, Operation};
use folio_model::{ActiveTemplateBinding, ContentKind, Section, SectionRegistry, ThemeConfig};
use serde_json::json;
use std::sync::Arc;

const USER: &str = "user-1";

/// basics and about required, skills on by default, projects off
fn small_registry() -> Arc<SectionRegistry> {
    Arc::new(
        SectionRegistry::builder()
            .section(Section::new("basics", "Basics", 0, ContentKind::Record).required())
            .section(Section::new("about", "About", 1, ContentKind::Record).required())
            .section(Section::new("skills", "Skills", 2, ContentKind::List))
            .section(Section::new("projects", "Projects", 3, ContentKind::List))
            .category("developer", ["basics", "about", "skills"])
            .build(),
    )
}

fn session(gateway: &Arc<MemoryGateway>) -> EditorSession {
    EditorSession::new(
        USER,
        gateway.clone(),
        small_registry(),
        EditorConfig::default(),
    )
}

fn visible_ids(session: &EditorSession) -> Vec<String> {
    session.visible_sections().into_iter().map(|s| s.id).collect()
}

#[tokio::test]
async fn test_visibility_round_trip_through_backend() {
    let gateway = Arc::new(MemoryGateway::new());

    let mut first = session(&gateway);
    first.start().await.unwrap();
    assert_eq!(visible_ids(&first), vec!["basics", "about", "skills"]);

    first.toggle_section("projects", true).unwrap();
    first.save_settings().await.unwrap();
    assert_eq!(
        visible_ids(&first),
        vec!["basics", "about", "skills", "projects"]
    );

    // A fresh session hydrates the same result from persisted state
    let mut second = session(&gateway);
    second.start().await.unwrap();
    assert_eq!(visible_ids(&second), visible_ids(&first));
}

#[tokio::test]
async fn test_stored_map_cannot_hide_required_sections() {
    let gateway = Arc::new(MemoryGateway::new());
    gateway.seed_visibility(
        USER,
        [("basics", false), ("about", false), ("skills", false)]
            .into_iter()
            .collect(),
    );

    let mut session = session(&gateway);
    session.start().await.unwrap();

    assert_eq!(visible_ids(&session), vec!["basics", "about"]);
}

#[tokio::test]
async fn test_theme_not_found_falls_back_to_defaults() {
    let gateway = Arc::new(MemoryGateway::new());
    gateway.fail(Operation::FetchTheme, GatewayError::NotFound);

    let mut session = session(&gateway);
    session.start().await.unwrap();

    assert_eq!(session.status(), SessionStatus::Ready);
    assert!(session.theme_error().is_none());

    let bundle = session.render_bundle(RenderMode::Preview);
    assert_eq!(bundle.theme().font_style, "Poppins");
    assert_eq!(bundle.theme().color_mode, "default");
}

#[tokio::test]
async fn test_theme_copy_seeds_visibility_only_until_server_answers() {
    let gateway = Arc::new(MemoryGateway::new());
    gateway.seed_theme(
        USER,
        ThemeConfig {
            enabled_sections: Some(
                [("projects".to_string(), true)].into_iter().collect(),
            ),
            ..ThemeConfig::default()
        },
    );
    gateway.seed_visibility(USER, [("projects", false)].into_iter().collect());

    let mut session = session(&gateway);
    session.start().await.unwrap();

    assert!(!session.is_section_enabled("projects"));
}

#[tokio::test]
async fn test_preview_bundle_follows_edits_and_visibility() {
    let gateway = Arc::new(MemoryGateway::new());
    gateway.seed_active_template(USER, ActiveTemplateBinding::new("aurora"));
    gateway.seed_section(USER, "basics", json!({ "name": "Ada" }));

    let mut session = session(&gateway);
    session.start().await.unwrap();

    session
        .update_section_content("skills", json!([{ "name": "Rust" }]))
        .unwrap();
    session.toggle_section("projects", true).unwrap();

    let bundle = session.render_bundle(RenderMode::Preview);
    assert_eq!(bundle.template_id(), Some("aurora"));
    assert_eq!(
        bundle.section_ids(),
        vec!["basics", "about", "skills", "projects"]
    );
    assert!(bundle.has_data("skills"));
    assert!(!bundle.has_data("projects"));
    assert_eq!(bundle.content("basics"), Some(&json!({ "name": "Ada" })));

    let data = bundle.data();
    assert_eq!(data["skills"], json!([{ "name": "Rust" }]));
}

#[tokio::test]
async fn test_state_snapshot_tracks_dirty_sections() {
    let gateway = Arc::new(MemoryGateway::new());
    let mut session = session(&gateway);
    session.start().await.unwrap();

    session
        .update_section_content("about", json!({ "description": "Hello" }))
        .unwrap();

    let state = session.state();
    assert_eq!(state.status, SessionStatus::Ready);
    assert!(state.sections["about"].dirty);
    assert!(!state.sections["basics"].dirty);
    assert_eq!(state.visible_sections.len(), 3);
    assert_eq!(state.settings_generation, 0);
}
