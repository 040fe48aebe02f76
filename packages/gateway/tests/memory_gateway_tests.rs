//! Behaviour of the in-memory gateway as a stand-in for the backend

use folio_gateway::{GatewayError, MemoryGateway, Operation, PersistenceGateway};
use folio_model::{normalize_dates, ActiveTemplateBinding, SectionVisibilityConfig, ThemePatch};
use serde_json::json;

const USER: &str = "user-1";

#[tokio::test]
async fn test_missing_section_is_not_found() {
    let gateway = MemoryGateway::new();

    let result = gateway.fetch_section_content(USER, "skills").await;
    assert_eq!(result, Err(GatewayError::NotFound));
}

#[tokio::test]
async fn test_save_then_fetch_round_trips_under_normalization() -> anyhow::Result<()> {
    let gateway = MemoryGateway::new();
    let sent = json!([
        { "school": "MIT", "startDate": "2015-09-01T00:00:00.000Z", "endDate": "2019-06-01" }
    ]);

    let echoed = gateway.save_section_content(USER, "education", &sent).await?;
    let fetched = gateway.fetch_section_content(USER, "education").await?;

    assert_eq!(echoed, fetched);
    assert_eq!(fetched, normalize_dates(&sent));
    assert_eq!(fetched[0]["startDate"], "2015-09-01");
    Ok(())
}

#[tokio::test]
async fn test_visibility_defaults_to_empty_map() -> anyhow::Result<()> {
    let gateway = MemoryGateway::new();

    let config = gateway.fetch_visibility(USER).await?;
    assert!(config.is_empty());
    Ok(())
}

#[tokio::test]
async fn test_visibility_save_merges_entries() -> anyhow::Result<()> {
    let gateway = MemoryGateway::new();
    gateway.seed_visibility(USER, [("skills", true), ("awards", true)].into_iter().collect());

    let update: SectionVisibilityConfig = [("skills", false)].into_iter().collect();
    gateway.save_visibility(USER, &update).await?;

    let stored = gateway.fetch_visibility(USER).await?;
    assert_eq!(stored.get("skills"), Some(false));
    assert_eq!(stored.get("awards"), Some(true));
    Ok(())
}

#[tokio::test]
async fn test_theme_not_found_then_partial_save() -> anyhow::Result<()> {
    let gateway = MemoryGateway::new();
    assert_eq!(gateway.fetch_theme(USER).await, Err(GatewayError::NotFound));

    let patch = ThemePatch {
        color_mode: Some("dark".to_string()),
        ..ThemePatch::default()
    };
    gateway.save_theme(USER, &patch).await?;

    let theme = gateway.fetch_theme(USER).await?;
    assert_eq!(theme.color_mode, "dark");
    assert_eq!(theme.resolved_font(), "Poppins");
    Ok(())
}

#[tokio::test]
async fn test_active_template_may_be_absent() -> anyhow::Result<()> {
    let gateway = MemoryGateway::new();
    assert!(gateway.fetch_active_template(USER).await?.is_none());

    gateway.seed_active_template(USER, ActiveTemplateBinding::new("aurora"));
    let binding = gateway.fetch_active_template(USER).await?;
    assert_eq!(binding.map(|b| b.template_id), Some("aurora".to_string()));
    Ok(())
}

#[tokio::test]
async fn test_section_scoped_failure_leaves_siblings_alone() {
    let gateway = MemoryGateway::new();
    gateway.seed_section(USER, "skills", json!([{ "name": "Rust" }]));
    gateway.seed_section(USER, "projects", json!([{ "title": "Folio" }]));
    gateway.fail_section(
        Operation::FetchSection,
        "skills",
        GatewayError::network("connection reset"),
    );

    assert!(gateway.fetch_section_content(USER, "skills").await.is_err());
    assert!(gateway.fetch_section_content(USER, "projects").await.is_ok());

    gateway.clear_failures();
    assert!(gateway.fetch_section_content(USER, "skills").await.is_ok());
}

#[tokio::test]
async fn test_calls_are_recorded_even_when_failing() {
    let gateway = MemoryGateway::new();
    gateway.fail(Operation::FetchVisibility, GatewayError::server(500, "boom"));

    let _ = gateway.fetch_visibility(USER).await;
    let _ = gateway.fetch_theme(USER).await;

    assert_eq!(gateway.call_count(Operation::FetchVisibility), 1);
    assert_eq!(gateway.call_count(Operation::FetchTheme), 1);
    assert_eq!(gateway.calls()[0].user_id, USER);
}
