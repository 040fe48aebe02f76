use criterion::{black_box, criterion_group, criterion_main, Criterion};
use folio_model::{SectionRegistry, ThemeConfig};
use folio_preview::{compose, RenderMode};
use serde_json::{json, Value};
use std::collections::HashMap;

fn full_portfolio() -> HashMap<String, Value> {
    let mut content = HashMap::new();
    content.insert("basics".to_string(), json!({ "name": "Ada", "email": "ada@example.com" }));
    content.insert("about".to_string(), json!({ "description": "Mathematician" }));

    for id in ["skills", "experience", "education", "projects", "publications", "certifications", "awards", "services"] {
        let entries: Vec<Value> = (0..20)
            .map(|i| json!({ "title": format!("{} {}", id, i), "startDate": "2020-01-01" }))
            .collect();
        content.insert(id.to_string(), Value::Array(entries));
    }
    content
}

fn compose_public(c: &mut Criterion) {
    let registry = SectionRegistry::standard();
    let visible = registry.list_sections().to_vec();
    let content = full_portfolio();
    let theme = ThemeConfig::default();

    c.bench_function("compose_public_full_portfolio", |b| {
        b.iter(|| compose(black_box(&visible), &content, &theme, Some("aurora"), RenderMode::Public))
    });
}

fn compose_preview_sparse(c: &mut Criterion) {
    let registry = SectionRegistry::standard();
    let visible = registry.list_sections().to_vec();
    let content: HashMap<String, Value> = HashMap::new();
    let theme = ThemeConfig::default();

    c.bench_function("compose_preview_empty_portfolio", |b| {
        b.iter(|| compose(black_box(&visible), &content, &theme, None, RenderMode::Preview))
    });
}

criterion_group!(benches, compose_public, compose_preview_sparse);
criterion_main!(benches);
