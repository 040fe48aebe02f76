//! Section content payloads and the normalization the backend applies to them.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde_json::Value;

/// Opaque per-section payload (object for records, array for lists)
pub type SectionContent = Value;

/// Keys whose string values the backend stores as calendar dates
pub const DATE_FIELDS: [&str; 6] = [
    "date",
    "startDate",
    "endDate",
    "issueDate",
    "expiryDate",
    "publishedDate",
];

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Normalize date fields to `YYYY-MM-DD`, recursing through objects and arrays.
///
/// Values that do not parse as a date are left untouched.
pub fn normalize_dates(content: &Value) -> Value {
    match content {
        Value::Object(map) => Value::Object(
            map.iter()
                .map(|(key, value)| {
                    let normalized = match value {
                        Value::String(s) if DATE_FIELDS.contains(&key.as_str()) => {
                            Value::String(normalize_date_str(s).unwrap_or_else(|| s.clone()))
                        }
                        other => normalize_dates(other),
                    };
                    (key.clone(), normalized)
                })
                .collect(),
        ),
        Value::Array(items) => Value::Array(items.iter().map(normalize_dates).collect()),
        other => other.clone(),
    }
}

fn normalize_date_str(raw: &str) -> Option<String> {
    let raw = raw.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.date_naive().format(DATE_FORMAT).to_string());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(dt.date().format(DATE_FORMAT).to_string());
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, DATE_FORMAT) {
        return Some(date.format(DATE_FORMAT).to_string());
    }
    None
}

/// Whether a field of a record payload holds something a visitor could see
pub fn field_is_filled(content: &Value, field: &str) -> bool {
    content.get(field).map(value_is_filled).unwrap_or(false)
}

/// Non-blank string, non-empty array/object, or any number/bool
pub fn value_is_filled(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::String(s) => !s.trim().is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
        Value::Bool(_) | Value::Number(_) => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_normalizes_nested_dates() {
        let content = json!([
            { "company": "Acme", "startDate": "2021-03-01T00:00:00.000Z", "endDate": "2023-06-30" },
            { "company": "Initech", "startDate": "2019-01-15T10:20:30" }
        ]);

        let normalized = normalize_dates(&content);

        assert_eq!(normalized[0]["startDate"], "2021-03-01");
        assert_eq!(normalized[0]["endDate"], "2023-06-30");
        assert_eq!(normalized[1]["startDate"], "2019-01-15");
        assert_eq!(normalized[0]["company"], "Acme");
    }

    #[test]
    fn test_leaves_unparseable_dates_alone() {
        let content = json!({ "date": "Spring 2020", "title": "2020-01-01T00:00:00Z" });
        let normalized = normalize_dates(&content);

        assert_eq!(normalized["date"], "Spring 2020");
        // Only date-named keys are touched
        assert_eq!(normalized["title"], "2020-01-01T00:00:00Z");
    }

    #[test]
    fn test_field_is_filled() {
        let content = json!({ "name": "Ada", "email": "   ", "links": [] });

        assert!(field_is_filled(&content, "name"));
        assert!(!field_is_filled(&content, "email"));
        assert!(!field_is_filled(&content, "links"));
        assert!(!field_is_filled(&content, "missing"));
    }
}
