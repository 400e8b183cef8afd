//! Test fixtures and factory functions for creating request bodies.

use serde_json::json;

/// Create a register request body.
pub fn register_request(username: &str) -> serde_json::Value {
    json!({ "username": username })
}

/// Create progress fields with the common numeric fields set.
pub fn progress_fields(learned: bool, interval: i64, ease: f64) -> serde_json::Value {
    json!({
        "learned": learned,
        "in_review": true,
        "interval": interval,
        "ease": ease,
        "consecutive_correct": 1,
        "total_reviews": 3,
        "correct_reviews": 2
    })
}

/// Create a single progress update request body: `item_id` plus the fields.
pub fn update_progress_request(item_id: &str, fields: serde_json::Value) -> serde_json::Value {
    let mut body = fields;
    body["item_id"] = json!(item_id);
    body
}

/// Create a bulk update request body from (item_id, fields) pairs.
pub fn bulk_update_request(items: Vec<(&str, serde_json::Value)>) -> serde_json::Value {
    let entries: Vec<serde_json::Value> = items
        .into_iter()
        .map(|(item_id, fields)| json!([item_id, fields]))
        .collect();
    json!({ "items": entries })
}

/// Create a settings update request body.
pub fn settings_request(
    display_name: Option<&str>,
    max_level: Option<i64>,
    language: Option<&str>,
) -> serde_json::Value {
    let mut obj = serde_json::Map::new();
    if let Some(name) = display_name {
        obj.insert("display_name".to_string(), json!(name));
    }
    if let Some(level) = max_level {
        obj.insert("max_level".to_string(), json!(level));
    }
    if let Some(lang) = language {
        obj.insert("language".to_string(), json!(lang));
    }
    serde_json::Value::Object(obj)
}
