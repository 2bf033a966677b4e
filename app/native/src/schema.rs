//! JSON Schema for the configuration file.

use crate::config::AlbumwallConfig;

/// Identifier embedded as the schema's `$id`.
const SCHEMA_ID: &str =
    "https://raw.githubusercontent.com/albumwall/albumwall/main/albumwall.schema.json";

/// Generates a JSON Schema for the albumwall configuration.
#[must_use]
pub fn generate_schema() -> schemars::Schema {
    let mut schema = schemars::schema_for!(AlbumwallConfig);

    if let Some(obj) = schema.as_object_mut() {
        obj.insert("$id".to_string(), serde_json::json!(SCHEMA_ID));
    }

    schema
}

/// Generates a pretty-printed JSON Schema string for the configuration.
#[must_use]
pub fn generate_schema_json() -> String {
    let schema = generate_schema();
    serde_json::to_string_pretty(&schema).unwrap_or_default()
}
