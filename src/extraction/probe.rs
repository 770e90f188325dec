// src/extraction/probe.rs
//! Key alias tables and first-match probing over JSON objects

use serde_json::{Map, Value};

pub const PROFILE_KEYS: &[&str] = &["firstName", "fullName", "linkedinUrl"];

// Order matters for field extraction: first non-null alias wins
pub const ID_KEYS: &[&str] = &["jobInfoId", "jobId", "id", "job_id", "jobID"];
pub const TITLE_KEYS: &[&str] = &["jobTitle", "title", "positionTitle", "name"];
pub const COMPANY_KEYS: &[&str] = &["companyName", "company", "company_name"];
pub const APPLY_KEYS: &[&str] = &[
    "applyUrl",
    "applyURL",
    "applyLink",
    "externalUrl",
    "sourceUrl",
    "url",
    "originalUrl",
];
pub const DETAIL_URL_KEYS: &[&str] = &["detailUrl", "jobUrl", "infoUrl", "jobrightUrl"];
pub const LOCATION_KEYS: &[&str] = &["jobLocation", "location", "locationName", "city"];
pub const NAME_KEYS: &[&str] = &["name", "displayName"];

pub const SOCIAL_CONNECTIONS_KEY: &str = "socialConnections";

/// First value among `keys` that is present and not null
pub fn pick<'a>(obj: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a Value> {
    keys.iter()
        .filter_map(|k| obj.get(*k))
        .find(|v| !v.is_null())
}

/// Whether any of `keys` is present with a non-null value
pub fn has_any(obj: &Map<String, Value>, keys: &[&str]) -> bool {
    pick(obj, keys).is_some()
}

/// Scalar rendered as text; strings verbatim, numbers and bools via JSON
pub fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Trimmed string, or None when the value is not a string or is blank
pub fn non_blank(value: &Value) -> Option<String> {
    value
        .as_str()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Optional string field on an object
pub fn str_field(obj: &Map<String, Value>, key: &str) -> Option<String> {
    obj.get(key).and_then(Value::as_str).map(str::to_string)
}

/// Probe `keys`; a nested object is re-probed with `nested_keys`
pub fn pick_text(
    obj: &Map<String, Value>,
    keys: &[&str],
    nested_keys: &[&str],
) -> Option<String> {
    match pick(obj, keys)? {
        Value::Object(inner) => pick(inner, nested_keys).and_then(scalar_text),
        other => scalar_text(other),
    }
}
