//! JSON export of the data model.
//!
//! Thin wrappers around `serde_json` for inspecting a parsed [`XapiRoot`].
//! Numbers stay numbers, blobs become base64 strings and temporal values use
//! ISO-8601. There is no JSON import; XML is the only wire format.

use crate::error::Result;
use crate::model::XapiRoot;

/// Serializes a root to a compact JSON string.
pub fn to_json_string(root: &XapiRoot) -> Result<String> {
    Ok(serde_json::to_string(root)?)
}

/// Serializes a root to a pretty-printed JSON string.
pub fn to_json_string_pretty(root: &XapiRoot) -> Result<String> {
    Ok(serde_json::to_string_pretty(root)?)
}

/// Serializes a root to a `serde_json::Value`.
pub fn to_json_value(root: &XapiRoot) -> Result<serde_json::Value> {
    Ok(serde_json::to_value(root)?)
}
