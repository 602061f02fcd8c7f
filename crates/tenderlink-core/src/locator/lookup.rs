//! Out-of-band storage name lookup via the per-tender file listing.

use serde_json::Value;

/// Reads `files[index].filename` (also under `data`) from a listing body.
pub(crate) fn storage_name_from_listing(body: &Value, index: usize) -> Option<String> {
    let files = body
        .get("files")
        .or_else(|| body.get("data").and_then(|d| d.get("files")))
        .and_then(Value::as_array)?;
    let entry = files.get(index)?;
    let name = entry.get("filename").and_then(Value::as_str)?.trim();
    if name.is_empty() {
        None
    } else {
        Some(name.to_string())
    }
}
