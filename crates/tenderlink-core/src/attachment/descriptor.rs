//! Raw attachment metadata as the backend sends it.
//!
//! Different endpoints (and different generations of the upload code) name
//! the same facts differently, so every field is optional and extraction is
//! lenient: a field of the wrong JSON type is treated as absent.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Name fields carried by a nested `data` (or object-valued `file`) sub-object.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NestedFile {
    pub filename: Option<String>,
    pub file: Option<String>,
    pub original_name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AttachmentDescriptor {
    pub filename: Option<String>,
    pub file: Option<String>,
    /// `savedAs` / `saved_as`.
    pub saved_as: Option<String>,
    /// `generatedName` / `generated_name` / `storedName` / `stored_name`.
    pub generated_name: Option<String>,
    pub path: Option<String>,
    /// `relativePath` / `relative_path`.
    pub relative_path: Option<String>,
    pub url: Option<String>,
    pub name: Option<String>,
    pub original_name: Option<String>,
    /// Snake-case `original_name`, kept apart from `originalName` because
    /// both spellings show up side by side.
    pub original_name_snake: Option<String>,
    pub data: Option<NestedFile>,
}

impl AttachmentDescriptor {
    /// Builds a descriptor from any JSON value. A bare string is a path.
    pub fn from_value(value: &Value) -> Self {
        match value {
            Value::String(s) => Self {
                path: non_empty(s),
                ..Self::default()
            },
            Value::Object(obj) => Self::from_object(obj),
            _ => Self::default(),
        }
    }

    fn from_object(obj: &Map<String, Value>) -> Self {
        let nested = obj
            .get("data")
            .and_then(Value::as_object)
            .or_else(|| obj.get("file").and_then(Value::as_object))
            .map(|n| NestedFile {
                filename: str_field(n, &["filename"]),
                file: str_field(n, &["file"]),
                original_name: str_field(n, &["originalName", "original_name", "originalname"]),
            });

        Self {
            filename: str_field(obj, &["filename"]),
            file: str_field(obj, &["file"]),
            saved_as: str_field(obj, &["savedAs", "saved_as"]),
            generated_name: str_field(
                obj,
                &["generatedName", "generated_name", "storedName", "stored_name"],
            ),
            path: str_field(obj, &["path"]),
            relative_path: str_field(obj, &["relativePath", "relative_path"]),
            url: str_field(obj, &["url"]),
            name: str_field(obj, &["name"]),
            original_name: str_field(obj, &["originalName", "originalname"]),
            original_name_snake: str_field(obj, &["original_name"]),
            data: nested,
        }
    }
}

impl<'de> Deserialize<'de> for AttachmentDescriptor {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Ok(Self::from_value(&value))
    }
}

/// First key holding a non-blank string.
fn str_field(obj: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    keys.iter()
        .filter_map(|k| obj.get(*k).and_then(Value::as_str))
        .find_map(non_empty)
}

fn non_empty(s: &str) -> Option<String> {
    let t = s.trim();
    if t.is_empty() {
        None
    } else {
        Some(t.to_string())
    }
}
