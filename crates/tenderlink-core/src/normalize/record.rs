//! Canonical tender record built from one JSON object.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::attachment::AttachmentDescriptor;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BudgetRange {
    pub min: Option<f64>,
    pub max: Option<f64>,
}

/// Whether the current user may bid, and the bid they already placed.
/// Only the privileged endpoint can say; everything else gets the default.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BidPermission {
    pub can_bid: bool,
    pub existing_bid_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CanonicalRecord {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub status: Option<String>,
    /// Deadline exactly as the backend sent it.
    pub deadline: Option<String>,
    pub budget: BudgetRange,
    pub categories: Vec<String>,
    pub attachments: Vec<AttachmentDescriptor>,
    pub bid: BidPermission,
}

impl CanonicalRecord {
    /// Builds a record from `obj`. `None` when it has no usable identifier.
    pub(crate) fn from_object(obj: &Map<String, Value>, bid: BidPermission) -> Option<Self> {
        let id = identifier(obj)?;
        Some(Self {
            id,
            title: first_string(obj, &["title", "name"]).unwrap_or_default(),
            description: first_string(obj, &["description"]),
            status: first_string(obj, &["status"]),
            deadline: first_string(obj, &["deadline", "closingDate", "closing_date"]),
            budget: budget(obj),
            categories: categories(obj),
            attachments: attachments(obj),
            bid,
        })
    }
}

/// `_id` or `id`, as a non-empty string or a number.
pub(crate) fn identifier(obj: &Map<String, Value>) -> Option<String> {
    ["_id", "id"].iter().find_map(|k| id_value(obj.get(*k)?))
}

pub(crate) fn has_identifier(value: &Value) -> bool {
    value.as_object().and_then(identifier).is_some()
}

pub(crate) fn has_title(value: &Value) -> bool {
    value
        .as_object()
        .and_then(|o| first_string(o, &["title", "name"]))
        .is_some()
}

fn id_value(v: &Value) -> Option<String> {
    match v {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        // Mongo extended JSON: {"$oid": "..."}
        Value::Object(o) => o.get("$oid").and_then(id_value),
        _ => None,
    }
}

/// Bid id from `existingBid`: a bare id or an object carrying one.
pub(crate) fn bid_id(v: &Value) -> Option<String> {
    match v {
        Value::Object(o) => identifier(o),
        other => id_value(other),
    }
}

fn first_string(obj: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    keys.iter()
        .filter_map(|k| obj.get(*k).and_then(Value::as_str))
        .map(str::trim)
        .find(|s| !s.is_empty())
        .map(str::to_string)
}

fn number(v: Option<&Value>) -> Option<f64> {
    match v? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn budget(obj: &Map<String, Value>) -> BudgetRange {
    let min = number(obj.get("budgetMin"));
    let max = number(obj.get("budgetMax"));
    if min.is_some() || max.is_some() {
        return BudgetRange { min, max };
    }
    match obj.get("budget") {
        Some(Value::Object(b)) => BudgetRange {
            min: number(b.get("min")),
            max: number(b.get("max")),
        },
        Some(v) => {
            let amount = number(Some(v));
            BudgetRange {
                min: amount,
                max: amount,
            }
        }
        None => BudgetRange::default(),
    }
}

fn category_name(v: &Value) -> Option<String> {
    match v {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Object(o) => first_string(o, &["name", "title"]),
        _ => None,
    }
}

fn categories(obj: &Map<String, Value>) -> Vec<String> {
    match obj.get("categories") {
        Some(Value::Array(items)) => items.iter().filter_map(category_name).collect(),
        _ => obj
            .get("category")
            .and_then(category_name)
            .into_iter()
            .collect(),
    }
}

/// Every entry keeps its position, junk included: the files listing is
/// indexed the same way. Unusable entries become empty descriptors.
fn attachments(obj: &Map<String, Value>) -> Vec<AttachmentDescriptor> {
    ["attachments", "documents", "files"]
        .iter()
        .find_map(|k| obj.get(*k).and_then(Value::as_array))
        .map(|items| items.iter().map(AttachmentDescriptor::from_value).collect())
        .unwrap_or_default()
}
