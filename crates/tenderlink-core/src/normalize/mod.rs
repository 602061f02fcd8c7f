//! Response normalization for tender records.
//!
//! The privileged and standard endpoints wrap the same tender differently,
//! and both have changed shape over time. [`normalize`] classifies the
//! payload into the [`Envelope`] readings it structurally matches and takes
//! the first whose record carries an identifier.

mod envelope;
mod record;

pub use envelope::Envelope;
pub use record::{BidPermission, BudgetRange, CanonicalRecord};

use serde_json::Value;

use crate::error::NormalizeError;

/// Which endpoint produced the payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    Privileged,
    Standard,
}

/// Normalizes a raw tender payload. Pure.
pub fn normalize(source: Source, raw: &Value) -> Result<CanonicalRecord, NormalizeError> {
    for reading in Envelope::readings(source, raw) {
        if !reading.is_acceptable() {
            continue;
        }
        let bid = match reading {
            Envelope::Privileged { data, .. } => BidPermission {
                can_bid: data.get("canBid").and_then(Value::as_bool).unwrap_or(false),
                existing_bid_id: data.get("existingBid").and_then(record::bid_id),
            },
            _ => BidPermission::default(),
        };
        if let Some(obj) = reading.record().as_object() {
            if let Some(rec) = CanonicalRecord::from_object(obj, bid) {
                return Ok(rec);
            }
        }
    }
    Err(NormalizeError::MalformedResponse)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn tender() -> Value {
        json!({
            "_id": "64f1c0ffee",
            "title": "School roof repair",
            "status": "open",
            "attachments": [{"filename": "file-1690000000-123.pdf", "originalName": "Spec.pdf"}]
        })
    }

    #[test]
    fn all_envelopes_yield_same_identity() {
        let t = tender();
        let cases = [
            (
                Source::Privileged,
                json!({"success": true, "data": {"tender": t.clone(), "canBid": true}}),
            ),
            (Source::Standard, json!({"success": true, "data": t.clone()})),
            (Source::Privileged, json!({"success": true, "data": t.clone()})),
            (Source::Privileged, json!({"tender": t.clone()})),
            (Source::Privileged, t.clone()),
        ];
        for (source, raw) in cases {
            let rec = normalize(source, &raw).unwrap();
            assert_eq!(rec.id, "64f1c0ffee");
            assert_eq!(rec.title, "School roof repair");
            assert_eq!(rec.attachments.len(), 1);
        }
        let direct = normalize(Source::Standard, &t).unwrap();
        assert_eq!(direct.id, "64f1c0ffee");
    }

    #[test]
    fn privileged_flags_are_read() {
        let raw = json!({
            "success": true,
            "data": {"tender": tender(), "canBid": true, "existingBid": {"_id": "bid-3"}}
        });
        let rec = normalize(Source::Privileged, &raw).unwrap();
        assert!(rec.bid.can_bid);
        assert_eq!(rec.bid.existing_bid_id.as_deref(), Some("bid-3"));
    }

    #[test]
    fn standard_flags_default() {
        let raw = json!({"success": true, "data": tender(), "canBid": true});
        let rec = normalize(Source::Standard, &raw).unwrap();
        assert_eq!(rec.bid, BidPermission::default());
    }

    #[test]
    fn empty_and_unsuccessful_are_malformed() {
        assert_eq!(
            normalize(Source::Standard, &json!({})),
            Err(NormalizeError::MalformedResponse)
        );
        assert_eq!(
            normalize(Source::Privileged, &json!({"success": false})),
            Err(NormalizeError::MalformedResponse)
        );
        assert_eq!(
            normalize(Source::Standard, &json!({"success": false})),
            Err(NormalizeError::MalformedResponse)
        );
    }

    #[test]
    fn privileged_without_identifier_falls_through() {
        // The privileged wrapper matches structurally but its tender has no id;
        // the top-level tender field does.
        let raw = json!({
            "success": true,
            "data": {"tender": {"title": "ghost"}},
            "tender": {"id": 5, "title": "real"}
        });
        let rec = normalize(Source::Privileged, &raw).unwrap();
        assert_eq!(rec.id, "5");
        assert_eq!(rec.title, "real");
        assert!(!rec.bid.can_bid);
    }

    #[test]
    fn non_object_payload_is_malformed() {
        assert!(normalize(Source::Standard, &json!("oops")).is_err());
        assert!(normalize(Source::Standard, &json!([tender()])).is_err());
    }
}
