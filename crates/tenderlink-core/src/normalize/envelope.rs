//! Response envelope shapes seen on the tender endpoints.

use serde_json::{Map, Value};

use super::record::{has_identifier, has_title};
use super::Source;

/// One structural reading of a payload, pointing at the record it would yield.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Envelope<'a> {
    /// `{success: true, data: {tender, canBid?, existingBid?}}` from the privileged endpoint.
    Privileged {
        tender: &'a Value,
        data: &'a Map<String, Value>,
    },
    /// Standard endpoint: the payload itself, or `data` when wrapped in `{success, data}`.
    Standard(&'a Value),
    /// `{success, data}` whose `data` carries a title.
    SuccessData(&'a Value),
    /// A `tender` object at the top level or under `data`.
    TenderField(&'a Value),
    /// The payload itself.
    Bare(&'a Value),
}

impl<'a> Envelope<'a> {
    /// Every reading that structurally applies, in precedence order.
    pub fn readings(source: Source, raw: &'a Value) -> Vec<Envelope<'a>> {
        let Some(obj) = raw.as_object() else {
            return Vec::new();
        };
        let data = obj.get("data");
        let data_obj = data.and_then(Value::as_object);
        let mut out = Vec::with_capacity(4);

        if source == Source::Privileged && obj.get("success") == Some(&Value::Bool(true)) {
            if let Some(d) = data_obj {
                if let Some(tender) = d.get("tender").filter(|t| t.is_object()) {
                    out.push(Envelope::Privileged { tender, data: d });
                }
            }
        }

        if source == Source::Standard {
            let wrapped = data
                .filter(|d| d.is_object())
                .filter(|_| obj.contains_key("success") || !has_identifier(raw));
            out.push(Envelope::Standard(wrapped.unwrap_or(raw)));
        }

        if obj.contains_key("success") {
            if let Some(d) = data.filter(|d| has_title(d)) {
                out.push(Envelope::SuccessData(d));
            }
        }

        let tender = obj
            .get("tender")
            .or_else(|| data_obj.and_then(|d| d.get("tender")))
            .filter(|t| t.is_object());
        if let Some(t) = tender {
            out.push(Envelope::TenderField(t));
        }

        out.push(Envelope::Bare(raw));
        out
    }

    pub fn record(&self) -> &'a Value {
        match *self {
            Envelope::Privileged { tender, .. } => tender,
            Envelope::Standard(v)
            | Envelope::SuccessData(v)
            | Envelope::TenderField(v)
            | Envelope::Bare(v) => v,
        }
    }

    /// A reading is accepted only if its record has an identifier.
    pub fn is_acceptable(&self) -> bool {
        has_identifier(self.record())
    }
}
