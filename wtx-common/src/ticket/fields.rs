//! Upstream extraction shapes
//!
//! The extraction API answers with an envelope whose `processed_text` is
//! itself a JSON document of ticket fields. That inner document is loose:
//! keys may be missing or `null`, numbers show up where strings are
//! expected, and `Time` is either a string or a `{"Time In", "Time Out"}`
//! object. Each of those cases is a distinct variant here so normalization
//! can match on them instead of probing JSON values at runtime.

use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

use super::weight::format_number;

/// Response body of `POST /extract-details`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionEnvelope {
    /// JSON-encoded [`ExtractedFields`]
    pub processed_text: String,
}

impl ExtractionEnvelope {
    /// Decode the nested field document
    pub fn fields(&self) -> serde_json::Result<ExtractedFields> {
        ExtractedFields::from_processed_text(&self.processed_text)
    }
}

/// Tri-state presence of a field in the upstream document
///
/// `Missing` and `Null` are kept apart: net weight is only derived when tare
/// weight is explicitly `null`, not when the key is absent.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Reported<T> {
    /// Key not present
    #[default]
    Missing,
    /// Key present with JSON `null`
    Null,
    /// Key present with a value
    Value(T),
}

impl<T> Reported<T> {
    pub fn is_missing(&self) -> bool {
        matches!(self, Reported::Missing)
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Reported::Null)
    }

    pub fn as_value(&self) -> Option<&T> {
        match self {
            Reported::Value(v) => Some(v),
            _ => None,
        }
    }

    pub fn into_option(self) -> Option<T> {
        match self {
            Reported::Value(v) => Some(v),
            _ => None,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Reported<U> {
        match self {
            Reported::Missing => Reported::Missing,
            Reported::Null => Reported::Null,
            Reported::Value(v) => Reported::Value(f(v)),
        }
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Reported<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        // Only reached when the key exists; `#[serde(default)]` covers Missing
        Ok(match Option::<T>::deserialize(deserializer)? {
            Some(v) => Reported::Value(v),
            None => Reported::Null,
        })
    }
}

impl<T: Serialize> Serialize for Reported<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Reported::Value(v) => v.serialize(serializer),
            Reported::Missing | Reported::Null => serializer.serialize_none(),
        }
    }
}

/// A free-form field value
///
/// Accepts JSON strings, numbers, and booleans and keeps their text form.
/// Objects and arrays are rejected.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Scalar(pub String);

impl Scalar {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl From<&str> for Scalar {
    fn from(s: &str) -> Self {
        Scalar(s.to_string())
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Serialize for Scalar {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

struct ScalarVisitor;

impl<'de> Visitor<'de> for ScalarVisitor {
    type Value = Scalar;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a string, number, or boolean")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Scalar, E> {
        Ok(Scalar(v.to_string()))
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<Scalar, E> {
        Ok(Scalar(v))
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> Result<Scalar, E> {
        Ok(Scalar(v.to_string()))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Scalar, E> {
        Ok(Scalar(v.to_string()))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Scalar, E> {
        Ok(Scalar(v.to_string()))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Scalar, E> {
        Ok(Scalar(format_number(v)))
    }
}

impl<'de> Deserialize<'de> for Scalar {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(ScalarVisitor)
    }
}

/// Time-in / time-out pair as reported on some tickets
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TimeRange {
    #[serde(rename = "Time In", default)]
    pub time_in: Option<Scalar>,
    #[serde(rename = "Time Out", default)]
    pub time_out: Option<Scalar>,
}

/// The `Time` field: either display text or an in/out pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TimeField {
    Display(Scalar),
    InOut(TimeRange),
}

/// Ticket fields as extracted upstream
///
/// Unknown keys are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ExtractedFields {
    #[serde(rename = "Date", default, skip_serializing_if = "Reported::is_missing")]
    pub date: Reported<Scalar>,

    #[serde(rename = "Time", default, skip_serializing_if = "Reported::is_missing")]
    pub time: Reported<TimeField>,

    #[serde(rename = "Ticket Number", default, skip_serializing_if = "Reported::is_missing")]
    pub ticket_number: Reported<Scalar>,

    #[serde(rename = "Issuing Company", default, skip_serializing_if = "Reported::is_missing")]
    pub issuing_company: Reported<Scalar>,

    #[serde(rename = "Truck Number", default, skip_serializing_if = "Reported::is_missing")]
    pub truck_number: Reported<Scalar>,

    #[serde(rename = "Waste Name", default, skip_serializing_if = "Reported::is_missing")]
    pub waste_name: Reported<Scalar>,

    #[serde(rename = "Gross Weight", default, skip_serializing_if = "Reported::is_missing")]
    pub gross_weight: Reported<Scalar>,

    #[serde(rename = "Tare Weight", default, skip_serializing_if = "Reported::is_missing")]
    pub tare_weight: Reported<Scalar>,

    #[serde(rename = "Net Weight", default, skip_serializing_if = "Reported::is_missing")]
    pub net_weight: Reported<Scalar>,
}

impl ExtractedFields {
    /// Parse the string carried in [`ExtractionEnvelope::processed_text`]
    pub fn from_processed_text(text: &str) -> serde_json::Result<Self> {
        serde_json::from_str(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_missing_and_null_are_distinct() {
        let fields: ExtractedFields =
            serde_json::from_value(json!({ "Tare Weight": null })).unwrap();

        assert!(fields.tare_weight.is_null());
        assert!(fields.gross_weight.is_missing());
    }

    #[test]
    fn test_numbers_become_text() {
        let fields: ExtractedFields = serde_json::from_value(json!({
            "Gross Weight": 1520,
            "Tare Weight": 20.5,
            "Ticket Number": "T-9"
        }))
        .unwrap();

        assert_eq!(fields.gross_weight, Reported::Value(Scalar::from("1520")));
        assert_eq!(fields.tare_weight, Reported::Value(Scalar::from("20.5")));
        assert_eq!(fields.ticket_number, Reported::Value(Scalar::from("T-9")));
    }

    #[test]
    fn test_time_as_text() {
        let fields: ExtractedFields =
            serde_json::from_value(json!({ "Time": "08:15" })).unwrap();

        assert_eq!(
            fields.time,
            Reported::Value(TimeField::Display(Scalar::from("08:15")))
        );
    }

    #[test]
    fn test_time_as_in_out_object() {
        let fields: ExtractedFields = serde_json::from_value(json!({
            "Time": { "Time In": "08:00", "Time Out": "09:00" }
        }))
        .unwrap();

        assert_eq!(
            fields.time,
            Reported::Value(TimeField::InOut(TimeRange {
                time_in: Some(Scalar::from("08:00")),
                time_out: Some(Scalar::from("09:00")),
            }))
        );
    }

    #[test]
    fn test_unknown_keys_ignored() {
        let fields: ExtractedFields =
            serde_json::from_value(json!({ "Driver": "Sam", "Date": "2024-01-02" })).unwrap();

        assert_eq!(fields.date, Reported::Value(Scalar::from("2024-01-02")));
    }

    #[test]
    fn test_envelope_decodes_nested_document() {
        let envelope = ExtractionEnvelope {
            processed_text: r#"{"Waste Name":"Concrete","Gross Weight":"100"}"#.to_string(),
        };

        let fields = envelope.fields().unwrap();
        assert_eq!(fields.waste_name, Reported::Value(Scalar::from("Concrete")));
    }

    #[test]
    fn test_nested_document_must_be_json() {
        let envelope = ExtractionEnvelope {
            processed_text: "Sorry, I could not read that ticket.".to_string(),
        };

        assert!(envelope.fields().is_err());
    }

    #[test]
    fn test_structured_value_rejected_for_text_field() {
        let result: Result<ExtractedFields, _> =
            serde_json::from_value(json!({ "Date": ["2024", "01"] }));

        assert!(result.is_err());
    }
}
