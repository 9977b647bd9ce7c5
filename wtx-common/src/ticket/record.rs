//! Canonical ticket record
//!
//! This is the shape accepted by `POST /api/save-details` and written to
//! the document store. Field names are the stored document keys.

use serde::{Deserialize, Deserializer, Serialize};

use super::fields::Scalar;

/// One waste ticket, every field free-form text
///
/// Deserialization is lenient the way the document store is: unknown keys
/// are dropped, numbers and booleans are cast to text, and only structured
/// values (objects, arrays) fail.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TicketRecord {
    #[serde(rename = "Date", default, deserialize_with = "loose_text")]
    pub date: Option<String>,

    /// Always display text, never an in/out pair
    #[serde(rename = "Time", default, deserialize_with = "loose_text")]
    pub time: Option<String>,

    #[serde(rename = "TicketNumber", default, deserialize_with = "loose_text")]
    pub ticket_number: Option<String>,

    #[serde(rename = "IssuingCompany", default, deserialize_with = "loose_text")]
    pub issuing_company: Option<String>,

    #[serde(rename = "TruckNumber", default, deserialize_with = "loose_text")]
    pub truck_number: Option<String>,

    #[serde(rename = "WasteName", default, deserialize_with = "loose_text")]
    pub waste_name: Option<String>,

    #[serde(rename = "GrossWeight", default, deserialize_with = "loose_text")]
    pub gross_weight: Option<String>,

    #[serde(rename = "TareWeight", default, deserialize_with = "loose_text")]
    pub tare_weight: Option<String>,

    #[serde(rename = "NetWeight", default, deserialize_with = "loose_text")]
    pub net_weight: Option<String>,
}

fn loose_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    Ok(Option::<Scalar>::deserialize(deserializer)?.map(Scalar::into_string))
}

impl TicketRecord {
    /// Labeled fields in display order
    pub fn labeled_fields(&self) -> [(&'static str, Option<&str>); 9] {
        [
            ("Date", self.date.as_deref()),
            ("Time", self.time.as_deref()),
            ("Ticket Number", self.ticket_number.as_deref()),
            ("Issuing Company", self.issuing_company.as_deref()),
            ("Truck Number", self.truck_number.as_deref()),
            ("Waste Name", self.waste_name.as_deref()),
            ("Gross Weight", self.gross_weight.as_deref()),
            ("Tare Weight", self.tare_weight.as_deref()),
            ("Net Weight", self.net_weight.as_deref()),
        ]
    }
}
