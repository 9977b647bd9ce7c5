//! Normalization of extracted fields into a [`TicketRecord`]
//!
//! Steps run in a fixed order:
//! 1. flatten an in/out `Time` pair into `"<in> - <out>"`
//! 2. derive net weight from gross weight when tare weight is `null`
//!
//! Net weight derivation copies the gross value; it never subtracts tare.
//! When tare weight has a value, net weight is whatever upstream reported.

use tracing::debug;

use super::fields::{ExtractedFields, Reported, Scalar, TimeField};
use super::record::TicketRecord;
use super::weight::{parse_float_prefix, with_unit};

/// Collapse the `Time` field into display text
pub fn flatten_time(time: Reported<TimeField>) -> Option<String> {
    match time.into_option()? {
        TimeField::Display(text) => Some(text.into_string()),
        TimeField::InOut(range) => {
            let time_in = range.time_in.map(Scalar::into_string).unwrap_or_default();
            let time_out = range.time_out.map(Scalar::into_string).unwrap_or_default();
            Some(format!("{} - {}", time_in, time_out))
        }
    }
}

/// Net weight for display and storage
///
/// Gross weight must be non-empty and tare weight explicitly `null`;
/// a missing tare key leaves `net` untouched.
pub fn derive_net_weight(
    gross: &Reported<Scalar>,
    tare: &Reported<Scalar>,
    net: Reported<Scalar>,
) -> Option<String> {
    match (gross.as_value(), tare) {
        (Some(gross), Reported::Null) if !gross.as_str().is_empty() => {
            let derived = with_unit(parse_float_prefix(gross.as_str()));
            debug!(gross = %gross, net = %derived, "Derived net weight from gross weight");
            Some(derived)
        }
        _ => net.into_option().map(Scalar::into_string),
    }
}

/// Convert upstream fields into the canonical record
pub fn normalize(fields: ExtractedFields) -> TicketRecord {
    let ExtractedFields {
        date,
        time,
        ticket_number,
        issuing_company,
        truck_number,
        waste_name,
        gross_weight,
        tare_weight,
        net_weight,
    } = fields;

    let time = flatten_time(time);
    let net_weight = derive_net_weight(&gross_weight, &tare_weight, net_weight);

    TicketRecord {
        date: text(date),
        time,
        ticket_number: text(ticket_number),
        issuing_company: text(issuing_company),
        truck_number: text(truck_number),
        waste_name: text(waste_name),
        gross_weight: text(gross_weight),
        tare_weight: text(tare_weight),
        net_weight,
    }
}

fn text(field: Reported<Scalar>) -> Option<String> {
    field.into_option().map(Scalar::into_string)
}
