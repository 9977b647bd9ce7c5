//! Waste ticket data model
//!
//! Two shapes live here:
//! - [`ExtractedFields`]: what the extraction upstream returns inside
//!   `processed_text`, with spaced keys and loosely typed values
//! - [`TicketRecord`]: the canonical record shown to the user and stored
//!   as one document per submission
//!
//! [`normalize`] is the only way to get from the first to the second.

pub mod fields;
pub mod normalize;
pub mod record;
pub mod weight;

pub use fields::{ExtractedFields, ExtractionEnvelope, Reported, Scalar, TimeField, TimeRange};
pub use normalize::{derive_net_weight, flatten_time, normalize};
pub use record::TicketRecord;
pub use weight::{format_number, parse_float_prefix, WEIGHT_UNIT};
