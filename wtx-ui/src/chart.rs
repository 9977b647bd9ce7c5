//! Net weight pie chart
//!
//! One slice per displayed record, labeled by waste name and sized by the
//! numeric net weight (unit marker removed).

use wtx_common::ticket::weight::strip_unit;
use wtx_common::TicketRecord;

/// Slice colors, cycled
pub const PALETTE: [&str; 5] = ["#FF6384", "#36A2EB", "#FFCE56", "#4BC0C0", "#9966FF"];

/// Dataset label shown above the chart
pub const DATASET_LABEL: &str = "Net Weight";

#[derive(Debug, Clone, PartialEq)]
pub struct PieSlice {
    /// Waste name; empty when the ticket had none
    pub label: String,
    /// `None` when net weight is absent or not numeric
    pub value: Option<f64>,
    pub color: &'static str,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct PieChart {
    pub slices: Vec<PieSlice>,
}

impl PieChart {
    pub fn from_records(records: &[TicketRecord]) -> Self {
        let slices = records
            .iter()
            .enumerate()
            .map(|(i, record)| PieSlice {
                label: record.waste_name.clone().unwrap_or_default(),
                value: record
                    .net_weight
                    .as_deref()
                    .map(strip_unit)
                    .filter(|v| v.is_finite()),
                color: PALETTE[i % PALETTE.len()],
            })
            .collect();

        Self { slices }
    }

    /// Sum of all sized slices
    pub fn total(&self) -> f64 {
        self.slices.iter().filter_map(|s| s.value).sum()
    }

    /// Fraction of the pie taken by `slice`, in `0.0..=1.0`
    pub fn share(&self, slice: &PieSlice) -> Option<f64> {
        let total = self.total();
        match slice.value {
            Some(v) if total > 0.0 && v > 0.0 => Some(v / total),
            _ => None,
        }
    }
}
