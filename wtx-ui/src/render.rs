//! Plain-text rendering of session state
//!
//! Every function returns a `String` so output can be asserted on without a
//! terminal.

use std::fmt::Write;

use wtx_common::TicketRecord;

use crate::chart::{PieChart, DATASET_LABEL};
use crate::session::{Notification, NotificationLevel, SaveOutcome, SessionState, SAVE_FAILURE};

/// Width of a full chart bar, in characters
const BAR_WIDTH: usize = 20;

/// Labeled table card for one record
pub fn render_table(record: &TicketRecord) -> String {
    let fields = record.labeled_fields();
    let width = fields.iter().map(|(label, _)| label.len()).max().unwrap_or(0);

    let mut out = String::new();
    for (label, value) in fields {
        let value = match (label, value) {
            ("Tare Weight", None) => "N/A",
            ("Net Weight", None) => "Calculating...",
            (_, value) => value.unwrap_or(""),
        };
        let _ = writeln!(out, "  {:<width$}  {}", label, value, width = width);
    }
    out
}

/// Text pie chart: one row per slice with share of the total
pub fn render_chart(chart: &PieChart) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", DATASET_LABEL);

    for slice in &chart.slices {
        let label = if slice.label.is_empty() {
            "(unnamed)"
        } else {
            slice.label.as_str()
        };

        match chart.share(slice) {
            Some(share) => {
                let filled = (share * BAR_WIDTH as f64).round() as usize;
                let _ = writeln!(
                    out,
                    "  {} {:<20} {:<bar$} {:>5.1}%",
                    slice.color,
                    label,
                    "#".repeat(filled),
                    share * 100.0,
                    bar = BAR_WIDTH
                );
            }
            None => {
                let _ = writeln!(out, "  {} {:<20} no data", slice.color, label);
            }
        }
    }
    out
}

pub fn render_notification(notification: &Notification) -> String {
    let tag = match notification.level {
        NotificationLevel::Success => "[ok]",
        NotificationLevel::Error => "[error]",
    };
    format!("{} {}", tag, notification.message)
}

/// Everything shown for the current state; empty when idle
pub fn render_state(state: &SessionState) -> String {
    let mut out = String::new();

    match state {
        SessionState::Idle => {}
        SessionState::Loading { .. } => {
            let _ = writeln!(out, "Loading...");
        }
        SessionState::Failed { image_url, error } => {
            let _ = writeln!(out, "Image: {}", image_url);
            let _ = writeln!(out, "{}", error);
        }
        SessionState::Succeeded {
            image_url,
            record,
            chart,
            save,
        } => {
            let _ = writeln!(out, "Image: {}", image_url);
            out.push_str(&render_table(record));
            out.push('\n');
            out.push_str(&render_chart(chart));
            match save {
                SaveOutcome::Pending => {
                    let _ = writeln!(out, "Saving...");
                }
                SaveOutcome::Saved => {
                    let _ = writeln!(out, "Saved");
                }
                SaveOutcome::Failed(reason) => {
                    let _ = writeln!(out, "{}: {}", SAVE_FAILURE, reason);
                }
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::PALETTE;

    fn record() -> TicketRecord {
        TicketRecord {
            ticket_number: Some("104882".to_string()),
            waste_name: Some("Concrete".to_string()),
            gross_weight: Some("100".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_table_placeholders() {
        let table = render_table(&record());

        assert!(table.contains("Ticket Number    104882"));
        assert!(table.contains("Tare Weight      N/A"));
        assert!(table.contains("Net Weight       Calculating..."));
        assert_eq!(table.lines().count(), 9);
    }

    #[test]
    fn test_table_shows_values() {
        let record = TicketRecord {
            tare_weight: Some("20".to_string()),
            net_weight: Some("80 KG".to_string()),
            ..record()
        };
        let table = render_table(&record);

        assert!(table.contains("Tare Weight      20"));
        assert!(table.contains("Net Weight       80 KG"));
    }

    #[test]
    fn test_chart_rows() {
        let records = [
            TicketRecord {
                waste_name: Some("Concrete".to_string()),
                net_weight: Some("75 KG".to_string()),
                ..Default::default()
            },
            TicketRecord {
                net_weight: Some("25".to_string()),
                ..Default::default()
            },
            TicketRecord {
                waste_name: Some("Metal".to_string()),
                net_weight: Some("NaN KG".to_string()),
                ..Default::default()
            },
        ];
        let text = render_chart(&PieChart::from_records(&records));
        let lines: Vec<_> = text.lines().collect();

        assert_eq!(lines[0], "Net Weight");
        assert!(lines[1].starts_with(&format!("  {} Concrete", PALETTE[0])));
        assert!(lines[1].contains(&"#".repeat(15)));
        assert!(lines[1].ends_with(" 75.0%"));
        assert!(lines[2].contains("(unnamed)"));
        assert!(lines[2].ends_with(" 25.0%"));
        assert!(lines[3].contains(PALETTE[2]));
        assert!(lines[3].ends_with("no data"));
    }

    #[test]
    fn test_render_states() {
        assert_eq!(render_state(&SessionState::Idle), "");
        assert_eq!(
            render_state(&SessionState::Loading {
                image_url: "https://example.com/a.png".to_string()
            }),
            "Loading...\n"
        );

        let failed = render_state(&SessionState::Failed {
            image_url: "https://example.com/a.png".to_string(),
            error: "Failed to fetch image details".to_string(),
        });
        assert_eq!(
            failed,
            "Image: https://example.com/a.png\nFailed to fetch image details\n"
        );
    }

    #[test]
    fn test_render_succeeded_with_save_failure() {
        let record = record();
        let state = SessionState::Succeeded {
            image_url: "https://example.com/a.png".to_string(),
            chart: PieChart::from_records(std::slice::from_ref(&record)),
            record,
            save: SaveOutcome::Failed("HTTP 500: disk full".to_string()),
        };
        let text = render_state(&state);

        assert!(text.starts_with("Image: https://example.com/a.png\n"));
        assert!(text.contains("Waste Name       Concrete"));
        assert!(text.contains("no data"));
        assert!(text.ends_with("Failed to save details: HTTP 500: disk full\n"));
    }

    #[test]
    fn test_notification_tags() {
        let ok = Notification {
            level: NotificationLevel::Success,
            message: "Details saved successfully!".to_string(),
        };
        let err = Notification {
            level: NotificationLevel::Error,
            message: "Failed to save details".to_string(),
        };

        assert_eq!(render_notification(&ok), "[ok] Details saved successfully!");
        assert_eq!(render_notification(&err), "[error] Failed to save details");
    }
}
