//! "Tracking Number - Details" line composition
//!
//! Format: `{TN} - {Status}, {Date} → {WHO}` followed by ` ({exception})` for
//! shipments that are not delivered yet.
//!
//! - Delivered rows show Date Delivered, everything else Scheduled Delivery.
//! - WHO is `ROCKWELL` when the ship-to names the company, else `CUSTOMER`.
//! - Exception text is description then resolution, sentinels dropped.

use once_cell::sync::Lazy;
use regex::Regex;

use super::expander::NormalizedRow;
use super::normalize::{to_display_string, NA};
use super::schema::canonicalize_status;

static NOT_AVAILABLE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\bnot\s*avail").expect("not-available pattern is valid"));

/// Which side of the return the shipment is headed to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Recipient {
    Rockwell,
    Customer,
}

impl Recipient {
    pub fn classify(ship_to: &str) -> Self {
        if ship_to.to_uppercase().contains("ROCKWELL") {
            Self::Rockwell
        } else {
            Self::Customer
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Rockwell => "ROCKWELL",
            Self::Customer => "CUSTOMER",
        }
    }
}

fn display_date(value: &str) -> String {
    let text = to_display_string(Some(value), false);
    if NOT_AVAILABLE.is_match(&text) {
        NA.to_string()
    } else {
        text
    }
}

/// Build the details line for one normalized row
pub fn compose_tracking_details(row: &NormalizedRow) -> String {
    let tracking_number = row.tracking_number.trim().to_uppercase();
    let status = canonicalize_status(&row.status);
    let delivered = status.eq_ignore_ascii_case("delivered");

    let date = if delivered {
        display_date(&row.date_delivered)
    } else {
        display_date(&row.scheduled_delivery)
    };
    let date = if date.trim().is_empty() { NA.to_string() } else { date };

    let who = Recipient::classify(&row.ship_to);
    let mut line = format!("{} - {}, {} → {}", tracking_number, status, date, who.as_str());

    if !delivered {
        let exception = [
            to_display_string(Some(&row.exception_description), true),
            to_display_string(Some(&row.exception_resolution), true),
        ]
        .into_iter()
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(" ");

        if !exception.is_empty() {
            line.push_str(&format!(" ({})", exception));
        }
    }

    line
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(status: &str) -> NormalizedRow {
        NormalizedRow {
            tracking_number: "1z1234567890123456".to_string(),
            status: status.to_string(),
            ship_to: "Customer XYZ".to_string(),
            scheduled_delivery: "2024-01-15".to_string(),
            date_delivered: "2024-01-14".to_string(),
            exception_description: "N/A".to_string(),
            exception_resolution: "N/A".to_string(),
            ..NormalizedRow::default()
        }
    }

    #[test]
    fn test_in_transit_uses_scheduled_date() {
        assert_eq!(
            compose_tracking_details(&row("In Transit")),
            "1Z1234567890123456 - In Transit, 2024-01-15 → CUSTOMER"
        );
    }

    #[test]
    fn test_delivered_uses_delivered_date_and_skips_exceptions() {
        let mut r = row("Delivered");
        r.exception_description = "Damaged".to_string();
        r.ship_to = "Rockwell Automation Returns".to_string();
        assert_eq!(
            compose_tracking_details(&r),
            "1Z1234567890123456 - Delivered, 2024-01-14 → ROCKWELL"
        );
    }

    #[test]
    fn test_exception_text_is_appended() {
        let mut r = row("Exception");
        r.exception_description = "Address incorrect".to_string();
        r.exception_resolution = "Contacting receiver".to_string();
        assert_eq!(
            compose_tracking_details(&r),
            "1Z1234567890123456 - Exception, 2024-01-15 → CUSTOMER (Address incorrect Contacting receiver)"
        );
    }

    #[test]
    fn test_unavailable_dates_become_sentinel() {
        let mut r = row("In Transit");
        r.scheduled_delivery = "Not  available".to_string();
        assert!(compose_tracking_details(&r).contains(", N/A → "));

        r.scheduled_delivery = String::new();
        assert!(compose_tracking_details(&r).contains(", N/A → "));
    }

    #[test]
    fn test_recipient_classification() {
        assert_eq!(Recipient::classify("ROCKWELL AUTOMATION"), Recipient::Rockwell);
        assert_eq!(Recipient::classify("rockwell"), Recipient::Rockwell);
        assert_eq!(Recipient::classify("N/A"), Recipient::Customer);
    }
}
