//! Alert classification for report rows
//!
//! - `Critical`: the carrier reports an exception, or no status at all
//! - `Warning`: still in transit (or only manifested) longer than the
//!   configured number of days after the manifest date
//!
//! Rows whose manifest date cannot be parsed never raise an aging alert.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use rma_common::config::AlertThresholds;

use crate::engine::normalize::NA;
use crate::engine::FinalRow;

/// Appended to the details line of rows that need action
pub const ALERT_SUFFIX: &str = " (⚠️action to be taken)";

const DATE_FORMATS: [&str; 4] = ["%Y-%m-%d", "%m/%d/%Y", "%Y%m%d", "%d.%m.%Y"];
const DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S", "%m/%d/%Y %H:%M"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum AlertLevel {
    None,
    Warning,
    Critical,
}

/// Parse the date formats seen in carrier exports
pub fn parse_report_date(value: &str) -> Option<NaiveDate> {
    let text = value.trim();
    if text.is_empty() || text == NA {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.date_naive());
    }
    for format in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(text, format) {
            return Some(dt.date());
        }
    }
    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(text, format).ok())
}

/// Alert level of one report row as of `analysis_date`
pub fn classify(row: &FinalRow, analysis_date: NaiveDate, thresholds: &AlertThresholds) -> AlertLevel {
    let threshold = match row.status.as_str() {
        "Exception" | NA => return AlertLevel::Critical,
        "In Transit" => thresholds.in_transit_days_threshold,
        "Manifest" => thresholds.manifest_days_threshold,
        _ => return AlertLevel::None,
    };

    match parse_report_date(&row.manifest_date) {
        Some(manifested) if (analysis_date - manifested).num_days() > threshold => {
            AlertLevel::Warning
        }
        _ => AlertLevel::None,
    }
}

/// Copy of `rows` with [`ALERT_SUFFIX`] appended to the details of alerting rows
pub fn annotate(rows: &[FinalRow], analysis_date: NaiveDate, thresholds: &AlertThresholds) -> Vec<FinalRow> {
    rows.iter()
        .map(|row| {
            let mut row = row.clone();
            if classify(&row, analysis_date, thresholds) != AlertLevel::None
                && !row.tracking_details.ends_with(ALERT_SUFFIX)
            {
                row.tracking_details.push_str(ALERT_SUFFIX);
            }
            row
        })
        .collect()
}

/// Number of (warning, critical) rows
pub fn count_alerts(rows: &[FinalRow], analysis_date: NaiveDate, thresholds: &AlertThresholds) -> (usize, usize) {
    rows.iter()
        .map(|row| classify(row, analysis_date, thresholds))
        .fold((0, 0), |(warn, crit), level| match level {
            AlertLevel::Warning => (warn + 1, crit),
            AlertLevel::Critical => (warn, crit + 1),
            AlertLevel::None => (warn, crit),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn row(status: &str, manifest: &str) -> FinalRow {
        FinalRow {
            manifest_date: manifest.to_string(),
            rma_number: "67024814".to_string(),
            tracking_details: "1Z1234567890123456 - In Transit, 2024-01-15 → CUSTOMER".to_string(),
            status: status.to_string(),
            ..FinalRow::default()
        }
    }

    #[test]
    fn test_parse_report_date_formats() {
        assert_eq!(parse_report_date("2024-01-10"), Some(date(2024, 1, 10)));
        assert_eq!(parse_report_date("01/10/2024"), Some(date(2024, 1, 10)));
        assert_eq!(parse_report_date("20240110"), Some(date(2024, 1, 10)));
        assert_eq!(parse_report_date("2024-01-10 08:30:00"), Some(date(2024, 1, 10)));
        assert_eq!(parse_report_date("2024-01-10T08:30:00+01:00"), Some(date(2024, 1, 10)));
        assert_eq!(parse_report_date("N/A"), None);
        assert_eq!(parse_report_date("next week"), None);
    }

    #[test]
    fn test_exception_and_missing_status_are_critical() {
        let thresholds = AlertThresholds::default();
        let today = date(2024, 1, 11);
        assert_eq!(classify(&row("Exception", "2024-01-10"), today, &thresholds), AlertLevel::Critical);
        assert_eq!(classify(&row("N/A", ""), today, &thresholds), AlertLevel::Critical);
    }

    #[test]
    fn test_in_transit_ages_past_threshold() {
        let thresholds = AlertThresholds::default();
        let r = row("In Transit", "2024-01-10");
        assert_eq!(classify(&r, date(2024, 1, 15), &thresholds), AlertLevel::None);
        assert_eq!(classify(&r, date(2024, 1, 16), &thresholds), AlertLevel::Warning);
    }

    #[test]
    fn test_manifest_threshold_is_separate() {
        let thresholds = AlertThresholds {
            in_transit_days_threshold: 5,
            manifest_days_threshold: 1,
        };
        let r = row("Manifest", "2024-01-10");
        assert_eq!(classify(&r, date(2024, 1, 12), &thresholds), AlertLevel::Warning);
    }

    #[test]
    fn test_delivered_never_alerts() {
        let thresholds = AlertThresholds::default();
        assert_eq!(classify(&row("Delivered", "2020-01-01"), date(2024, 1, 1), &thresholds), AlertLevel::None);
    }

    #[test]
    fn test_unparseable_manifest_date_does_not_age() {
        let thresholds = AlertThresholds::default();
        assert_eq!(classify(&row("In Transit", "N/A"), date(2030, 1, 1), &thresholds), AlertLevel::None);
    }

    #[test]
    fn test_annotate_appends_suffix_once() {
        let thresholds = AlertThresholds::default();
        let rows = vec![row("Exception", "2024-01-10"), row("Delivered", "2024-01-10")];
        let once = annotate(&rows, date(2024, 1, 11), &thresholds);
        let twice = annotate(&once, date(2024, 1, 11), &thresholds);

        assert!(once[0].tracking_details.ends_with(ALERT_SUFFIX));
        assert!(!once[1].tracking_details.ends_with(ALERT_SUFFIX));
        assert_eq!(once, twice);
        assert_eq!(count_alerts(&rows, date(2024, 1, 11), &thresholds), (0, 1));
    }
}
