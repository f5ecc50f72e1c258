//! Canonical column vocabulary
//!
//! Carrier exports name the same field in several ways. Everything past the
//! schema harmonizer speaks in the canonical names defined here.

pub const MANIFEST_DATE: &str = "Manifest Date";
pub const PACKAGE_REFERENCE_1: &str = "Package Reference No. 1";
pub const PACKAGE_REFERENCE_2: &str = "Package Reference No. 2";
pub const RMA_NUMBER: &str = "RMA Number";
pub const TRACKING_NUMBER: &str = "Tracking Number";
pub const TRACKING_DETAILS: &str = "Tracking Number - Details";
pub const STATUS: &str = "Status";
pub const SHIPPER_NAME: &str = "Shipper Name";
pub const SHIP_TO: &str = "Ship To";
pub const SCHEDULED_DELIVERY: &str = "Scheduled Delivery";
pub const ORIGINAL_SCHEDULED_DELIVERY: &str = "Original Scheduled Delivery Date";
pub const DATE_DELIVERED: &str = "Date Delivered";
pub const EXCEPTION_DESCRIPTION: &str = "Exception Description";
pub const EXCEPTION_RESOLUTION: &str = "Exception Resolution";
pub const SHIP_TO_LOCATION: &str = "Ship To Location";
pub const WEIGHT: &str = "Weight";

/// Verbatim text the identifier was taken from (normalized view only)
pub const ORIGINAL_RMA: &str = "Original RMA";

/// Output tab names
pub const SHEET_RMA_ANALYSIS: &str = "RMA Analysis";
pub const SHEET_NON_STANDARD: &str = "Non-Standard RMAs";

/// Known header spellings (lower-cased, trimmed) and the canonical name each maps to.
///
/// Order matters: missing canonical columns are appended in this order.
pub const HEADER_VARIANTS: [(&str, &str); 16] = [
    ("manifest date", MANIFEST_DATE),
    ("package reference no. 1", PACKAGE_REFERENCE_1),
    ("package reference no. 2", PACKAGE_REFERENCE_2),
    ("rma number", RMA_NUMBER),
    ("tracking number", TRACKING_NUMBER),
    ("tracking number - details", TRACKING_DETAILS),
    ("status", STATUS),
    ("shipper name", SHIPPER_NAME),
    ("ship to", SHIP_TO),
    ("scheduled delivery", SCHEDULED_DELIVERY),
    ("original scheduled delivery date", ORIGINAL_SCHEDULED_DELIVERY),
    ("date delivered", DATE_DELIVERED),
    ("exception description", EXCEPTION_DESCRIPTION),
    ("exception resolution", EXCEPTION_RESOLUTION),
    ("ship to location", SHIP_TO_LOCATION),
    ("weight", WEIGHT),
];

/// Columns of the normalized per-tracking-number/per-RMA view
pub const NORMALIZED_COLUMNS: [&str; 15] = [
    MANIFEST_DATE,
    ORIGINAL_RMA,
    RMA_NUMBER,
    TRACKING_NUMBER,
    TRACKING_DETAILS,
    STATUS,
    SHIPPER_NAME,
    SHIP_TO,
    SCHEDULED_DELIVERY,
    DATE_DELIVERED,
    EXCEPTION_DESCRIPTION,
    EXCEPTION_RESOLUTION,
    SHIP_TO_LOCATION,
    WEIGHT,
    PACKAGE_REFERENCE_2,
];

/// Public report columns, in output order
pub const FINAL_COLUMNS: [&str; 11] = [
    MANIFEST_DATE,
    RMA_NUMBER,
    TRACKING_DETAILS,
    STATUS,
    SHIPPER_NAME,
    SHIP_TO,
    SCHEDULED_DELIVERY,
    DATE_DELIVERED,
    EXCEPTION_DESCRIPTION,
    EXCEPTION_RESOLUTION,
    WEIGHT,
];

/// Look up the canonical name for a raw header, if it is a known variant
pub fn canonical_name(header: &str) -> Option<&'static str> {
    let key = header.trim().to_lowercase();
    HEADER_VARIANTS
        .iter()
        .find(|(variant, _)| *variant == key)
        .map(|(_, canonical)| *canonical)
}
