//! Scalar field normalization
//!
//! Carrier exports spell "no value" many ways: empty cells, `nan` left over
//! from spreadsheet round-trips, `None`, `Not Available`, `not avail.`. All of
//! them collapse to the single sentinel [`NA`].

/// The normalized "not available" marker
pub const NA: &str = "N/A";

/// True when `value` is one of the "no value" spellings
pub fn is_missing(value: Option<&str>) -> bool {
    let Some(text) = value else {
        return true;
    };
    let text = text.trim();
    if text.is_empty() {
        return true;
    }
    let lower = text.to_lowercase();
    lower == "nan" || lower == "none" || lower.contains("not avail")
}

/// Map null/blank/"not available" variants to [`NA`], otherwise trim
pub fn normalize_missing(value: Option<&str>) -> String {
    if is_missing(value) {
        NA.to_string()
    } else {
        value.unwrap_or_default().trim().to_string()
    }
}

/// Display form of a field; with `drop_sentinel` the sentinel becomes ""
pub fn to_display_string(value: Option<&str>, drop_sentinel: bool) -> String {
    let normalized = normalize_missing(value);
    if drop_sentinel && normalized == NA {
        String::new()
    } else {
        normalized
    }
}
