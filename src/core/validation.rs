//! Shared input checks.
//!
//! Each helper records its failure into a [`FieldErrors`] instead of returning early, so a
//! caller can report every bad field of a request at once.

use crate::errors::FieldErrors;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, de};

/// Requires a non-blank string of at most `max_len` characters.
pub fn require_text(errors: &mut FieldErrors, field: &str, value: &str, max_len: Option<usize>) {
    if value.trim().is_empty() {
        errors.add(field, format!("The {field} field is required."));
        return;
    }
    check_max_len(errors, field, value, max_len);
}

/// Checks an optional string against a length limit; `None` and blanks pass.
pub fn optional_text(
    errors: &mut FieldErrors,
    field: &str,
    value: Option<&str>,
    max_len: Option<usize>,
) {
    if let Some(value) = value {
        check_max_len(errors, field, value, max_len);
    }
}

fn check_max_len(errors: &mut FieldErrors, field: &str, value: &str, max_len: Option<usize>) {
    if let Some(max) = max_len {
        if value.trim().chars().count() > max {
            errors.add(
                field,
                format!("The {field} field must not be greater than {max} characters."),
            );
        }
    }
}

/// Requires an integer of at least `min`.
pub fn require_min(errors: &mut FieldErrors, field: &str, value: i64, min: i64) {
    if value < min {
        errors.add(field, format!("The {field} field must be at least {min}."));
    }
}

/// Requires a finite, non-negative amount.
pub fn require_amount(errors: &mut FieldErrors, field: &str, value: f64) {
    if !value.is_finite() {
        errors.add(field, format!("The {field} field must be a number."));
    } else if value < 0.0 {
        errors.add(field, format!("The {field} field must be at least 0."));
    }
}

/// Message used when a referenced row does not exist.
#[must_use]
pub fn missing_reference(field: &str) -> String {
    format!("The selected {field} is invalid.")
}

/// Trims a string and turns blanks into `None`.
#[must_use]
pub fn normalize_optional(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Parses a business date: an RFC 3339 timestamp, a `YYYY-MM-DD HH:MM:SS` wall-clock time
/// or a bare `YYYY-MM-DD`. Times without an offset are taken as UTC, bare dates as midnight.
#[must_use]
pub fn parse_date_time(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return Some(parsed.with_timezone(&Utc));
    }
    ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M"]
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(value, "%Y-%m-%d")
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
        .map(|naive| naive.and_utc())
}

/// Serde adapter for [`parse_date_time`].
pub fn deserialize_date_time<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_date_time(&raw).ok_or_else(|| de::Error::custom("must be a valid date"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_text() {
        let mut errors = FieldErrors::new();
        require_text(&mut errors, "name", "   ", None);
        require_text(&mut errors, "phone", "0123456789012345678901", Some(20));
        require_text(&mut errors, "address", "Main street 1", None);

        assert!(errors.contains("name"));
        assert!(errors.contains("phone"));
        assert!(!errors.contains("address"));
    }

    #[test]
    fn test_require_amount() {
        let mut errors = FieldErrors::new();
        require_amount(&mut errors, "a", -1.0);
        require_amount(&mut errors, "b", f64::NAN);
        require_amount(&mut errors, "c", f64::INFINITY);
        require_amount(&mut errors, "d", 0.0);

        assert!(errors.contains("a"));
        assert!(errors.contains("b"));
        assert!(errors.contains("c"));
        assert!(!errors.contains("d"));
    }

    #[test]
    fn test_require_min() {
        let mut errors = FieldErrors::new();
        require_min(&mut errors, "qty", 0, 1);
        require_min(&mut errors, "stock", 0, 0);
        assert!(errors.contains("qty"));
        assert!(!errors.contains("stock"));
    }

    #[test]
    fn test_parse_date_time() {
        let midnight = NaiveDate::from_ymd_opt(2025, 1, 15)
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .map(|n| n.and_utc());
        assert_eq!(parse_date_time("2025-01-15"), midnight);
        assert_eq!(parse_date_time("2025-01-15T00:00:00Z"), midnight);
        assert_eq!(parse_date_time("2025-01-15T02:00:00+02:00"), midnight);
        assert_eq!(parse_date_time(" 2025-01-15 00:00:00 "), midnight);
        assert_eq!(parse_date_time("15/01/2025"), None);
        assert_eq!(parse_date_time("2025-02-30"), None);
    }

    #[test]
    fn test_normalize_optional() {
        assert_eq!(normalize_optional(Some("  ".to_string())), None);
        assert_eq!(
            normalize_optional(Some(" 555-0100 ".to_string())),
            Some("555-0100".to_string())
        );
        assert_eq!(normalize_optional(None), None);
    }
}
