//! Input validation and normalization for store operations
//!
//! Titles, names, priorities and due dates arrive as loose text from views
//! and the command line; these helpers turn them into checked values or a
//! `StoreError::InvalidInput`.

use crate::error::StoreError;
use crate::todo::{Color, Priority};
use chrono::{DateTime, NaiveDate, TimeZone, Utc};

/// Trim a task title and reject it if nothing is left
pub fn normalize_title(title: &str) -> Result<String, StoreError> {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        return Err(StoreError::invalid("Task title cannot be empty"));
    }
    Ok(trimmed.to_string())
}

/// Trim a category name and reject it if nothing is left
pub fn normalize_name(name: &str) -> Result<String, StoreError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(StoreError::invalid("Category name cannot be empty"));
    }
    Ok(trimmed.to_string())
}

/// Normalize CRLF and lone CR line endings to LF
pub fn normalize_line_endings(s: &str) -> String {
    s.replace("\r\n", "\n").replace('\r', "\n")
}

/// Normalize an id supplied by a caller
///
/// Ids are opaque; only surrounding whitespace is removed.
pub fn normalize_id(id: &str) -> &str {
    id.trim()
}

/// Parse a priority band (`low`, `medium`, `high`)
pub fn parse_priority(s: &str) -> Result<Priority, StoreError> {
    s.parse::<Priority>().map_err(StoreError::InvalidInput)
}

/// Parse a category color given in any CSS color syntax
pub fn parse_color(s: &str) -> Result<Color, StoreError> {
    s.parse::<Color>().map_err(StoreError::InvalidInput)
}

/// Parse a due date given as `YYYY-MM-DD`
///
/// # Arguments
/// * `date_str` - Date string in YYYY-MM-DD format
/// * `tz` - Time zone whose midnight the due date is anchored to
///
/// # Returns
/// The instant of local midnight at the start of that day
pub fn parse_due_date<Tz: TimeZone>(date_str: &str, tz: &Tz) -> Result<DateTime<Utc>, StoreError> {
    let date = NaiveDate::parse_from_str(date_str.trim(), "%Y-%m-%d").map_err(|_| {
        StoreError::invalid(format!(
            "Invalid date format '{}'. Use YYYY-MM-DD (e.g., '2025-03-15')",
            date_str
        ))
    })?;
    Ok(start_of_day(date, tz))
}

/// First instant of `date` in `tz`
///
/// Falls back to UTC midnight when local midnight does not exist (DST gap).
pub fn start_of_day<Tz: TimeZone>(date: NaiveDate, tz: &Tz) -> DateTime<Utc> {
    let midnight = date.and_time(chrono::NaiveTime::MIN);
    tz.from_local_datetime(&midnight)
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|| Utc.from_utc_datetime(&midnight))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::FixedOffset;

    #[test]
    fn test_normalize_title() {
        assert_eq!(normalize_title("  Go for a run ").unwrap(), "Go for a run");
        assert!(matches!(
            normalize_title(" \t\n"),
            Err(StoreError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_normalize_name() {
        assert_eq!(normalize_name("Work").unwrap(), "Work");
        assert!(normalize_name("").is_err());
    }

    #[test]
    fn test_normalize_line_endings() {
        assert_eq!(normalize_line_endings("a\r\nb\rc\n"), "a\nb\nc\n");
    }

    #[test]
    fn test_parse_priority_reports_invalid_input() {
        assert_eq!(parse_priority("high").unwrap(), Priority::High);
        match parse_priority("asap") {
            Err(StoreError::InvalidInput(msg)) => assert!(msg.contains("asap")),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_parse_due_date_anchors_to_local_midnight() {
        let tz = FixedOffset::east_opt(2 * 3600).unwrap();
        let due = parse_due_date("2025-03-15", &tz).unwrap();
        assert_eq!(due, "2025-03-14T22:00:00Z".parse::<DateTime<Utc>>().unwrap());
    }

    #[test]
    fn test_parse_due_date_rejects_bad_format() {
        assert!(parse_due_date("15/03/2025", &Utc).is_err());
        assert!(parse_due_date("2025-02-30", &Utc).is_err());
    }
}
