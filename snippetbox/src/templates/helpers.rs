//! Template filters.

use chrono::{DateTime, TimeZone, Utc};
use minijinja::{Error, ErrorKind};

const HUMAN_DATE_FORMAT: &str = "%d %b %Y at %H:%M";

/// Format a timestamp as `17 Mar 2022 at 10:15`, always in UTC.
///
/// A missing time renders as the empty string.
///
/// # Example
///
/// ```rust
/// use chrono::{TimeZone, Utc};
/// use snippetbox::templates::human_date;
///
/// let t = Utc.with_ymd_and_hms(2022, 3, 17, 10, 15, 0).unwrap();
/// assert_eq!(human_date(Some(t)), "17 Mar 2022 at 10:15");
/// ```
#[must_use]
pub fn human_date<Tz: TimeZone>(t: Option<DateTime<Tz>>) -> String {
    t.map(|t| t.with_timezone(&Utc).format(HUMAN_DATE_FORMAT).to_string())
        .unwrap_or_default()
}

/// `{{ snippet.created | human_date }}`
///
/// Timestamps reach templates as RFC 3339 strings through serde.
pub(crate) fn human_date_filter(value: Option<String>) -> Result<String, Error> {
    match value.as_deref() {
        None | Some("") => Ok(String::new()),
        Some(raw) => DateTime::parse_from_rfc3339(raw)
            .map(|t| human_date(Some(t)))
            .map_err(|e| {
                Error::new(
                    ErrorKind::InvalidOperation,
                    format!("human_date expects an RFC 3339 timestamp, got {raw:?}: {e}"),
                )
            }),
    }
}
