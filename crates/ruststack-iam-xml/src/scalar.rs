//! Scalar leaf decoders.
//!
//! Each decoder reads exactly the text of the element (or attribute) the
//! cursor is positioned on and returns. None of them re-enter the
//! depth-bounded loop. Parse failures are reported as
//! [`XmlError::ParseError`] and turned into field failures by the table that
//! invoked them.

use chrono::{DateTime, Utc};

use crate::cursor::StaxCursor;
use crate::error::XmlError;

/// Read a string member.
pub fn string(cursor: &mut StaxCursor<'_>) -> Result<String, XmlError> {
    cursor.read_text()
}

/// Read an ISO 8601 timestamp member.
pub fn timestamp(cursor: &mut StaxCursor<'_>) -> Result<DateTime<Utc>, XmlError> {
    let text = cursor.read_text()?;
    parse_timestamp(text.trim())
}

/// Read a boolean member (`true` / `false`).
pub fn boolean(cursor: &mut StaxCursor<'_>) -> Result<bool, XmlError> {
    let text = cursor.read_text()?;
    parse_bool(text.trim())
}

/// Parse a boolean from XML text ("true"/"false").
fn parse_bool(s: &str) -> Result<bool, XmlError> {
    match s {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => Err(XmlError::ParseError(format!("invalid boolean: {s}"))),
    }
}

/// Parse an ISO 8601 timestamp from XML text.
fn parse_timestamp(s: &str) -> Result<DateTime<Utc>, XmlError> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .or_else(|_| {
            // No offset at all: read as UTC.
            chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f")
                .map(|ndt| ndt.and_utc())
        })
        .map_err(|e| XmlError::ParseError(format!("invalid timestamp '{s}': {e}")))
}
