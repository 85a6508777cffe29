//! Opaque pagination cursors
//!
//! A cursor is the base64 encoding of the RFC 3339 `created_at` of the last
//! article on the previous page.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use chrono::{DateTime, SecondsFormat, Utc};
use scribe_core::DomainError;

/// Encode a page boundary
pub fn encode(created_at: DateTime<Utc>) -> String {
    STANDARD.encode(created_at.to_rfc3339_opts(SecondsFormat::Nanos, true))
}

/// Decode a cursor; the empty cursor starts from the beginning
///
/// # Errors
///
/// Returns [`DomainError::BadParamInput`] for anything that is not a cursor
/// produced by [`encode`]
pub fn decode(cursor: &str) -> Result<DateTime<Utc>, DomainError> {
    if cursor.is_empty() {
        return Ok(DateTime::<Utc>::UNIX_EPOCH);
    }

    let bytes = STANDARD.decode(cursor).map_err(|_| DomainError::BadParamInput)?;
    let text = std::str::from_utf8(&bytes).map_err(|_| DomainError::BadParamInput)?;

    DateTime::parse_from_rfc3339(text)
        .map(|at| at.with_timezone(&Utc))
        .map_err(|_| DomainError::BadParamInput)
}
