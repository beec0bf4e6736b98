//! Timezone handling at the presentation boundary.
//!
//! Instants are stored and compared in UTC. Conversion happens only when
//! parsing user input and when rendering output, using the IANA database from
//! `chrono-tz`.

use chrono::{DateTime, LocalResult, NaiveDateTime, SecondsFormat, TimeZone, Utc};
use chrono_tz::Tz;

use crate::error::{Result, RotaError};

/// Naive formats accepted for local input, most specific first. The second
/// is what an HTML `datetime-local` field submits.
const NAIVE_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M"];

/// Parse an IANA timezone name such as `"Australia/Brisbane"`.
pub fn parse_timezone(name: &str) -> Result<Tz> {
    name.trim()
        .parse()
        .map_err(|_| RotaError::InvalidTimezone(name.to_string()))
}

/// Parse a user-supplied instant.
///
/// RFC 3339 input (with `Z` or an offset) is taken as-is. A naive local
/// datetime is interpreted in `tz`. A local time that does not exist (spring
/// forward gap) is rejected; an ambiguous one (fall back) resolves to the
/// earlier instant.
pub fn parse_instant(text: &str, tz: Tz) -> Result<DateTime<Utc>> {
    let text = text.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Ok(dt.with_timezone(&Utc));
    }

    let naive = NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok())
        .ok_or_else(|| RotaError::InvalidDatetime(format!("'{text}' is not a valid datetime")))?;

    match tz.from_local_datetime(&naive) {
        LocalResult::Single(dt) => Ok(dt.with_timezone(&Utc)),
        LocalResult::Ambiguous(earliest, _) => Ok(earliest.with_timezone(&Utc)),
        LocalResult::None => Err(RotaError::InvalidDatetime(format!(
            "'{text}' does not exist in {tz}"
        ))),
    }
}

/// Render an instant as RFC 3339 in `tz`, to the second.
pub fn format_instant(instant: DateTime<Utc>, tz: Tz) -> String {
    instant
        .with_timezone(&tz)
        .to_rfc3339_opts(SecondsFormat::Secs, true)
}
