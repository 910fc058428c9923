//! Decoding of the composite DRC timestamp token.
//!
//! Trace lines carry timestamps as `YYYY-MM-DD_HH:MM:SS.mmm`, UTC with no
//! zone offset. The codec converts them to floating-point epoch seconds
//! with the millisecond field preserved as the fractional part.

use crate::utils::error::ParseError;
use chrono::NaiveDate;

/// Decode a `YYYY-MM-DD_HH:MM:SS.mmm` token into epoch seconds.
///
/// # Errors
/// * `ParseError::MalformedTimestamp` - any component missing or non-numeric
pub fn parse_timestamp(token: &str) -> Result<f64, ParseError> {
    decode(token).ok_or_else(|| ParseError::MalformedTimestamp(token.to_string()))
}

/// Split and decode the token, `None` on any missing or bad component
fn decode(token: &str) -> Option<f64> {
    let (date, time) = token.split_once('_')?;

    let mut date_parts = date.splitn(3, '-');
    let year: i32 = date_parts.next()?.parse().ok()?;
    let month: u32 = date_parts.next()?.parse().ok()?;
    let day: u32 = date_parts.next()?.parse().ok()?;

    let (clock, millis) = time.rsplit_once('.')?;
    let mut clock_parts = clock.splitn(3, ':');
    let hour: u32 = clock_parts.next()?.parse().ok()?;
    let minute: u32 = clock_parts.next()?.parse().ok()?;
    let second: u32 = clock_parts.next()?.parse().ok()?;

    // Interpreted as UTC calendar time, never the local timezone
    let epoch = NaiveDate::from_ymd_opt(year, month, day)?
        .and_hms_opt(hour, minute, second)?
        .and_utc()
        .timestamp();

    let fraction = millis.parse::<u32>().ok()? as f64 / 10f64.powi(millis.len() as i32);

    Some(epoch as f64 + fraction)
}
