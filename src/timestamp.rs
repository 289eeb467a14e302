//! `U`-type timestamps: 16 ASCII bytes `YYMMDDhhmmss.fff` in UTC.

use crate::error::{Error, Result};
use time::{Date, Month, OffsetDateTime, PrimitiveDateTime, Time};

fn invalid(raw: &str, message: impl Into<String>) -> Error {
    Error::InvalidTimestamp {
        raw: raw.to_string(),
        message: message.into(),
    }
}

fn two_digits(raw: &str, field: &str, s: &str) -> Result<u8> {
    if s.len() != 2 || !s.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid(raw, format!("{field} is not two digits: {s:?}")));
    }
    s.parse::<u8>()
        .map_err(|e| invalid(raw, format!("{field}: {e}")))
}

/// Parse a camera timestamp. Year is `2000 + YY`; everything after the
/// minutes is read as fractional seconds. Trailing NULs are ignored.
pub fn parse_timestamp(bytes: &[u8]) -> Result<OffsetDateTime> {
    let raw: String = bytes
        .iter()
        .take_while(|&&b| b != 0)
        .map(|&b| b as char)
        .collect();

    if raw.len() < 12 || !raw.is_ascii() {
        return Err(invalid(&raw, "shorter than YYMMDDhhmmss"));
    }

    let year = 2000 + two_digits(&raw, "year", &raw[0..2])? as i32;
    let month = two_digits(&raw, "month", &raw[2..4])?;
    let day = two_digits(&raw, "day", &raw[4..6])?;
    let hour = two_digits(&raw, "hour", &raw[6..8])?;
    let minute = two_digits(&raw, "minute", &raw[8..10])?;

    let sec_str = raw[10..].trim();
    if !sec_str.bytes().all(|b| b.is_ascii_digit() || b == b'.') {
        return Err(invalid(&raw, format!("seconds not numeric: {sec_str:?}")));
    }
    let seconds: f64 = sec_str
        .parse()
        .map_err(|e| invalid(&raw, format!("seconds: {e}")))?;
    if !(0.0..60.0).contains(&seconds) {
        return Err(invalid(&raw, format!("seconds out of range: {seconds}")));
    }
    let whole = seconds.trunc() as u8;
    let nanos = ((seconds.fract() * 1e9).round() as u32).min(999_999_999);

    let month = Month::try_from(month).map_err(|e| invalid(&raw, e.to_string()))?;
    let date = Date::from_calendar_date(year, month, day).map_err(|e| invalid(&raw, e.to_string()))?;
    let time =
        Time::from_hms_nano(hour, minute, whole, nanos).map_err(|e| invalid(&raw, e.to_string()))?;

    Ok(PrimitiveDateTime::new(date, time).assume_utc())
}
