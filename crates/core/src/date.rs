//! Lenient date decoding for server JSON.
//!
//! The backend serializes plain dates as `YYYY-MM-DD` but join timestamps as
//! full datetimes. Rows only ever show the calendar day, so both decode into a
//! [`NaiveDate`].

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serializer};

/// Parse a date or datetime string, keeping only the date.
pub fn parse_lenient(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if let Ok(d) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(d);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.date_naive());
    }
    for fmt in ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(dt.date());
        }
    }
    None
}

/// `#[serde(with = "posboard_core::date::lenient")]` for required dates.
pub mod lenient {
    use super::*;

    pub fn serialize<S: Serializer>(date: &NaiveDate, s: S) -> Result<S::Ok, S::Error> {
        s.collect_str(&date.format("%Y-%m-%d"))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<NaiveDate, D::Error> {
        let raw = String::deserialize(d)?;
        parse_lenient(&raw)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid date: {raw}")))
    }
}

/// `#[serde(with = "posboard_core::date::lenient_opt", default)]` for optional dates.
///
/// `null` and empty strings decode to `None`.
pub mod lenient_opt {
    use super::*;

    pub fn serialize<S: Serializer>(date: &Option<NaiveDate>, s: S) -> Result<S::Ok, S::Error> {
        match date {
            Some(d) => s.collect_str(&d.format("%Y-%m-%d")),
            None => s.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<NaiveDate>, D::Error> {
        let raw = Option::<String>::deserialize(d)?;
        match raw.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(s) => parse_lenient(s)
                .map(Some)
                .ok_or_else(|| serde::de::Error::custom(format!("invalid date: {s}"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_dates_and_datetimes() {
        let day = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();
        assert_eq!(parse_lenient("2024-03-09"), Some(day));
        assert_eq!(parse_lenient("2024-03-09 14:22:01"), Some(day));
        assert_eq!(parse_lenient("2024-03-09T14:22:01.123456-05:00"), Some(day));
        assert_eq!(parse_lenient("09/03/2024"), None);
    }
}
