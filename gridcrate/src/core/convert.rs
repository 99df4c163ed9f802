//! Conversion of textual filter bounds into typed [`Value`]s.
//!
//! Bounds always arrive as text (`filter`, `filterTo`, `dateFrom`, `dateTo`)
//! and are parsed against the concrete type of the property they are compared
//! with, once, while the filter compiles.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta};
use rust_decimal::Decimal;
use std::borrow::Cow;
use std::str::FromStr;
use uuid::Uuid;

use super::value::{Value, ValueType};
use crate::errors::{FilterError, Result};

const OFFSET_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f%:z",
    "%Y-%m-%dT%H:%M:%S%.f%:z",
    "%Y-%m-%d %H:%M:%S%.f%z",
    "%Y-%m-%dT%H:%M:%S%.f%z",
];

const LOCAL_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

const DATE_FORMAT: &str = "%Y-%m-%d";

const TIME_FORMATS: &[&str] = &["%H:%M:%S%.f", "%H:%M"];

/// Parse a numeric bound for a numeric property type.
///
/// Integer widths are range checked, so `"300"` is rejected for a `u8`
/// property. Non-numeric types fall back to [`parse_value`].
///
/// # Errors
///
/// Returns [`FilterError::InvalidFilterValue`] when the text does not parse.
pub fn parse_number(raw: &str, ty: ValueType) -> Result<Value<'static>> {
    let text = raw.trim();
    let parsed = match ty {
        ValueType::I8 => parse_as::<i8>(text).map(|v| Value::Int(v.into())),
        ValueType::I16 => parse_as::<i16>(text).map(|v| Value::Int(v.into())),
        ValueType::I32 => parse_as::<i32>(text).map(|v| Value::Int(v.into())),
        ValueType::I64 => parse_as::<i64>(text).map(Value::Int),
        ValueType::U8 => parse_as::<u8>(text).map(|v| Value::UInt(v.into())),
        ValueType::U16 => parse_as::<u16>(text).map(|v| Value::UInt(v.into())),
        ValueType::U32 => parse_as::<u32>(text).map(|v| Value::UInt(v.into())),
        ValueType::U64 => parse_as::<u64>(text).map(Value::UInt),
        ValueType::F32 => parse_as::<f32>(text).map(|v| Value::Float(v.into())),
        ValueType::F64 => parse_as::<f64>(text).map(Value::Float),
        ValueType::Decimal => parse_as::<Decimal>(text)
            .or_else(|| Decimal::from_scientific(text).ok())
            .map(Value::Decimal),
        _ => return parse_value(raw, ty),
    };
    parsed.ok_or_else(|| FilterError::invalid_value(raw, ty.name()))
}

/// Parse a temporal bound for a temporal property type.
///
/// Non-temporal types fall back to [`parse_value`].
///
/// # Errors
///
/// Returns [`FilterError::InvalidFilterValue`] when the text does not parse.
pub fn parse_temporal(raw: &str, ty: ValueType) -> Result<Value<'static>> {
    let text = raw.trim();
    let parsed = match ty {
        ValueType::DateTimeOffset => parse_offset_timestamp(text).map(Value::DateTimeOffset),
        ValueType::DateTime => parse_local_timestamp(text).map(Value::DateTime),
        ValueType::Date => parse_date(text).map(Value::Date),
        ValueType::Time => TIME_FORMATS
            .iter()
            .find_map(|fmt| NaiveTime::parse_from_str(text, fmt).ok())
            .map(Value::Time),
        ValueType::Duration => parse_duration(text).map(Value::Duration),
        _ => return parse_value(raw, ty),
    };
    parsed.ok_or_else(|| FilterError::invalid_value(raw, ty.name()))
}

/// Generic conversion of a textual bound into any property type.
///
/// # Errors
///
/// Returns [`FilterError::InvalidFilterValue`] when the text does not parse.
pub fn parse_value(raw: &str, ty: ValueType) -> Result<Value<'static>> {
    if ty.is_numeric() {
        return parse_number(raw, ty);
    }
    if ty.is_temporal() {
        return parse_temporal(raw, ty);
    }
    let text = raw.trim();
    let parsed = match ty {
        ValueType::Text => Some(Value::Text(Cow::Owned(raw.to_string()))),
        ValueType::Bool => match text.to_ascii_lowercase().as_str() {
            "true" => Some(Value::Bool(true)),
            "false" => Some(Value::Bool(false)),
            _ => None,
        },
        ValueType::Uuid => Uuid::parse_str(text).ok().map(Value::Uuid),
        _ => None,
    };
    parsed.ok_or_else(|| FilterError::invalid_value(raw, ty.name()))
}

fn parse_as<V: FromStr>(text: &str) -> Option<V> {
    text.parse().ok()
}

fn parse_offset_timestamp(text: &str) -> Option<DateTime<FixedOffset>> {
    DateTime::parse_from_rfc3339(text)
        .ok()
        .or_else(|| {
            OFFSET_FORMATS
                .iter()
                .find_map(|fmt| DateTime::parse_from_str(text, fmt).ok())
        })
        // Timestamps without an offset are read as UTC.
        .or_else(|| parse_local_timestamp(text).map(|naive| naive.and_utc().fixed_offset()))
}

fn parse_local_timestamp(text: &str) -> Option<NaiveDateTime> {
    LOCAL_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(text, DATE_FORMAT)
                .ok()
                .map(|date| date.and_time(NaiveTime::MIN))
        })
        .or_else(|| {
            DateTime::parse_from_rfc3339(text)
                .ok()
                .map(|dt| dt.naive_local())
        })
}

fn parse_date(text: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(text, DATE_FORMAT)
        .ok()
        .or_else(|| parse_local_timestamp(text).map(|dt| dt.date()))
}

/// `[-][d.]hh:mm[:ss[.fffffffff]]`, or a whole number of days.
fn parse_duration(text: &str) -> Option<TimeDelta> {
    let (negative, body) = text
        .strip_prefix('-')
        .map_or((false, text), |rest| (true, rest));

    let Some((head, clock)) = body.split_once(':') else {
        let days = TimeDelta::try_days(body.parse::<i64>().ok()?)?;
        return Some(if negative { -days } else { days });
    };

    let (days, hours) = match head.split_once('.') {
        Some((days, hours)) => (days.parse::<i64>().ok()?, hours.parse::<i64>().ok()?),
        None => (0, head.parse::<i64>().ok()?),
    };
    let (minutes, seconds) = match clock.split_once(':') {
        Some((minutes, seconds)) => (minutes.parse::<i64>().ok()?, Some(seconds)),
        None => (clock.parse::<i64>().ok()?, None),
    };
    let (seconds, nanos) = match seconds {
        None => (0, 0),
        Some(seconds) => match seconds.split_once('.') {
            Some((whole, fraction)) => (whole.parse::<i64>().ok()?, parse_fraction(fraction)?),
            None => (seconds.parse::<i64>().ok()?, 0),
        },
    };
    if !(0..24).contains(&hours) || !(0..60).contains(&minutes) || !(0..60).contains(&seconds) {
        return None;
    }

    let total = TimeDelta::try_days(days)?
        .checked_add(&TimeDelta::try_hours(hours)?)?
        .checked_add(&TimeDelta::try_minutes(minutes)?)?
        .checked_add(&TimeDelta::try_seconds(seconds)?)?
        .checked_add(&TimeDelta::nanoseconds(nanos))?;
    Some(if negative { -total } else { total })
}

fn parse_fraction(fraction: &str) -> Option<i64> {
    if fraction.is_empty() || !fraction.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let digits: String = fraction.chars().chain("000000000".chars()).take(9).collect();
    digits.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integer_width_is_range_checked() {
        assert_eq!(parse_number("200", ValueType::U8).unwrap(), Value::UInt(200));
        assert!(matches!(
            parse_number("300", ValueType::U8),
            Err(FilterError::InvalidFilterValue { target: "u8", .. })
        ));
        assert!(parse_number("-1", ValueType::U32).is_err());
        assert_eq!(parse_number(" -12 ", ValueType::I16).unwrap(), Value::Int(-12));
    }

    #[test]
    fn test_decimal_and_float() {
        assert_eq!(
            parse_number("12.50", ValueType::Decimal).unwrap(),
            Value::Decimal(Decimal::new(1250, 2))
        );
        assert_eq!(parse_number("2.5", ValueType::F64).unwrap(), Value::Float(2.5));
        assert!(parse_number("abc", ValueType::F64).is_err());
    }

    #[test]
    fn test_offset_timestamp_forms() {
        let expected = DateTime::parse_from_rfc3339("2022-06-01T10:30:00+02:00").unwrap();
        assert_eq!(
            parse_temporal("2022-06-01T10:30:00+02:00", ValueType::DateTimeOffset).unwrap(),
            Value::DateTimeOffset(expected)
        );
        assert_eq!(
            parse_temporal("2022-06-01 10:30:00+02:00", ValueType::DateTimeOffset).unwrap(),
            Value::DateTimeOffset(expected)
        );
        let utc = parse_temporal("2022-06-01 08:30:00", ValueType::DateTimeOffset).unwrap();
        assert_eq!(utc, Value::DateTimeOffset(expected));
    }

    #[test]
    fn test_date_accepts_timestamp_text() {
        let expected = NaiveDate::from_ymd_opt(2022, 6, 1).unwrap();
        assert_eq!(parse_temporal("2022-06-01", ValueType::Date).unwrap(), Value::Date(expected));
        assert_eq!(
            parse_temporal("2022-06-01 00:00:00", ValueType::Date).unwrap(),
            Value::Date(expected)
        );
        assert!(parse_temporal("June first", ValueType::Date).is_err());
    }

    #[test]
    fn test_local_timestamp_from_bare_date_is_midnight() {
        let expected = NaiveDate::from_ymd_opt(2023, 2, 2)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        assert_eq!(
            parse_temporal("2023-02-02", ValueType::DateTime).unwrap(),
            Value::DateTime(expected)
        );
    }

    #[test]
    fn test_time_only() {
        let expected = NaiveTime::from_hms_opt(13, 45, 0).unwrap();
        assert_eq!(parse_temporal("13:45", ValueType::Time).unwrap(), Value::Time(expected));
        assert_eq!(parse_temporal("13:45:00", ValueType::Time).unwrap(), Value::Time(expected));
    }

    #[test]
    fn test_duration_forms() {
        assert_eq!(parse_duration("01:30"), TimeDelta::try_minutes(90));
        assert_eq!(parse_duration("2"), TimeDelta::try_days(2));
        assert_eq!(
            parse_duration("1.02:00:00"),
            TimeDelta::try_hours(26)
        );
        assert_eq!(parse_duration("-00:00:01.5"), Some(-TimeDelta::milliseconds(1500)));
        assert_eq!(parse_duration("25:00"), None);
        assert_eq!(parse_duration("aa:bb"), None);
    }

    #[test]
    fn test_generic_fallback() {
        assert_eq!(
            parse_temporal("2022", ValueType::Text).unwrap(),
            Value::Text(Cow::Borrowed("2022"))
        );
        assert_eq!(parse_temporal("2022", ValueType::I32).unwrap(), Value::Int(2022));
        assert_eq!(parse_value("TRUE", ValueType::Bool).unwrap(), Value::Bool(true));
        assert!(parse_temporal("2022-06-01", ValueType::Bool).is_err());
        assert!(parse_value("not-a-uuid", ValueType::Uuid).is_err());
    }
}
