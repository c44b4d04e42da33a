//! Numeric and date coercion for loosely-typed backend records
//!
//! The backend emits the same logical value under several field names and
//! several encodings (plain numbers, numeric strings, MongoDB extended JSON).
//! Everything here substitutes a safe default instead of failing.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde_json::{Map, Value};

/// MongoDB extended-JSON wrapper for Decimal128
const DECIMAL_WRAPPER_KEY: &str = "$numberDecimal";

/// MongoDB extended-JSON wrappers for dates and 64-bit integers
const DATE_WRAPPER_KEY: &str = "$date";
const LONG_WRAPPER_KEY: &str = "$numberLong";

/// Naive datetime layouts, read in the reference timezone
const NAIVE_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Return the first field in `fields` that is present and not `null`.
pub fn first_present<'a>(map: &'a Map<String, Value>, fields: &[&str]) -> Option<&'a Value> {
    fields
        .iter()
        .filter_map(|name| map.get(*name))
        .find(|v| !v.is_null())
}

/// Return the first field in `fields` holding a truthy value.
///
/// Missing, `null`, `false`, numeric zero and `""` all fall through to the
/// next candidate. Numeric strings such as `"0"` and wrapper objects count as
/// truthy and stop the search.
pub fn first_truthy<'a>(map: &'a Map<String, Value>, fields: &[&str]) -> Option<&'a Value> {
    fields
        .iter()
        .filter_map(|name| map.get(*name))
        .find(|v| is_truthy(v))
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map_or(false, |f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Coerce a raw amount into a finite `f64`.
///
/// Accepts plain numbers, numeric strings and `{"$numberDecimal": "..."}`.
/// Missing, `null`, unparseable and non-finite values become `0.0`.
/// Negative values pass through unchanged.
///
/// # Examples
/// ```
/// use foodgle_insights::services::coercion::coerce_amount;
/// use serde_json::json;
///
/// assert_eq!(coerce_amount(Some(&json!({"$numberDecimal": "12.50"}))), 12.5);
/// assert_eq!(coerce_amount(Some(&json!("12.50"))), 12.5);
/// assert_eq!(coerce_amount(None), 0.0);
/// ```
pub fn coerce_amount(raw: Option<&Value>) -> f64 {
    let parsed = match raw {
        None | Some(Value::Null) => None,
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => parse_decimal_str(s),
        Some(Value::Object(map)) => match map.get(DECIMAL_WRAPPER_KEY) {
            Some(Value::String(s)) => parse_decimal_str(s),
            Some(Value::Number(n)) => n.as_f64(),
            _ => None,
        },
        Some(_) => None,
    };

    parsed.filter(|v| v.is_finite()).unwrap_or(0.0)
}

fn parse_decimal_str(s: &str) -> Option<f64> {
    s.trim().parse::<f64>().ok()
}

/// Parse a single timestamp value.
///
/// Offset-carrying strings (RFC 3339) keep their offset; naive strings and
/// bare dates are read as wall-clock time in `tz`. Integers are epoch
/// milliseconds. `{"$date": ...}` and `{"$numberLong": ...}` wrappers are
/// unwrapped.
pub fn parse_timestamp(raw: &Value, tz: &FixedOffset) -> Option<DateTime<Utc>> {
    match raw {
        Value::String(s) => parse_timestamp_str(s.trim(), tz),
        Value::Number(n) => {
            let millis = n.as_i64().or_else(|| n.as_f64().map(|f| f as i64))?;
            DateTime::from_timestamp_millis(millis)
        }
        Value::Object(map) => {
            if let Some(inner) = map.get(DATE_WRAPPER_KEY) {
                parse_timestamp(inner, tz)
            } else if let Some(Value::String(s)) = map.get(LONG_WRAPPER_KEY) {
                DateTime::from_timestamp_millis(s.trim().parse().ok()?)
            } else {
                None
            }
        }
        _ => None,
    }
}

fn parse_timestamp_str(s: &str, tz: &FixedOffset) -> Option<DateTime<Utc>> {
    if s.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    // Offsets without a colon, e.g. "2025-03-01T10:00:00.000+0800"
    if let Ok(dt) = DateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f%z") {
        return Some(dt.with_timezone(&Utc));
    }

    let naive = NAIVE_DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })?;

    tz.from_local_datetime(&naive)
        .single()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Try each candidate field in priority order; the first one that parses wins.
pub fn resolve_timestamp(
    map: &Map<String, Value>,
    fields: &[&str],
    tz: &FixedOffset,
) -> Option<DateTime<Utc>> {
    fields
        .iter()
        .filter_map(|name| map.get(*name))
        .filter(|v| !v.is_null())
        .find_map(|v| parse_timestamp(v, tz))
}

/// Parse a UTC offset such as `+08:00`, `-0530`, `+8` or `UTC`.
pub fn parse_utc_offset(s: &str) -> Option<FixedOffset> {
    let s = s.trim();
    if s.eq_ignore_ascii_case("utc") || s.eq_ignore_ascii_case("z") {
        return FixedOffset::east_opt(0);
    }

    let (sign, rest) = match s.as_bytes().first()? {
        b'+' => (1, &s[1..]),
        b'-' => (-1, &s[1..]),
        _ => (1, s),
    };

    let (hours, minutes): (i32, i32) = if let Some((h, m)) = rest.split_once(':') {
        (h.parse().ok()?, m.parse().ok()?)
    } else if rest.len() == 4 {
        (rest.get(..2)?.parse().ok()?, rest.get(2..)?.parse().ok()?)
    } else {
        (rest.parse().ok()?, 0)
    };

    if !(0..=23).contains(&hours) || !(0..=59).contains(&minutes) {
        return None;
    }
    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
}
