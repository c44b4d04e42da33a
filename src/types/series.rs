//! Time-series types shared by the aggregator and the CLI

use crate::types::{InsightsError, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Time-window size used to group records
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    Hour,
    #[default]
    Day,
    Week,
    Month,
    Year,
}

impl Granularity {
    pub const ALL: [Granularity; 5] = [
        Granularity::Hour,
        Granularity::Day,
        Granularity::Week,
        Granularity::Month,
        Granularity::Year,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Granularity::Hour => "hour",
            Granularity::Day => "day",
            Granularity::Week => "week",
            Granularity::Month => "month",
            Granularity::Year => "year",
        }
    }

    /// Parse a selector value. Unknown values fall back to `Day`.
    pub fn parse_lenient(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "hour" | "hourly" => Granularity::Hour,
            "day" | "daily" => Granularity::Day,
            "week" | "weekly" => Granularity::Week,
            "month" | "monthly" => Granularity::Month,
            "year" | "yearly" => Granularity::Year,
            other => {
                tracing::warn!(granularity = other, "unknown granularity, using day");
                Granularity::Day
            }
        }
    }

    /// Hour and Day buckets are zero-filled across the range;
    /// Week, Month and Year only exist where records fall.
    pub fn is_dense(&self) -> bool {
        matches!(self, Granularity::Hour | Granularity::Day)
    }
}

impl fmt::Display for Granularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for Granularity {
    fn from(s: &str) -> Self {
        Self::parse_lenient(s)
    }
}

/// Caller-requested calendar range (inclusive, in the reference timezone)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DateRange {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl DateRange {
    pub fn new(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        Self { start, end }
    }

    pub fn between(start: NaiveDate, end: NaiveDate) -> Self {
        Self::new(Some(start), Some(end))
    }

    pub fn unbounded() -> Self {
        Self::default()
    }

    /// Parse optional `YYYY-MM-DD` strings; blank strings mean "no bound".
    pub fn from_iso(start: Option<&str>, end: Option<&str>) -> Result<Self> {
        Ok(Self::new(parse_iso_date(start)?, parse_iso_date(end)?))
    }

    pub fn is_unbounded(&self) -> bool {
        self.start.is_none() && self.end.is_none()
    }

    /// True when both bounds are present and `start > end`
    pub fn is_inverted(&self) -> bool {
        matches!((self.start, self.end), (Some(s), Some(e)) if s > e)
    }

    /// Inclusive calendar-day membership test
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start.map_or(true, |s| date >= s) && self.end.map_or(true, |e| date <= e)
    }
}

fn parse_iso_date(value: Option<&str>) -> Result<Option<NaiveDate>> {
    match value.map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) => NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .map(Some)
            .map_err(|e| InsightsError::Parse(format!("invalid date '{}': {}", s, e))),
    }
}

/// One time window of a chart series
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bucket {
    /// Short axis label (e.g., "Mar 01")
    pub period_label: String,
    /// Sortable key, unique within a series (e.g., "2025-03-01")
    pub period_key: String,
    pub total: f64,
    pub count: u64,
}

impl Bucket {
    pub fn empty(period_key: String, period_label: String) -> Self {
        Self {
            period_label,
            period_key,
            total: 0.0,
            count: 0,
        }
    }

    pub fn add(&mut self, amount: f64) {
        self.total += amount;
        self.count = self.count.saturating_add(1);
    }
}

/// Display strings for chart chrome
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeriesDescription {
    pub title: String,
    pub x_axis_label: String,
    pub y_axis_label: String,
    pub tooltip_label: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_granularity_parse_known() {
        assert_eq!(Granularity::parse_lenient("hour"), Granularity::Hour);
        assert_eq!(Granularity::parse_lenient("WEEK"), Granularity::Week);
        assert_eq!(Granularity::parse_lenient("monthly"), Granularity::Month);
        assert_eq!(Granularity::from("year"), Granularity::Year);
    }

    #[test]
    fn test_granularity_unknown_falls_back_to_day() {
        assert_eq!(Granularity::parse_lenient("fortnight"), Granularity::Day);
        assert_eq!(Granularity::parse_lenient(""), Granularity::Day);
    }

    #[test]
    fn test_granularity_density() {
        assert!(Granularity::Hour.is_dense());
        assert!(Granularity::Day.is_dense());
        assert!(!Granularity::Week.is_dense());
        assert!(!Granularity::Month.is_dense());
        assert!(!Granularity::Year.is_dense());
    }

    #[test]
    fn test_date_range_from_iso() {
        let range = DateRange::from_iso(Some("2025-01-01"), Some("")).unwrap();
        assert_eq!(range.start, NaiveDate::from_ymd_opt(2025, 1, 1));
        assert_eq!(range.end, None);
        assert!(!range.is_unbounded());
    }

    #[test]
    fn test_date_range_invalid_string() {
        assert!(DateRange::from_iso(Some("2025-13-01"), None).is_err());
    }

    #[test]
    fn test_date_range_contains_inclusive() {
        let d = |day| NaiveDate::from_ymd_opt(2025, 1, day).unwrap();
        let range = DateRange::between(d(5), d(10));
        assert!(range.contains(d(5)));
        assert!(range.contains(d(10)));
        assert!(!range.contains(d(4)));
        assert!(!range.contains(d(11)));
        assert!(DateRange::unbounded().contains(d(1)));
    }

    #[test]
    fn test_date_range_inverted() {
        let d = |day| NaiveDate::from_ymd_opt(2025, 1, day).unwrap();
        assert!(DateRange::between(d(10), d(5)).is_inverted());
        assert!(!DateRange::between(d(5), d(5)).is_inverted());
        assert!(!DateRange::new(Some(d(10)), None).is_inverted());
    }

    #[test]
    fn test_bucket_serializes_camel_case() {
        let mut bucket = Bucket::empty("2025-03-01".into(), "Mar 01".into());
        bucket.add(10.0);
        let json = serde_json::to_value(&bucket).unwrap();
        assert_eq!(json["periodKey"], "2025-03-01");
        assert_eq!(json["periodLabel"], "Mar 01");
        assert_eq!(json["count"], 1);
    }
}
