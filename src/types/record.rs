//! Financial record types (orders and donations)

use crate::services::coercion::{coerce_amount, first_present, first_truthy, resolve_timestamp};
use crate::types::{InsightsError, Result};
use chrono::{DateTime, FixedOffset, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

/// Amount fields for orders, highest priority first
const ORDER_AMOUNT_FIELDS: &[&str] = &["total_order_cost", "order_cost"];

/// Amount fields for donations, highest priority first
const DONATION_AMOUNT_FIELDS: &[&str] = &["donation_amt", "amount", "donation_amount", "value"];

/// DSGD (donation token) amount fields
const DSGD_AMOUNT_FIELDS: &[&str] = &["donation_dsgd_amt", "dsgd_amount", "donation_dsgd"];

const ORDER_TIMESTAMP_FIELDS: &[&str] =
    &["order_complete_datetime", "created_at", "createdAt", "date"];

const DONATION_TIMESTAMP_FIELDS: &[&str] =
    &["donation_datetime", "created_at", "createdAt", "date"];

const ORDER_DIMENSION_FIELDS: &[&str] = &["merchant_name"];

const DONATION_DIMENSION_FIELDS: &[&str] = &["donation_location", "location", "donation_type"];

/// Which backend collection a record came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordKind {
    Order,
    Donation,
}

impl RecordKind {
    /// REST collection name (e.g., "orders")
    pub fn collection(&self) -> &'static str {
        match self {
            RecordKind::Order => "orders",
            RecordKind::Donation => "donations",
        }
    }

    /// Plural display name used in chart titles
    pub fn display_name(&self) -> &'static str {
        match self {
            RecordKind::Order => "Orders",
            RecordKind::Donation => "Donations",
        }
    }

    pub fn amount_fields(&self) -> &'static [&'static str] {
        match self {
            RecordKind::Order => ORDER_AMOUNT_FIELDS,
            RecordKind::Donation => DONATION_AMOUNT_FIELDS,
        }
    }

    pub fn timestamp_fields(&self) -> &'static [&'static str] {
        match self {
            RecordKind::Order => ORDER_TIMESTAMP_FIELDS,
            RecordKind::Donation => DONATION_TIMESTAMP_FIELDS,
        }
    }

    pub fn dimension_fields(&self) -> &'static [&'static str] {
        match self {
            RecordKind::Order => ORDER_DIMENSION_FIELDS,
            RecordKind::Donation => DONATION_DIMENSION_FIELDS,
        }
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.collection())
    }
}

impl FromStr for RecordKind {
    type Err = InsightsError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "order" | "orders" => Ok(RecordKind::Order),
            "donation" | "donations" => Ok(RecordKind::Donation),
            other => Err(InsightsError::Parse(format!("unknown record kind '{}'", other))),
        }
    }
}

/// An order or donation with its amount and timestamp already resolved.
///
/// The raw JSON fields are kept so that dashboard insights can read
/// attributes the aggregator does not care about (status, type, cause).
#[derive(Debug, Clone, PartialEq)]
pub struct FinancialRecord {
    pub kind: RecordKind,
    pub amount: f64,
    /// `None` when no candidate field held a parseable date
    pub timestamp: Option<DateTime<Utc>>,
    pub dimension: Option<String>,
    pub fields: Map<String, Value>,
}

impl FinancialRecord {
    /// Build a record directly (used by tests and benchmarks)
    pub fn new(kind: RecordKind, amount: f64, timestamp: Option<DateTime<Utc>>) -> Self {
        Self {
            kind,
            amount,
            timestamp,
            dimension: None,
            fields: Map::new(),
        }
    }

    pub fn with_dimension(mut self, dimension: impl Into<String>) -> Self {
        self.dimension = Some(dimension.into());
        self
    }

    pub fn with_field(mut self, name: &str, value: Value) -> Self {
        self.fields.insert(name.to_string(), value);
        self
    }

    /// Resolve a raw backend record. Naive timestamps are read in `tz`.
    ///
    /// Never fails: non-object values yield a zero-amount record without
    /// a timestamp, which the aggregator later excludes.
    pub fn from_value(value: &Value, kind: RecordKind, tz: &FixedOffset) -> Self {
        let fields = match value {
            Value::Object(map) => map.clone(),
            _ => Map::new(),
        };

        // donations skip zero and empty amounts in favour of the next field
        let raw_amount = match kind {
            RecordKind::Order => first_present(&fields, kind.amount_fields()),
            RecordKind::Donation => first_truthy(&fields, kind.amount_fields()),
        };
        let amount = coerce_amount(raw_amount);
        let timestamp = resolve_timestamp(&fields, kind.timestamp_fields(), tz);
        let dimension = first_present(&fields, kind.dimension_fields())
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from);

        Self {
            kind,
            amount,
            timestamp,
            dimension,
            fields,
        }
    }

    /// Resolve a batch of raw backend records
    pub fn from_values(values: &[Value], kind: RecordKind, tz: &FixedOffset) -> Vec<Self> {
        values
            .iter()
            .map(|v| Self::from_value(v, kind, tz))
            .collect()
    }

    /// String attribute from the raw record (empty strings count as missing)
    pub fn field_str(&self, name: &str) -> Option<&str> {
        self.fields
            .get(name)
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
    }

    /// DSGD token amount attached to a donation
    pub fn dsgd_amount(&self) -> f64 {
        coerce_amount(first_present(&self.fields, DSGD_AMOUNT_FIELDS))
    }

    /// Timestamp expressed in the reference timezone
    pub fn local_time(&self, tz: &FixedOffset) -> Option<DateTime<FixedOffset>> {
        self.timestamp.map(|ts| ts.with_timezone(tz))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn sgt() -> FixedOffset {
        FixedOffset::east_opt(8 * 3600).unwrap()
    }

    #[test]
    fn test_record_kind_from_str() {
        assert_eq!("orders".parse::<RecordKind>().unwrap(), RecordKind::Order);
        assert_eq!("Donation".parse::<RecordKind>().unwrap(), RecordKind::Donation);
        assert!("users".parse::<RecordKind>().is_err());
    }

    #[test]
    fn test_order_prefers_total_order_cost() {
        let raw = json!({
            "total_order_cost": {"$numberDecimal": "12.50"},
            "order_cost": 3,
            "order_complete_datetime": "2025-03-01T10:00:00Z",
            "merchant_name": "Koufu"
        });
        let record = FinancialRecord::from_value(&raw, RecordKind::Order, &sgt());

        assert!((record.amount - 12.5).abs() < f64::EPSILON);
        assert_eq!(
            record.timestamp,
            Some(Utc.with_ymd_and_hms(2025, 3, 1, 10, 0, 0).unwrap())
        );
        assert_eq!(record.dimension.as_deref(), Some("Koufu"));
    }

    #[test]
    fn test_order_falls_back_to_order_cost() {
        let raw = json!({"order_cost": "4.20", "total_order_cost": null});
        let record = FinancialRecord::from_value(&raw, RecordKind::Order, &sgt());
        assert!((record.amount - 4.2).abs() < f64::EPSILON);
        assert!(record.timestamp.is_none());
    }

    #[test]
    fn test_donation_field_priority() {
        let raw = json!({
            "amount": 7,
            "donation_amount": 99,
            "created_at": "2025-03-02 09:30:00",
            "donation_datetime": "garbage"
        });
        let record = FinancialRecord::from_value(&raw, RecordKind::Donation, &sgt());

        assert!((record.amount - 7.0).abs() < f64::EPSILON);
        // donation_datetime is unparseable, created_at is read in +08:00
        assert_eq!(
            record.timestamp,
            Some(Utc.with_ymd_and_hms(2025, 3, 2, 1, 30, 0).unwrap())
        );
    }

    #[test]
    fn test_donation_zero_amount_falls_through() {
        let zero = json!({"donation_amt": 0, "amount": 5});
        let empty = json!({"donation_amt": "", "amount": null, "donation_amount": "3.25"});
        let all_zero = json!({"donation_amt": 0, "amount": ""});

        let amount = |raw: &Value| FinancialRecord::from_value(raw, RecordKind::Donation, &sgt()).amount;

        assert!((amount(&zero) - 5.0).abs() < f64::EPSILON);
        assert!((amount(&empty) - 3.25).abs() < f64::EPSILON);
        assert_eq!(amount(&all_zero), 0.0);
    }

    #[test]
    fn test_order_zero_amount_is_kept() {
        let raw = json!({"total_order_cost": 0, "order_cost": 8});
        let record = FinancialRecord::from_value(&raw, RecordKind::Order, &sgt());
        assert_eq!(record.amount, 0.0);
    }

    #[test]
    fn test_non_object_value() {
        let record = FinancialRecord::from_value(&json!(42), RecordKind::Order, &sgt());
        assert_eq!(record.amount, 0.0);
        assert!(record.timestamp.is_none());
        assert!(record.fields.is_empty());
    }

    #[test]
    fn test_blank_dimension_is_none() {
        let raw = json!({"merchant_name": "   "});
        let record = FinancialRecord::from_value(&raw, RecordKind::Order, &sgt());
        assert!(record.dimension.is_none());
    }

    #[test]
    fn test_dsgd_amount() {
        let raw = json!({"donation_amt": 5, "dsgd_amount": "2.5"});
        let record = FinancialRecord::from_value(&raw, RecordKind::Donation, &sgt());
        assert!((record.dsgd_amount() - 2.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_field_str_ignores_empty() {
        let record = FinancialRecord::new(RecordKind::Order, 1.0, None)
            .with_field("order_type", json!(""))
            .with_field("order_status", json!("completed"));
        assert_eq!(record.field_str("order_type"), None);
        assert_eq!(record.field_str("order_status"), Some("completed"));
    }
}
