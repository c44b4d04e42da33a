//! Home-view headline figures: totals, counts and the weekly donation trend

use crate::types::{FinancialRecord, RecordKind, UserProfile};
use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use std::collections::{BTreeMap, HashSet};

/// Status value marking a settled donation
const COMPLETED_STATUS: &str = "completed";

/// Label for records missing a grouping attribute
pub const UNKNOWN_LABEL: &str = "Unknown";

/// Week-over-week donation change
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeeklyTrend {
    pub this_week: f64,
    pub last_week: f64,
    /// `None` when last week had nothing to compare against
    pub percent_change: Option<f64>,
    pub label: String,
}

impl WeeklyTrend {
    /// Compare `[now - 7d, now]` against `[now - 14d, now - 7d)`
    pub fn compute(records: &[FinancialRecord], now: DateTime<Utc>) -> Self {
        let one_week_ago = now - Duration::days(7);
        let two_weeks_ago = now - Duration::days(14);

        let mut this_week = 0.0;
        let mut last_week = 0.0;
        for record in records {
            let Some(ts) = record.timestamp else {
                continue;
            };
            if ts >= one_week_ago && ts <= now {
                this_week += record.amount;
            } else if ts >= two_weeks_ago && ts < one_week_ago {
                last_week += record.amount;
            }
        }

        if records.is_empty() {
            return Self {
                this_week,
                last_week,
                percent_change: None,
                label: "+0%".into(),
            };
        }

        if last_week == 0.0 {
            let label = if this_week > 0.0 { "+100%" } else { "+0%" };
            return Self {
                this_week,
                last_week,
                percent_change: None,
                label: label.into(),
            };
        }

        let change = (this_week - last_week) / last_week * 100.0;
        let sign = if change >= 0.0 { "+" } else { "" };
        Self {
            this_week,
            last_week,
            percent_change: Some(change),
            label: format!("{}{:.1}% from last week", sign, change),
        }
    }
}

/// Headline figures for the home view
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OverviewStats {
    pub total_donations: f64,
    pub total_dsgd_donations: f64,
    pub donation_count: u64,
    pub user_count: u64,
    pub active_merchants: u64,
    pub completed_donations: u64,
    pub pending_donations: u64,
    pub donations_by_type: BTreeMap<String, f64>,
    pub donations_by_cause: BTreeMap<String, f64>,
    pub donation_trend: WeeklyTrend,
}

impl OverviewStats {
    pub fn compute(
        orders: &[FinancialRecord],
        donations: &[FinancialRecord],
        users: &[UserProfile],
        now: DateTime<Utc>,
    ) -> Self {
        let donations: Vec<FinancialRecord> = donations
            .iter()
            .filter(|d| d.kind == RecordKind::Donation)
            .cloned()
            .collect();

        let merchants: HashSet<&str> = orders
            .iter()
            .filter_map(|o| o.field_str("merchant_name"))
            .collect();

        let completed = donations
            .iter()
            .filter(|d| d.field_str("donation_status") == Some(COMPLETED_STATUS))
            .count() as u64;

        Self {
            total_donations: donations.iter().map(|d| d.amount).sum(),
            total_dsgd_donations: donations.iter().map(FinancialRecord::dsgd_amount).sum(),
            donation_count: donations.len() as u64,
            user_count: users.len() as u64,
            active_merchants: merchants.len() as u64,
            completed_donations: completed,
            pending_donations: donations.len() as u64 - completed,
            donations_by_type: sum_by_field(&donations, "donation_type"),
            donations_by_cause: sum_by_field(&donations, "donation_cause"),
            donation_trend: WeeklyTrend::compute(&donations, now),
        }
    }
}

/// Total amount per value of a string attribute (missing → "Unknown")
pub fn sum_by_field(records: &[FinancialRecord], field: &str) -> BTreeMap<String, f64> {
    let mut totals: BTreeMap<String, f64> = BTreeMap::new();
    for record in records {
        let key = record.field_str(field).unwrap_or(UNKNOWN_LABEL);
        *totals.entry(key.to_string()).or_insert(0.0) += record.amount;
    }
    totals
}
