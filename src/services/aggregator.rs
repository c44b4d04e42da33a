//! Aggregator service for time-bucketed order and donation series

use crate::services::buckets::{assign_to_buckets, generate_buckets};
use crate::services::range::resolve_effective_range;
use crate::types::{Bucket, DateRange, FinancialRecord, Granularity, RecordKind};
use chrono::FixedOffset;
use serde_json::Value;

/// Aggregator for computing chart series
pub struct Aggregator;

impl Aggregator {
    /// Bucket `records` of `kind` into a series ordered by period key.
    ///
    /// Records without a timestamp, of another kind, or outside the
    /// resolved range are left out. Hour and Day series are zero-filled
    /// across the range; Week, Month and Year only contain periods that
    /// have records. Empty input yields an empty series.
    pub fn aggregate(
        records: &[FinancialRecord],
        kind: RecordKind,
        requested: &DateRange,
        granularity: Granularity,
        tz: &FixedOffset,
    ) -> Vec<Bucket> {
        let timestamped: Vec<&FinancialRecord> = records
            .iter()
            .filter(|r| r.kind == kind && r.timestamp.is_some())
            .collect();

        tracing::debug!(
            %kind,
            %granularity,
            total = records.len(),
            timestamped = timestamped.len(),
            "aggregating series"
        );

        if timestamped.is_empty() {
            return Vec::new();
        }

        let Some(range) =
            resolve_effective_range(timestamped.iter().copied(), requested, granularity, tz)
        else {
            return Vec::new();
        };

        let in_range: Vec<&FinancialRecord> = timestamped
            .into_iter()
            .filter(|r| {
                r.local_time(tz)
                    .is_some_and(|t| requested.contains(t.date_naive()))
            })
            .filter(|r| r.timestamp.is_some_and(|ts| range.contains(&ts)))
            .collect();

        if in_range.is_empty() {
            tracing::debug!(?requested, "no records inside the requested range");
            return Vec::new();
        }

        let mut buckets = generate_buckets(&range, granularity);
        let dropped = assign_to_buckets(in_range.iter().copied(), &mut buckets, granularity, tz);
        if dropped > 0 {
            tracing::debug!(dropped, "records without a matching bucket");
        }

        buckets
    }

    /// Resolve raw backend records, then [`Aggregator::aggregate`] them
    pub fn aggregate_values(
        values: &[Value],
        kind: RecordKind,
        requested: &DateRange,
        granularity: Granularity,
        tz: &FixedOffset,
    ) -> Vec<Bucket> {
        let records = FinancialRecord::from_values(values, kind, tz);
        Self::aggregate(&records, kind, requested, granularity, tz)
    }

    /// Sum of totals and counts across a series
    pub fn series_totals(buckets: &[Bucket]) -> (f64, u64) {
        buckets.iter().fold((0.0, 0u64), |(total, count), b| {
            (total + b.total, count.saturating_add(b.count))
        })
    }
}
