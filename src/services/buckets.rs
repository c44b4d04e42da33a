//! Bucket keying, generation and assignment per granularity

use crate::services::range::EffectiveRange;
use crate::types::{Bucket, FinancialRecord, Granularity};
use chrono::{Datelike, Duration, FixedOffset, NaiveDateTime, NaiveTime, Timelike};
use std::collections::HashMap;

/// Truncate a local wall-clock time to the start of its period.
/// Weeks start on Sunday.
pub fn period_start(local: NaiveDateTime, granularity: Granularity) -> NaiveDateTime {
    let date = local.date();
    match granularity {
        Granularity::Hour => local
            .with_minute(0)
            .and_then(|t| t.with_second(0))
            .and_then(|t| t.with_nanosecond(0))
            .unwrap_or(local),
        Granularity::Day => date.and_time(NaiveTime::MIN),
        Granularity::Week => {
            let back = i64::from(date.weekday().num_days_from_sunday());
            (date - Duration::days(back)).and_time(NaiveTime::MIN)
        }
        Granularity::Month => date.with_day(1).unwrap_or(date).and_time(NaiveTime::MIN),
        Granularity::Year => date
            .with_month(1)
            .and_then(|d| d.with_day(1))
            .unwrap_or(date)
            .and_time(NaiveTime::MIN),
    }
}

/// Sortable key of the period containing `local`
pub fn period_key(local: NaiveDateTime, granularity: Granularity) -> String {
    let start = period_start(local, granularity);
    let fmt = match granularity {
        Granularity::Hour => "%Y-%m-%d %H:%M",
        Granularity::Day | Granularity::Week => "%Y-%m-%d",
        Granularity::Month => "%Y-%m",
        Granularity::Year => "%Y",
    };
    start.format(fmt).to_string()
}

/// Axis label of the period containing `local`
pub fn period_label(local: NaiveDateTime, granularity: Granularity) -> String {
    let start = period_start(local, granularity);
    match granularity {
        Granularity::Hour => start.format("%b %d %H:%M").to_string(),
        Granularity::Day => start.format("%b %d").to_string(),
        Granularity::Week => {
            let end = start + Duration::days(6);
            format!("{} - {}", start.format("%b %d"), end.format("%b %d"))
        }
        Granularity::Month => start.format("%b %Y").to_string(),
        Granularity::Year => start.format("%Y").to_string(),
    }
}

fn empty_bucket(local: NaiveDateTime, granularity: Granularity) -> Bucket {
    Bucket::empty(
        period_key(local, granularity),
        period_label(local, granularity),
    )
}

/// Zero-filled buckets for every step of `range`.
///
/// Only Hour and Day are dense; coarser granularities return an empty
/// vector and get their buckets from [`assign_to_buckets`].
pub fn generate_buckets(range: &EffectiveRange, granularity: Granularity) -> Vec<Bucket> {
    let first = range.start.naive_local();
    let last = range.end.naive_local();

    match granularity {
        Granularity::Hour => {
            let mut buckets = Vec::new();
            let mut cursor = period_start(first, Granularity::Hour);
            while cursor <= last {
                buckets.push(empty_bucket(cursor, granularity));
                cursor += Duration::hours(1);
            }
            buckets
        }
        Granularity::Day => range
            .first_day()
            .iter_days()
            .take_while(|d| *d <= range.last_day())
            .map(|d| empty_bucket(d.and_time(NaiveTime::MIN), granularity))
            .collect(),
        Granularity::Week | Granularity::Month | Granularity::Year => Vec::new(),
    }
}

/// Add each record's amount to the bucket matching its period key.
///
/// Dense granularities drop records whose key has no bucket; sparse ones
/// create the bucket on first use and re-sort by key afterwards.
/// Records without a timestamp are skipped. Returns the number dropped.
pub fn assign_to_buckets<'a, I>(
    records: I,
    buckets: &mut Vec<Bucket>,
    granularity: Granularity,
    tz: &FixedOffset,
) -> usize
where
    I: IntoIterator<Item = &'a FinancialRecord>,
{
    let mut index: HashMap<String, usize> = buckets
        .iter()
        .enumerate()
        .map(|(i, b)| (b.period_key.clone(), i))
        .collect();
    let mut dropped = 0;

    for record in records {
        let Some(local) = record.local_time(tz) else {
            dropped += 1;
            continue;
        };
        let local = local.naive_local();
        let key = period_key(local, granularity);

        let slot = match index.get(&key) {
            Some(&i) => i,
            None if granularity.is_dense() => {
                tracing::debug!(key = %key, "no bucket for record, dropping");
                dropped += 1;
                continue;
            }
            None => {
                buckets.push(Bucket::empty(key.clone(), period_label(local, granularity)));
                index.insert(key, buckets.len() - 1);
                buckets.len() - 1
            }
        };

        buckets[slot].add(record.amount);
    }

    if !granularity.is_dense() {
        buckets.sort_by(|a, b| a.period_key.cmp(&b.period_key));
    }

    dropped
}
