//! Effective date-range resolution for a time series

use crate::types::{DateRange, FinancialRecord, Granularity};
use chrono::{DateTime, Duration, FixedOffset, NaiveDate, NaiveTime, TimeZone, Utc};

/// Hourly series never span more than this many calendar days
pub const HOURLY_MAX_DAYS: i64 = 7;

/// Default hourly window when no bounds are requested (latest day included)
pub const HOURLY_DEFAULT_DAYS: i64 = 3;

/// Padding applied on each side when all data falls on a single day
pub const SINGLE_DAY_PADDING_DAYS: i64 = 3;

/// Inclusive instant range in the reference timezone.
///
/// `start` is a local midnight and `end` is 23:59:59.999 of the last day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EffectiveRange {
    pub start: DateTime<FixedOffset>,
    pub end: DateTime<FixedOffset>,
}

impl EffectiveRange {
    /// Build the range covering whole calendar days `first..=last` in `tz`
    pub fn from_days(first: NaiveDate, last: NaiveDate, tz: &FixedOffset) -> Option<Self> {
        if first > last {
            return None;
        }
        let start = local_midnight(first, tz)?;
        let end = local_midnight(last.succ_opt()?, tz)? - Duration::milliseconds(1);
        Some(Self { start, end })
    }

    pub fn contains(&self, ts: &DateTime<Utc>) -> bool {
        *ts >= self.start && *ts <= self.end
    }

    pub fn first_day(&self) -> NaiveDate {
        self.start.date_naive()
    }

    pub fn last_day(&self) -> NaiveDate {
        self.end.date_naive()
    }

    /// Number of calendar days covered (inclusive)
    pub fn day_count(&self) -> i64 {
        (self.last_day() - self.first_day()).num_days() + 1
    }
}

fn local_midnight(day: NaiveDate, tz: &FixedOffset) -> Option<DateTime<FixedOffset>> {
    tz.from_local_datetime(&day.and_time(NaiveTime::MIN)).single()
}

/// Resolve the range a series should cover.
///
/// - With both bounds, the requested calendar days in `tz` are used as-is.
/// - Otherwise the span of the records inside the requested bound (if any)
///   is used, padded by [`SINGLE_DAY_PADDING_DAYS`] on each side when it is a
///   single day. Hourly series instead cover the last
///   [`HOURLY_DEFAULT_DAYS`] days of that data.
/// - Hourly series are capped at [`HOURLY_MAX_DAYS`] days.
///
/// Returns `None` when no timestamped record falls inside the requested
/// bounds or the requested range is inverted.
pub fn resolve_effective_range<'a, I>(
    records: I,
    requested: &DateRange,
    granularity: Granularity,
    tz: &FixedOffset,
) -> Option<EffectiveRange>
where
    I: IntoIterator<Item = &'a FinancialRecord>,
{
    if requested.is_inverted() {
        tracing::warn!(?requested, "start date is after end date, nothing to resolve");
        return None;
    }

    let mut days = records
        .into_iter()
        .filter_map(|r| r.local_time(tz))
        .map(|dt| dt.date_naive())
        .filter(|d| requested.contains(*d));
    let first = days.next()?;
    let (earliest, latest) = days.fold((first, first), |(lo, hi), d| (lo.min(d), hi.max(d)));

    let (start, mut end) = match (requested.start, requested.end) {
        (Some(start), Some(end)) => (start, end),
        _ if granularity == Granularity::Hour => {
            (latest - Duration::days(HOURLY_DEFAULT_DAYS - 1), latest)
        }
        _ if earliest == latest => (
            earliest - Duration::days(SINGLE_DAY_PADDING_DAYS),
            latest + Duration::days(SINGLE_DAY_PADDING_DAYS),
        ),
        _ => (earliest, latest),
    };

    if granularity == Granularity::Hour && (end - start).num_days() >= HOURLY_MAX_DAYS {
        let capped = start + Duration::days(HOURLY_MAX_DAYS - 1);
        tracing::debug!(%start, %end, %capped, "limiting hourly range");
        end = capped;
    }

    EffectiveRange::from_days(start, end, tz)
}
