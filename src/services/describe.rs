//! Chart chrome strings for a time series

use crate::types::{Granularity, RecordKind, SeriesDescription};

fn period_word(granularity: Granularity) -> (&'static str, &'static str) {
    match granularity {
        Granularity::Hour => ("Hourly", "Hour"),
        Granularity::Day => ("Daily", "Day"),
        Granularity::Week => ("Weekly", "Week"),
        Granularity::Month => ("Monthly", "Month"),
        Granularity::Year => ("Yearly", "Year"),
    }
}

/// Title, axis and tooltip labels for a `(granularity, kind)` pair
pub fn describe_series(granularity: Granularity, kind: RecordKind) -> SeriesDescription {
    let (adverb, axis) = period_word(granularity);
    let (y_axis_label, measure) = match kind {
        RecordKind::Order => ("Revenue ($)", "Revenue"),
        RecordKind::Donation => ("Donation Amount ($)", "Donations"),
    };

    SeriesDescription {
        title: format!("{} Over Time ({})", kind.display_name(), adverb),
        x_axis_label: axis.to_string(),
        y_axis_label: y_axis_label.to_string(),
        tooltip_label: format!("{} {}", adverb, measure),
    }
}
