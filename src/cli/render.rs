//! Plain-text report layouts

use std::fmt::Write;

use super::{MerchantsReport, OverviewReport, SeriesReport};
use crate::services::merchants::WEEKDAYS;

pub fn series(report: &SeriesReport) -> String {
    let mut out = String::new();
    let d = &report.description;
    let _ = writeln!(out, "{}", d.title);
    if report.buckets.is_empty() {
        let _ = writeln!(out, "  no data");
        return out;
    }

    let width = label_width(report.buckets.iter().map(|b| b.period_label.as_str()), d.x_axis_label.len());
    let _ = writeln!(out, "  {:<width$}  {:>12}  {:>6}", d.x_axis_label, d.y_axis_label, "Count");
    for bucket in &report.buckets {
        let _ = writeln!(
            out,
            "  {:<width$}  {:>12.2}  {:>6}",
            bucket.period_label, bucket.total, bucket.count
        );
    }
    let _ = writeln!(out, "  {:<width$}  {:>12.2}  {:>6}", "Total", report.total, report.count);
    out
}

pub fn overview(report: &OverviewReport) -> String {
    let mut out = String::new();
    let s = &report.stats;
    let _ = writeln!(out, "Total donations      ${:.2}", s.total_donations);
    let _ = writeln!(out, "Total DSGD donated   {:.2}", s.total_dsgd_donations);
    let _ = writeln!(
        out,
        "Donations            {} ({} completed, {} pending)",
        s.donation_count, s.completed_donations, s.pending_donations
    );
    let _ = writeln!(out, "Users                {}", s.user_count);
    let _ = writeln!(out, "Active merchants     {}", s.active_merchants);
    let _ = writeln!(out, "Weekly trend         {}", s.donation_trend.label);

    section(&mut out, "Donations by type", s.donations_by_type.iter());
    section(&mut out, "Donations by cause", s.donations_by_cause.iter());

    if !report.gender.is_empty() {
        let _ = writeln!(out, "\nUsers by gender");
        for share in &report.gender {
            let _ = writeln!(out, "  {:<12} {}", share.name, share.value);
        }
    }
    out
}

pub fn merchants(report: &MerchantsReport) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "Total transactions  {}\n", report.total_transactions);
    let _ = writeln!(out, "Top merchants");
    let width = label_width(report.top_merchants.iter().map(|m| m.name.as_str()), 8);
    for (rank, m) in report.top_merchants.iter().enumerate() {
        let _ = writeln!(
            out,
            "  {:>2}. {:<width$}  {:>10.2}  {:>4} orders",
            rank + 1,
            m.name,
            m.total,
            m.count
        );
    }

    let _ = writeln!(out, "\nPeak transaction hour  {}", report.peak_hour);

    if !report.order_types.is_empty() {
        let _ = writeln!(out, "\nOrders by hour      Dine-in  Takeaway");
        for slot in &report.order_types {
            let _ = writeln!(out, "  {:<16} {:>8}  {:>8}", slot.time, slot.dine_in, slot.takeaway);
        }
    }

    if !report.heatmap.rows.is_empty() {
        let width = label_width(report.heatmap.rows.iter().map(|r| r.merchant.as_str()), 8);
        let _ = write!(out, "\nOrders by weekday\n  {:<width$}", "");
        for day in WEEKDAYS {
            let _ = write!(out, " {:>4}", day);
        }
        out.push('\n');
        for row in &report.heatmap.rows {
            let _ = write!(out, "  {:<width$}", row.merchant);
            for count in row.counts {
                let _ = write!(out, " {:>4}", count);
            }
            out.push('\n');
        }
    }

    if !report.earning_methods.is_empty() {
        let _ = writeln!(out, "\nDSGD earning methods");
        for share in &report.earning_methods {
            let _ = writeln!(out, "  {:<18} {}%", share.name, share.value);
        }
    }
    out
}

fn section<'a>(out: &mut String, title: &str, rows: impl Iterator<Item = (&'a String, &'a f64)>) {
    let rows: Vec<_> = rows.collect();
    if rows.is_empty() {
        return;
    }
    let _ = writeln!(out, "\n{}", title);
    let width = label_width(rows.iter().map(|(k, _)| k.as_str()), 8);
    for (name, amount) in rows {
        let _ = writeln!(out, "  {:<width$}  {:>10.2}", name, amount);
    }
}

fn label_width<'a>(labels: impl Iterator<Item = &'a str>, min: usize) -> usize {
    labels.map(|l| l.chars().count()).max().unwrap_or(0).max(min)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::{describe_series, WeekdayHeatmap};
    use crate::types::{Bucket, Granularity, RecordKind};

    fn bucket(key: &str, label: &str, total: f64, count: u64) -> Bucket {
        let mut b = Bucket::empty(key.to_string(), label.to_string());
        b.total = total;
        b.count = count;
        b
    }

    #[test]
    fn test_series_text() {
        let report = SeriesReport {
            description: describe_series(Granularity::Day, RecordKind::Donation),
            buckets: vec![
                bucket("2025-03-01", "Mar 01", 10.0, 2),
                bucket("2025-03-02", "Mar 02", 0.0, 0),
            ],
            total: 10.0,
            count: 2,
        };

        let text = series(&report);

        assert!(text.starts_with("Donations Over Time (Daily)\n"));
        assert!(text.contains("Mar 01"));
        assert!(text.contains("10.00"));
        assert!(text.lines().last().unwrap().contains("Total"));
    }

    #[test]
    fn test_series_text_empty() {
        let report = SeriesReport {
            description: describe_series(Granularity::Week, RecordKind::Order),
            buckets: Vec::new(),
            total: 0.0,
            count: 0,
        };
        assert_eq!(series(&report), "Orders Over Time (Weekly)\n  no data\n");
    }

    #[test]
    fn test_merchants_text_without_orders() {
        let report = MerchantsReport {
            total_transactions: 0,
            top_merchants: Vec::new(),
            peak_hour: "N/A".into(),
            order_types: Vec::new(),
            heatmap: WeekdayHeatmap {
                rows: Vec::new(),
                max: 0,
            },
            earning_methods: Vec::new(),
        };
        let text = merchants(&report);
        assert!(text.starts_with("Total transactions  0\n"));
        assert!(text.contains("Peak transaction hour  N/A"));
        assert!(!text.contains("Orders by weekday"));
    }
}
