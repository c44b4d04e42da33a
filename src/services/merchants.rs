//! Merchant-view rankings and hour/weekday breakdowns

use crate::services::overview::UNKNOWN_LABEL;
use crate::types::FinancialRecord;
use chrono::{Datelike, FixedOffset, Timelike};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

/// Weekday column order of the heatmap
pub const WEEKDAYS: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

/// Colour stops for heatmap cells: empty → half → max
const HEAT_LOW: (u8, u8, u8) = (0xff, 0xfb, 0xea);
const HEAT_MID: (u8, u8, u8) = (0xfb, 0xbf, 0x24);
const HEAT_HIGH: (u8, u8, u8) = (0xb9, 0x1c, 0x1c);

/// Total amount for one dimension value (e.g., one merchant)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DimensionTotal {
    pub name: String,
    pub total: f64,
    pub count: u64,
}

/// Rank dimension values by total amount, highest first.
///
/// Ties are broken by name. `limit = None` returns every value.
pub fn top_by_dimension(records: &[FinancialRecord], limit: Option<usize>) -> Vec<DimensionTotal> {
    let mut totals: HashMap<&str, DimensionTotal> = HashMap::new();
    for record in records {
        let name = record.dimension.as_deref().unwrap_or(UNKNOWN_LABEL);
        let entry = totals.entry(name).or_insert_with(|| DimensionTotal {
            name: name.to_string(),
            total: 0.0,
            count: 0,
        });
        entry.total += record.amount;
        entry.count = entry.count.saturating_add(1);
    }

    let mut ranked: Vec<DimensionTotal> = totals.into_values().collect();
    ranked.sort_by(|a, b| {
        b.total
            .total_cmp(&a.total)
            .then_with(|| a.name.cmp(&b.name))
    });
    if let Some(limit) = limit {
        ranked.truncate(limit);
    }
    ranked
}

/// Hour of day (0-23, reference timezone) with the most orders.
/// Ties go to the earliest hour.
pub fn peak_hour(orders: &[FinancialRecord], tz: &FixedOffset) -> Option<u32> {
    let mut counts = [0u64; 24];
    for local in orders.iter().filter_map(|o| o.local_time(tz)) {
        counts[local.hour() as usize] += 1;
    }

    let (hour, &max) = counts
        .iter()
        .enumerate()
        .rev()
        .max_by_key(|&(_, &c)| c)?;
    (max > 0).then_some(hour as u32)
}

pub fn peak_hour_label(hour: Option<u32>) -> String {
    match hour {
        Some(h) => format!("{:02}:00 - {}:00", h, h + 1),
        None => "N/A".to_string(),
    }
}

/// Dine-in and takeaway order counts for one hour slot
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderTypeSlot {
    /// "HH:00"
    pub time: String,
    pub dine_in: u64,
    pub takeaway: u64,
}

/// Dine-in vs takeaway counts per hour slot, sorted by slot.
/// Slots appear for every hour that has an order of any type.
pub fn order_type_by_hour(orders: &[FinancialRecord], tz: &FixedOffset) -> Vec<OrderTypeSlot> {
    let mut slots: BTreeMap<u32, OrderTypeSlot> = BTreeMap::new();
    for order in orders {
        let Some(local) = order.local_time(tz) else {
            continue;
        };
        let slot = slots
            .entry(local.hour())
            .or_insert_with(|| OrderTypeSlot {
                time: format!("{:02}:00", local.hour()),
                dine_in: 0,
                takeaway: 0,
            });

        let order_type = order.field_str("order_type").map(str::to_ascii_lowercase);
        match order_type.as_deref() {
            Some("dine-in") => slot.dine_in += 1,
            Some("takeaway") => slot.takeaway += 1,
            _ => {}
        }
    }
    slots.into_values().collect()
}

/// Order counts for one merchant, Sunday first
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HeatmapRow {
    pub merchant: String,
    pub counts: [u64; 7],
}

/// Orders per merchant per weekday
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WeekdayHeatmap {
    pub rows: Vec<HeatmapRow>,
    pub max: u64,
}

impl WeekdayHeatmap {
    /// Rows keep the order merchants are first seen in
    pub fn compute(orders: &[FinancialRecord], tz: &FixedOffset) -> Self {
        let mut rows: Vec<HeatmapRow> = Vec::new();
        let mut index: HashMap<String, usize> = HashMap::new();

        for order in orders {
            let merchant = order.dimension.as_deref().unwrap_or(UNKNOWN_LABEL);
            let row = *index.entry(merchant.to_string()).or_insert_with(|| {
                rows.push(HeatmapRow {
                    merchant: merchant.to_string(),
                    counts: [0; 7],
                });
                rows.len() - 1
            });

            if let Some(local) = order.local_time(tz) {
                let col = local.weekday().num_days_from_sunday() as usize;
                rows[row].counts[col] += 1;
            }
        }

        let max = rows
            .iter()
            .flat_map(|r| r.counts.iter().copied())
            .max()
            .unwrap_or(0);
        Self { rows, max }
    }

    pub fn cell_colour(&self, value: u64) -> String {
        heat_colour(value, self.max)
    }
}

/// Interpolate a cell colour on the yellow → orange → red scale
pub fn heat_colour(value: u64, max: u64) -> String {
    let hex = |(r, g, b): (u8, u8, u8)| format!("#{:02x}{:02x}{:02x}", r, g, b);
    if max == 0 || value == 0 {
        return hex(HEAT_LOW);
    }

    let intensity = (value as f64 / max as f64).min(1.0);
    let (from, to, t) = if intensity < 0.5 {
        (HEAT_LOW, HEAT_MID, intensity / 0.5)
    } else {
        (HEAT_MID, HEAT_HIGH, (intensity - 0.5) / 0.5)
    };
    let lerp = |a: u8, b: u8| (a as f64 + (b as f64 - a as f64) * t).round() as u8;
    format!(
        "rgb({},{},{})",
        lerp(from.0, to.0),
        lerp(from.1, to.1),
        lerp(from.2, to.2)
    )
}
