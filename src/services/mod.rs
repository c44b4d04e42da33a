//! Services for record coercion, aggregation and dashboard insights

pub mod aggregator;
pub mod audience;
pub mod buckets;
pub mod charities;
pub mod coercion;
pub mod config;
pub mod describe;
pub mod merchants;
pub mod overview;
pub mod range;

pub use aggregator::Aggregator;
pub use audience::{earning_methods, gender_distribution, Share};
pub use charities::CharityDirectory;
pub use config::Settings;
pub use describe::describe_series;
pub use merchants::{
    order_type_by_hour, peak_hour, peak_hour_label, top_by_dimension, DimensionTotal,
    WeekdayHeatmap,
};
pub use overview::{OverviewStats, WeeklyTrend};
pub use range::{resolve_effective_range, EffectiveRange};
