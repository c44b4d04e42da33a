mod charities;
mod render;

use anyhow::Context as _;
use chrono::{FixedOffset, Utc};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;

use crate::services::coercion::parse_utc_offset;
use crate::services::merchants::{order_type_by_hour, peak_hour, peak_hour_label, OrderTypeSlot};
use crate::services::{
    describe_series, earning_methods, gender_distribution, top_by_dimension, Aggregator,
    DimensionTotal, OverviewStats, Settings, Share, WeekdayHeatmap,
};
use crate::sources::{ApiSource, FileSource, RecordSource};
use crate::types::{
    Bucket, DateRange, FinancialRecord, Granularity, RecordKind, SeriesDescription, UserProfile,
};

pub use charities::CharitiesArgs;

/// Order and donation analytics for the campus food-ordering dashboard
#[derive(Parser)]
#[command(name = "foodgle")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(flatten)]
    sources: SourceArgs,

    #[command(subcommand)]
    command: Commands,
}

/// Where records come from; collections without a path are fetched from the API
#[derive(Args, Debug, Default)]
struct SourceArgs {
    /// Orders JSON file or glob
    #[arg(long, global = true, value_name = "PATH")]
    orders: Option<String>,

    /// Donations JSON file or glob
    #[arg(long, global = true, value_name = "PATH")]
    donations: Option<String>,

    /// Users JSON file or glob
    #[arg(long, global = true, value_name = "PATH")]
    users: Option<String>,

    /// Reference UTC offset (e.g., +08:00)
    #[arg(long, global = true, value_name = "OFFSET", allow_hyphen_values = true)]
    tz: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Time-bucketed totals for orders or donations
    Series {
        /// orders | donations
        #[arg(long)]
        kind: RecordKind,

        /// First day (YYYY-MM-DD)
        #[arg(long)]
        start: Option<String>,

        /// Last day (YYYY-MM-DD)
        #[arg(long)]
        end: Option<String>,

        /// hour | day | week | month | year
        #[arg(long)]
        granularity: Option<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Headline donation, user and merchant figures
    Overview {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Merchant rankings, peak hour and weekday heatmap
    Merchants {
        /// Number of merchants to rank (-1 for all)
        #[arg(long, allow_hyphen_values = true)]
        top: Option<i64>,

        /// First day (YYYY-MM-DD)
        #[arg(long)]
        start: Option<String>,

        /// Last day (YYYY-MM-DD)
        #[arg(long)]
        end: Option<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Browse the charity directory
    Charities(CharitiesArgs),
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeriesReport {
    pub description: SeriesDescription,
    pub buckets: Vec<Bucket>,
    pub total: f64,
    pub count: u64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OverviewReport {
    pub stats: OverviewStats,
    pub gender: Vec<Share>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MerchantsReport {
    pub total_transactions: u64,
    pub top_merchants: Vec<DimensionTotal>,
    pub peak_hour: String,
    pub order_types: Vec<OrderTypeSlot>,
    pub heatmap: WeekdayHeatmap,
    pub earning_methods: Vec<Share>,
}

/// Resolved settings plus the sources to read each collection from
struct Context {
    settings: Settings,
    tz: FixedOffset,
    sources: SourceArgs,
}

impl Context {
    fn new(settings: Settings, sources: SourceArgs) -> anyhow::Result<Self> {
        let tz = match sources.tz.as_deref() {
            Some(raw) => parse_utc_offset(raw)
                .with_context(|| format!("invalid --tz offset: {}", raw))?,
            None => settings.tz()?,
        };
        Ok(Self {
            settings,
            tz,
            sources,
        })
    }

    fn source(&self, path: Option<&String>) -> anyhow::Result<Box<dyn RecordSource>> {
        let source: Box<dyn RecordSource> = match path {
            Some(pattern) => Box::new(FileSource::new(pattern.as_str())),
            None => Box::new(ApiSource::from_settings(&self.settings)?),
        };
        Ok(source)
    }

    fn records(&self, kind: RecordKind) -> anyhow::Result<Vec<FinancialRecord>> {
        let path = match kind {
            RecordKind::Order => self.sources.orders.as_ref(),
            RecordKind::Donation => self.sources.donations.as_ref(),
        };
        let records = self
            .source(path)?
            .load_records(kind, &self.tz)
            .with_context(|| format!("failed to load {}", kind.collection()))?;
        Ok(records)
    }

    fn users(&self) -> anyhow::Result<Vec<UserProfile>> {
        let values = self
            .source(self.sources.users.as_ref())?
            .fetch("users")
            .context("failed to load users")?;
        Ok(UserProfile::from_values(&values))
    }

    fn run(&self, command: Commands) -> anyhow::Result<()> {
        match command {
            Commands::Series {
                kind,
                start,
                end,
                granularity,
                json,
            } => {
                let granularity = granularity
                    .as_deref()
                    .map(Granularity::parse_lenient)
                    .unwrap_or_else(|| self.settings.granularity());
                let range = DateRange::from_iso(start.as_deref(), end.as_deref())?;
                let records = self.records(kind)?;
                let report = build_series(&records, kind, &range, granularity, &self.tz);
                emit(&report, json, render::series)
            }
            Commands::Overview { json } => {
                let orders = self.records(RecordKind::Order)?;
                let donations = self.records(RecordKind::Donation)?;
                let users = self.users()?;
                let report = OverviewReport {
                    stats: OverviewStats::compute(&orders, &donations, &users, Utc::now()),
                    gender: gender_distribution(&users),
                };
                emit(&report, json, render::overview)
            }
            Commands::Merchants {
                top,
                start,
                end,
                json,
            } => {
                let limit = match top {
                    Some(n) => usize::try_from(n).ok(),
                    None => self.settings.top_limit(),
                };
                let range = DateRange::from_iso(start.as_deref(), end.as_deref())?;
                let orders = self.records(RecordKind::Order)?;
                let users = self.users()?;
                let report = build_merchants(&orders, &users, &range, limit, &self.tz);
                emit(&report, json, render::merchants)
            }
            Commands::Charities(args) => args.run(),
        }
    }
}

impl Cli {
    pub fn run(self) -> anyhow::Result<()> {
        self.run_with(Settings::load)
    }

    /// `load_settings` is only called by commands that read collections
    fn run_with<F>(self, load_settings: F) -> anyhow::Result<()>
    where
        F: FnOnce() -> crate::types::Result<Settings>,
    {
        match self.command {
            // needs neither the API nor the reference timezone
            Commands::Charities(args) => args.run(),
            command => Context::new(load_settings()?, self.sources)?.run(command),
        }
    }
}

pub fn build_series(
    records: &[FinancialRecord],
    kind: RecordKind,
    range: &DateRange,
    granularity: Granularity,
    tz: &FixedOffset,
) -> SeriesReport {
    let buckets = Aggregator::aggregate(records, kind, range, granularity, tz);
    let (total, count) = Aggregator::series_totals(&buckets);
    SeriesReport {
        description: describe_series(granularity, kind),
        buckets,
        total,
        count,
    }
}

/// Merchant figures over the orders whose local date falls in `range`.
/// Untimestamped orders only count when the range is unbounded.
pub fn build_merchants(
    orders: &[FinancialRecord],
    users: &[UserProfile],
    range: &DateRange,
    limit: Option<usize>,
    tz: &FixedOffset,
) -> MerchantsReport {
    let orders: Vec<FinancialRecord> = if range.is_unbounded() {
        orders.to_vec()
    } else {
        orders
            .iter()
            .filter(|o| {
                o.local_time(tz)
                    .map_or(false, |dt| range.contains(dt.date_naive()))
            })
            .cloned()
            .collect()
    };
    tracing::debug!(kept = orders.len(), ?range, "orders in merchant window");

    MerchantsReport {
        total_transactions: orders.len() as u64,
        top_merchants: top_by_dimension(&orders, limit),
        peak_hour: peak_hour_label(peak_hour(&orders, tz)),
        order_types: order_type_by_hour(&orders, tz),
        heatmap: WeekdayHeatmap::compute(&orders, tz),
        earning_methods: earning_methods(users),
    }
}

/// Print `report` as pretty JSON or through its text renderer
fn emit<T: Serialize>(report: &T, json: bool, text: fn(&T) -> String) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(report)?);
    } else {
        print!("{}", text(report));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::InsightsError;
    use chrono::NaiveDate;

    fn sgt() -> FixedOffset {
        FixedOffset::east_opt(8 * 3600).unwrap()
    }

    #[test]
    fn test_cli_parse_series() {
        let cli = Cli::try_parse_from([
            "foodgle",
            "series",
            "--kind",
            "orders",
            "--start",
            "2025-03-01",
            "--granularity",
            "week",
            "--json",
        ])
        .unwrap();
        match cli.command {
            Commands::Series {
                kind,
                start,
                end,
                granularity,
                json,
            } => {
                assert_eq!(kind, RecordKind::Order);
                assert_eq!(start.as_deref(), Some("2025-03-01"));
                assert_eq!(end, None);
                assert_eq!(granularity.as_deref(), Some("week"));
                assert!(json);
            }
            _ => panic!("expected series"),
        }
    }

    #[test]
    fn test_cli_parse_series_requires_kind() {
        assert!(Cli::try_parse_from(["foodgle", "series"]).is_err());
        assert!(Cli::try_parse_from(["foodgle", "series", "--kind", "users"]).is_err());
    }

    #[test]
    fn test_cli_parse_global_sources_after_subcommand() {
        let cli = Cli::try_parse_from([
            "foodgle",
            "overview",
            "--orders",
            "data/orders-*.json",
            "--tz",
            "-05:00",
        ])
        .unwrap();
        assert!(matches!(cli.command, Commands::Overview { json: false }));
        assert_eq!(cli.sources.orders.as_deref(), Some("data/orders-*.json"));
        assert_eq!(cli.sources.tz.as_deref(), Some("-05:00"));
        assert_eq!(cli.sources.donations, None);
    }

    #[test]
    fn test_cli_parse_merchants_all() {
        let cli = Cli::try_parse_from(["foodgle", "merchants", "--top", "-1"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Merchants {
                top: Some(-1),
                start: None,
                json: false,
                ..
            }
        ));
    }

    #[test]
    fn test_cli_parse_no_subcommand_fails() {
        assert!(Cli::try_parse_from(["foodgle"]).is_err());
    }

    #[test]
    fn test_context_rejects_bad_tz() {
        let sources = SourceArgs {
            tz: Some("+25:00".into()),
            ..Default::default()
        };
        assert!(Context::new(Settings::default(), sources).is_err());
    }

    #[test]
    fn test_context_tz_flag_overrides_settings() {
        let sources = SourceArgs {
            tz: Some("+05:30".into()),
            ..Default::default()
        };
        let ctx = Context::new(Settings::default(), sources).unwrap();
        assert_eq!(ctx.tz.local_minus_utc(), 5 * 3600 + 30 * 60);
    }

    #[test]
    fn test_series_from_fixture() {
        let ctx = Context::new(
            Settings::default(),
            SourceArgs {
                orders: Some("tests/fixtures/orders.json".into()),
                ..Default::default()
            },
        )
        .unwrap();
        let orders = ctx.records(RecordKind::Order).unwrap();
        let range = DateRange::between(
            NaiveDate::from_ymd_opt(2025, 3, 1).unwrap(),
            NaiveDate::from_ymd_opt(2025, 3, 3).unwrap(),
        );

        let report = build_series(&orders, RecordKind::Order, &range, Granularity::Day, &sgt());

        let totals: Vec<f64> = report.buckets.iter().map(|b| b.total).collect();
        assert_eq!(report.buckets.len(), 3);
        // Mar 1: 8.5 + 12.5; Mar 2: 6.90; Mar 3: 15 + unparseable (0)
        assert!((totals[0] - 21.0).abs() < 1e-9);
        assert!((totals[1] - 6.9).abs() < 1e-9);
        assert!((totals[2] - 15.0).abs() < 1e-9);
        assert_eq!(report.count, 5);
        assert_eq!(report.description.title, "Orders Over Time (Daily)");
    }

    #[test]
    fn test_merchants_report_from_fixture() {
        let orders = FileSource::new("tests/fixtures/orders.json")
            .load_records(RecordKind::Order, &sgt())
            .unwrap();
        let users =
            UserProfile::from_values(&FileSource::new("tests/fixtures/users.json").fetch("users").unwrap());

        let report = build_merchants(&orders, &users, &DateRange::unbounded(), Some(2), &sgt());

        assert_eq!(report.total_transactions, 6);
        assert_eq!(report.top_merchants.len(), 2);
        assert_eq!(report.top_merchants[0].name, "Koufu");
        assert!((report.top_merchants[0].total - 25.2).abs() < 1e-9);
        assert_eq!(report.top_merchants[1].name, "Mala Express");
        assert_eq!(report.peak_hour, "12:00 - 13:00");
        assert_eq!(report.earning_methods[0].value, 67.0);
        assert_eq!(report.heatmap.rows.len(), 3);
    }

    #[test]
    fn test_cli_parse_merchants_window() {
        let cli = Cli::try_parse_from([
            "foodgle",
            "merchants",
            "--start",
            "2025-03-01",
            "--end",
            "2025-03-02",
        ])
        .unwrap();
        match cli.command {
            Commands::Merchants { start, end, .. } => {
                assert_eq!(start.as_deref(), Some("2025-03-01"));
                assert_eq!(end.as_deref(), Some("2025-03-02"));
            }
            _ => panic!("expected merchants"),
        }
    }

    #[test]
    fn test_merchants_window_excludes_later_merchant() {
        let orders = FileSource::new("tests/fixtures/orders.json")
            .load_records(RecordKind::Order, &sgt())
            .unwrap();
        let range = DateRange::between(
            NaiveDate::from_ymd_opt(2025, 3, 1).unwrap(),
            NaiveDate::from_ymd_opt(2025, 3, 2).unwrap(),
        );

        let report = build_merchants(&orders, &[], &range, None, &sgt());

        // Koufu 8.50 + 12.50 on Mar 1, Subway 6.90 on Mar 2; undated Koufu 4.20 dropped
        assert_eq!(report.total_transactions, 3);
        let names: Vec<&str> = report.top_merchants.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["Koufu", "Subway"]);
        assert!((report.top_merchants[0].total - 21.0).abs() < 1e-9);
        assert!(report.heatmap.rows.iter().all(|r| r.merchant != "Mala Express"));
        assert!(report.earning_methods.is_empty());
    }

    #[test]
    fn test_merchants_window_with_start_only() {
        let orders = FileSource::new("tests/fixtures/orders.json")
            .load_records(RecordKind::Order, &sgt())
            .unwrap();
        let range = DateRange::new(NaiveDate::from_ymd_opt(2025, 3, 3), None);

        let report = build_merchants(&orders, &[], &range, None, &sgt());

        assert_eq!(report.total_transactions, 2);
        assert_eq!(report.top_merchants[0].name, "Mala Express");
    }

    #[test]
    fn test_charities_runs_without_loading_settings() {
        let cli = Cli::try_parse_from([
            "foodgle",
            "charities",
            "--input",
            "tests/fixtures/charities.json",
            "--json",
        ])
        .unwrap();
        let result = cli.run_with(|| Err(InsightsError::Config("unreadable config".into())));
        assert!(result.is_ok());
    }

    #[test]
    fn test_collection_commands_surface_settings_error() {
        let cli = Cli::try_parse_from([
            "foodgle",
            "merchants",
            "--orders",
            "tests/fixtures/orders.json",
            "--users",
            "tests/fixtures/users.json",
        ])
        .unwrap();
        let err = cli
            .run_with(|| Err(InsightsError::Config("unreadable config".into())))
            .unwrap_err();
        assert!(err.to_string().contains("unreadable config"));
    }
}
