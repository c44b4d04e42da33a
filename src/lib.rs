//! Order and donation analytics for the campus food-ordering dashboard.
//!
//! Raw backend records are coerced into [`types::FinancialRecord`]s and
//! grouped into time-bucketed series by [`services::Aggregator`].

pub mod cli;
pub mod logging;
pub mod services;
pub mod sources;
pub mod types;
