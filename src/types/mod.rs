//! Type definitions for foodgle-insights

mod error;
mod profile;
mod record;
mod series;

pub use error::*;
pub use profile::*;
pub use record::*;
pub use series::*;
