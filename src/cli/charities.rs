//! `foodgle charities` subcommand for browsing the charity directory

use clap::Args;
use serde::Serialize;
use std::fmt::Write;

use crate::services::CharityDirectory;
use crate::sources::{FileSource, RecordSource};
use crate::types::{Charity, InsightsError, Result};

/// Browse the charity directory
#[derive(Args, Debug)]
pub struct CharitiesArgs {
    /// Charity directory JSON file or glob
    #[arg(long, value_name = "FILE")]
    pub input: String,

    /// Only show this category ("All" for every category)
    #[arg(long)]
    pub category: Option<String>,

    /// Case-insensitive search over name and organization
    #[arg(long, default_value = "")]
    pub search: String,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Serialize)]
pub struct CharityListing<'a> {
    pub categories: Vec<String>,
    pub charities: Vec<&'a Charity>,
}

impl CharitiesArgs {
    pub fn run(self) -> anyhow::Result<()> {
        let directory = load_directory(&self.input)?;
        let listing = CharityListing {
            categories: directory.categories(),
            charities: directory.filter(self.category.as_deref(), &self.search),
        };

        if self.json {
            let json = serde_json::to_string_pretty(&listing)
                .map_err(|e| InsightsError::Parse(e.to_string()))?;
            println!("{}", json);
        } else {
            print!("{}", render(&listing));
        }
        Ok(())
    }
}

fn load_directory(pattern: &str) -> Result<CharityDirectory> {
    let values = FileSource::new(pattern).fetch("charities")?;
    Ok(CharityDirectory::new(Charity::from_values(&values)))
}

fn render(listing: &CharityListing<'_>) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Categories: {}", listing.categories.join(", "));
    if listing.charities.is_empty() {
        let _ = writeln!(out, "No charities match.");
        return out;
    }
    for charity in &listing.charities {
        let _ = writeln!(out, "\n{} [{}]", charity.name, charity.category);
        if !charity.organization.is_empty() && charity.organization != charity.name {
            let _ = writeln!(out, "  {}", charity.organization);
        }
        if let Some(email) = &charity.email {
            let _ = writeln!(out, "  {}", email);
        }
        if let Some(website) = &charity.website {
            let _ = writeln!(out, "  {}", website);
        }
    }
    out
}
