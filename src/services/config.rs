//! User settings (~/.foodgle/config.json)

use crate::services::coercion::parse_utc_offset;
use crate::types::{Granularity, InsightsError, Result};
use chrono::FixedOffset;
use directories::BaseDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Environment variable overriding `api_base_url`
pub const API_BASE_URL_ENV: &str = "FOODGLE_API_BASE_URL";

const DEFAULT_API_BASE_URL: &str = "http://localhost:8000/api/v1";
const DEFAULT_TIMEZONE: &str = "+08:00";
const DEFAULT_TOP_MERCHANTS: i64 = 5;
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub api_base_url: String,
    /// UTC offset, e.g. "+08:00"
    pub timezone: String,
    pub granularity: String,
    /// Negative means no limit
    pub top_merchants: i64,
    pub request_timeout_secs: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            timezone: DEFAULT_TIMEZONE.to_string(),
            granularity: Granularity::default().as_str().to_string(),
            top_merchants: DEFAULT_TOP_MERCHANTS,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
        }
    }
}

impl Settings {
    /// Load from the default path, then apply the environment override
    pub fn load() -> Result<Self> {
        let settings = match Self::default_path() {
            Some(path) => Self::load_from(&path)?,
            None => {
                tracing::debug!("no home directory, using default settings");
                Self::default()
            }
        };
        Ok(settings.with_api_base_url(std::env::var(API_BASE_URL_ENV).ok()))
    }

    /// Missing file gives defaults; unreadable or malformed file is an error
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)?;
        serde_json::from_str(&content)
            .map_err(|e| InsightsError::Config(format!("{}: {}", path.display(), e)))
    }

    pub fn default_path() -> Option<PathBuf> {
        BaseDirs::new().map(|d| d.home_dir().join(".foodgle").join("config.json"))
    }

    /// Replace the base URL when `url` is set and non-blank
    pub fn with_api_base_url(mut self, url: Option<String>) -> Self {
        if let Some(url) = url.filter(|u| !u.trim().is_empty()) {
            self.api_base_url = url;
        }
        self
    }

    pub fn tz(&self) -> Result<FixedOffset> {
        parse_utc_offset(&self.timezone).ok_or_else(|| {
            InsightsError::Config(format!("invalid timezone offset: {}", self.timezone))
        })
    }

    pub fn granularity(&self) -> Granularity {
        Granularity::parse_lenient(&self.granularity)
    }

    /// `None` means every merchant
    pub fn top_limit(&self) -> Option<usize> {
        usize::try_from(self.top_merchants).ok()
    }
}
