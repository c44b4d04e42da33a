//! Backend REST API source

use super::{unwrap_envelope, RecordSource};
use crate::services::Settings;
use crate::types::{InsightsError, Result};
use serde_json::Value;
use std::time::Duration;

/// Fetches `{base_url}/{collection}` with a single blocking GET
pub struct ApiSource {
    base_url: String,
    client: reqwest::blocking::Client,
}

impl ApiSource {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| InsightsError::Fetch(format!("HTTP client error: {}", e)))?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    pub fn from_settings(settings: &Settings) -> Result<Self> {
        Self::new(
            &settings.api_base_url,
            Duration::from_secs(settings.request_timeout_secs),
        )
    }

    pub fn url_for(&self, collection: &str) -> String {
        format!("{}/{}", self.base_url, collection.trim_start_matches('/'))
    }
}

impl RecordSource for ApiSource {
    fn name(&self) -> &str {
        "api"
    }

    fn fetch(&self, collection: &str) -> Result<Vec<Value>> {
        let url = self.url_for(collection);
        tracing::debug!(%url, "requesting collection");

        let response = self
            .client
            .get(&url)
            .send()
            .map_err(|e| InsightsError::Fetch(format!("HTTP request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(InsightsError::Fetch(format!("HTTP {} for {}", status, url)));
        }

        let body: Value = response
            .json()
            .map_err(|e| InsightsError::Parse(format!("{}: {}", url, e)))?;
        Ok(unwrap_envelope(body, collection))
    }
}
