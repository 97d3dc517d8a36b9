use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, error};

use crate::error::ImportError;

/// Downloads the raw text of a spreadsheet export.
#[async_trait]
pub trait SheetFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<String, ImportError>;
}

pub struct HttpSheetFetcher {
    client: Client,
}

impl HttpSheetFetcher {
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .context("Failed to create spreadsheet HTTP client")?;
        Ok(Self { client })
    }
}

#[async_trait]
impl SheetFetcher for HttpSheetFetcher {
    async fn fetch(&self, url: &str) -> Result<String, ImportError> {
        let response = self.client.get(url).send().await.map_err(|err| {
            error!(%url, error = %err, "Spreadsheet export request failed");
            ImportError::SourceUnavailable(err.to_string())
        })?;

        let status = response.status();
        if !status.is_success() {
            error!(%url, %status, "Spreadsheet export returned an error status");
            return Err(ImportError::SourceUnavailable(status.to_string()));
        }

        let text = response
            .text()
            .await
            .map_err(|err| ImportError::SourceUnavailable(err.to_string()))?;
        debug!(bytes = text.len(), "Downloaded spreadsheet export");
        Ok(text)
    }
}

/// A private sheet answers the export URL with a sign-in page rather than
/// CSV.
pub fn looks_like_html(text: &str) -> bool {
    let head: String = text
        .trim_start_matches('\u{feff}')
        .trim_start()
        .chars()
        .take(16)
        .collect::<String>()
        .to_ascii_lowercase();
    head.starts_with("<!doctype html") || head.starts_with("<html")
}
