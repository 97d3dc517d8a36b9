//! Runtime configuration read from environment variables.
//!
//! Every value is optional at load time; the components that need a value
//! report its absence when they run (an unconfigured sheet fails the import,
//! a missing geocoding key fails each row, a missing webhook fails the chat
//! request).

use std::time::Duration;

use anyhow::{Context, Result};

use crate::error::ImportError;

pub const DEFAULT_SHEET_GID: &str = "0";
pub const DEFAULT_GEOCODING_ENDPOINT: &str = "https://maps.googleapis.com/maps/api/geocode/json";
pub const DEFAULT_REGION_SUFFIX: &str = "Ciudad de México, México";
pub const DEFAULT_THROTTLE_MS: u64 = 100;
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SheetConfig {
    pub published_url: Option<String>,
    pub sheet_id: Option<String>,
    pub gid: Option<String>,
}

impl SheetConfig {
    /// The CSV export location. A published URL takes precedence over a
    /// sheet id; with neither there is nothing to import from.
    pub fn export_url(&self) -> Result<String, ImportError> {
        if let Some(url) = &self.published_url {
            return Ok(url.clone());
        }
        match &self.sheet_id {
            Some(sheet_id) => {
                let gid = self.gid.as_deref().unwrap_or(DEFAULT_SHEET_GID);
                Ok(format!(
                    "https://docs.google.com/spreadsheets/d/{sheet_id}/export?format=csv&gid={gid}"
                ))
            }
            None => Err(ImportError::NotConfigured),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeocodingConfig {
    pub api_key: Option<String>,
    pub endpoint: String,
    pub region_suffix: String,
}

impl Default for GeocodingConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            endpoint: DEFAULT_GEOCODING_ENDPOINT.to_string(),
            region_suffix: DEFAULT_REGION_SUFFIX.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChatConfig {
    pub webhook_url: Option<String>,
    pub api_key: Option<String>,
    pub chat_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub database_url: Option<String>,
    pub bind_addr: String,
    pub sheet: SheetConfig,
    pub geocoding: GeocodingConfig,
    pub throttle: Duration,
    pub chat: ChatConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database_url: None,
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            sheet: SheetConfig::default(),
            geocoding: GeocodingConfig::default(),
            throttle: Duration::from_millis(DEFAULT_THROTTLE_MS),
            chat: ChatConfig::default(),
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from any key lookup. Blank values are
    /// treated as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let throttle = match get("IMPORT_THROTTLE_MS") {
            Some(raw) => Duration::from_millis(
                raw.parse::<u64>()
                    .with_context(|| format!("IMPORT_THROTTLE_MS must be a whole number of milliseconds, got '{raw}'"))?,
            ),
            None => Duration::from_millis(DEFAULT_THROTTLE_MS),
        };

        Ok(Self {
            database_url: get("DATABASE_URL"),
            bind_addr: get("PLACEMAP_BIND").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string()),
            sheet: SheetConfig {
                published_url: get("GOOGLE_SHEET_PUBLISHED_URL"),
                sheet_id: get("GOOGLE_SHEET_ID"),
                gid: get("GOOGLE_SHEET_GID"),
            },
            geocoding: GeocodingConfig {
                api_key: get("GOOGLE_MAPS_API_KEY"),
                endpoint: get("GEOCODING_ENDPOINT")
                    .unwrap_or_else(|| DEFAULT_GEOCODING_ENDPOINT.to_string()),
                region_suffix: get("GEOCODING_REGION_SUFFIX")
                    .unwrap_or_else(|| DEFAULT_REGION_SUFFIX.to_string()),
            },
            throttle,
            chat: ChatConfig {
                webhook_url: get("N8N_WEBHOOK_URL"),
                api_key: get("N8N_API_KEY"),
                chat_url: get("N8N_CHAT_URL"),
            },
        })
    }
}
