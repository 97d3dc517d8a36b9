// crates/placemap-core/src/error.rs

use thiserror::Error;
use uuid::Uuid;

pub const SHEET_SHARING_HELP_URL: &str = "https://support.google.com/drive/answer/2494822";

pub const SHEET_SHARING_STEPS: &str = "The sheet returned an HTML page instead of CSV data. Please make your Google Sheet public:\n1. Open your sheet\n2. Click Share (top right)\n3. Change to \"Anyone with the link\" → \"Viewer\"\n4. Try importing again";

/// Conditions that stop an import before any row can be processed.
#[derive(Error, Debug)]
pub enum ImportError {
    #[error("Google Sheet URL not configured")]
    NotConfigured,

    #[error("Google Sheet is not public")]
    SourceNotPublic {
        details: &'static str,
        help_url: &'static str,
    },

    #[error("Failed to fetch Google Sheet: {0}")]
    SourceUnavailable(String),

    #[error("Storage failure: {0}")]
    Storage(#[from] RepositoryError),
}

impl ImportError {
    pub fn source_not_public() -> Self {
        ImportError::SourceNotPublic {
            details: SHEET_SHARING_STEPS,
            help_url: SHEET_SHARING_HELP_URL,
        }
    }
}

#[derive(Error, Debug)]
pub enum RepositoryError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("invalid category value '{0}'")]
    InvalidCategory(String),

    #[error("record not found for id '{0}'")]
    NotFound(Uuid),
}
