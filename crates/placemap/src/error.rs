use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use placemap_core::chat::ChatError;
use placemap_core::error::{ImportError, RepositoryError};
use placemap_core::places::PlaceValidationError;
use serde::Serialize;
use tracing::error;

/// JSON error envelope: `{ error, details?, helpUrl? }`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorBody {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub help_url: Option<String>,
}

#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub body: ErrorBody,
}

impl ApiError {
    pub fn new(status: StatusCode, error: impl Into<String>) -> Self {
        Self {
            status,
            body: ErrorBody {
                error: error.into(),
                details: None,
                help_url: None,
            },
        }
    }

    pub fn bad_request(error: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, error)
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.body.details = Some(details.into());
        self
    }

    fn with_help_url(mut self, help_url: impl Into<String>) -> Self {
        self.body.help_url = Some(help_url.into());
        self
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

impl From<ImportError> for ApiError {
    fn from(err: ImportError) -> Self {
        error!("Import error: {err}");
        match err {
            ImportError::NotConfigured => {
                ApiError::new(StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
            }
            ImportError::SourceNotPublic { details, help_url } => {
                ApiError::new(StatusCode::FORBIDDEN, "Google Sheet is not public")
                    .with_details(details)
                    .with_help_url(help_url)
            }
            ImportError::SourceUnavailable(details) => {
                ApiError::new(StatusCode::BAD_GATEWAY, "Failed to import data").with_details(details)
            }
            ImportError::Storage(err) => {
                ApiError::new(StatusCode::INTERNAL_SERVER_ERROR, "Failed to import data")
                    .with_details(err.to_string())
            }
        }
    }
}

impl From<RepositoryError> for ApiError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound(_) => ApiError::new(StatusCode::NOT_FOUND, "Place not found"),
            other => {
                error!("Storage error: {other}");
                ApiError::new(StatusCode::INTERNAL_SERVER_ERROR, "Database error")
            }
        }
    }
}

impl From<PlaceValidationError> for ApiError {
    fn from(err: PlaceValidationError) -> Self {
        ApiError::bad_request(err.to_string())
    }
}

impl From<ChatError> for ApiError {
    fn from(err: ChatError) -> Self {
        error!("Chat error: {err}");
        match err {
            ChatError::NotConfigured => {
                ApiError::new(StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
            }
            other => ApiError::new(StatusCode::BAD_GATEWAY, "Failed to process chat message")
                .with_details(other.to_string()),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::new(rejection.status(), "Invalid request body").with_details(rejection.body_text())
    }
}
