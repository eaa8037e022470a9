use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use inventory_common::model::error::ErrorDetail;
use thiserror::Error;

/// Every failure the service can surface at its HTTP boundary.
///
/// The messages are returned verbatim to clients as `{"detail": ...}`, which
/// includes the underlying remote or configuration error text.
#[derive(Error, Debug)]
pub enum AppError {
    /// Missing or unusable spreadsheet/credential settings.
    #[error("{0}")]
    Configuration(String),

    /// Transport, authorization or quota failure reported by the spreadsheet service.
    #[error("{0}")]
    RemoteService(String),

    /// Shared PIN mismatch.
    #[error("Invalid PIN")]
    Authorization,

    /// Request body that does not match the expected shape.
    #[error("{0}")]
    Validation(String),

    #[error("Failed to read static page: {0}")]
    StaticAsset(#[from] std::io::Error),
}

impl AppError {
    /// Wraps the error in the message prefix used by a specific endpoint, keeping its kind.
    pub fn context(self, prefix: &str) -> Self {
        match self {
            AppError::Configuration(msg) => AppError::Configuration(format!("{}: {}", prefix, msg)),
            AppError::RemoteService(msg) => AppError::RemoteService(format!("{}: {}", prefix, msg)),
            other => other,
        }
    }
}

impl From<reqwest::Error> for AppError {
    fn from(e: reqwest::Error) -> Self {
        AppError::RemoteService(e.to_string())
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Configuration(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::RemoteService(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Authorization => StatusCode::UNAUTHORIZED,
            AppError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::StaticAsset(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(ErrorDetail {
            detail: self.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statuses_follow_error_kind() {
        assert_eq!(
            AppError::Configuration("x".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            AppError::RemoteService("x".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(AppError::Authorization.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            AppError::Validation("x".into()).status_code(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
    }

    #[test]
    fn context_prefixes_message_and_keeps_kind() {
        let err = AppError::Configuration("SHEET_ID env var is not set".into()).context("Config error");
        assert!(matches!(err, AppError::Configuration(_)));
        assert_eq!(err.to_string(), "Config error: SHEET_ID env var is not set");

        assert_eq!(AppError::Authorization.context("ignored").to_string(), "Invalid PIN");
    }
}
