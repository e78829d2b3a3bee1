use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use ledger_core::ErrorKind;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Ledger(#[from] ledger_core::Error),

    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    /// Machine-readable code for the response body
    pub fn code(&self) -> &'static str {
        match self {
            ApiError::Ledger(e) => match e.root().kind() {
                ErrorKind::InvalidArgument => "VALIDATION_ERROR",
                ErrorKind::NotFound => "NOT_FOUND",
                ErrorKind::InsufficientBalance => "INSUFFICIENT_BALANCE",
                ErrorKind::Timeout => "TIMEOUT",
                ErrorKind::Exhausted => "RETRIES_EXHAUSTED",
                ErrorKind::Internal => "INTERNAL_ERROR",
            },
            ApiError::Validation(_) => "VALIDATION_ERROR",
            ApiError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    fn message(&self) -> String {
        match self {
            ApiError::Ledger(e) => e.root().to_string(),
            other => other.to_string(),
        }
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Ledger(e) if e.root().kind() == ErrorKind::NotFound => StatusCode::NOT_FOUND,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::BAD_REQUEST,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(serde_json::json!({
            "error": self.code(),
            "message": self.message()
        }))
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
