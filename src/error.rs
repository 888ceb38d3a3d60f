use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Invalid data provided")]
    InvalidInput,
    #[error("{0}")]
    SearchFailure(String),
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("Internal server error: {0}")]
    Unexpected(String),
}

/// Domain failures raised by the table search. The message reaches the client as-is.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SearchError {
    #[error("No times available for this party size")]
    NoSearchTimes,
}

impl From<SearchError> for AppError {
    fn from(err: SearchError) -> Self {
        AppError::SearchFailure(err.to_string())
    }
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::InvalidInput | AppError::SearchFailure(_) => StatusCode::BAD_REQUEST,
            AppError::Database(_) | AppError::Config(_) | AppError::Unexpected(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let message = match &self {
            AppError::InvalidInput => self.to_string(),
            AppError::SearchFailure(msg) => msg.clone(),
            AppError::Database(e) => {
                error!("Database error: {:?}", e);
                "Internal server error".to_string()
            }
            AppError::Config(msg) | AppError::Unexpected(msg) => {
                error!("Internal error: {}", msg);
                "Internal server error".to_string()
            }
        };

        let body = Json(json!({
            "errorMessage": message
        }));

        (self.status(), body).into_response()
    }
}
