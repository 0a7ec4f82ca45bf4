use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Malformed payload")]
    MalformedPayload,

    #[error("Invalid request: {0}")]
    Validation(String),

    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("Internal error: {0}")]
    Internal(#[from] Box<dyn std::error::Error + Send + Sync>),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match self {
            AppError::MalformedPayload { .. } => StatusCode::BAD_REQUEST,
            AppError::Validation { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        };

        (status, self.to_string()).into_response()
    }
}

impl From<redis::RedisError> for AppError {
    fn from(error: redis::RedisError) -> Self {
        AppError::Internal(Box::new(error))
    }
}

impl From<meilisearch_sdk::errors::Error> for AppError {
    fn from(error: meilisearch_sdk::errors::Error) -> Self {
        AppError::Internal(Box::new(error))
    }
}

impl From<serde_json::Error> for AppError {
    fn from(error: serde_json::Error) -> Self {
        AppError::Internal(Box::new(error))
    }
}

impl From<eco::forecast::ForecastError> for AppError {
    fn from(error: eco::forecast::ForecastError) -> Self {
        AppError::Validation(error.to_string())
    }
}

impl From<eco::accuracy::AccuracyError> for AppError {
    fn from(error: eco::accuracy::AccuracyError) -> Self {
        AppError::Validation(error.to_string())
    }
}
