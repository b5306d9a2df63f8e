use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::features::reports::models::ReportStatus;
use crate::shared::types::ApiResponse;

#[derive(Debug, Error, PartialEq)]
pub enum AppError {
    #[error("Illegal transition from {from} to {to}")]
    IllegalTransition { from: ReportStatus, to: ReportStatus },

    #[error("A comment is required to move a report to {0}")]
    MissingRequiredComment(ReportStatus),

    #[error("Unknown status: {0}")]
    UnknownStatus(String),

    #[error("Invalid value for filter '{field}': {value}")]
    InvalidFilterValue { field: String, value: String },

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn invalid_filter(field: &str, value: impl Into<String>) -> Self {
        AppError::InvalidFilterValue {
            field: field.to_string(),
            value: value.into(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message, errors) = match self {
            AppError::IllegalTransition { .. } => (StatusCode::CONFLICT, self.to_string(), None),
            AppError::MissingRequiredComment(_) => {
                let msg = self.to_string();
                (StatusCode::BAD_REQUEST, msg.clone(), Some(vec![msg]))
            }
            AppError::UnknownStatus(_) | AppError::InvalidFilterValue { .. } => {
                let msg = self.to_string();
                (StatusCode::BAD_REQUEST, msg.clone(), Some(vec![msg]))
            }
            AppError::NotFound(ref msg) => (StatusCode::NOT_FOUND, msg.clone(), None),
            AppError::Validation(ref msg) => (
                StatusCode::BAD_REQUEST,
                msg.clone(),
                Some(vec![msg.clone()]),
            ),
            AppError::BadRequest(ref msg) => (StatusCode::BAD_REQUEST, msg.clone(), None),
            AppError::Conflict(ref msg) => (StatusCode::CONFLICT, msg.clone(), None),
            AppError::Internal(ref msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                    None,
                )
            }
        };

        let body = Json(ApiResponse::<()>::error(Some(message), errors));

        (status, body).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
