//! Unrecoverable request failures.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use clinic_records_core::db::DbError;
use clinic_records_core::service::RecordError;
use thiserror::Error;

/// Failures that end the request with a generic 500 page. The detail is
/// logged, never sent to the client.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Storage failure: {0}")]
    Storage(#[from] DbError),

    #[error("Record operation failed: {0}")]
    Record(#[from] RecordError),

    #[error("Blocking task failed: {0}")]
    Join(#[from] tokio::task::JoinError),

    #[error("Status message encoding failed: {0}")]
    Flash(#[from] serde_json::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        tracing::error!(error = %self, "request failed");
        (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response()
    }
}
