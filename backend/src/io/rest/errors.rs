//! Translation of domain errors into HTTP responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use log::{error, warn};

use crate::domain::LedgerError;
use shared::ErrorResponse;

/// Message shown for every failure the caller cannot act on
pub const GENERIC_ERROR_MESSAGE: &str = "An error occurred, please try again";

pub fn error_response(operation: &str, err: LedgerError) -> Response {
    let (status, message) = match &err {
        LedgerError::Validation(e) => {
            warn!("{} rejected: {}", operation, e);
            (StatusCode::BAD_REQUEST, e.to_string())
        }
        LedgerError::NotFound { .. } => {
            warn!("{}: {}", operation, err);
            (StatusCode::NOT_FOUND, err.to_string())
        }
        LedgerError::SetupRequired => {
            warn!("{}: {}", operation, err);
            (StatusCode::CONFLICT, err.to_string())
        }
        LedgerError::Transport(_) | LedgerError::CleanupIncomplete { .. } => {
            // The cause goes to the log only
            error!("{} failed: {}", operation, err);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                GENERIC_ERROR_MESSAGE.to_string(),
            )
        }
    };

    (status, Json(ErrorResponse { error: message })).into_response()
}
