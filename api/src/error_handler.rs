//! Public application error type and its HTTP mapping.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use qa_engine::QaError;
use serde::Serialize;
use thiserror::Error;

use crate::core::app_state::ConfigError;

/// Public application error type.
#[derive(Debug, Error)]
pub enum AppError {
    // --- Boot / config ---
    #[error(transparent)]
    Config(#[from] ConfigError),

    // --- IO / network / server ---
    #[error("failed to bind listener")]
    Bind(#[source] std::io::Error),

    #[error("server error")]
    Server(#[source] std::io::Error),

    // --- Request handling ---
    #[error(transparent)]
    Qa(#[from] QaError),
}

impl AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            // startup-only
            AppError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Bind(_) | AppError::Server(_) => StatusCode::INTERNAL_SERVER_ERROR,

            AppError::Qa(QaError::EmptyQuestion) => StatusCode::BAD_REQUEST,
            // A legitimate terminal outcome, surfaced as "not found".
            AppError::Qa(QaError::NoContext) => StatusCode::NOT_FOUND,
            AppError::Qa(QaError::Upstream { .. }) => StatusCode::BAD_GATEWAY,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            AppError::Config(_) => "CONFIG_ERROR",
            AppError::Bind(_) => "BIND_ERROR",
            AppError::Server(_) => "SERVER_ERROR",
            AppError::Qa(QaError::EmptyQuestion) => "EMPTY_QUESTION",
            AppError::Qa(QaError::NoContext) => "NO_RELEVANT_CONTEXT",
            AppError::Qa(QaError::Upstream { .. }) => "UPSTREAM_ERROR",
        }
    }
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = ErrorBody {
            error: self.error_code(),
            message: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

/// Handy result alias used across handlers.
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn qa_outcomes_map_to_distinct_statuses() {
        assert_eq!(
            AppError::Qa(QaError::EmptyQuestion).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::Qa(QaError::NoContext).status_code(),
            StatusCode::NOT_FOUND
        );
        let upstream = AppError::Qa(QaError::upstream(
            qa_engine::QueryStage::Generate,
            std::io::Error::other("down"),
        ));
        assert_eq!(upstream.status_code(), StatusCode::BAD_GATEWAY);
        assert_eq!(upstream.error_code(), "UPSTREAM_ERROR");
    }
}
