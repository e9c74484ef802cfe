use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Authentication required")]
    Unauthenticated,

    #[error("Project not found")]
    ProjectNotFound,

    #[error("Scenario not found")]
    ScenarioNotFound,

    #[error("Test case not found")]
    TestCaseNotFound,

    #[error("{message}")]
    Validation {
        message: String,
        required: Vec<&'static str>,
    },

    #[error("Test results not available")]
    ResultsNotAvailable,

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn validation(message: impl Into<String>) -> Self {
        AppError::Validation {
            message: message.into(),
            required: Vec::new(),
        }
    }

    pub fn missing_fields(required: Vec<&'static str>) -> Self {
        AppError::Validation {
            message: "Missing required fields".to_string(),
            required,
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Unauthenticated => StatusCode::UNAUTHORIZED,
            AppError::ProjectNotFound
            | AppError::ScenarioNotFound
            | AppError::TestCaseNotFound => StatusCode::NOT_FOUND,
            AppError::Validation { .. } | AppError::ResultsNotAvailable => StatusCode::BAD_REQUEST,
            AppError::Io(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        tracing::warn!(status = %rejection.status(), "rejected request body: {}", rejection.body_text());
        AppError::validation(rejection.body_text())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let body = match &self {
            AppError::Validation { message, required } if !required.is_empty() => {
                json!({ "error": message, "required": required })
            }
            AppError::Io(e) => {
                tracing::error!("I/O error: {}", e);
                json!({ "error": "internal server error" })
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {:#}", e);
                json!({ "error": "internal server error" })
            }
            other => json!({ "error": other.to_string() }),
        };

        (status, Json(body)).into_response()
    }
}
