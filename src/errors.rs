use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Failures of the plan-generation pipeline, from the upstream call
/// through JSON extraction and shape validation.
#[derive(Error, Debug)]
pub enum GenerationError {
    #[error("no JSON object found in model response")]
    NoJsonFound,
    #[error("failed to parse generated plan: {0}")]
    ParseFailure(#[from] serde_json::Error),
    #[error("generated plan has an invalid shape: {0}")]
    InvalidShape(String),
    #[error("upstream completion request failed: {0}")]
    UpstreamFailure(String),
    #[error("upstream completion response was empty")]
    EmptyResponse,
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),
    #[error(transparent)]
    Generation(#[from] GenerationError),
    #[error("persistence failure during {operation}")]
    Persistence {
        operation: &'static str,
        #[source]
        source: sqlx::Error,
    },
    #[error("{0}")]
    Precondition(String),
    #[error("{0}")]
    NotFound(String),
}

impl AppError {
    pub fn persistence(operation: &'static str, source: sqlx::Error) -> Self {
        AppError::Persistence { operation, source }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::Validation(message) => (StatusCode::BAD_REQUEST, message.clone()),
            AppError::NotFound(message) => (StatusCode::NOT_FOUND, message.clone()),
            AppError::Precondition(message) => {
                tracing::warn!("Precondition failed: {message}");
                (
                    StatusCode::UNAUTHORIZED,
                    "Authentication required".to_string(),
                )
            }
            AppError::Generation(err) => {
                tracing::error!("Workout generation failed: {err}");
                let message = match err {
                    GenerationError::NoJsonFound
                    | GenerationError::ParseFailure(_)
                    | GenerationError::InvalidShape(_) => "Failed to parse workout plan",
                    GenerationError::UpstreamFailure(_) | GenerationError::EmptyResponse => {
                        "Failed to generate workout plan"
                    }
                };
                (StatusCode::INTERNAL_SERVER_ERROR, message.to_string())
            }
            AppError::Persistence { operation, source } => {
                tracing::error!("Persistence failure during {operation}: {source}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Something went wrong, please try again".to_string(),
                )
            }
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_error_keeps_its_message() {
        let response = AppError::Validation("Prompt is required".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn generation_errors_map_to_internal_server_error() {
        let response = AppError::Generation(GenerationError::NoJsonFound).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let response =
            AppError::Generation(GenerationError::UpstreamFailure("503".to_string())).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
