use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use gemini_agent::GeminiAgentError;
use mandala_core::error::MandalaError;

// ---------------------------------------------------------------------------
// AppError — unified error type for HTTP responses
// ---------------------------------------------------------------------------

/// Unified error type for HTTP responses.
#[derive(Debug)]
pub struct AppError(pub anyhow::Error);

impl AppError {
    /// Construct a 400 Bad Request error with the given message.
    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self(MandalaError::InvalidOwnerId(msg.into()).into())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = if let Some(e) = self.0.downcast_ref::<MandalaError>() {
            match e {
                MandalaError::NotInitialized => StatusCode::BAD_REQUEST,
                MandalaError::PlanNotFound { .. } => StatusCode::NOT_FOUND,
                MandalaError::InvalidStep(_)
                | MandalaError::InvalidOwnerId(_)
                | MandalaError::InvalidTheme(_)
                | MandalaError::InvalidRole(_) => StatusCode::BAD_REQUEST,
                MandalaError::InvalidField { .. }
                | MandalaError::BatchOutOfOrder(_)
                | MandalaError::IncompleteSummary(_) => StatusCode::UNPROCESSABLE_ENTITY,
                MandalaError::StepLocked { .. }
                | MandalaError::StepGated { .. }
                | MandalaError::VersionConflict { .. } => StatusCode::CONFLICT,
                MandalaError::Io(_) | MandalaError::Yaml(_) | MandalaError::Json(_) => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            }
        } else if let Some(e) = self.0.downcast_ref::<GeminiAgentError>() {
            match e {
                GeminiAgentError::MissingApiKey => StatusCode::SERVICE_UNAVAILABLE,
                _ => StatusCode::BAD_GATEWAY,
            }
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        };

        let body = serde_json::json!({ "error": self.0.to_string() });
        (status, axum::Json(body)).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}
