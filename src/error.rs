use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::envelope::Envelope;

pub const AVAILABLE_ENDPOINTS: [&str; 4] = [
    "GET /tasks - Get all tasks",
    "POST /tasks - Create new task",
    "PUT /tasks/{id} - Update task",
    "DELETE /tasks/{id} - Delete task",
];

#[derive(Debug, Error)]
pub enum ApiError {
    /// Bad or missing input. The message goes back to the caller verbatim.
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    NotFound(String),

    #[error("Endpoint not found: {path}")]
    RouteNotFound { path: String },

    #[error("{0}")]
    MethodNotAllowed(&'static str),

    #[error("{context}: {source}")]
    Storage {
        context: &'static str,
        #[source]
        source: sqlx::Error,
    },
}

impl ApiError {
    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::Validation(message.into())
    }

    pub fn task_not_found() -> Self {
        ApiError::NotFound("Task not found".to_string())
    }

    pub fn storage(context: &'static str) -> impl FnOnce(sqlx::Error) -> Self {
        move |source| ApiError::Storage { context, source }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::NotFound(_) | ApiError::RouteNotFound { .. } => StatusCode::NOT_FOUND,
            _ => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match &self {
            ApiError::Storage { .. } => tracing::error!(error = %self, "storage failure"),
            _ => tracing::debug!(error = %self, "request rejected"),
        }

        let status = self.status();
        let mut body = Envelope::<()>::failure(self.to_string());
        if matches!(self, ApiError::RouteNotFound { .. }) {
            body.available_endpoints =
                Some(AVAILABLE_ENDPOINTS.iter().map(|e| e.to_string()).collect());
        }

        (status, Json(body)).into_response()
    }
}
