use axum::{
    body::Bytes,
    extract::{Path, State},
    http::Uri,
    Json,
};
use serde::de::DeserializeOwned;

use super::dto::{CreateTask, UpdateTask};
use super::model::TaskResponse;
use crate::envelope::Envelope;
use crate::error::ApiError;
use crate::state::AppState;

type ApiResult<T> = Result<Json<Envelope<T>>, ApiError>;

/// Reads a JSON body; an empty body counts as an empty object.
fn parse_body<T: DeserializeOwned + Default>(body: &Bytes) -> Result<T, ApiError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(T::default());
    }
    serde_json::from_slice(body).map_err(|e| ApiError::validation(format!("Invalid JSON body: {e}")))
}

/// Ids are all digits; anything else is an unknown endpoint.
pub(crate) fn parse_task_id(raw: &str, uri: &Uri) -> Result<i64, ApiError> {
    let not_found = || ApiError::RouteNotFound { path: uri.path().to_string() };
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return Err(not_found());
    }
    raw.parse().map_err(|_| not_found())
}

pub async fn list(State(state): State<AppState>) -> ApiResult<Vec<TaskResponse>> {
    let tasks = state.tasks.list().await?;
    Ok(Json(Envelope::data(tasks.into_iter().map(TaskResponse::from).collect())))
}

pub async fn create(State(state): State<AppState>, body: Bytes) -> ApiResult<TaskResponse> {
    let new_task = parse_body::<CreateTask>(&body)?.validate()?;
    let task = state.tasks.create(&new_task).await?;
    tracing::info!(id = task.id, priority = %task.priority, "task created");
    Ok(Json(Envelope::data(task.into())))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    uri: Uri,
    body: Bytes,
) -> ApiResult<TaskResponse> {
    let id = parse_task_id(&id, &uri)?;
    state.tasks.get(id).await?;
    let completed = parse_body::<UpdateTask>(&body)?
        .completed
        .ok_or_else(|| ApiError::validation("Completed flag is required"))?;

    let task = state.tasks.set_completed(id, completed).await?;
    tracing::info!(id, completed, "task updated");
    Ok(Json(Envelope::data(task.into())))
}

pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
    uri: Uri,
) -> ApiResult<()> {
    let id = parse_task_id(&id, &uri)?;
    state.tasks.delete(id).await?;
    tracing::info!(id, "task deleted");
    Ok(Json(Envelope::message("Task deleted successfully")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_body_is_empty_request() {
        let parsed: UpdateTask = parse_body(&Bytes::from_static(b"  ")).unwrap();
        assert!(parsed.completed.is_none());
    }

    #[test]
    fn malformed_body_is_validation_error() {
        let err = parse_body::<CreateTask>(&Bytes::from_static(b"{not json")).unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));
    }

    #[test]
    fn non_numeric_ids_are_unknown_endpoints() {
        let uri: Uri = "/tasks/abc".parse().unwrap();
        let err = parse_task_id("abc", &uri).unwrap_err();
        assert_eq!(err.to_string(), "Endpoint not found: /tasks/abc");
        assert_eq!(parse_task_id("42", &uri).unwrap(), 42);
    }
}
