use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, Utc};
use reqwest::{Client, RequestBuilder};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use thiserror::Error;

use crate::envelope::Envelope;
use crate::priority::Priority;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Failed to parse response: {0}")]
    Decode(String),

    /// The server answered with `success: false`; holds its message as-is.
    #[error("{0}")]
    Api(String),
}

/// A task as the client keeps it, with parsed timestamps.
#[derive(Debug, Clone, PartialEq)]
pub struct Task {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub priority: Priority,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

/// A task as it arrives over the wire.
#[derive(Debug, Clone, Deserialize)]
pub struct WireTask {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub priority: Priority,
    pub completed: bool,
    pub created_at: String,
    #[serde(default)]
    pub completed_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TaskDraft {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub priority: Priority,
}

impl TaskDraft {
    pub fn new(title: impl Into<String>, priority: Priority) -> Self {
        Self { title: title.into(), description: None, priority }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Accepts RFC 3339 or SQLite's `YYYY-MM-DD HH:MM:SS`, the latter as UTC.
pub fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, ClientError> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Ok(ts.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f")
        .map(|naive| naive.and_utc())
        .map_err(|e| ClientError::Decode(format!("invalid timestamp `{raw}`: {e}")))
}

impl TryFrom<WireTask> for Task {
    type Error = ClientError;

    fn try_from(wire: WireTask) -> Result<Self, Self::Error> {
        Ok(Self {
            created_at: parse_timestamp(&wire.created_at)?,
            completed_at: wire.completed_at.as_deref().map(parse_timestamp).transpose()?,
            id: wire.id,
            title: wire.title,
            description: wire.description,
            priority: wire.priority,
            completed: wire.completed,
        })
    }
}

/// The remote operations the task store depends on.
#[async_trait]
pub trait TaskBackend: Send + Sync {
    async fn list(&self) -> Result<Vec<Task>, ClientError>;
    async fn create(&self, draft: &TaskDraft) -> Result<Task, ClientError>;
    async fn set_completed(&self, id: &str, completed: bool) -> Result<Task, ClientError>;
    async fn delete(&self, id: &str) -> Result<(), ClientError>;
}

/// HTTP client for the task API.
#[derive(Debug, Clone)]
pub struct TaskApi {
    client: Client,
    base_url: String,
}

impl TaskApi {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Sends the request and unwraps the envelope. Error statuses still
    /// carry an envelope, so the body is read regardless of status.
    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<Envelope<T>, ClientError> {
        let response = request.send().await?;
        let bytes = response.bytes().await?;
        let envelope: Envelope<T> =
            serde_json::from_slice(&bytes).map_err(|e| ClientError::Decode(e.to_string()))?;

        if !envelope.success {
            let message = envelope.error.unwrap_or_else(|| "Request failed".to_string());
            return Err(ClientError::Api(message));
        }

        Ok(envelope)
    }

    async fn send_task(&self, request: RequestBuilder) -> Result<Task, ClientError> {
        self.send::<WireTask>(request)
            .await?
            .data
            .ok_or_else(|| ClientError::Decode("missing task in response".to_string()))?
            .try_into()
    }
}

#[async_trait]
impl TaskBackend for TaskApi {
    async fn list(&self) -> Result<Vec<Task>, ClientError> {
        let envelope = self.send::<Vec<WireTask>>(self.client.get(self.url("/tasks"))).await?;
        envelope
            .data
            .unwrap_or_default()
            .into_iter()
            .map(Task::try_from)
            .collect()
    }

    async fn create(&self, draft: &TaskDraft) -> Result<Task, ClientError> {
        self.send_task(self.client.post(self.url("/tasks")).json(draft)).await
    }

    async fn set_completed(&self, id: &str, completed: bool) -> Result<Task, ClientError> {
        let request = self
            .client
            .put(self.url(&format!("/tasks/{id}")))
            .json(&serde_json::json!({ "completed": completed }));
        self.send_task(request).await
    }

    async fn delete(&self, id: &str) -> Result<(), ClientError> {
        self.send::<serde_json::Value>(self.client.delete(self.url(&format!("/tasks/{id}"))))
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn parses_rfc3339_and_sqlite_timestamps() {
        let expected = Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap();
        assert_eq!(parse_timestamp("2024-01-02T03:04:05Z").unwrap(), expected);
        assert_eq!(parse_timestamp("2024-01-02T05:04:05+02:00").unwrap(), expected);
        assert_eq!(parse_timestamp("2024-01-02 03:04:05").unwrap(), expected);
        assert!(matches!(parse_timestamp("yesterday"), Err(ClientError::Decode(_))));
    }

    #[test]
    fn wire_task_maps_to_parsed_task() {
        let wire: WireTask = serde_json::from_value(serde_json::json!({
            "id": "7",
            "title": "Buy milk",
            "description": null,
            "priority": "LOW",
            "completed": true,
            "created_at": "2024-01-01 00:00:00",
            "completed_at": "2024-01-02T00:00:00Z"
        }))
        .unwrap();

        let task = Task::try_from(wire).unwrap();
        assert_eq!(task.id, "7");
        assert_eq!(task.priority, Priority::Low);
        assert_eq!(task.created_at, Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap());
        assert_eq!(task.completed_at, Some(Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap()));
    }

    #[test]
    fn draft_omits_missing_description() {
        let body = serde_json::to_value(TaskDraft::new("Buy milk", Priority::High)).unwrap();
        assert_eq!(body, serde_json::json!({"title": "Buy milk", "priority": "HIGH"}));
    }

    #[test]
    fn base_url_trailing_slash_is_dropped() {
        let api = TaskApi::new("http://localhost:8000/");
        assert_eq!(api.url("/tasks"), "http://localhost:8000/tasks");
    }
}
