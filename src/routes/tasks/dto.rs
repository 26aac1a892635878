use serde::Deserialize;

use crate::error::ApiError;
use crate::priority::Priority;

#[derive(Debug, Default, Deserialize)]
pub struct CreateTask {
    pub title: Option<String>,
    pub description: Option<String>,
    pub priority: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateTask {
    pub completed: Option<bool>,
}

/// A create request that passed validation.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTask {
    pub title: String,
    pub description: Option<String>,
    pub priority: Priority,
}

impl CreateTask {
    pub fn validate(self) -> Result<NewTask, ApiError> {
        let title = self
            .title
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty());
        let priority = self.priority.filter(|p| !p.is_empty());

        let (title, priority) = match (title, priority) {
            (Some(title), Some(priority)) => (title, priority),
            (None, None) => return Err(ApiError::validation("Title and priority are required")),
            (None, Some(_)) => return Err(ApiError::validation("Title is required")),
            (Some(_), None) => return Err(ApiError::validation("Priority is required")),
        };

        let priority: Priority = priority
            .parse()
            .map_err(|e: crate::priority::InvalidPriority| ApiError::validation(e.to_string()))?;

        let description = self
            .description
            .map(|d| d.trim().to_string())
            .filter(|d| !d.is_empty());

        Ok(NewTask { title, description, priority })
    }
}
