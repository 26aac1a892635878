use std::cmp::{Ordering, Reverse};

use super::api::{ClientError, Task, TaskBackend, TaskDraft};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortBy {
    /// HIGH first.
    #[default]
    Priority,
    /// Title, ascending.
    Name,
    /// Newest first.
    Created,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaskFilters {
    pub sort_by: SortBy,
    pub show_completed: bool,
}

impl Default for TaskFilters {
    fn default() -> Self {
        Self { sort_by: SortBy::Priority, show_completed: true }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TaskStats {
    pub total: usize,
    pub completed: usize,
}

/// Client-side cache of the task list.
///
/// Mutations never patch the cache locally: each successful call is followed
/// by a full re-fetch, so the cache always mirrors what the server returned
/// last. A failed call records its message in [`TaskStore::error`] and leaves
/// the cache as it was.
pub struct TaskStore<B> {
    backend: B,
    tasks: Vec<Task>,
    filters: TaskFilters,
    loading: bool,
    error: Option<String>,
}

impl<B: TaskBackend> TaskStore<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            tasks: Vec::new(),
            filters: TaskFilters::default(),
            loading: false,
            error: None,
        }
    }

    /// Raw cache, in server order.
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn filters(&self) -> TaskFilters {
        self.filters
    }

    pub fn set_filters(&mut self, filters: TaskFilters) {
        self.filters = filters;
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub async fn fetch_all(&mut self) -> Result<(), ClientError> {
        self.loading = true;
        let result = self.backend.list().await;
        let tasks = self.settle(result)?;
        tracing::debug!(count = tasks.len(), "task cache refreshed");
        self.tasks = tasks;
        Ok(())
    }

    /// Manual retry; re-issues the list call.
    pub async fn refresh(&mut self) -> Result<(), ClientError> {
        self.fetch_all().await
    }

    pub async fn add_task(&mut self, draft: TaskDraft) -> Result<(), ClientError> {
        self.loading = true;
        let result = self.backend.create(&draft).await;
        self.settle(result)?;
        self.fetch_all().await
    }

    /// Flips the completion flag of a cached task. Ids not in the cache are
    /// ignored.
    pub async fn toggle_task(&mut self, id: &str) -> Result<(), ClientError> {
        let Some(completed) = self.tasks.iter().find(|t| t.id == id).map(|t| t.completed) else {
            return Ok(());
        };

        self.loading = true;
        let result = self.backend.set_completed(id, !completed).await;
        self.settle(result)?;
        self.fetch_all().await
    }

    pub async fn delete_task(&mut self, id: &str) -> Result<(), ClientError> {
        self.loading = true;
        let result = self.backend.delete(id).await;
        self.settle(result)?;
        self.fetch_all().await
    }

    /// The cache filtered by `show_completed` and sorted by `sort_by`.
    pub fn visible_tasks(&self) -> Vec<&Task> {
        let mut visible: Vec<&Task> = self
            .tasks
            .iter()
            .filter(|t| self.filters.show_completed || !t.completed)
            .collect();

        match self.filters.sort_by {
            SortBy::Priority => visible.sort_by_key(|t| Reverse(t.priority.weight())),
            SortBy::Name => visible.sort_by(|a, b| compare_titles(&a.title, &b.title)),
            SortBy::Created => visible.sort_by_key(|t| Reverse(t.created_at)),
        }

        visible
    }

    /// Counts over the whole cache, independent of the filters.
    pub fn stats(&self) -> TaskStats {
        TaskStats {
            total: self.tasks.len(),
            completed: self.tasks.iter().filter(|t| t.completed).count(),
        }
    }

    fn settle<T>(&mut self, result: Result<T, ClientError>) -> Result<T, ClientError> {
        self.loading = false;
        match result {
            Ok(value) => {
                self.error = None;
                Ok(value)
            }
            Err(e) => {
                tracing::warn!(error = %e, "task request failed");
                self.error = Some(e.to_string());
                Err(e)
            }
        }
    }
}

/// Orders titles ignoring case; titles equal up to case fall back to byte order.
fn compare_titles(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}
