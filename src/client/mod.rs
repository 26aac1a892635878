//! Client side of the task API: an HTTP backend and a store that caches the
//! task list and derives the filtered, sorted view and completion stats.

pub mod api;
pub mod store;

pub use api::{ClientError, Task, TaskApi, TaskBackend, TaskDraft};
pub use store::{SortBy, TaskFilters, TaskStats, TaskStore};
