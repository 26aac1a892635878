use sqlx::SqlitePool;

use crate::routes::tasks::TaskRepository;

#[derive(Clone)]
pub struct AppState {
    pub tasks: TaskRepository,
}

impl AppState {
    pub fn new(pool: SqlitePool) -> Self {
        Self { tasks: TaskRepository::new(pool) }
    }
}
