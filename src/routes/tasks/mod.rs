pub mod dto;
pub mod model;
pub mod queries;
pub mod routes;

pub use model::TaskResponse;
pub use queries::TaskRepository;
