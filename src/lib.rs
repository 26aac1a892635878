pub mod client;
pub mod config;
pub mod db;
pub mod envelope;
pub mod error;
pub mod priority;
pub mod routes;
pub mod state;

pub use envelope::Envelope;
pub use error::ApiError;
pub use priority::Priority;
pub use routes::app;
pub use state::AppState;
