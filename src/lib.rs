// Library root for the todo REST API

pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod routes;

// Re-export commonly used types
pub use db::{Database, MemoryStore, SharedStore, TodoStore};
pub use error::ApiError;
pub use models::{Todo, TodoRequest, TodoResponse};
pub use routes::create_router;
