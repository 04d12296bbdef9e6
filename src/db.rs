// Storage layer
// Handlers only see the `TodoStore` trait; the backend is chosen at startup.

mod memory;
mod postgres;

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::ApiResult;
use crate::models::todo::Todo;

pub use memory::MemoryStore;
pub use postgres::Database;

/// Persistence operations behind the todo endpoints.
///
/// Every lookup by id reports a missing row as `ApiError::NotFound` naming
/// the todo, so handlers can propagate it with `?`.
#[async_trait]
pub trait TodoStore: Send + Sync {
    /// All todos in insertion (id) order.
    async fn list_todos(&self) -> ApiResult<Vec<Todo>>;

    /// Insert a todo with a fresh id and the current timestamp.
    async fn create_todo(&self, title: &str) -> ApiResult<Todo>;

    async fn get_todo(&self, id: i64) -> ApiResult<Todo>;

    /// Replace the title. Id and `created_at` are left untouched.
    async fn update_todo(&self, id: i64, title: &str) -> ApiResult<Todo>;

    async fn delete_todo(&self, id: i64) -> ApiResult<()>;

    async fn health_check(&self) -> ApiResult<()>;
}

/// Router state shared by every handler.
pub type SharedStore = Arc<dyn TodoStore>;
