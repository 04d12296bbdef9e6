use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use tracing::info;

use super::TodoStore;
use crate::error::{ApiError, ApiResult};
use crate::models::todo::Todo;

/// In-process todo store. Ids come from a counter that never rewinds, so a
/// deleted id is not handed out again.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: RwLock<MemoryState>,
}

#[derive(Debug, Default)]
struct MemoryState {
    last_id: i64,
    todos: BTreeMap<i64, Todo>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TodoStore for MemoryStore {
    async fn list_todos(&self) -> ApiResult<Vec<Todo>> {
        let state = self.inner.read().await;
        Ok(state.todos.values().cloned().collect())
    }

    async fn create_todo(&self, title: &str) -> ApiResult<Todo> {
        let mut state = self.inner.write().await;
        state.last_id += 1;

        let todo = Todo {
            id: state.last_id,
            title: title.to_string(),
            created_at: Utc::now(),
        };
        state.todos.insert(todo.id, todo.clone());

        info!("Created todo with id: {}", todo.id);
        Ok(todo)
    }

    async fn get_todo(&self, id: i64) -> ApiResult<Todo> {
        let state = self.inner.read().await;
        state
            .todos
            .get(&id)
            .cloned()
            .ok_or_else(|| ApiError::todo_not_found(id))
    }

    async fn update_todo(&self, id: i64, title: &str) -> ApiResult<Todo> {
        let mut state = self.inner.write().await;
        let todo = state
            .todos
            .get_mut(&id)
            .ok_or_else(|| ApiError::todo_not_found(id))?;
        todo.title = title.to_string();

        info!("Updated todo with id: {}", id);
        Ok(todo.clone())
    }

    async fn delete_todo(&self, id: i64) -> ApiResult<()> {
        let mut state = self.inner.write().await;
        state
            .todos
            .remove(&id)
            .map(|_| info!("Deleted todo with id: {}", id))
            .ok_or_else(|| ApiError::todo_not_found(id))
    }

    async fn health_check(&self) -> ApiResult<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio_test::{assert_err, assert_ok};

    #[tokio::test]
    async fn test_create_assigns_increasing_ids() {
        let store = MemoryStore::new();

        let first = store.create_todo("First").await.unwrap();
        let second = store.create_todo("Second").await.unwrap();

        assert_eq!(first.id, 1);
        assert_eq!(second.id, 2);
        assert!(second.created_at >= first.created_at);
    }

    #[tokio::test]
    async fn test_list_preserves_insertion_order() {
        let store = MemoryStore::new();
        assert!(store.list_todos().await.unwrap().is_empty());

        for title in ["First", "Second", "Third"] {
            assert_ok!(store.create_todo(title).await);
        }

        let titles: Vec<String> = store
            .list_todos()
            .await
            .unwrap()
            .into_iter()
            .map(|todo| todo.title)
            .collect();
        assert_eq!(titles, ["First", "Second", "Third"]);
    }

    #[tokio::test]
    async fn test_update_keeps_id_and_created_at() {
        let store = MemoryStore::new();
        let created = store.create_todo("Before Update").await.unwrap();

        let updated = store.update_todo(created.id, "After Update").await.unwrap();

        assert_eq!(updated.id, created.id);
        assert_eq!(updated.created_at, created.created_at);
        assert_eq!(store.get_todo(created.id).await.unwrap().title, "After Update");
    }

    #[tokio::test]
    async fn test_missing_ids_are_not_found() {
        let store = MemoryStore::new();

        for result in [
            store.get_todo(99999).await.map(|_| ()),
            store.update_todo(99999, "Updated").await.map(|_| ()),
            store.delete_todo(99999).await,
        ] {
            match result {
                Err(ApiError::NotFound(resource)) => assert_eq!(resource, "Todo 99999"),
                other => panic!("expected not found, got {:?}", other),
            }
        }
    }

    #[tokio::test]
    async fn test_deleted_ids_are_not_reused() {
        let store = MemoryStore::new();
        let first = store.create_todo("Delete Me").await.unwrap();

        assert_ok!(store.delete_todo(first.id).await);
        assert_err!(store.delete_todo(first.id).await);
        assert_err!(store.get_todo(first.id).await);

        let second = store.create_todo("Fresh").await.unwrap();
        assert!(second.id > first.id);
    }
}
