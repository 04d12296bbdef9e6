use axum::{
    routing::{get, MethodRouter},
    Router,
};

use crate::{
    db::SharedStore,
    handlers::{
        health_check, hello_world, method_not_allowed, route_not_found,
        todos::{create_todo, delete_todo, get_todo, list_todos, update_todo},
    },
};

/// Create the Axum router with all `/api` endpoints.
///
/// Each path is registered with and without a trailing slash. Middleware is
/// layered on by the caller.
pub fn create_router(store: SharedStore) -> Router {
    Router::new()
        // Health check and greeting endpoints
        .route("/api", status_routes())
        .route("/api/", status_routes())
        .route("/api/helloworld", greeting_routes())
        .route("/api/helloworld/", greeting_routes())
        // Todo management endpoints
        .route("/api/todos", collection_routes())
        .route("/api/todos/", collection_routes())
        .route("/api/todos/:id", item_routes())
        .route("/api/todos/:id/", item_routes())
        .fallback(route_not_found)
        // Add shared state (todo store)
        .with_state(store)
}

// Unsupported methods answer 405 with a JSON body instead of axum's empty one.

fn status_routes() -> MethodRouter<SharedStore> {
    get(health_check).fallback(method_not_allowed)
}

fn greeting_routes() -> MethodRouter<SharedStore> {
    get(hello_world).fallback(method_not_allowed)
}

fn collection_routes() -> MethodRouter<SharedStore> {
    get(list_todos)
        .post(create_todo)
        .fallback(method_not_allowed)
}

fn item_routes() -> MethodRouter<SharedStore> {
    get(get_todo)
        .put(update_todo)
        .delete(delete_todo)
        .fallback(method_not_allowed)
}
