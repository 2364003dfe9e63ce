//! HTTP service exposing CRUD and filtered listing over a single `todo` table.
//!
//! # Overview
//! A request flows through validation ([`validate`]), filter resolution
//! ([`filter`]), storage ([`store`]) and the record mapping in [`model`]
//! before it is serialized back to the caller.
//!
//! # Design
//! - One SQLite connection, opened at startup and shared through
//!   [`TodoStore`], is the router state.
//! - Every value reaching SQL is a bound parameter.
//! - Errors are plain-text bodies whose wording is part of the API.

pub mod config;
pub mod error;
pub mod filter;
pub mod model;
pub mod routes;
pub mod store;
pub mod validate;

use std::future::Future;

use axum::{routing::get, Router};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

pub use config::Config;
pub use error::{ServiceError, StoreError};
pub use model::{Category, Priority, Status, Todo};
pub use store::TodoStore;

use routes::{agenda, create_todo, delete_todo, get_todo, list_todos, update_todo};

/// Build the router. Paths answer with and without a trailing slash.
pub fn app(store: TodoStore) -> Router {
    Router::new()
        .route("/todos", get(list_todos).post(create_todo))
        .route("/todos/", get(list_todos).post(create_todo))
        .route("/todos/{id}", get(get_todo).put(update_todo).delete(delete_todo))
        .route("/todos/{id}/", get(get_todo).put(update_todo).delete(delete_todo))
        .route("/agenda", get(agenda))
        .route("/agenda/", get(agenda))
        .layer(TraceLayer::new_for_http())
        .with_state(store)
}

/// Serve until `shutdown` resolves.
pub async fn run(
    listener: TcpListener,
    store: TodoStore,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> Result<(), std::io::Error> {
    axum::serve(listener, app(store))
        .with_graceful_shutdown(shutdown)
        .await
}
