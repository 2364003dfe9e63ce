//! HTTP handlers for `/todos/` and `/agenda/`.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;

use crate::error::ServiceError;
use crate::filter::{resolve, FilterRejection, ListQuery, Resolution};
use crate::model::{CreateTodo, Todo, UpdateTodo};
use crate::store::TodoStore;
use crate::validate::{parse_due_date, validate_changes, validate_new_todo};

#[derive(Debug, Deserialize)]
pub struct AgendaQuery {
    pub date: Option<String>,
}

pub async fn list_todos(
    State(store): State<TodoStore>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<Todo>>, ServiceError> {
    let predicate = match resolve(&query) {
        Resolution::Matched(predicate) => predicate,
        Resolution::Rejected(FilterRejection::Invalid(error)) => {
            tracing::debug!(%error, "rejected list filter");
            return Err(error);
        }
        Resolution::Rejected(FilterRejection::NoMatch) => return Ok(Json(Vec::new())),
    };
    Ok(Json(store.list(&predicate).await?))
}

pub async fn get_todo(
    State(store): State<TodoStore>,
    Path(id): Path<i64>,
) -> Result<Json<Todo>, ServiceError> {
    store.get(id).await?.map(Json).ok_or(ServiceError::NotFound)
}

pub async fn agenda(
    State(store): State<TodoStore>,
    Query(query): Query<AgendaQuery>,
) -> Result<Json<Vec<Todo>>, ServiceError> {
    let date = query
        .date
        .as_deref()
        .and_then(parse_due_date)
        .ok_or(ServiceError::InvalidDueDate)?;
    Ok(Json(store.list_by_due_date(date).await?))
}

pub async fn create_todo(
    State(store): State<TodoStore>,
    Json(input): Json<CreateTodo>,
) -> Result<&'static str, ServiceError> {
    let todo = validate_new_todo(input)?;
    let id = todo.id;
    store.insert(todo).await?;
    tracing::info!(id, "todo added");
    Ok("Todo Successfully Added")
}

pub async fn update_todo(
    State(store): State<TodoStore>,
    Path(id): Path<i64>,
    Json(input): Json<UpdateTodo>,
) -> Result<String, ServiceError> {
    let (field, changes) = validate_changes(input)?;
    store.update(id, changes).await?.ok_or(ServiceError::NotFound)?;
    tracing::info!(id, field = field.api_name(), "todo updated");
    Ok(format!("{} Updated", field.label()))
}

pub async fn delete_todo(
    State(store): State<TodoStore>,
    Path(id): Path<i64>,
) -> Result<&'static str, ServiceError> {
    store.delete(id).await?;
    Ok("Todo Deleted")
}
