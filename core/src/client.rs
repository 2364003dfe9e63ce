//! Stateless HTTP request builder and response parser for the todo API.
//!
//! # Design
//! `TodoClient` holds only a `base_url`. Each operation is split into a
//! `build_*` method that produces an `HttpRequest` and a `parse_*` method
//! that consumes an `HttpResponse`. The caller executes the round-trip.
//!
//! All paths carry the trailing slash the service documents
//! (`/todos/`, `/todos/{id}/`, `/agenda/`).

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::types::{CreateTodo, Todo, TodoFilter, UpdateTodo};

#[derive(Debug, Clone)]
pub struct TodoClient {
    base_url: String,
}

impl TodoClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn build_list_todos(&self, filter: &TodoFilter) -> Result<HttpRequest, ApiError> {
        let path = self.with_query("todos/", filter)?;
        Ok(HttpRequest::bare(HttpMethod::Get, path))
    }

    pub fn build_get_todo(&self, id: i64) -> HttpRequest {
        HttpRequest::bare(HttpMethod::Get, self.todo_path(id))
    }

    /// Todos due on `date`. The server validates and normalizes the date.
    pub fn build_agenda(&self, date: &str) -> Result<HttpRequest, ApiError> {
        let path = self.with_query("agenda/", &[("date", date)])?;
        Ok(HttpRequest::bare(HttpMethod::Get, path))
    }

    pub fn build_create_todo(&self, input: &CreateTodo) -> Result<HttpRequest, ApiError> {
        let body = to_json(input)?;
        Ok(HttpRequest::json(
            HttpMethod::Post,
            format!("{}/todos/", self.base_url),
            body,
        ))
    }

    pub fn build_update_todo(&self, id: i64, input: &UpdateTodo) -> Result<HttpRequest, ApiError> {
        let body = to_json(input)?;
        Ok(HttpRequest::json(HttpMethod::Put, self.todo_path(id), body))
    }

    pub fn build_delete_todo(&self, id: i64) -> HttpRequest {
        HttpRequest::bare(HttpMethod::Delete, self.todo_path(id))
    }

    pub fn parse_list_todos(&self, response: HttpResponse) -> Result<Vec<Todo>, ApiError> {
        from_json(check_status(response)?)
    }

    pub fn parse_get_todo(&self, response: HttpResponse) -> Result<Todo, ApiError> {
        from_json(check_status(response)?)
    }

    pub fn parse_agenda(&self, response: HttpResponse) -> Result<Vec<Todo>, ApiError> {
        from_json(check_status(response)?)
    }

    /// Returns the confirmation text, e.g. "Todo Successfully Added".
    pub fn parse_create_todo(&self, response: HttpResponse) -> Result<String, ApiError> {
        check_status(response)
    }

    /// Returns the confirmation text naming the updated field, e.g.
    /// "Status Updated".
    pub fn parse_update_todo(&self, response: HttpResponse) -> Result<String, ApiError> {
        check_status(response)
    }

    pub fn parse_delete_todo(&self, response: HttpResponse) -> Result<(), ApiError> {
        check_status(response).map(|_| ())
    }

    fn todo_path(&self, id: i64) -> String {
        format!("{}/todos/{id}/", self.base_url)
    }

    fn with_query<Q: Serialize + ?Sized>(&self, route: &str, query: &Q) -> Result<String, ApiError> {
        let query = serde_urlencoded::to_string(query)
            .map_err(|e| ApiError::SerializationError(e.to_string()))?;
        if query.is_empty() {
            Ok(format!("{}/{route}", self.base_url))
        } else {
            Ok(format!("{}/{route}?{query}", self.base_url))
        }
    }
}

fn to_json<T: Serialize>(value: &T) -> Result<String, ApiError> {
    serde_json::to_string(value).map_err(|e| ApiError::SerializationError(e.to_string()))
}

fn from_json<T: DeserializeOwned>(body: String) -> Result<T, ApiError> {
    serde_json::from_str(&body).map_err(|e| ApiError::DeserializationError(e.to_string()))
}

/// Map a response to its body, or to the matching `ApiError` variant.
fn check_status(response: HttpResponse) -> Result<String, ApiError> {
    match response.status {
        200 => Ok(response.body),
        400 => Err(ApiError::Rejected(response.body)),
        404 => Err(ApiError::NotFound),
        status => Err(ApiError::HttpError {
            status,
            body: response.body,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> TodoClient {
        TodoClient::new("http://localhost:3000")
    }

    const TODO_JSON: &str = r#"{"id":1,"todo":"Learn Rust","priority":"HIGH","status":"TO DO","category":"LEARNING","dueDate":"2024-02-15"}"#;

    #[test]
    fn build_list_todos_without_filters_has_no_query() {
        let req = client().build_list_todos(&TodoFilter::default()).unwrap();
        assert_eq!(req.method, HttpMethod::Get);
        assert_eq!(req.path, "http://localhost:3000/todos/");
        assert!(req.body.is_none());
        assert!(req.headers.is_empty());
    }

    #[test]
    fn build_list_todos_encodes_filters() {
        let filter = TodoFilter {
            search_q: Some("buy & sell".to_string()),
            status: Some("IN PROGRESS".to_string()),
            ..Default::default()
        };
        let req = client().build_list_todos(&filter).unwrap();
        assert_eq!(
            req.path,
            "http://localhost:3000/todos/?search_q=buy+%26+sell&status=IN+PROGRESS"
        );
    }

    #[test]
    fn build_get_and_delete_use_id_path() {
        let req = client().build_get_todo(42);
        assert_eq!(req.method, HttpMethod::Get);
        assert_eq!(req.path, "http://localhost:3000/todos/42/");

        let req = client().build_delete_todo(42);
        assert_eq!(req.method, HttpMethod::Delete);
        assert_eq!(req.path, "http://localhost:3000/todos/42/");
        assert!(req.body.is_none());
    }

    #[test]
    fn build_agenda_puts_date_in_query() {
        let req = client().build_agenda("2024/02/15").unwrap();
        assert_eq!(req.path, "http://localhost:3000/agenda/?date=2024%2F02%2F15");
    }

    #[test]
    fn build_create_todo_sends_camel_case_json() {
        let input = CreateTodo {
            id: 3,
            todo: "Walk dog".to_string(),
            priority: "LOW".to_string(),
            status: "TO DO".to_string(),
            category: "HOME".to_string(),
            due_date: "2024-02-15".to_string(),
        };
        let req = client().build_create_todo(&input).unwrap();
        assert_eq!(req.method, HttpMethod::Post);
        assert_eq!(req.path, "http://localhost:3000/todos/");
        assert_eq!(
            req.headers,
            vec![("content-type".to_string(), "application/json".to_string())]
        );
        let body: serde_json::Value = serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
        assert_eq!(body["dueDate"], "2024-02-15");
        assert!(body.get("due_date").is_none());
    }

    #[test]
    fn build_update_todo_omits_unset_fields() {
        let input = UpdateTodo {
            status: Some("DONE".to_string()),
            ..Default::default()
        };
        let req = client().build_update_todo(5, &input).unwrap();
        assert_eq!(req.method, HttpMethod::Put);
        assert_eq!(req.path, "http://localhost:3000/todos/5/");
        let body: serde_json::Value = serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
        assert_eq!(body, serde_json::json!({"status": "DONE"}));
    }

    #[test]
    fn parse_get_todo_success() {
        let todo = client().parse_get_todo(HttpResponse::new(200, TODO_JSON)).unwrap();
        assert_eq!(todo.id, 1);
        assert_eq!(todo.due_date, "2024-02-15");
    }

    #[test]
    fn parse_list_todos_rejected_carries_message() {
        let err = client()
            .parse_list_todos(HttpResponse::new(400, "Invalid Todo Status"))
            .unwrap_err();
        assert!(matches!(err, ApiError::Rejected(ref m) if m == "Invalid Todo Status"));
    }

    #[test]
    fn parse_get_todo_not_found() {
        let err = client()
            .parse_get_todo(HttpResponse::new(404, "Todo Not Found"))
            .unwrap_err();
        assert!(matches!(err, ApiError::NotFound));
    }

    #[test]
    fn parse_update_todo_returns_message() {
        let message = client()
            .parse_update_todo(HttpResponse::new(200, "Status Updated"))
            .unwrap();
        assert_eq!(message, "Status Updated");
    }

    #[test]
    fn parse_create_todo_server_error() {
        let err = client()
            .parse_create_todo(HttpResponse::new(500, "Internal Server Error"))
            .unwrap_err();
        assert!(matches!(err, ApiError::HttpError { status: 500, .. }));
    }

    #[test]
    fn parse_agenda_bad_json() {
        let err = client()
            .parse_agenda(HttpResponse::new(200, "not json"))
            .unwrap_err();
        assert!(matches!(err, ApiError::DeserializationError(_)));
    }

    #[test]
    fn trailing_slash_is_stripped() {
        let client = TodoClient::new("http://localhost:3000/");
        assert_eq!(client.build_get_todo(1).path, "http://localhost:3000/todos/1/");
    }
}
