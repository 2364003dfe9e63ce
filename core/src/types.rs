//! DTOs for the todo API.
//!
//! # Design
//! Defined independently from the server crate. Enumerated fields stay
//! strings here: the server owns validation and answers with a 400 message,
//! which the client surfaces as `ApiError::Rejected`. Integration tests catch
//! schema drift between the two crates.

use serde::{Deserialize, Serialize};

/// A todo as returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Todo {
    pub id: i64,
    pub todo: String,
    pub priority: String,
    pub status: String,
    pub category: String,
    /// `yyyy-MM-dd`.
    pub due_date: String,
}

/// Payload for creating a todo. The caller picks the id.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTodo {
    pub id: i64,
    pub todo: String,
    pub priority: String,
    pub status: String,
    pub category: String,
    pub due_date: String,
}

/// Payload for updating a todo. Only the fields present in the JSON are
/// applied; omitted fields keep their stored value.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTodo {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub todo: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
}

/// Query parameters for listing todos. Unset filters are left out of the
/// query string.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TodoFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search_q: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}
