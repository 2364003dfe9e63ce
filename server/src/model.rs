//! Todo record, its enumerated fields, and the mapping between storage names
//! and API names.
//!
//! # Design
//! The table uses snake_case column names (`due_date`) while the JSON surface
//! uses camelCase (`dueDate`). `TodoRow` is the storage-shaped record read
//! from and written to SQLite; `Todo` is the external shape. `Field` names
//! every column once so the filter and the executor never spell column names
//! by hand.
//!
//! Request payloads (`CreateTodo`, `UpdateTodo`) keep enum-typed fields as
//! plain strings: the validator has to report which field was wrong, in a
//! fixed order, rather than letting deserialization fail on the first one.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use rusqlite::Row;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A string did not match any value of an enumerated field.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("`{value}` is not a valid {field}")]
pub struct ParseEnumError {
    pub field: &'static str,
    pub value: String,
}

/// Declares a closed enumeration whose wire spelling is shared by serde,
/// `FromStr`/`Display`, and SQLite.
macro_rules! wire_enum {
    ($(#[$meta:meta])* $name:ident, $field:literal { $($variant:ident => $text:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(
                #[serde(rename = $text)]
                $variant,
            )+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(self) -> &'static str {
                match self {
                    $($name::$variant => $text,)+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = ParseEnumError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($text => Ok($name::$variant),)+
                    other => Err(ParseEnumError {
                        field: $field,
                        value: other.to_string(),
                    }),
                }
            }
        }

        impl ToSql for $name {
            fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
                Ok(ToSqlOutput::from(self.as_str()))
            }
        }

        impl FromSql for $name {
            fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
                value
                    .as_str()?
                    .parse()
                    .map_err(|e: ParseEnumError| FromSqlError::Other(Box::new(e)))
            }
        }
    };
}

wire_enum!(
    /// How urgent a todo is.
    Priority, "priority" {
        High => "HIGH",
        Medium => "MEDIUM",
        Low => "LOW",
    }
);

wire_enum!(
    /// Progress of a todo.
    Status, "status" {
        ToDo => "TO DO",
        InProgress => "IN PROGRESS",
        Done => "DONE",
    }
);

wire_enum!(
    /// Area of life a todo belongs to.
    Category, "category" {
        Work => "WORK",
        Home => "HOME",
        Learning => "LEARNING",
    }
);

/// One column of the `todo` table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Id,
    Todo,
    Priority,
    Status,
    Category,
    DueDate,
}

impl Field {
    pub const ALL: [Field; 6] = [
        Field::Id,
        Field::Todo,
        Field::Priority,
        Field::Status,
        Field::Category,
        Field::DueDate,
    ];

    /// Column name in the `todo` table.
    pub fn column(self) -> &'static str {
        match self {
            Field::Id => "id",
            Field::Todo => "todo",
            Field::Priority => "priority",
            Field::Status => "status",
            Field::Category => "category",
            Field::DueDate => "due_date",
        }
    }

    /// Key used in JSON bodies.
    pub fn api_name(self) -> &'static str {
        match self {
            Field::DueDate => "dueDate",
            other => other.column(),
        }
    }

    /// Human-readable name used in update confirmations.
    pub fn label(self) -> &'static str {
        match self {
            Field::Id => "Id",
            Field::Todo => "Todo",
            Field::Priority => "Priority",
            Field::Status => "Status",
            Field::Category => "Category",
            Field::DueDate => "Due Date",
        }
    }

    pub fn from_column(name: &str) -> Option<Field> {
        Field::ALL.into_iter().find(|f| f.column() == name)
    }

    pub fn from_api_name(name: &str) -> Option<Field> {
        Field::ALL.into_iter().find(|f| f.api_name() == name)
    }
}

/// The columns restricted to a closed set of values. These are also the
/// list filters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EnumField {
    Status,
    Priority,
    Category,
}

impl EnumField {
    /// Order in which supplied list filters are validated.
    pub const ALL: [EnumField; 3] = [EnumField::Status, EnumField::Priority, EnumField::Category];

    pub fn field(self) -> Field {
        match self {
            EnumField::Status => Field::Status,
            EnumField::Priority => Field::Priority,
            EnumField::Category => Field::Category,
        }
    }
}

/// Column list shared by every `SELECT`, in `TodoRow` field order.
pub const SELECT_COLUMNS: &str = "id, todo, priority, status, category, due_date";

/// A todo as returned by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Todo {
    pub id: i64,
    pub todo: String,
    pub priority: Priority,
    pub status: Status,
    pub category: Category,
    pub due_date: NaiveDate,
}

/// A todo as stored in the `todo` table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TodoRow {
    pub id: i64,
    pub todo: String,
    pub priority: Priority,
    pub status: Status,
    pub category: Category,
    pub due_date: NaiveDate,
}

impl TodoRow {
    /// Read a row selected with [`SELECT_COLUMNS`].
    pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(Field::Id.column())?,
            todo: row.get(Field::Todo.column())?,
            priority: row.get(Field::Priority.column())?,
            status: row.get(Field::Status.column())?,
            category: row.get(Field::Category.column())?,
            due_date: row.get(Field::DueDate.column())?,
        })
    }
}

impl From<TodoRow> for Todo {
    fn from(row: TodoRow) -> Self {
        Self {
            id: row.id,
            todo: row.todo,
            priority: row.priority,
            status: row.status,
            category: row.category,
            due_date: row.due_date,
        }
    }
}

impl From<Todo> for TodoRow {
    fn from(todo: Todo) -> Self {
        Self {
            id: todo.id,
            todo: todo.todo,
            priority: todo.priority,
            status: todo.status,
            category: todo.category,
            due_date: todo.due_date,
        }
    }
}

/// Request payload for `POST /todos/`. Every field is required.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTodo {
    pub id: i64,
    pub todo: String,
    pub priority: String,
    pub status: String,
    pub category: String,
    pub due_date: String,
}

/// Request payload for `PUT /todos/{id}/`. Only supplied fields change.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTodo {
    pub status: Option<String>,
    pub priority: Option<String>,
    pub todo: Option<String>,
    pub category: Option<String>,
    pub due_date: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Todo {
        Todo {
            id: 1,
            todo: "Learn Rust".to_string(),
            priority: Priority::High,
            status: Status::InProgress,
            category: Category::Learning,
            due_date: NaiveDate::from_ymd_opt(2024, 2, 15).unwrap(),
        }
    }

    #[test]
    fn todo_serializes_with_camel_case_keys() {
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(json["id"], 1);
        assert_eq!(json["todo"], "Learn Rust");
        assert_eq!(json["priority"], "HIGH");
        assert_eq!(json["status"], "IN PROGRESS");
        assert_eq!(json["category"], "LEARNING");
        assert_eq!(json["dueDate"], "2024-02-15");
        assert!(json.get("due_date").is_none());
    }

    #[test]
    fn row_and_record_convert_both_ways() {
        let todo = sample();
        let row = TodoRow::from(todo.clone());
        assert_eq!(row.due_date, todo.due_date);
        assert_eq!(Todo::from(row), todo);
    }

    #[test]
    fn field_names_map_between_storage_and_api() {
        assert_eq!(Field::DueDate.column(), "due_date");
        assert_eq!(Field::DueDate.api_name(), "dueDate");
        assert_eq!(Field::from_column("due_date"), Some(Field::DueDate));
        assert_eq!(Field::from_api_name("dueDate"), Some(Field::DueDate));
        assert_eq!(Field::from_api_name("due_date"), None);
        for field in Field::ALL {
            assert_eq!(Field::from_column(field.column()), Some(field));
            assert_eq!(Field::from_api_name(field.api_name()), Some(field));
        }
    }

    #[test]
    fn enum_fields_name_their_columns() {
        let columns: Vec<_> = EnumField::ALL.iter().map(|f| f.field().column()).collect();
        assert_eq!(columns, ["status", "priority", "category"]);
    }

    #[test]
    fn enum_parsing_is_exact_and_case_sensitive() {
        assert_eq!("TO DO".parse::<Status>(), Ok(Status::ToDo));
        assert!("to do".parse::<Status>().is_err());
        assert!("TODO".parse::<Status>().is_err());
        assert!(" HIGH".parse::<Priority>().is_err());
        let err = "GARDEN".parse::<Category>().unwrap_err();
        assert_eq!(err.field, "category");
        assert_eq!(err.value, "GARDEN");
    }

    #[test]
    fn enum_display_matches_wire_spelling() {
        for status in Status::ALL {
            assert_eq!(status.to_string().parse::<Status>(), Ok(*status));
        }
        assert_eq!(Status::InProgress.to_string(), "IN PROGRESS");
    }

    #[test]
    fn update_payload_fields_are_optional() {
        let input: UpdateTodo = serde_json::from_str(r#"{"dueDate":"2024-01-01"}"#).unwrap();
        assert_eq!(input.due_date.as_deref(), Some("2024-01-01"));
        assert!(input.status.is_none());
        assert!(input.todo.is_none());
    }

    #[test]
    fn create_payload_requires_every_field() {
        let result: Result<CreateTodo, _> =
            serde_json::from_str(r#"{"id":1,"todo":"x","priority":"HIGH"}"#);
        assert!(result.is_err());
    }
}
