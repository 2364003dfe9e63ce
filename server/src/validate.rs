//! Validation of enumerated fields, due dates, and request payloads.
//!
//! Everything here is pure: no storage access, no logging. Handlers run these
//! checks before touching the table.

use chrono::NaiveDate;

use crate::error::ServiceError;
use crate::model::{Category, CreateTodo, EnumField, Field, Priority, Status, Todo, UpdateTodo};

/// Date shapes accepted on input. Output is always `yyyy-MM-dd`.
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d"];

pub fn valid_priority(value: &str) -> bool {
    value.parse::<Priority>().is_ok()
}

pub fn valid_status(value: &str) -> bool {
    value.parse::<Status>().is_ok()
}

pub fn valid_category(value: &str) -> bool {
    value.parse::<Category>().is_ok()
}

/// Parse a calendar date, rejecting impossible ones such as `2024-02-30`.
pub fn parse_due_date(value: &str) -> Option<NaiveDate> {
    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(value, format).ok())
}

pub fn is_valid_due_date(value: &str) -> bool {
    parse_due_date(value).is_some()
}

/// Normalize a date to `yyyy-MM-dd`, or `None` if it is not a real date.
pub fn normalize_due_date(value: &str) -> Option<String> {
    parse_due_date(value).map(|date| date.format("%Y-%m-%d").to_string())
}

/// Check `value` against the validator for `field`.
///
/// Returns the canonical spelling on success.
pub fn check_enum(field: EnumField, value: &str) -> Result<String, ServiceError> {
    let ok = match field {
        EnumField::Priority => valid_priority(value),
        EnumField::Status => valid_status(value),
        EnumField::Category => valid_category(value),
    };
    if ok {
        Ok(value.to_string())
    } else {
        Err(ServiceError::invalid(field))
    }
}

/// Validate a creation payload.
///
/// Checks run priority, status, category, due date, then title; the first
/// failure is returned.
pub fn validate_new_todo(input: CreateTodo) -> Result<Todo, ServiceError> {
    let priority = input
        .priority
        .parse::<Priority>()
        .map_err(|_| ServiceError::InvalidPriority)?;
    let status = input
        .status
        .parse::<Status>()
        .map_err(|_| ServiceError::InvalidStatus)?;
    let category = input
        .category
        .parse::<Category>()
        .map_err(|_| ServiceError::InvalidCategory)?;
    let due_date = parse_due_date(&input.due_date).ok_or(ServiceError::InvalidDueDate)?;
    if input.todo.trim().is_empty() {
        return Err(ServiceError::InvalidTitle);
    }
    Ok(Todo {
        id: input.id,
        todo: input.todo,
        priority,
        status,
        category,
        due_date,
    })
}

/// A validated partial update.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TodoChanges {
    pub status: Option<Status>,
    pub priority: Option<Priority>,
    pub todo: Option<String>,
    pub category: Option<Category>,
    pub due_date: Option<NaiveDate>,
}

impl TodoChanges {
    /// The field named in the confirmation message: the first one supplied in
    /// the order status, priority, todo, category, due date.
    pub fn primary_field(&self) -> Option<Field> {
        if self.status.is_some() {
            Some(Field::Status)
        } else if self.priority.is_some() {
            Some(Field::Priority)
        } else if self.todo.is_some() {
            Some(Field::Todo)
        } else if self.category.is_some() {
            Some(Field::Category)
        } else if self.due_date.is_some() {
            Some(Field::DueDate)
        } else {
            None
        }
    }

    /// Overwrite the supplied fields of `current`, keeping the rest.
    pub fn apply(self, current: Todo) -> Todo {
        Todo {
            id: current.id,
            todo: self.todo.unwrap_or(current.todo),
            priority: self.priority.unwrap_or(current.priority),
            status: self.status.unwrap_or(current.status),
            category: self.category.unwrap_or(current.category),
            due_date: self.due_date.unwrap_or(current.due_date),
        }
    }
}

/// Validate an update payload.
///
/// Every supplied field is checked, in the same order as
/// [`TodoChanges::primary_field`]; one bad value blocks the whole update.
/// A payload with no recognized field is rejected. On success the field to
/// name in the confirmation is returned with the changes.
pub fn validate_changes(input: UpdateTodo) -> Result<(Field, TodoChanges), ServiceError> {
    let status = input
        .status
        .map(|v| v.parse::<Status>().map_err(|_| ServiceError::InvalidStatus))
        .transpose()?;
    let priority = input
        .priority
        .map(|v| v.parse::<Priority>().map_err(|_| ServiceError::InvalidPriority))
        .transpose()?;
    let todo = match input.todo {
        Some(title) if title.trim().is_empty() => return Err(ServiceError::InvalidTitle),
        other => other,
    };
    let category = input
        .category
        .map(|v| v.parse::<Category>().map_err(|_| ServiceError::InvalidCategory))
        .transpose()?;
    let due_date = input
        .due_date
        .map(|v| parse_due_date(&v).ok_or(ServiceError::InvalidDueDate))
        .transpose()?;

    let changes = TodoChanges {
        status,
        priority,
        todo,
        category,
        due_date,
    };
    let field = changes.primary_field().ok_or(ServiceError::EmptyUpdate)?;
    Ok((field, changes))
}
