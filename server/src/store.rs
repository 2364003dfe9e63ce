//! SQLite-backed storage for todos.
//!
//! # Design
//! `TodoStore` wraps the single connection the service opens at startup and
//! holds for its lifetime. Clones share that connection behind a tokio
//! mutex; each call locks it only for the duration of one statement.
//!
//! Every statement binds its inputs as parameters. Column names come from
//! [`crate::model::Field::column`], so no request text ever becomes part of
//! the SQL.
//!
//! `update` is a read followed by a separate write, with no transaction
//! around them. A concurrent update landing between the two is overwritten.

use std::path::Path;
use std::sync::Arc;

use chrono::NaiveDate;
use rusqlite::{params, params_from_iter, Connection, OptionalExtension};
use tokio::sync::Mutex;

use crate::error::StoreError;
use crate::filter::{Op, Predicate};
use crate::model::{Todo, TodoRow, SELECT_COLUMNS};
use crate::validate::TodoChanges;

const CREATE_TABLE: &str = "CREATE TABLE IF NOT EXISTS todo (
    id INTEGER PRIMARY KEY,
    todo TEXT NOT NULL,
    priority TEXT NOT NULL,
    status TEXT NOT NULL,
    category TEXT NOT NULL,
    due_date TEXT NOT NULL
)";

/// Shared handle to the `todo` table.
#[derive(Clone)]
pub struct TodoStore {
    conn: Arc<Mutex<Connection>>,
}

impl TodoStore {
    /// Open (or create) the database file and make sure the table exists.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        Self::with_connection(Connection::open(path)?)
    }

    pub fn open_in_memory() -> Result<Self, StoreError> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> Result<Self, StoreError> {
        conn.execute(CREATE_TABLE, [])?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Release the connection. Fails with [`StoreError::InUse`] while other
    /// clones of this handle are still alive.
    pub fn close(self) -> Result<(), StoreError> {
        let conn = Arc::try_unwrap(self.conn).map_err(|_| StoreError::InUse)?;
        conn.into_inner().close().map_err(|(_, error)| error)?;
        Ok(())
    }

    /// Rows matching every condition of `predicate`, in storage order.
    pub async fn list(&self, predicate: &Predicate) -> Result<Vec<Todo>, StoreError> {
        let (sql, values) = render_select(predicate);
        tracing::debug!(rule = predicate.rule, %sql, "listing todos");

        let conn = self.conn.lock().await;
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
            .query_map(params_from_iter(values), TodoRow::from_row)?
            .map(|row| row.map(Todo::from))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    pub async fn get(&self, id: i64) -> Result<Option<Todo>, StoreError> {
        let conn = self.conn.lock().await;
        let row = conn
            .query_row(
                &format!("SELECT {SELECT_COLUMNS} FROM todo WHERE id = ?1"),
                params![id],
                TodoRow::from_row,
            )
            .optional()?;
        Ok(row.map(Todo::from))
    }

    /// Todos due exactly on `date`.
    pub async fn list_by_due_date(&self, date: NaiveDate) -> Result<Vec<Todo>, StoreError> {
        let conn = self.conn.lock().await;
        let mut stmt = conn.prepare(&format!(
            "SELECT {SELECT_COLUMNS} FROM todo WHERE due_date = ?1"
        ))?;
        let rows = stmt
            .query_map(params![date], TodoRow::from_row)?
            .map(|row| row.map(Todo::from))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    pub async fn insert(&self, todo: Todo) -> Result<(), StoreError> {
        let row = TodoRow::from(todo);
        let conn = self.conn.lock().await;
        conn.execute(
            "INSERT INTO todo (id, todo, priority, status, category, due_date)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![row.id, row.todo, row.priority, row.status, row.category, row.due_date],
        )?;
        Ok(())
    }

    /// Apply `changes` on top of the stored row. Returns the new row, or
    /// `None` when `id` does not exist.
    pub async fn update(&self, id: i64, changes: TodoChanges) -> Result<Option<Todo>, StoreError> {
        let Some(current) = self.get(id).await? else {
            return Ok(None);
        };
        let row = TodoRow::from(changes.apply(current));

        let conn = self.conn.lock().await;
        conn.execute(
            "UPDATE todo
             SET todo = ?2, priority = ?3, status = ?4, category = ?5, due_date = ?6
             WHERE id = ?1",
            params![row.id, row.todo, row.priority, row.status, row.category, row.due_date],
        )?;
        Ok(Some(row.into()))
    }

    /// Delete by id. Deleting a missing id is not an error.
    pub async fn delete(&self, id: i64) -> Result<(), StoreError> {
        let conn = self.conn.lock().await;
        let removed = conn.execute("DELETE FROM todo WHERE id = ?1", params![id])?;
        tracing::debug!(id, removed, "deleted todo");
        Ok(())
    }
}

/// Build the `SELECT` for a predicate and the values to bind, in placeholder
/// order.
fn render_select(predicate: &Predicate) -> (String, Vec<&str>) {
    let mut sql = format!("SELECT {SELECT_COLUMNS} FROM todo");
    let mut values = Vec::with_capacity(predicate.conditions.len());

    for (i, condition) in predicate.conditions.iter().enumerate() {
        let n = i + 1;
        let column = condition.field.column();
        sql.push_str(if i == 0 { " WHERE " } else { " AND " });
        match condition.op {
            Op::Eq => sql.push_str(&format!("{column} = ?{n}")),
            Op::Contains => sql.push_str(&format!("(?{n} = '' OR instr({column}, ?{n}) > 0)")),
        }
        values.push(condition.value.as_str());
    }
    (sql, values)
}
