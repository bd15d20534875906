//! Repository for the `todos` table.
//!
//! Every call is a single SQL statement against the shared pool; SQLite's own
//! locking (plus `busy_timeout`) serializes concurrent writers.

use crate::domain::{TodoInput, TodoItem};
use sqlx::sqlite::{SqlitePool, SqliteRow};
use sqlx::Row;

/// Store for todo items.
pub struct Repository {
    pool: SqlitePool,
}

impl Repository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: SqlitePool) -> Self {
        Repository { pool }
    }

    /// Close the underlying pool, waiting for in-flight queries.
    pub async fn close(&self) {
        self.pool.close().await;
    }

    /// Cheap round trip used by the readiness probe.
    pub async fn ping(&self) -> Result<(), sqlx::Error> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    /// All todo items in storage order.
    ///
    /// # Errors
    /// Returns an error if the query fails.
    pub async fn list(&self) -> Result<Vec<TodoItem>, sqlx::Error> {
        let rows = sqlx::query("SELECT id, title, completed FROM todos ORDER BY id ASC")
            .fetch_all(&self.pool)
            .await?;

        rows.iter().map(row_to_todo).collect()
    }

    /// Fetch a single item, `None` if no row has this id.
    ///
    /// # Errors
    /// Returns an error if the query fails.
    pub async fn get(&self, id: i64) -> Result<Option<TodoItem>, sqlx::Error> {
        let row = sqlx::query("SELECT id, title, completed FROM todos WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(row_to_todo).transpose()
    }

    /// Insert a new item and return it with its assigned id.
    ///
    /// # Errors
    /// Returns an error if the insert fails.
    pub async fn create(&self, input: &TodoInput) -> Result<TodoItem, sqlx::Error> {
        let row = sqlx::query(
            r#"
            INSERT INTO todos (title, completed)
            VALUES (?, ?)
            RETURNING id, title, completed
            "#,
        )
        .bind(input.title.as_str())
        .bind(input.completed)
        .fetch_one(&self.pool)
        .await?;

        row_to_todo(&row)
    }

    /// Overwrite title and completion of an existing item.
    ///
    /// The existence check and the write are one statement, so an item deleted
    /// concurrently is reported as missing rather than resurrected. Returns
    /// `None` when no row matched.
    ///
    /// # Errors
    /// Returns an error if the update fails.
    pub async fn update(
        &self,
        id: i64,
        input: &TodoInput,
    ) -> Result<Option<TodoItem>, sqlx::Error> {
        let row = sqlx::query(
            r#"
            UPDATE todos
            SET title = ?, completed = ?
            WHERE id = ?
            RETURNING id, title, completed
            "#,
        )
        .bind(input.title.as_str())
        .bind(input.completed)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(row_to_todo).transpose()
    }

    /// Permanently remove an item. Returns true if a row was deleted.
    ///
    /// # Errors
    /// Returns an error if the delete fails.
    pub async fn delete(&self, id: i64) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM todos WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

fn row_to_todo(row: &SqliteRow) -> Result<TodoItem, sqlx::Error> {
    Ok(TodoItem {
        id: row.try_get("id")?,
        title: row.try_get("title")?,
        completed: row.try_get("completed")?,
    })
}
