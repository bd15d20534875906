//! Database initialization: pragmas, schema and seed data.

use sqlx::sqlite::{SqliteConnection, SqlitePool, SqlitePoolOptions};
use std::path::Path;
use tracing::info;

/// Title of the record written into an empty database.
pub const SEED_TITLE: &str = "Hello World";

/// Open (creating if needed) the SQLite database at `db_path`, ensure the
/// schema exists and seed it when empty.
pub async fn init_db(db_path: &str) -> Result<SqlitePool, sqlx::Error> {
    if let Some(parent) = Path::new(db_path).parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).ok();
        }
    }

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .after_connect(|conn, _meta| Box::pin(async move { configure_pragmas_conn(conn).await }))
        .connect(&format!("sqlite:{}?mode=rwc", db_path))
        .await?;

    prepare(&pool).await?;

    info!("Database initialized at {}", db_path);
    Ok(pool)
}

/// In-memory database with the same schema and seed.
///
/// Pinned to a single connection that is never recycled, since every new
/// in-memory connection would see an empty database.
pub async fn init_memory_db() -> Result<SqlitePool, sqlx::Error> {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await?;

    prepare(&pool).await?;
    Ok(pool)
}

async fn prepare(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    run_migrations(pool).await?;
    if seed_if_empty(pool).await? {
        info!(title = SEED_TITLE, "Seeded empty todos table");
    } else {
        info!("Todos table already populated, skipping seed");
    }
    Ok(())
}

/// Create the schema if absent.
async fn run_migrations(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    info!("Running database migrations...");
    let schema_sql = include_str!("schema.sql");

    for statement in schema_sql.split(';') {
        let trimmed = statement.trim();
        if !trimmed.is_empty() {
            sqlx::query(trimmed).execute(pool).await?;
        }
    }

    info!("Migrations completed successfully");
    Ok(())
}

/// Insert the seed record only when the table holds no rows.
///
/// Returns true if a row was written.
async fn seed_if_empty(pool: &SqlitePool) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        r#"
        INSERT INTO todos (title, completed)
        SELECT ?, ?
        WHERE NOT EXISTS (SELECT 1 FROM todos)
        "#,
    )
    .bind(SEED_TITLE)
    .bind(false)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

async fn configure_pragmas_conn(conn: &mut SqliteConnection) -> Result<(), sqlx::Error> {
    use sqlx::Row;

    sqlx::query("PRAGMA busy_timeout = 5000")
        .execute(&mut *conn)
        .await?;

    // journal_mode returns the actual mode set; must use fetch to get result
    let row = sqlx::query("PRAGMA journal_mode = WAL")
        .fetch_one(&mut *conn)
        .await?;
    let journal_mode: String = row.try_get(0)?;
    info!("SQLite journal_mode set to: {}", journal_mode);

    sqlx::query("PRAGMA synchronous = NORMAL")
        .execute(&mut *conn)
        .await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn temp_db_path(temp_dir: &TempDir) -> String {
        temp_dir
            .path()
            .join("test.db")
            .to_string_lossy()
            .to_string()
    }

    async fn count_todos(pool: &SqlitePool) -> i64 {
        let result: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM todos")
            .fetch_one(pool)
            .await
            .expect("query failed");
        result.0
    }

    #[tokio::test]
    async fn test_init_db_creates_database() {
        let temp_dir = TempDir::new().unwrap();
        let db_path = temp_db_path(&temp_dir);

        let _pool = init_db(&db_path).await.expect("init_db failed");
        assert!(Path::new(&db_path).exists());
    }

    #[tokio::test]
    async fn test_init_db_creates_parent_directories() {
        let temp_dir = TempDir::new().unwrap();
        let db_path = temp_dir
            .path()
            .join("nested/dir/todos.db")
            .to_string_lossy()
            .to_string();

        init_db(&db_path).await.expect("init_db failed");
        assert!(Path::new(&db_path).exists());
    }

    #[tokio::test]
    async fn test_migrations_create_todos_table() {
        let pool = init_memory_db().await.expect("init failed");

        let result: (String,) =
            sqlx::query_as("SELECT name FROM sqlite_master WHERE type='table' AND name='todos'")
                .fetch_one(&pool)
                .await
                .expect("query failed");
        assert_eq!(result.0, "todos");
    }

    #[tokio::test]
    async fn test_migrations_idempotent() {
        let pool = init_memory_db().await.expect("init failed");

        run_migrations(&pool)
            .await
            .expect("second migration run failed");
        assert_eq!(count_todos(&pool).await, 1);
    }

    #[tokio::test]
    async fn test_fresh_database_is_seeded() {
        let pool = init_memory_db().await.expect("init failed");

        let (id, title, completed): (i64, String, bool) =
            sqlx::query_as("SELECT id, title, completed FROM todos")
                .fetch_one(&pool)
                .await
                .expect("query failed");
        assert_eq!(id, 1);
        assert_eq!(title, SEED_TITLE);
        assert!(!completed);
    }

    #[tokio::test]
    async fn test_seed_not_repeated_on_restart() {
        let temp_dir = TempDir::new().unwrap();
        let db_path = temp_db_path(&temp_dir);

        let pool = init_db(&db_path).await.expect("first init failed");
        pool.close().await;
        let pool = init_db(&db_path).await.expect("second init failed");

        assert_eq!(count_todos(&pool).await, 1);
    }

    #[tokio::test]
    async fn test_seed_if_empty_skips_populated_table() {
        let pool = init_memory_db().await.expect("init failed");
        assert!(!seed_if_empty(&pool).await.expect("seed failed"));
    }

    #[tokio::test]
    async fn test_busy_timeout_configured() {
        let temp_dir = TempDir::new().unwrap();
        let pool = init_db(&temp_db_path(&temp_dir))
            .await
            .expect("init_db failed");

        let result: (i64,) = sqlx::query_as("PRAGMA busy_timeout")
            .fetch_one(&pool)
            .await
            .expect("query failed");
        assert_eq!(result.0, 5000);
    }
}
