//! SQLite storage bootstrap and module migration runner.
//!
//! A [`Database`] wraps a single connection behind a mutex so it can be shared
//! by repositories across request handlers. Migrations contributed by modules
//! are tracked per `(module, id)` in the `schema_migrations` table.

use std::path::Path;
use std::sync::{Arc, Mutex};

use anyhow::Context;
use booktracker_kernel::settings::DatabaseSettings;
use booktracker_kernel::Migration;
use rusqlite::{params, Connection};
use thiserror::Error;

const IN_MEMORY_PATH: &str = ":memory:";

const MIGRATIONS_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS schema_migrations (
        module     TEXT NOT NULL,
        id         TEXT NOT NULL,
        applied_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
        PRIMARY KEY (module, id)
    );
"#;

pub type DbResult<T> = Result<T, DbError>;

#[derive(Error, Debug)]
pub enum DbError {
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("database connection lock poisoned")]
    Poisoned,

    #[error("database task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// Thread-safe SQLite handle
#[derive(Clone)]
pub struct Database {
    conn: Arc<Mutex<Connection>>,
    path: String,
}

impl std::fmt::Debug for Database {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Database").field("path", &self.path).finish()
    }
}

impl Database {
    /// Open the database described by `settings`.
    pub fn open(settings: &DatabaseSettings) -> anyhow::Result<Self> {
        if settings.path == IN_MEMORY_PATH {
            return Self::open_in_memory();
        }

        let path = Path::new(&settings.path);
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("failed to create database directory {}", parent.display())
            })?;
        }

        let conn = Connection::open(path)
            .with_context(|| format!("failed to open sqlite database {}", path.display()))?;
        tracing::info!(target: "booktracker-db", path = %settings.path, "sqlite database opened");

        Self::from_connection(conn, settings.path.clone())
    }

    /// Open a private in-memory database.
    pub fn open_in_memory() -> anyhow::Result<Self> {
        let conn = Connection::open_in_memory().context("failed to open in-memory sqlite")?;
        Self::from_connection(conn, IN_MEMORY_PATH.to_string())
    }

    fn from_connection(conn: Connection, path: String) -> anyhow::Result<Self> {
        conn.execute_batch("PRAGMA foreign_keys = ON;")
            .context("failed to configure sqlite connection")?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
            path,
        })
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// Run `f` with exclusive access to the connection.
    pub fn with_conn<T>(
        &self,
        f: impl FnOnce(&mut Connection) -> rusqlite::Result<T>,
    ) -> DbResult<T> {
        let mut conn = self.conn.lock().map_err(|_| DbError::Poisoned)?;
        Ok(f(&mut *conn)?)
    }

    /// Run `f` on the blocking thread pool so SQLite I/O stays off the async
    /// workers.
    pub async fn call<T, F>(&self, f: F) -> DbResult<T>
    where
        F: FnOnce(&mut Connection) -> rusqlite::Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let db = self.clone();
        tokio::task::spawn_blocking(move || db.with_conn(f)).await?
    }

    /// Apply every migration not yet recorded in `schema_migrations`.
    ///
    /// Each migration runs in its own transaction together with its journal
    /// row. Returns the number of migrations applied by this call.
    pub fn apply_migrations(&self, migrations: &[(String, Migration)]) -> DbResult<usize> {
        self.with_conn(|conn| {
            conn.execute_batch(MIGRATIONS_TABLE)?;

            let mut applied = 0;
            for (module, migration) in migrations {
                let tx = conn.transaction()?;

                let already_applied: bool = tx.query_row(
                    "SELECT EXISTS(SELECT 1 FROM schema_migrations WHERE module = ?1 AND id = ?2)",
                    params![module, migration.id],
                    |row| row.get(0),
                )?;
                if already_applied {
                    tracing::debug!(
                        target: "booktracker-db",
                        %module,
                        id = migration.id,
                        "migration already applied"
                    );
                    continue;
                }

                tx.execute_batch(migration.up)?;
                tx.execute(
                    "INSERT INTO schema_migrations (module, id) VALUES (?1, ?2)",
                    params![module, migration.id],
                )?;
                tx.commit()?;

                tracing::info!(
                    target: "booktracker-db",
                    %module,
                    id = migration.id,
                    "migration applied"
                );
                applied += 1;
            }

            Ok(applied)
        })
    }
}
