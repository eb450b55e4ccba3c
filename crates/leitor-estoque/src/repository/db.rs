//! Database Connection and Setup
//!
//! Manages the SQLite connection and schema. The app persists a single
//! JSON record in a key/value table, mirroring the storage model of the
//! mobile counter it syncs with.

use rusqlite::Connection;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::domain::{DomainError, DomainResult};

/// Database state wrapper
pub struct DbState {
    conn: Arc<Mutex<Option<Connection>>>,
}

impl DbState {
    pub fn new() -> Self {
        Self {
            conn: Arc::new(Mutex::new(None)),
        }
    }

    /// Shared handle for repositories.
    pub fn conn(&self) -> Arc<Mutex<Option<Connection>>> {
        Arc::clone(&self.conn)
    }
}

impl Default for DbState {
    fn default() -> Self {
        Self::new()
    }
}

/// Open (or create) the database at `db_path` and run migrations.
/// `:memory:` is accepted for tests.
pub async fn init_db(db_path: &Path) -> DomainResult<DbState> {
    let conn = Connection::open(db_path)
        .map_err(|e| DomainError::Internal(format!("Failed to open db: {}", e)))?;

    run_migrations(&conn)?;

    let state = DbState::new();
    *state.conn.lock().await = Some(conn);
    Ok(state)
}

fn run_migrations(conn: &Connection) -> DomainResult<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS app_state (
            key TEXT PRIMARY KEY,
            value TEXT NOT NULL
        )",
        (),
    )
    .map_err(|e| DomainError::Internal(e.to_string()))?;
    Ok(())
}
