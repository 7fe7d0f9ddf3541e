pub mod migrations;
pub mod models;
pub mod queries;

use anyhow::{Result, anyhow};
use rusqlite::Connection;
use std::path::Path;
use std::sync::Mutex;
use tracing::info;

/// The process-wide store handle: one SQLite connection, opened at startup
/// and closed once at shutdown.
pub struct Database {
    conn: Mutex<Option<Connection>>,
}

impl Database {
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)?;

        conn.pragma_update(None, "journal_mode", "WAL")?;

        migrations::run(&conn)?;

        info!("Database opened at {}", path.display());
        Ok(Self::from_conn(conn))
    }

    /// Fresh in-memory database with the schema applied.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        migrations::run(&conn)?;
        Ok(Self::from_conn(conn))
    }

    fn from_conn(conn: Connection) -> Self {
        Self {
            conn: Mutex::new(Some(conn)),
        }
    }

    pub fn with_conn<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Connection) -> Result<T>,
    {
        let guard = self.conn.lock().map_err(|e| anyhow!("DB lock poisoned: {}", e))?;
        let conn = guard.as_ref().ok_or_else(|| anyhow!("Database is closed"))?;
        f(conn)
    }

    /// Close the connection. Later calls to `with_conn` fail; closing twice
    /// is a no-op.
    pub fn close(&self) -> Result<()> {
        let mut guard = self.conn.lock().map_err(|e| anyhow!("DB lock poisoned: {}", e))?;
        if let Some(conn) = guard.take() {
            conn.close().map_err(|(_, e)| anyhow!("Failed to close database: {}", e))?;
            info!("Database connection closed");
        }
        Ok(())
    }

    #[cfg(test)]
    fn is_open(&self) -> bool {
        self.conn.lock().map(|g| g.is_some()).unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_creates_file_and_schema() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("messages.db");
        assert!(!path.exists());

        let db = Database::open(&path).unwrap();
        assert!(path.exists());
        assert_eq!(db.count_messages().unwrap(), 0);
    }

    #[test]
    fn reopening_keeps_existing_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("messages.db");

        let db = Database::open(&path).unwrap();
        db.insert_message(&models::NewMessage {
            name: "Иван".into(),
            phone: "80291234567".into(),
            message: "Привет!".into(),
        })
        .unwrap();
        db.close().unwrap();

        let db = Database::open(&path).unwrap();
        assert_eq!(db.count_messages().unwrap(), 1);
    }

    #[test]
    fn closed_database_rejects_work() {
        let db = Database::open_in_memory().unwrap();
        assert!(db.is_open());
        db.close().unwrap();
        assert!(!db.is_open());
        assert!(db.count_messages().is_err());
        // Second close is harmless.
        db.close().unwrap();
    }
}
