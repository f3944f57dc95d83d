//! Database layer for the clinic record manager.
//!
//! A [`Database`] wraps one SQLite connection. Callers open one per unit of
//! work and drop it when done; dropping closes the connection on every exit
//! path, including early returns through `?`.

mod schema;
mod patients;

pub use schema::*;

use rusqlite::{Connection, ErrorCode};
use std::path::Path;
use thiserror::Error;

/// Database errors.
#[derive(Error, Debug)]
pub enum DbError {
    #[error("SQLite error: {0}")]
    Sqlite(rusqlite::Error),

    #[error("Duplicate key: {0}")]
    DuplicateKey(String),
}

impl From<rusqlite::Error> for DbError {
    fn from(e: rusqlite::Error) -> Self {
        match &e {
            rusqlite::Error::SqliteFailure(err, msg)
                if err.code == ErrorCode::ConstraintViolation
                    && err.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE =>
            {
                DbError::DuplicateKey(msg.clone().unwrap_or_else(|| "UNIQUE constraint failed".into()))
            }
            _ => DbError::Sqlite(e),
        }
    }
}

pub type DbResult<T> = Result<T, DbError>;

/// Database connection wrapper.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open database at path, creating if needed.
    pub fn open<P: AsRef<Path>>(path: P) -> DbResult<Self> {
        let conn = Connection::open(path)?;
        let db = Self { conn };
        db.initialize()?;
        Ok(db)
    }

    /// Create in-memory database (for testing).
    pub fn open_in_memory() -> DbResult<Self> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.initialize()?;
        Ok(db)
    }

    /// Create the schema at process start, then release the connection.
    pub fn bootstrap<P: AsRef<Path>>(path: P) -> DbResult<()> {
        Self::open(path).map(drop)
    }

    /// Initialize schema.
    fn initialize(&self) -> DbResult<()> {
        self.conn.execute_batch(SCHEMA)?;
        Ok(())
    }

    /// Get raw connection (for advanced queries).
    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    /// Begin a transaction. Rolls back on drop unless committed.
    pub fn transaction(&self) -> DbResult<rusqlite::Transaction<'_>> {
        Ok(self.conn.unchecked_transaction()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_in_memory() {
        let db = Database::open_in_memory();
        assert!(db.is_ok());
    }

    #[test]
    fn test_schema_initialized() {
        let db = Database::open_in_memory().unwrap();

        let tables: Vec<String> = db
            .conn()
            .prepare("SELECT name FROM sqlite_master WHERE type='table' ORDER BY name")
            .unwrap()
            .query_map([], |row| row.get(0))
            .unwrap()
            .filter_map(|r| r.ok())
            .collect();

        assert!(tables.contains(&"patients".to_string()));
    }

    #[test]
    fn test_bootstrap_creates_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("patients.db");

        Database::bootstrap(&path).unwrap();
        assert!(path.exists());

        let db = Database::open(&path).unwrap();
        assert_eq!(db.count_patients().unwrap(), 0);
    }

    #[test]
    fn test_unique_violation_maps_to_duplicate_key() {
        let db = Database::open_in_memory().unwrap();
        let insert = "INSERT INTO patients (patient_id, name) VALUES ('P1', 'Asha')";

        db.conn().execute(insert, []).unwrap();
        let err: DbError = db.conn().execute(insert, []).unwrap_err().into();
        assert!(matches!(err, DbError::DuplicateKey(_)));
    }

    #[test]
    fn test_not_null_violation_is_not_duplicate_key() {
        let db = Database::open_in_memory().unwrap();

        let err: DbError = db
            .conn()
            .execute("INSERT INTO patients (patient_id) VALUES ('P1')", [])
            .unwrap_err()
            .into();
        assert!(matches!(err, DbError::Sqlite(_)));
    }

    #[test]
    fn test_uncommitted_transaction_rolls_back() {
        let db = Database::open_in_memory().unwrap();
        {
            let tx = db.transaction().unwrap();
            tx.execute(
                "INSERT INTO patients (patient_id, name) VALUES ('P1', 'Asha')",
                [],
            )
            .unwrap();
        }
        assert_eq!(db.count_patients().unwrap(), 0);
    }
}
