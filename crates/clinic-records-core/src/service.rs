//! Record service: create, search, update and delete patient records.
//!
//! Every write validates first and then runs inside a single transaction on
//! the request's [`Database`]. Recoverable outcomes (field errors, duplicate
//! patient IDs, missing records) come back as [`RecordError`] variants so the
//! caller can turn them into status messages.

use std::collections::HashMap;

use thiserror::Error;

use crate::db::{Database, DbError};
use crate::models::{Patient, SearchFilters};
use crate::validation::{validate_patient_form, ValidationErrors};

/// Record service errors.
#[derive(Error, Debug)]
pub enum RecordError {
    #[error("Validation failed: {}", .0.join(" "))]
    Validation(Vec<String>),

    #[error("Duplicate patient ID: {0}")]
    DuplicateKey(String),

    #[error("Patient not found: {0}")]
    NotFound(i64),

    #[error("Storage error: {0}")]
    Storage(DbError),
}

impl From<DbError> for RecordError {
    fn from(e: DbError) -> Self {
        match e {
            DbError::DuplicateKey(msg) => RecordError::DuplicateKey(msg),
            other => RecordError::Storage(other),
        }
    }
}

impl From<rusqlite::Error> for RecordError {
    fn from(e: rusqlite::Error) -> Self {
        DbError::from(e).into()
    }
}

impl From<ValidationErrors> for RecordError {
    fn from(e: ValidationErrors) -> Self {
        RecordError::Validation(e.into_messages())
    }
}

impl RecordError {
    /// Whether the caller can recover by showing a message to the user.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, RecordError::Storage(_))
    }
}

pub type RecordResult<T> = Result<T, RecordError>;

/// Patient record operations over one request-scoped database handle.
pub struct RecordService<'a> {
    db: &'a Database,
}

impl<'a> RecordService<'a> {
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// Validate and insert a new record. Returns its internal id.
    pub fn create(&self, form: &HashMap<String, String>) -> RecordResult<i64> {
        let fields = validate_patient_form(form)?;

        let tx = self.db.transaction()?;
        let id = self.db.insert_patient(&fields)?;
        tx.commit()?;

        Ok(id)
    }

    /// Records matching every non-empty filter, newest first.
    pub fn search(&self, filters: &SearchFilters) -> RecordResult<Vec<Patient>> {
        Ok(self.db.search_patients(filters)?)
    }

    /// Look up one record by internal id.
    pub fn get(&self, id: i64) -> RecordResult<Option<Patient>> {
        Ok(self.db.get_patient(id)?)
    }

    /// Validate and overwrite every mutable field of record `id`.
    ///
    /// There is no existence check before the write; an update that touches
    /// no rows is reported as [`RecordError::NotFound`].
    pub fn update(&self, id: i64, form: &HashMap<String, String>) -> RecordResult<()> {
        let fields = validate_patient_form(form)?;

        let tx = self.db.transaction()?;
        let rows = self.db.update_patient(id, &fields)?;
        if rows == 0 {
            return Err(RecordError::NotFound(id));
        }
        tx.commit()?;

        Ok(())
    }

    /// Delete record `id`, or report [`RecordError::NotFound`].
    pub fn delete(&self, id: i64) -> RecordResult<()> {
        let tx = self.db.transaction()?;
        if self.db.get_patient(id)?.is_none() {
            return Err(RecordError::NotFound(id));
        }
        self.db.delete_patient(id)?;
        tx.commit()?;

        Ok(())
    }
}
