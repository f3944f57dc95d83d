//! Patient database operations.

use rusqlite::{params, params_from_iter, OptionalExtension, Row};

use super::{Database, DbResult};
use crate::models::{Patient, PatientFields, SearchFilters};

const PATIENT_COLUMNS: &str = "id, patient_id, serial_number, visit_date, name, \
     father_or_husband_name, age, phone, address, description";

/// Map a row selected with `PATIENT_COLUMNS`. NULL text reads as "".
fn patient_from_row(row: &Row<'_>) -> rusqlite::Result<Patient> {
    let text = |idx: usize| -> rusqlite::Result<String> {
        Ok(row.get::<_, Option<String>>(idx)?.unwrap_or_default())
    };

    Ok(Patient {
        id: row.get(0)?,
        fields: PatientFields {
            patient_id: text(1)?,
            serial_number: text(2)?,
            visit_date: text(3)?,
            name: text(4)?,
            father_or_husband_name: text(5)?,
            age: row.get(6)?,
            phone: text(7)?,
            address: text(8)?,
            description: text(9)?,
        },
    })
}

impl Database {
    /// Insert a new patient and return its internal id.
    pub fn insert_patient(&self, fields: &PatientFields) -> DbResult<i64> {
        self.conn.execute(
            r#"
            INSERT INTO patients (
                patient_id, serial_number, visit_date, name,
                father_or_husband_name, age, phone, address, description
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            "#,
            params![
                fields.patient_id,
                fields.serial_number,
                fields.visit_date,
                fields.name,
                fields.father_or_husband_name,
                fields.age,
                fields.phone,
                fields.address,
                fields.description,
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    /// Overwrite every mutable field of a patient. Returns rows affected.
    pub fn update_patient(&self, id: i64, fields: &PatientFields) -> DbResult<usize> {
        let rows_affected = self.conn.execute(
            r#"
            UPDATE patients SET
                patient_id = ?2,
                serial_number = ?3,
                visit_date = ?4,
                name = ?5,
                father_or_husband_name = ?6,
                age = ?7,
                phone = ?8,
                address = ?9,
                description = ?10
            WHERE id = ?1
            "#,
            params![
                id,
                fields.patient_id,
                fields.serial_number,
                fields.visit_date,
                fields.name,
                fields.father_or_husband_name,
                fields.age,
                fields.phone,
                fields.address,
                fields.description,
            ],
        )?;
        Ok(rows_affected)
    }

    /// Get a patient by internal id.
    pub fn get_patient(&self, id: i64) -> DbResult<Option<Patient>> {
        self.conn
            .query_row(
                &format!("SELECT {PATIENT_COLUMNS} FROM patients WHERE id = ?"),
                [id],
                patient_from_row,
            )
            .optional()
            .map_err(Into::into)
    }

    /// Search patients by substring filters, newest first.
    ///
    /// Each non-empty filter becomes `column LIKE %value%`; filters are
    /// combined with AND. SQLite's LIKE is case-insensitive for ASCII.
    pub fn search_patients(&self, filters: &SearchFilters) -> DbResult<Vec<Patient>> {
        let active = filters.active();

        let mut sql = format!("SELECT {PATIENT_COLUMNS} FROM patients WHERE 1=1");
        for (column, _) in &active {
            sql.push_str(&format!(" AND {column} LIKE ?"));
        }
        sql.push_str(" ORDER BY id DESC");

        let patterns = active.iter().map(|(_, value)| format!("%{value}%"));

        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map(params_from_iter(patterns), patient_from_row)?;

        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    /// Delete a patient. Returns rows affected.
    pub fn delete_patient(&self, id: i64) -> DbResult<usize> {
        let rows_affected = self
            .conn
            .execute("DELETE FROM patients WHERE id = ?", [id])?;
        Ok(rows_affected)
    }

    /// Count all patients.
    pub fn count_patients(&self) -> DbResult<i64> {
        self.conn
            .query_row("SELECT COUNT(*) FROM patients", [], |row| row.get(0))
            .map_err(Into::into)
    }
}
