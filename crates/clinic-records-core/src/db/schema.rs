//! SQLite schema definition.

/// Database schema. Applied on every open; creates missing objects only.
pub const SCHEMA: &str = r#"
-- ============================================================================
-- Patients
-- ============================================================================

CREATE TABLE IF NOT EXISTS patients (
    id INTEGER PRIMARY KEY AUTOINCREMENT,        -- AUTOINCREMENT: ids never reused
    patient_id TEXT NOT NULL UNIQUE,
    serial_number TEXT,
    visit_date TEXT,
    name TEXT NOT NULL,
    father_or_husband_name TEXT,
    age INTEGER,
    phone TEXT,
    address TEXT,
    description TEXT
);
"#;
