//! Clinic Records Core Library
//!
//! Patient visit records kept in a single SQLite table.
//!
//! # Architecture
//!
//! ```text
//! raw form fields ──► validation ──► RecordService ──► Database ──► patients table
//!                        │                 │
//!                        ▼                 ▼
//!                 field errors     DuplicateKey / NotFound
//! ```
//!
//! # Modules
//!
//! - [`db`]: SQLite storage layer, one connection per unit of work
//! - [`models`]: Domain types (Patient, PatientFields, SearchFilters)
//! - [`validation`]: Form input checks and mapping
//! - [`service`]: Create / search / update / delete operations

pub mod db;
pub mod models;
pub mod service;
pub mod validation;

// Re-export commonly used types
pub use db::{Database, DbError, DbResult};
pub use models::{Patient, PatientFields, SearchFilters};
pub use service::{RecordError, RecordResult, RecordService};
pub use validation::{validate_patient_form, ValidationErrors};
