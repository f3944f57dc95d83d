//! Patient visit record models.

use serde::{Deserialize, Serialize};

/// A stored patient visit record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Patient {
    /// Internal id assigned by storage, never reused
    pub id: i64,
    #[serde(flatten)]
    pub fields: PatientFields,
}

/// The mutable part of a patient record: everything except the internal id.
///
/// Optional text fields are empty strings rather than `None`; only `age`
/// is nullable.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct PatientFields {
    /// User-supplied identifier, unique across all records
    pub patient_id: String,
    pub serial_number: String,
    /// Visit date as entered (`YYYY-MM-DD` from the date input)
    pub visit_date: String,
    pub name: String,
    pub father_or_husband_name: String,
    pub age: Option<i64>,
    pub phone: String,
    pub address: String,
    pub description: String,
}

impl PatientFields {
    /// Create fields with the three required values; everything else empty.
    pub fn new(
        patient_id: impl Into<String>,
        name: impl Into<String>,
        visit_date: impl Into<String>,
    ) -> Self {
        Self {
            patient_id: patient_id.into(),
            name: name.into(),
            visit_date: visit_date.into(),
            ..Self::default()
        }
    }
}

/// Substring filters for the record search. Empty strings impose no constraint.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct SearchFilters {
    pub patient_id: String,
    pub name: String,
    pub phone: String,
    pub address: String,
}

impl SearchFilters {
    /// Trim every filter value.
    pub fn trimmed(self) -> Self {
        Self {
            patient_id: self.patient_id.trim().to_string(),
            name: self.name.trim().to_string(),
            phone: self.phone.trim().to_string(),
            address: self.address.trim().to_string(),
        }
    }

    /// Filters that carry a value, as `(column, value)` pairs.
    pub fn active(&self) -> Vec<(&'static str, &str)> {
        [
            ("patient_id", self.patient_id.as_str()),
            ("name", self.name.as_str()),
            ("phone", self.phone.as_str()),
            ("address", self.address.as_str()),
        ]
        .into_iter()
        .filter(|(_, value)| !value.is_empty())
        .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.active().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_fields_defaults() {
        let fields = PatientFields::new("P1", "Asha", "2024-01-01");
        assert_eq!(fields.patient_id, "P1");
        assert_eq!(fields.name, "Asha");
        assert_eq!(fields.visit_date, "2024-01-01");
        assert_eq!(fields.age, None);
        assert!(fields.phone.is_empty());
        assert!(fields.description.is_empty());
    }

    #[test]
    fn test_active_filters() {
        let filters = SearchFilters {
            name: "  as ".into(),
            phone: "98".into(),
            ..Default::default()
        }
        .trimmed();

        assert_eq!(filters.active(), vec![("name", "as"), ("phone", "98")]);
        assert!(!filters.is_empty());
        assert!(SearchFilters::default().is_empty());
    }

    #[test]
    fn test_patient_serializes_flat() {
        let patient = Patient {
            id: 7,
            fields: PatientFields::new("P7", "Bina", "2024-02-02"),
        };
        let json = serde_json::to_value(&patient).unwrap();
        assert_eq!(json["id"], 7);
        assert_eq!(json["patient_id"], "P7");
        assert!(json["age"].is_null());
    }
}
