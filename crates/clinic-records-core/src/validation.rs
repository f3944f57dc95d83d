//! Form validation and mapping to [`PatientFields`].

use std::collections::HashMap;

use thiserror::Error;

use crate::models::PatientFields;

pub const PATIENT_ID_REQUIRED: &str = "Patient ID is required.";
pub const NAME_REQUIRED: &str = "Patient Name is required.";
pub const DATE_REQUIRED: &str = "Date is required.";
pub const AGE_NOT_A_NUMBER: &str = "Age must be a number.";

/// One or more human-readable field errors. Never empty.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{}", .0.join(" "))]
pub struct ValidationErrors(pub Vec<String>);

impl ValidationErrors {
    pub fn messages(&self) -> &[String] {
        &self.0
    }

    pub fn into_messages(self) -> Vec<String> {
        self.0
    }
}

/// Validate raw form input.
///
/// Presence of `patient_id`, `name` and `visit_date` is checked first and
/// all missing fields are reported together. The age format is checked only
/// once those pass, and fails on its own.
pub fn validate_patient_form(
    form: &HashMap<String, String>,
) -> Result<PatientFields, ValidationErrors> {
    let field = |key: &str| -> String {
        form.get(key)
            .map(|value| value.trim().to_string())
            .unwrap_or_default()
    };

    let patient_id = field("patient_id");
    let name = field("name");
    let visit_date = field("visit_date");

    let errors: Vec<String> = [
        (patient_id.is_empty(), PATIENT_ID_REQUIRED),
        (name.is_empty(), NAME_REQUIRED),
        (visit_date.is_empty(), DATE_REQUIRED),
    ]
    .into_iter()
    .filter(|(missing, _)| *missing)
    .map(|(_, message)| message.to_string())
    .collect();

    if !errors.is_empty() {
        return Err(ValidationErrors(errors));
    }

    let age = parse_age(&field("age"))?;

    Ok(PatientFields {
        patient_id,
        serial_number: field("serial_number"),
        visit_date,
        name,
        father_or_husband_name: field("father_or_husband_name"),
        age,
        phone: field("phone"),
        address: field("address"),
        description: field("description"),
    })
}

/// Empty means absent; anything else must be a base-10 integer with an
/// optional sign. Digit-group underscores are rejected.
fn parse_age(raw: &str) -> Result<Option<i64>, ValidationErrors> {
    if raw.is_empty() {
        return Ok(None);
    }
    raw.parse::<i64>()
        .map(Some)
        .map_err(|_| ValidationErrors(vec![AGE_NOT_A_NUMBER.to_string()]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn form(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_valid_minimal() {
        let fields = validate_patient_form(&form(&[
            ("patient_id", " P1 "),
            ("name", "Asha"),
            ("visit_date", "2024-01-01"),
        ]))
        .unwrap();

        assert_eq!(fields, PatientFields::new("P1", "Asha", "2024-01-01"));
    }

    #[test]
    fn test_all_fields_trimmed() {
        let fields = validate_patient_form(&form(&[
            ("patient_id", "P1"),
            ("serial_number", " 17 "),
            ("visit_date", "2024-01-01"),
            ("name", "Asha"),
            ("father_or_husband_name", " Ravi\t"),
            ("age", " 42 "),
            ("phone", " 12345 "),
            ("address", "  Lake View "),
            ("description", "\nfever\n"),
        ]))
        .unwrap();

        assert_eq!(fields.serial_number, "17");
        assert_eq!(fields.father_or_husband_name, "Ravi");
        assert_eq!(fields.age, Some(42));
        assert_eq!(fields.phone, "12345");
        assert_eq!(fields.address, "Lake View");
        assert_eq!(fields.description, "fever");
    }

    #[test]
    fn test_missing_fields_collected() {
        let err = validate_patient_form(&form(&[("name", "   ")])).unwrap_err();
        assert_eq!(
            err.messages(),
            &[PATIENT_ID_REQUIRED, NAME_REQUIRED, DATE_REQUIRED]
        );
    }

    #[test]
    fn test_presence_checked_before_age() {
        let err = validate_patient_form(&form(&[
            ("patient_id", "P1"),
            ("age", "abc"),
        ]))
        .unwrap_err();
        assert_eq!(err.messages(), &[NAME_REQUIRED, DATE_REQUIRED]);
    }

    #[test]
    fn test_bad_age() {
        let err = validate_patient_form(&form(&[
            ("patient_id", "P1"),
            ("name", "Asha"),
            ("visit_date", "2024-01-01"),
            ("age", "abc"),
        ]))
        .unwrap_err();
        assert_eq!(err.messages(), &[AGE_NOT_A_NUMBER]);
    }

    #[test]
    fn test_age_is_plain_decimal() {
        for raw in ["1_0", "4.0", "0x2a", "4 2"] {
            let err = validate_patient_form(&form(&[
                ("patient_id", "P1"),
                ("name", "Asha"),
                ("visit_date", "2024-01-01"),
                ("age", raw),
            ]))
            .unwrap_err();
            assert_eq!(err.messages(), &[AGE_NOT_A_NUMBER], "{raw}");
        }

        let fields = validate_patient_form(&form(&[
            ("patient_id", "P1"),
            ("name", "Asha"),
            ("visit_date", "2024-01-01"),
            ("age", "+7"),
        ]))
        .unwrap();
        assert_eq!(fields.age, Some(7));
    }

    #[test]
    fn test_blank_age_is_absent() {
        let fields = validate_patient_form(&form(&[
            ("patient_id", "P1"),
            ("name", "Asha"),
            ("visit_date", "2024-01-01"),
            ("age", "   "),
        ]))
        .unwrap();
        assert_eq!(fields.age, None);
    }

    proptest! {
        #[test]
        fn prop_integer_age_accepted(age in any::<i64>()) {
            let fields = validate_patient_form(&form(&[
                ("patient_id", "P1"),
                ("name", "Asha"),
                ("visit_date", "2024-01-01"),
                ("age", age.to_string().as_str()),
            ]))
            .unwrap();
            prop_assert_eq!(fields.age, Some(age));
        }

        #[test]
        fn prop_non_numeric_age_rejected(age in "[a-zA-Z][a-zA-Z0-9 ]{0,8}") {
            let result = validate_patient_form(&form(&[
                ("patient_id", "P1"),
                ("name", "Asha"),
                ("visit_date", "2024-01-01"),
                ("age", age.as_str()),
            ]));
            prop_assert_eq!(result, Err(ValidationErrors(vec![AGE_NOT_A_NUMBER.to_string()])));
        }

        #[test]
        fn prop_whitespace_required_fields_rejected(ws in "[ \t\n]{0,4}") {
            let err = validate_patient_form(&form(&[
                ("patient_id", ws.as_str()),
                ("name", ws.as_str()),
                ("visit_date", ws.as_str()),
            ]))
            .unwrap_err();
            prop_assert_eq!(err.messages().len(), 3);
        }
    }
}
