//! Server-side validation of doctor records.
//!
//! All validation is server-authoritative: the form sends whatever the user typed and maps
//! the violations reported here back onto its fields. Violations are reported per field in
//! form order, with messages in rule order, so a client that keeps only the first message
//! shows the most basic problem.

use crate::constants::{MED_CERT_ID_MAX_LEN, NAME_MAX_LEN, PHONE_MAX_LEN};
use crate::field::DoctorField;
use crate::speciality::SpecialityCatalog;
use api_shared::{DoctorRecord, FieldViolation};
use docdir_types::PostalCode;

fn is_digits(value: &str) -> bool {
    value.bytes().all(|b| b.is_ascii_digit())
}

fn char_len(value: &str) -> usize {
    value.chars().count()
}

fn required_digits(value: &str, max_len: usize, errors: &mut Vec<String>) {
    if value.trim().is_empty() {
        errors.push("is required".into());
        return;
    }
    optional_digits(value, max_len, errors);
}

fn optional_digits(value: &str, max_len: usize, errors: &mut Vec<String>) {
    if value.is_empty() {
        return;
    }
    if !is_digits(value) {
        errors.push("must contain only digits".into());
    }
    if char_len(value) > max_len {
        errors.push(format!("must be at most {max_len} characters"));
    }
}

fn field_errors(
    field: DoctorField,
    record: &DoctorRecord,
    catalog: &SpecialityCatalog,
) -> Vec<String> {
    let mut errors = Vec::new();
    match field {
        DoctorField::Name => {
            if record.name.trim().is_empty() {
                errors.push("is required".into());
            }
            if char_len(&record.name) > NAME_MAX_LEN {
                errors.push(format!("must be at most {NAME_MAX_LEN} characters"));
            }
        }
        DoctorField::MedCertId => {
            required_digits(&record.med_cert_id, MED_CERT_ID_MAX_LEN, &mut errors)
        }
        DoctorField::Phone => optional_digits(&record.phone, PHONE_MAX_LEN, &mut errors),
        DoctorField::MobilePhone => {
            optional_digits(&record.mobile_phone, PHONE_MAX_LEN, &mut errors)
        }
        DoctorField::ZipCode => {
            if !record.zip_code.is_empty() {
                if let Err(e) = PostalCode::parse(&record.zip_code) {
                    errors.push(e.to_string());
                }
            }
        }
        DoctorField::Speciality => {
            if record.speciality.is_empty() {
                errors.push("select at least one speciality".into());
            }
            for name in record.speciality.iter() {
                if !catalog.contains(name) {
                    errors.push(format!("'{name}' is not a known speciality"));
                }
            }
        }
        DoctorField::Address
        | DoctorField::Number
        | DoctorField::Neighborhood
        | DoctorField::City
        | DoctorField::StateProvince => {}
    }
    errors
}

/// Validates a doctor record against the directory's rules.
///
/// Rules:
/// - `name`: required, at most 120 characters
/// - `medCertId`: required, digits only, at most 7 characters
/// - `phone`, `mobilePhone`: optional, digits only, at most 11 characters
/// - `zipCode`: optional, exactly 8 digits when present
/// - `speciality`: at least one entry, every entry from the catalog
///
/// # Returns
///
/// An empty vector when the record is valid; otherwise one [`FieldViolation`] per failing
/// field.
pub fn validate_doctor(record: &DoctorRecord, catalog: &SpecialityCatalog) -> Vec<FieldViolation> {
    DoctorField::ALL
        .into_iter()
        .filter_map(|field| {
            let errors = field_errors(field, record, catalog);
            (!errors.is_empty()).then(|| FieldViolation::new(field.path(), errors))
        })
        .collect()
}
