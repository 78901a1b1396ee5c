//! Per-field validation messages shown inline on the form.

use api_shared::FieldViolation;
use docdir_core::DoctorField;
use std::collections::BTreeMap;

/// At most one message per field; a missing entry means the field is currently valid.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ValidationErrorMap(BTreeMap<DoctorField, String>);

impl ValidationErrorMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// A map holding exactly one message.
    pub fn single(field: DoctorField, message: impl Into<String>) -> Self {
        let mut map = BTreeMap::new();
        map.insert(field, message.into());
        Self(map)
    }

    /// Builds the map from server-reported violations.
    ///
    /// Entries are taken in order and only the first message of the first entry for a given
    /// path is kept. Paths that do not name a known field, and entries without messages, are
    /// skipped.
    pub fn from_violations(violations: &[FieldViolation]) -> Self {
        let mut map = BTreeMap::new();
        for violation in violations {
            let field = match violation.path.parse::<DoctorField>() {
                Ok(field) => field,
                Err(e) => {
                    tracing::warn!(error = %e, "ignoring server violation");
                    continue;
                }
            };
            let Some(first) = violation.errors.first() else {
                continue;
            };
            map.entry(field).or_insert_with(|| first.clone());
        }
        Self(map)
    }

    pub fn get(&self, field: DoctorField) -> Option<&str> {
        self.0.get(&field).map(String::as_str)
    }

    pub fn has_error(&self, field: DoctorField) -> bool {
        self.0.contains_key(&field)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Fields with messages, in form order.
    pub fn iter(&self) -> impl Iterator<Item = (DoctorField, &str)> {
        self.0.iter().map(|(field, msg)| (*field, msg.as_str()))
    }
}
