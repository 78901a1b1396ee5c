//! The closed set of fields on a doctor record.
//!
//! Validation errors, form updates and server failure paths are all keyed by
//! [`DoctorField`] rather than by free-form strings.

use crate::{DoctorError, DoctorResult};
use api_shared::DoctorRecord;

/// A field of [`DoctorRecord`], excluding the persistence-assigned `id`.
///
/// Variants are declared in form order, so the derived `Ord` sorts fields the way the form
/// lays them out.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DoctorField {
    Name,
    MedCertId,
    Phone,
    MobilePhone,
    Speciality,
    ZipCode,
    Address,
    Number,
    Neighborhood,
    City,
    StateProvince,
}

impl DoctorField {
    /// Every field, in form order.
    pub const ALL: [DoctorField; 11] = [
        DoctorField::Name,
        DoctorField::MedCertId,
        DoctorField::Phone,
        DoctorField::MobilePhone,
        DoctorField::Speciality,
        DoctorField::ZipCode,
        DoctorField::Address,
        DoctorField::Number,
        DoctorField::Neighborhood,
        DoctorField::City,
        DoctorField::StateProvince,
    ];

    /// Fields filled in by a successful postal-code resolution.
    pub const RESOLVED_BY_POSTAL_CODE: [DoctorField; 5] = [
        DoctorField::ZipCode,
        DoctorField::Address,
        DoctorField::Neighborhood,
        DoctorField::City,
        DoctorField::StateProvince,
    ];

    /// Wire name of the field, as used in JSON bodies and validation paths.
    pub fn path(self) -> &'static str {
        match self {
            DoctorField::Name => "name",
            DoctorField::MedCertId => "medCertId",
            DoctorField::Phone => "phone",
            DoctorField::MobilePhone => "mobilePhone",
            DoctorField::ZipCode => "zipCode",
            DoctorField::Address => "address",
            DoctorField::Number => "number",
            DoctorField::Neighborhood => "neighborhood",
            DoctorField::City => "city",
            DoctorField::StateProvince => "stateProvince",
            DoctorField::Speciality => "speciality",
        }
    }

    /// Parse a wire name. Returns `None` for anything outside the closed set.
    pub fn from_path(path: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|field| field.path() == path)
    }

    /// Label shown next to the input.
    pub fn label(self) -> &'static str {
        match self {
            DoctorField::Name => "Name",
            DoctorField::MedCertId => "CRM",
            DoctorField::Phone => "Telefone",
            DoctorField::MobilePhone => "Celular",
            DoctorField::ZipCode => "CEP",
            DoctorField::Address => "Endereço",
            DoctorField::Number => "Número",
            DoctorField::Neighborhood => "Bairro",
            DoctorField::City => "Cidade",
            DoctorField::StateProvince => "Estado",
            DoctorField::Speciality => "Especialidade",
        }
    }

    /// Input length cap, in characters, if the field has one.
    pub fn max_input_len(self) -> Option<usize> {
        use crate::constants::{MED_CERT_ID_MAX_LEN, NAME_MAX_LEN, PHONE_MAX_LEN};

        match self {
            DoctorField::Name => Some(NAME_MAX_LEN),
            DoctorField::MedCertId => Some(MED_CERT_ID_MAX_LEN),
            DoctorField::Phone | DoctorField::MobilePhone => Some(PHONE_MAX_LEN),
            DoctorField::ZipCode => Some(docdir_types::PostalCode::LEN),
            _ => None,
        }
    }

    /// Reject input longer than [`max_input_len`](Self::max_input_len).
    ///
    /// # Errors
    ///
    /// Returns [`DoctorError::InputTooLong`] when `value` has more characters than the cap.
    pub fn check_input_len(self, value: &str) -> DoctorResult<()> {
        match self.max_input_len() {
            Some(max) if value.chars().count() > max => {
                Err(DoctorError::InputTooLong { field: self, max })
            }
            _ => Ok(()),
        }
    }

    pub fn is_text(self) -> bool {
        self != DoctorField::Speciality
    }

    /// Borrow the value of a text field. `None` for [`DoctorField::Speciality`].
    pub fn text(self, record: &DoctorRecord) -> Option<&str> {
        let value = match self {
            DoctorField::Name => &record.name,
            DoctorField::MedCertId => &record.med_cert_id,
            DoctorField::Phone => &record.phone,
            DoctorField::MobilePhone => &record.mobile_phone,
            DoctorField::ZipCode => &record.zip_code,
            DoctorField::Address => &record.address,
            DoctorField::Number => &record.number,
            DoctorField::Neighborhood => &record.neighborhood,
            DoctorField::City => &record.city,
            DoctorField::StateProvince => &record.state_province,
            DoctorField::Speciality => return None,
        };
        Some(value.as_str())
    }

    /// Overwrite a text field on `record`.
    ///
    /// # Errors
    ///
    /// Returns [`DoctorError::NotATextField`] for [`DoctorField::Speciality`]; the record is
    /// left unchanged.
    pub fn set_text(self, record: &mut DoctorRecord, value: String) -> DoctorResult<()> {
        let slot = self
            .text_mut(record)
            .ok_or(DoctorError::NotATextField(self))?;
        *slot = value;
        Ok(())
    }

    /// Empty a text field on `record`. Does nothing for [`DoctorField::Speciality`].
    pub fn clear_text(self, record: &mut DoctorRecord) {
        if let Some(slot) = self.text_mut(record) {
            slot.clear();
        }
    }

    fn text_mut(self, record: &mut DoctorRecord) -> Option<&mut String> {
        let slot = match self {
            DoctorField::Name => &mut record.name,
            DoctorField::MedCertId => &mut record.med_cert_id,
            DoctorField::Phone => &mut record.phone,
            DoctorField::MobilePhone => &mut record.mobile_phone,
            DoctorField::ZipCode => &mut record.zip_code,
            DoctorField::Address => &mut record.address,
            DoctorField::Number => &mut record.number,
            DoctorField::Neighborhood => &mut record.neighborhood,
            DoctorField::City => &mut record.city,
            DoctorField::StateProvince => &mut record.state_province,
            DoctorField::Speciality => return None,
        };
        Some(slot)
    }
}

impl std::fmt::Display for DoctorField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.path())
    }
}

impl std::str::FromStr for DoctorField {
    type Err = DoctorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_path(s).ok_or_else(|| DoctorError::UnknownField(s.to_string()))
    }
}
