//! JSON wire types exchanged between the REST API and its clients.
//!
//! Field names follow the camelCase convention used on the wire (`medCertId`,
//! `newData`, `stateAbbreviation`); the Rust side keeps snake_case.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Identifier assigned to a doctor by the persistence layer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DoctorId(u64);

impl DoctorId {
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub const fn get(self) -> u64 {
        self.0
    }

    /// The identifier allocated after this one, or `None` once `u64` runs out.
    pub const fn checked_next(self) -> Option<Self> {
        match self.0.checked_add(1) {
            Some(raw) => Some(Self(raw)),
            None => None,
        }
    }
}

impl std::fmt::Display for DoctorId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for DoctorId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<u64>().map(Self)
    }
}

/// The set of specialities chosen for a doctor.
///
/// Duplicates are collapsed on construction; the first occurrence keeps its position so
/// selection order survives for display.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct SpecialitySelection(Vec<String>);

impl SpecialitySelection {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut selected: Vec<String> = Vec::new();
        for name in names {
            let name = name.into();
            if !selected.contains(&name) {
                selected.push(name);
            }
        }
        Self(selected)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.iter().any(|s| s == name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Renders the selection the way the picker shows it, e.g. `"Angiologia, Alergologia"`.
    pub fn display_label(&self) -> String {
        self.0.join(", ")
    }
}

impl From<Vec<String>> for SpecialitySelection {
    fn from(names: Vec<String>) -> Self {
        Self::new(names)
    }
}

impl From<SpecialitySelection> for Vec<String> {
    fn from(selection: SpecialitySelection) -> Self {
        selection.0
    }
}

/// A doctor record as sent by the form and stored by the API.
///
/// The empty template used by a fresh create form is `DoctorRecord::default()`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DoctorRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<u64>)]
    pub id: Option<DoctorId>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub med_cert_id: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub mobile_phone: String,
    #[serde(default)]
    pub zip_code: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub number: String,
    #[serde(default)]
    pub neighborhood: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub state_province: String,
    #[serde(default)]
    #[schema(value_type = Vec<String>)]
    pub speciality: SpecialitySelection,
}

impl DoctorRecord {
    /// Returns a copy of this record carrying `id`.
    pub fn with_id(mut self, id: DoctorId) -> Self {
        self.id = Some(id);
        self
    }
}

/// One server-reported validation failure for a single field.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct FieldViolation {
    /// Wire name of the offending field (for example `medCertId`).
    pub path: String,
    /// Messages in rule order; clients usually show only the first.
    pub errors: Vec<String>,
}

impl FieldViolation {
    pub fn new(path: impl Into<String>, errors: Vec<String>) -> Self {
        Self {
            path: path.into(),
            errors,
        }
    }
}

/// Container for validation failures, mirroring the `info.inner` shape clients expect.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ValidationInfo {
    #[serde(default)]
    pub inner: Vec<FieldViolation>,
}

/// Response body of the create and update endpoints.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct SubmissionRes {
    pub success: bool,
    #[serde(rename = "newData", default, skip_serializing_if = "Option::is_none")]
    pub new_data: Option<DoctorRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub info: Option<ValidationInfo>,
    #[serde(default)]
    pub message: String,
}

impl SubmissionRes {
    pub fn succeeded(new_data: DoctorRecord, message: impl Into<String>) -> Self {
        Self {
            success: true,
            new_data: Some(new_data),
            info: None,
            message: message.into(),
        }
    }

    pub fn rejected(inner: Vec<FieldViolation>, message: impl Into<String>) -> Self {
        Self {
            success: false,
            new_data: None,
            info: Some(ValidationInfo { inner }),
            message: message.into(),
        }
    }

    /// A failure that carries no field-level detail (unknown record, storage error).
    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            new_data: None,
            info: None,
            message: message.into(),
        }
    }
}

/// Response body of `GET /api/doctor`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ListDoctorsRes {
    pub doctors: Vec<DoctorRecord>,
}

/// Response body of `GET /api/specialities`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct SpecialitiesRes {
    pub specialities: Vec<String>,
}

/// A resolved address breakdown for a postal code.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AddressFound {
    pub street: String,
    pub neighborhood: String,
    pub city: String,
    pub state_abbreviation: String,
}

/// Body returned when a postal code has no match, or the lookup could not be served.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct AddressMessage {
    pub message: String,
}

/// Response body of `GET /api/services/address/{code}`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(untagged)]
pub enum AddressRes {
    Found(AddressFound),
    NotFound(AddressMessage),
}

/// Response body of `GET /health`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct HealthRes {
    pub ok: bool,
    pub message: String,
}

impl HealthRes {
    /// The answer of a running server. The server stays up without its data directory,
    /// so liveness is all this reports.
    pub fn alive() -> Self {
        Self {
            ok: true,
            message: "Doctor directory is alive".into(),
        }
    }
}
