//! Doctor record persistence.
//!
//! ## Storage Layout
//!
//! Each doctor is stored as one YAML file named after its identifier:
//!
//! ```text
//! <doctor_data_dir>/
//!   doctors/
//!     1.yaml
//!     2.yaml
//! ```
//!
//! Identifiers are allocated as one past the highest identifier on disk. Allocation and
//! writes are serialised through a process-local lock; multiple server processes sharing a
//! data directory are not supported.
//!
//! The on-disk wire model is strict: unknown keys are rejected and schema mismatches report
//! the offending path.

use crate::config::CoreConfig;
use crate::constants::DOCTOR_FILE_EXTENSION;
use crate::{DoctorError, DoctorResult};
use api_shared::{DoctorId, DoctorRecord, SpecialitySelection};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

/// A stored record together with its bookkeeping timestamps.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StoredDoctor {
    pub record: DoctorRecord,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// YAML-file-backed store of doctor records.
#[derive(Clone, Debug)]
pub struct DoctorRepository {
    cfg: Arc<CoreConfig>,
    write_lock: Arc<Mutex<()>>,
}

impl DoctorRepository {
    pub fn new(cfg: Arc<CoreConfig>) -> Self {
        Self {
            cfg,
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    fn record_path(&self, id: DoctorId) -> PathBuf {
        self.cfg
            .doctors_dir()
            .join(format!("{id}.{DOCTOR_FILE_EXTENSION}"))
    }

    /// Highest identifier currently on disk, judged by file name alone.
    fn highest_id(&self) -> DoctorResult<Option<DoctorId>> {
        let entries = match fs::read_dir(self.cfg.doctors_dir()) {
            Ok(it) => it,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(DoctorError::FileRead(e)),
        };

        Ok(entries
            .flatten()
            .filter_map(|entry| {
                let path = entry.path();
                if path.extension()?.to_str()? != DOCTOR_FILE_EXTENSION {
                    return None;
                }
                path.file_stem()?.to_str()?.parse::<DoctorId>().ok()
            })
            .max())
    }

    /// Persists a new doctor and assigns its identifier.
    ///
    /// Any `id` on `draft` is ignored.
    ///
    /// # Errors
    ///
    /// Returns `DoctorError::IdsExhausted` if the highest identifier on disk is `u64::MAX`,
    /// or another `DoctorError` if the doctors directory cannot be created or the file cannot
    /// be serialised or written.
    pub fn create(&self, draft: DoctorRecord) -> DoctorResult<DoctorRecord> {
        let _guard = self.write_lock.lock().map_err(|_| DoctorError::LockPoisoned)?;

        fs::create_dir_all(self.cfg.doctors_dir()).map_err(DoctorError::StorageDirCreation)?;

        let id = match self.highest_id()? {
            None => DoctorId::new(1),
            Some(highest) => highest.checked_next().ok_or(DoctorError::IdsExhausted)?,
        };
        let now = Utc::now();
        let stored = StoredDoctor {
            record: draft.with_id(id),
            created_at: now,
            updated_at: now,
        };

        let yaml = render(&stored)?;
        fs::write(self.record_path(id), yaml).map_err(DoctorError::FileWrite)?;

        tracing::info!(doctor_id = %id, "created doctor record");
        Ok(stored.record)
    }

    /// Replaces every field of an existing doctor.
    ///
    /// The identifier is immutable: `draft.id` may be absent or equal to `id`.
    ///
    /// # Errors
    ///
    /// Returns:
    /// - `DoctorError::IdMismatch` if `draft` carries a different identifier,
    /// - `DoctorError::NotFound` if no record with `id` exists,
    /// - any read, parse or write error.
    pub fn update(&self, id: DoctorId, draft: DoctorRecord) -> DoctorResult<DoctorRecord> {
        if let Some(body_id) = draft.id {
            if body_id != id {
                return Err(DoctorError::IdMismatch {
                    path_id: id,
                    body_id,
                });
            }
        }

        let _guard = self.write_lock.lock().map_err(|_| DoctorError::LockPoisoned)?;

        let existing = self.get(id)?;
        let stored = StoredDoctor {
            record: draft.with_id(id),
            created_at: existing.created_at,
            updated_at: Utc::now(),
        };

        let yaml = render(&stored)?;
        fs::write(self.record_path(id), yaml).map_err(DoctorError::FileWrite)?;

        tracing::info!(doctor_id = %id, "updated doctor record");
        Ok(stored.record)
    }

    /// Reads one doctor.
    ///
    /// # Errors
    ///
    /// Returns `DoctorError::NotFound` if the file does not exist, `DoctorError::Translation`
    /// if the file holds a different identifier, or a read/parse error.
    pub fn get(&self, id: DoctorId) -> DoctorResult<StoredDoctor> {
        let contents = match fs::read_to_string(self.record_path(id)) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(DoctorError::NotFound(id))
            }
            Err(e) => return Err(DoctorError::FileRead(e)),
        };
        parse_as(id, &contents)
    }

    /// Lists every stored doctor, ordered by identifier.
    ///
    /// Files that cannot be read or parsed, or whose name does not match the stored
    /// identifier, are logged as warnings and skipped.
    pub fn list(&self) -> Vec<StoredDoctor> {
        let mut doctors = Vec::new();

        let entries = match fs::read_dir(self.cfg.doctors_dir()) {
            Ok(it) => it,
            Err(_) => return doctors,
        };

        for entry in entries.flatten() {
            let path = entry.path();
            let is_record = path
                .extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| ext == DOCTOR_FILE_EXTENSION);
            if !path.is_file() || !is_record {
                continue;
            }
            let Some(id) = path
                .file_stem()
                .and_then(|stem| stem.to_str())
                .and_then(|stem| stem.parse::<DoctorId>().ok())
            else {
                tracing::warn!("skipping doctor file without a numeric name: {}", path.display());
                continue;
            };

            match fs::read_to_string(&path)
                .map_err(DoctorError::FileRead)
                .and_then(|c| parse_as(id, &c))
            {
                Ok(stored) => doctors.push(stored),
                Err(e) => {
                    tracing::warn!("failed to load doctor record: {} - {}", path.display(), e);
                }
            }
        }

        doctors.sort_by_key(|d| d.record.id);
        doctors
    }
}

// ============================================================================
// Wire types (internal)
// ============================================================================

/// On-disk representation of a doctor record.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
struct StoredDoctorWire {
    id: u64,
    name: String,
    #[serde(default)]
    med_cert_id: String,
    #[serde(default)]
    phone: String,
    #[serde(default)]
    mobile_phone: String,
    #[serde(default)]
    zip_code: String,
    #[serde(default)]
    address: String,
    #[serde(default)]
    number: String,
    #[serde(default)]
    neighborhood: String,
    #[serde(default)]
    city: String,
    #[serde(default)]
    state_province: String,
    #[serde(default)]
    speciality: Vec<String>,
    created_at: String,
    updated_at: String,
}

fn render(stored: &StoredDoctor) -> DoctorResult<String> {
    let record = &stored.record;
    let id = record
        .id
        .ok_or_else(|| DoctorError::InvalidInput("cannot store a doctor without an id".into()))?;

    let wire = StoredDoctorWire {
        id: id.get(),
        name: record.name.clone(),
        med_cert_id: record.med_cert_id.clone(),
        phone: record.phone.clone(),
        mobile_phone: record.mobile_phone.clone(),
        zip_code: record.zip_code.clone(),
        address: record.address.clone(),
        number: record.number.clone(),
        neighborhood: record.neighborhood.clone(),
        city: record.city.clone(),
        state_province: record.state_province.clone(),
        speciality: record.speciality.as_slice().to_vec(),
        created_at: stored.created_at.to_rfc3339(),
        updated_at: stored.updated_at.to_rfc3339(),
    };
    serde_yaml::to_string(&wire).map_err(DoctorError::YamlSerialization)
}

/// Parse a record read from the file for `id`; the stored identifier must agree.
fn parse_as(id: DoctorId, yaml_text: &str) -> DoctorResult<StoredDoctor> {
    let stored = parse(yaml_text)?;
    match stored.record.id {
        Some(stored_id) if stored_id == id => Ok(stored),
        Some(stored_id) => Err(DoctorError::Translation(format!(
            "doctor file {id}.{DOCTOR_FILE_EXTENSION} holds id {stored_id}"
        ))),
        None => Err(DoctorError::Translation(format!(
            "doctor file {id}.{DOCTOR_FILE_EXTENSION} has no id"
        ))),
    }
}

fn parse(yaml_text: &str) -> DoctorResult<StoredDoctor> {
    let deserializer = serde_yaml::Deserializer::from_str(yaml_text);

    let wire = match serde_path_to_error::deserialize::<_, StoredDoctorWire>(deserializer) {
        Ok(parsed) => parsed,
        Err(err) => {
            let path = err.path().to_string();
            let source = err.into_inner();
            let path = if path.is_empty() {
                "<root>"
            } else {
                path.as_str()
            };
            return Err(DoctorError::Translation(format!(
                "doctor schema mismatch at {path}: {source}"
            )));
        }
    };

    let parse_time = |label: &str, value: &str| {
        value
            .parse::<DateTime<Utc>>()
            .map_err(|e| DoctorError::Translation(format!("invalid {label} '{value}': {e}")))
    };
    let created_at = parse_time("createdAt", &wire.created_at)?;
    let updated_at = parse_time("updatedAt", &wire.updated_at)?;

    Ok(StoredDoctor {
        record: DoctorRecord {
            id: Some(DoctorId::new(wire.id)),
            name: wire.name,
            med_cert_id: wire.med_cert_id,
            phone: wire.phone,
            mobile_phone: wire.mobile_phone,
            zip_code: wire.zip_code,
            address: wire.address,
            number: wire.number,
            neighborhood: wire.neighborhood,
            city: wire.city,
            state_province: wire.state_province,
            speciality: SpecialitySelection::new(wire.speciality),
        },
        created_at,
        updated_at,
    })
}
