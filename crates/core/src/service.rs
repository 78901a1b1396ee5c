//! Validate-then-persist operations behind the create and update endpoints.
//!
//! This module contains **only** data operations; HTTP status mapping and response
//! envelopes belong in `api-rest`.

use crate::config::CoreConfig;
use crate::repository::DoctorRepository;
use crate::speciality::SpecialityCatalog;
use crate::validation::validate_doctor;
use crate::DoctorResult;
use api_shared::{DoctorId, DoctorRecord, FieldViolation};
use std::sync::Arc;

/// Result of a save attempt that reached validation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SaveOutcome {
    /// The record passed validation and was written.
    Saved(DoctorRecord),
    /// The record was rejected; nothing was written.
    Rejected(Vec<FieldViolation>),
}

/// Service for creating, updating and reading doctors.
#[derive(Clone, Debug)]
pub struct DoctorService {
    repository: DoctorRepository,
    catalog: Arc<SpecialityCatalog>,
}

impl DoctorService {
    /// Creates a service over the standard speciality catalog.
    pub fn new(cfg: Arc<CoreConfig>) -> Self {
        Self::with_catalog(cfg, SpecialityCatalog::standard())
    }

    pub fn with_catalog(cfg: Arc<CoreConfig>, catalog: SpecialityCatalog) -> Self {
        Self {
            repository: DoctorRepository::new(cfg),
            catalog: Arc::new(catalog),
        }
    }

    pub fn catalog(&self) -> &SpecialityCatalog {
        &self.catalog
    }

    /// Validates and stores a new doctor.
    ///
    /// # Errors
    ///
    /// Returns `DoctorError` only for storage failures; validation failures are
    /// `Ok(SaveOutcome::Rejected(..))`.
    pub fn create(&self, draft: DoctorRecord) -> DoctorResult<SaveOutcome> {
        let violations = validate_doctor(&draft, &self.catalog);
        if !violations.is_empty() {
            tracing::debug!(fields = violations.len(), "rejected new doctor");
            return Ok(SaveOutcome::Rejected(violations));
        }
        self.repository.create(draft).map(SaveOutcome::Saved)
    }

    /// Validates and replaces an existing doctor.
    ///
    /// # Errors
    ///
    /// Returns `DoctorError::NotFound`, `DoctorError::IdMismatch` or a storage error.
    /// Validation failures are `Ok(SaveOutcome::Rejected(..))`.
    pub fn update(&self, id: DoctorId, draft: DoctorRecord) -> DoctorResult<SaveOutcome> {
        let violations = validate_doctor(&draft, &self.catalog);
        if !violations.is_empty() {
            tracing::debug!(doctor_id = %id, fields = violations.len(), "rejected doctor update");
            return Ok(SaveOutcome::Rejected(violations));
        }
        self.repository.update(id, draft).map(SaveOutcome::Saved)
    }

    /// Reads one doctor.
    ///
    /// # Errors
    ///
    /// Returns `DoctorError::NotFound` if absent, or a read/parse error.
    pub fn get(&self, id: DoctorId) -> DoctorResult<DoctorRecord> {
        self.repository.get(id).map(|stored| stored.record)
    }

    /// Lists all doctors, ordered by identifier.
    pub fn list(&self) -> Vec<DoctorRecord> {
        self.repository
            .list()
            .into_iter()
            .map(|stored| stored.record)
            .collect()
    }
}
