//! # Doctor Directory Core
//!
//! Core business logic for the doctor directory.
//!
//! This crate contains pure data operations and file management:
//! - the closed set of doctor fields and the speciality catalog
//! - server-side validation producing per-field violations
//! - YAML storage of doctor records under the configured data directory
//!
//! **No API concerns**: HTTP servers and response envelopes belong in `api-rest`; form
//! state belongs in `docdir-form`.

pub mod config;
pub mod constants;
pub mod error;
pub mod field;
pub mod repository;
pub mod service;
pub mod speciality;
pub mod validation;

// Record and envelope types live in the shared wire crate.
pub use api_shared::{DoctorId, DoctorRecord, FieldViolation, SpecialitySelection};

pub use config::CoreConfig;
pub use constants::DEFAULT_DOCTOR_DATA_DIR;
pub use error::{DoctorError, DoctorResult};
pub use field::DoctorField;
pub use repository::{DoctorRepository, StoredDoctor};
pub use service::{DoctorService, SaveOutcome};
pub use speciality::{SpecialityCatalog, SPECIALITY_CATALOG};
pub use validation::validate_doctor;

pub use docdir_types::{NonEmptyText, PostalCode, TextError};
