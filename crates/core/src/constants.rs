//! Constants used throughout the doctor directory core crate.
//!
//! This module contains path, filename and field-limit constants to ensure
//! consistency across the codebase and make maintenance easier.

/// Directory name for doctor records storage, relative to the data directory.
pub const DOCTORS_DIR_NAME: &str = "doctors";

/// Default directory for doctor data storage when no explicit directory is configured.
pub const DEFAULT_DOCTOR_DATA_DIR: &str = "doctor_data";

/// File extension of stored doctor records.
pub const DOCTOR_FILE_EXTENSION: &str = "yaml";

/// Default base URL of the upstream postal-code service.
pub const DEFAULT_ADDRESS_LOOKUP_URL: &str = "https://viacep.com.br/ws";

/// Default timeout, in seconds, for a single upstream postal-code request.
pub const DEFAULT_ADDRESS_LOOKUP_TIMEOUT_SECS: u64 = 10;

/// Maximum length of a doctor's name, in characters.
pub const NAME_MAX_LEN: usize = 120;

/// Maximum length of a professional registration number.
pub const MED_CERT_ID_MAX_LEN: usize = 7;

/// Maximum length of a phone or mobile phone number.
pub const PHONE_MAX_LEN: usize = 11;
