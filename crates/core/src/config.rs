//! Core runtime configuration.
//!
//! This module defines configuration that should be resolved once at process startup and then
//! passed into core services. Environment variables are read by the binaries only; the helpers
//! here take the raw optional values so request handling never touches process-wide state.

use crate::constants::{
    DEFAULT_ADDRESS_LOOKUP_TIMEOUT_SECS, DEFAULT_ADDRESS_LOOKUP_URL, DEFAULT_DOCTOR_DATA_DIR,
    DOCTORS_DIR_NAME,
};
use crate::{DoctorError, DoctorResult};
use docdir_types::NonEmptyText;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Core configuration resolved at startup.
#[derive(Clone, Debug)]
pub struct CoreConfig {
    doctor_data_dir: PathBuf,
    address_lookup_url: NonEmptyText,
    address_lookup_timeout: Duration,
}

impl CoreConfig {
    /// Create a new `CoreConfig`.
    ///
    /// # Errors
    ///
    /// Returns `DoctorError::InvalidInput` if the lookup URL is not an http(s) URL or the
    /// timeout is zero.
    pub fn new(
        doctor_data_dir: PathBuf,
        address_lookup_url: NonEmptyText,
        address_lookup_timeout: Duration,
    ) -> DoctorResult<Self> {
        let url = address_lookup_url.as_str();
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(DoctorError::InvalidInput(format!(
                "address lookup URL must start with http:// or https://, got '{url}'"
            )));
        }
        if address_lookup_timeout.is_zero() {
            return Err(DoctorError::InvalidInput(
                "address lookup timeout cannot be zero".into(),
            ));
        }

        Ok(Self {
            doctor_data_dir,
            address_lookup_url: NonEmptyText::new(url.trim_end_matches('/'))?,
            address_lookup_timeout,
        })
    }

    pub fn doctor_data_dir(&self) -> &Path {
        &self.doctor_data_dir
    }

    pub fn doctors_dir(&self) -> PathBuf {
        self.doctor_data_dir.join(DOCTORS_DIR_NAME)
    }

    /// Base URL of the upstream postal-code service, without a trailing slash.
    pub fn address_lookup_url(&self) -> &str {
        self.address_lookup_url.as_str()
    }

    pub fn address_lookup_timeout(&self) -> Duration {
        self.address_lookup_timeout
    }
}

/// Resolve the data directory from an optional override, falling back to the default.
pub fn data_dir_from_env_value(value: Option<String>) -> PathBuf {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_DOCTOR_DATA_DIR))
}

/// Parse the upstream lookup URL from an optional string value.
///
/// If `value` is `None` or empty/whitespace, returns the default ViaCEP base URL.
pub fn lookup_url_from_env_value(value: Option<String>) -> DoctorResult<NonEmptyText> {
    let value = value.filter(|v| !v.trim().is_empty());
    Ok(NonEmptyText::new(
        value.as_deref().unwrap_or(DEFAULT_ADDRESS_LOOKUP_URL),
    )?)
}

/// Parse the upstream lookup timeout (whole seconds) from an optional string value.
///
/// If `value` is `None` or empty/whitespace, returns the default timeout.
pub fn lookup_timeout_from_env_value(value: Option<String>) -> DoctorResult<Duration> {
    let value = value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty());
    let secs = match value {
        Some(v) => v.parse::<u64>().map_err(|e| {
            DoctorError::InvalidInput(format!("invalid lookup timeout '{v}': {e}"))
        })?,
        None => DEFAULT_ADDRESS_LOOKUP_TIMEOUT_SECS,
    };
    Ok(Duration::from_secs(secs))
}

/// Create the data and doctors directories if they do not exist yet.
///
/// This is intended to be run at startup, after `CoreConfig` is constructed.
pub fn ensure_storage_dirs(cfg: &CoreConfig) -> DoctorResult<()> {
    std::fs::create_dir_all(cfg.doctors_dir()).map_err(DoctorError::StorageDirCreation)
}
