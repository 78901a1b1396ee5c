use docdir_core::DoctorError;

#[derive(Debug, thiserror::Error)]
pub enum FormError {
    #[error("cannot open an edit form for a doctor without an id")]
    MissingId,
    #[error("invalid base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },
    #[error("failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
    #[error(transparent)]
    Core(#[from] DoctorError),
}

pub type FormResult<T> = std::result::Result<T, FormError>;
