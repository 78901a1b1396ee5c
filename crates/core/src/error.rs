use crate::field::DoctorField;
use api_shared::DoctorId;

#[derive(Debug, thiserror::Error)]
pub enum DoctorError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("failed to create storage directory: {0}")]
    StorageDirCreation(std::io::Error),
    #[error("failed to write doctor file: {0}")]
    FileWrite(std::io::Error),
    #[error("failed to read doctor file: {0}")]
    FileRead(std::io::Error),
    #[error("failed to serialize YAML: {0}")]
    YamlSerialization(serde_yaml::Error),
    #[error("translation error: {0}")]
    Translation(String),

    #[error("doctor {0} not found")]
    NotFound(DoctorId),
    #[error("doctor id is immutable: path has {path_id}, body has {body_id}")]
    IdMismatch { path_id: DoctorId, body_id: DoctorId },
    #[error("{0} is not a text field")]
    NotATextField(DoctorField),
    #[error("unknown doctor field: {0}")]
    UnknownField(String),
    #[error("{field} accepts at most {max} characters")]
    InputTooLong { field: DoctorField, max: usize },
    #[error("doctor id space is exhausted")]
    IdsExhausted,
    #[error("doctor repository lock was poisoned")]
    LockPoisoned,

    #[error("invalid text: {0}")]
    Text(#[from] docdir_types::TextError),
}

pub type DoctorResult<T> = std::result::Result<T, DoctorError>;
