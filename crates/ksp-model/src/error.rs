use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ModelError {
    #[error("unrecognized campaign state '{0}' (expected 'successful' or 'failed')")]
    UnknownState(String),
    #[error("invalid outcome label {0} (expected 0 or 1)")]
    InvalidLabel(u8),
}

pub type Result<T> = std::result::Result<T, ModelError>;
