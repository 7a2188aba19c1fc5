use thiserror::Error;

/// Application-level errors (command layer)
#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    RfcError(#[from] kalends_rfc::error::RfcError),

    #[error(transparent)]
    CoreError(#[from] kalends_core::error::CoreError),

    #[error("Invalid revision '{0}', expected SEQ or SEQ@DTSTAMP")]
    InvalidRevision(String),
}

pub type AppResult<T> = std::result::Result<T, AppError>;
