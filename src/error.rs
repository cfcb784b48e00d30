use thiserror::Error;

/// Failure taxonomy shared by the stores and services. Only the API layer
/// translates these into HTTP statuses; no kind crosses the wire untranslated.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("{0}")]
    Validation(String),
    #[error("Username already exists")]
    DuplicateUsername,
    #[error("{0}")]
    NotFound(String),
    #[error("Invalid password")]
    InvalidCredential,
    #[error("Invalid token")]
    InvalidToken,
    #[error("Only image files are allowed")]
    UnsupportedMediaType,
    #[error("File size too large. Maximum size is 5MB.")]
    PayloadTooLarge,
    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}

impl From<rusqlite::Error> for DomainError {
    fn from(err: rusqlite::Error) -> Self {
        DomainError::Storage(anyhow::Error::new(err))
    }
}

pub type DomainResult<T> = Result<T, DomainError>;
