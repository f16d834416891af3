use thiserror::Error;

/// Failures surfaced to the caller. All of them are synchronous and leave
/// previously persisted state unchanged.
#[derive(Debug, Error)]
pub enum Error {
    #[error("email already registered")]
    DuplicateEmail,

    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("not logged in")]
    NotAuthenticated,

    #[error("email already in use")]
    EmailInUse,

    #[error("current password is incorrect")]
    IncorrectPassword,

    #[error("task not found: {0}")]
    TaskNotFound(String),

    #[error("{0}")]
    Validation(String),

    /// Store I/O, serialization or hashing failures.
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub fn validation(msg: impl Into<String>) -> Self {
        Error::Validation(msg.into())
    }
}
