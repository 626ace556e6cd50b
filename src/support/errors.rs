use thiserror::Error;

/// Coarse classification an outer layer (HTTP, CLI) maps to a response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    BadRequest,
    NotFound,
    Internal,
}

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Email in use: {0}")]
    EmailInUse(String),

    #[error("User not found: {0}")]
    UserNotFound(String),

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("{count} accounts share email {email}")]
    AmbiguousAccount { email: String, count: usize },

    #[error("Stored password of user {0} is not in salt.hash form")]
    MalformedPasswordHash(i32),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Crypto error: {0}")]
    Crypto(String),
}

impl DomainError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            DomainError::EmailInUse(_) | DomainError::InvalidCredentials => ErrorKind::BadRequest,
            DomainError::UserNotFound(_) => ErrorKind::NotFound,
            _ => ErrorKind::Internal,
        }
    }
}

#[derive(Debug, Error)]
pub enum InfraError {
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    #[error("Crypto error: {0}")]
    Crypto(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<InfraError> for DomainError {
    fn from(err: InfraError) -> Self {
        match err {
            InfraError::Crypto(msg) => DomainError::Crypto(msg),
            other => DomainError::Storage(other.to_string()),
        }
    }
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Infra(#[from] InfraError),
}

/// Result type for domain operations
pub type DomainResult<T> = Result<T, DomainError>;
