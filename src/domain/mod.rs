//! Domain layer: entities, DTOs and the repository boundary.

pub mod user;

pub use user::{CreateUserDto, User, UserRepositoryInterface};

// Re-export errors from support for convenience
pub use crate::support::errors::{DomainError, DomainResult, ErrorKind};
