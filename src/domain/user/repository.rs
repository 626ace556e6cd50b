use async_trait::async_trait;

use super::{CreateUserDto, User};
use crate::domain::DomainResult;

/// Persistence boundary consumed by the auth service.
///
/// Implementations must reject a second user with the same email by
/// returning [`DomainError::EmailInUse`](crate::domain::DomainError::EmailInUse)
/// from `create`, so that concurrent signups cannot both succeed.
#[async_trait]
pub trait UserRepositoryInterface: Send + Sync {
    /// All users registered under `email` (empty if none).
    async fn find(&self, email: &str) -> DomainResult<Vec<User>>;

    async fn create(&self, dto: CreateUserDto) -> DomainResult<User>;
}
