//! Signup / signin service — application-layer orchestration
//!
//! Password storage and verification live here; persistence is delegated
//! to a `UserRepositoryInterface` supplied at construction.

use std::sync::Arc;

use tracing::{error, info, warn};

use crate::domain::{CreateUserDto, DomainError, DomainResult, User, UserRepositoryInterface};
use crate::infrastructure::crypto::password::{PasswordHasher, StoredPassword};

/// Auth service — orchestrates the signup and signin use-cases.
///
/// Generic over `R: UserRepositoryInterface` so it stays decoupled from
/// the concrete persistence layer.
pub struct AuthService<R: UserRepositoryInterface> {
    repo: Arc<R>,
    hasher: PasswordHasher,
}

impl<R: UserRepositoryInterface> AuthService<R> {
    pub fn new(repo: Arc<R>, hasher: PasswordHasher) -> Self {
        Self { repo, hasher }
    }

    pub fn repository(&self) -> &Arc<R> {
        &self.repo
    }

    // ── Signup ──────────────────────────────────────────────────

    /// Register a new user, storing the password as `salt.hash`.
    pub async fn signup(&self, email: &str, password: &str) -> DomainResult<User> {
        if !self.repo.find(email).await?.is_empty() {
            warn!(email, "Signup rejected: email in use");
            return Err(DomainError::EmailInUse(email.to_string()));
        }

        let password = self.hasher.hash_blocking(password).await?;

        // The repository rejects duplicates too, covering concurrent signups
        // that both passed the check above.
        let user = self
            .repo
            .create(CreateUserDto {
                email: email.to_string(),
                password,
            })
            .await?;

        info!(user_id = user.id, email = %user.email, "New user signed up");
        Ok(user)
    }

    // ── Signin ──────────────────────────────────────────────────

    /// Authenticate by email + password and return the matching user.
    pub async fn signin(&self, email: &str, password: &str) -> DomainResult<User> {
        let mut users = self.repo.find(email).await?;

        let user = match users.len() {
            0 => {
                warn!(email, "Signin rejected: unknown email");
                return Err(DomainError::UserNotFound(email.to_string()));
            }
            1 => users.remove(0),
            count => {
                error!(email, count, "Multiple accounts registered under one email");
                return Err(DomainError::AmbiguousAccount {
                    email: email.to_string(),
                    count,
                });
            }
        };

        let stored = StoredPassword::parse(&user.password).ok_or_else(|| {
            error!(user_id = user.id, "Stored password is malformed");
            DomainError::MalformedPasswordHash(user.id)
        })?;

        if !self.hasher.verify_blocking(password, stored).await? {
            warn!(user_id = user.id, "Signin rejected: invalid credentials");
            return Err(DomainError::InvalidCredentials);
        }

        info!(user_id = user.id, "User signed in");
        Ok(user)
    }
}
