//! In-memory user repository

use std::sync::atomic::{AtomicI32, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

use crate::domain::{CreateUserDto, DomainError, DomainResult, User, UserRepositoryInterface};

/// In-memory user storage for development and testing
pub struct InMemoryUserRepository {
    users: DashMap<i32, User>,
    /// email -> user id
    emails: DashMap<String, i32>,
    id_counter: AtomicI32,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self {
            users: DashMap::new(),
            emails: DashMap::new(),
            id_counter: AtomicI32::new(1),
        }
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}

impl Default for InMemoryUserRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UserRepositoryInterface for InMemoryUserRepository {
    async fn find(&self, email: &str) -> DomainResult<Vec<User>> {
        let Some(id) = self.emails.get(email).map(|id| *id) else {
            return Ok(Vec::new());
        };
        Ok(self.users.get(&id).map(|u| u.clone()).into_iter().collect())
    }

    async fn create(&self, dto: CreateUserDto) -> DomainResult<User> {
        // The entry guard holds the shard lock until the user is stored.
        match self.emails.entry(dto.email.clone()) {
            Entry::Occupied(_) => Err(DomainError::EmailInUse(dto.email)),
            Entry::Vacant(slot) => {
                let user = User {
                    id: self.id_counter.fetch_add(1, Ordering::SeqCst),
                    email: dto.email,
                    password: dto.password,
                    created_at: Utc::now(),
                };
                self.users.insert(user.id, user.clone());
                slot.insert(user.id);
                Ok(user)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;

    fn dto(email: &str) -> CreateUserDto {
        CreateUserDto {
            email: email.to_string(),
            password: "0011223344556677.abcd".to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_and_find() {
        let repo = InMemoryUserRepository::new();
        assert!(repo.is_empty());

        let created = repo.create(dto("a@x.com")).await.unwrap();
        assert_eq!(created.id, 1);
        assert_eq!(created.email, "a@x.com");

        let found = repo.find("a@x.com").await.unwrap();
        assert_eq!(found, vec![created]);
        assert!(repo.find("b@x.com").await.unwrap().is_empty());
        assert_eq!(repo.len(), 1);
    }

    #[tokio::test]
    async fn test_ids_are_sequential() {
        let repo = InMemoryUserRepository::new();
        let a = repo.create(dto("a@x.com")).await.unwrap();
        let b = repo.create(dto("b@x.com")).await.unwrap();
        assert_eq!(b.id, a.id + 1);
    }

    #[tokio::test]
    async fn test_duplicate_email_rejected() {
        let repo = InMemoryUserRepository::new();
        repo.create(dto("a@x.com")).await.unwrap();

        let err = repo.create(dto("a@x.com")).await.unwrap_err();
        assert!(matches!(err, DomainError::EmailInUse(ref e) if e == "a@x.com"));
        assert_eq!(repo.len(), 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_creates_single_winner() {
        let repo = Arc::new(InMemoryUserRepository::new());

        let handles: Vec<_> = (0..16)
            .map(|_| {
                let repo = repo.clone();
                tokio::spawn(async move { repo.create(dto("race@x.com")).await })
            })
            .collect();

        let mut created = 0;
        for handle in handles {
            if handle.await.unwrap().is_ok() {
                created += 1;
            }
        }

        assert_eq!(created, 1);
        assert_eq!(repo.find("race@x.com").await.unwrap().len(), 1);
    }
}
