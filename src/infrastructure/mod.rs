//! Infrastructure layer - external concerns

pub mod crypto;
pub mod database;
pub mod storage;

pub use crypto::{PasswordHasher, ScryptSettings};
pub use database::{init_database, DatabaseConfig, UserRepository};
pub use storage::InMemoryUserRepository;
