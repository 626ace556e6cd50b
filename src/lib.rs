//! # Users Auth
//!
//! Email + password signup and signin with salted scrypt hashes.
//!
//! ## Architecture
//!
//! The project follows Clean Architecture principles:
//!
//! - **domain**: User entity, DTOs and the repository trait
//! - **application**: `AuthService` (signup / signin use cases)
//! - **infrastructure**: Password hashing, in-memory and SeaORM repositories
//! - **support**: Error types
//! - **config** / **bootstrap**: TOML configuration, tracing and runtime wiring

pub mod application;
pub mod bootstrap;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod support;

pub use config::{default_config_path, AppConfig};

pub use application::AuthService;
pub use bootstrap::{init_tracing, AuthRuntime, RuntimeOptions};
pub use domain::{
    CreateUserDto, DomainError, DomainResult, ErrorKind, User, UserRepositoryInterface,
};
pub use infrastructure::{
    init_database, DatabaseConfig, InMemoryUserRepository, PasswordHasher, ScryptSettings,
    UserRepository,
};
pub use support::errors::{AppError, InfraError};
