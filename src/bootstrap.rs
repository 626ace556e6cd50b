//! Process bootstrap shared by the CLI and embedders.
//!
//! [`AuthRuntime`] wires configuration, database, migrations and the
//! [`AuthService`] together; [`init_tracing`] installs the subscriber.

use std::sync::Arc;

use sea_orm::DatabaseConnection;
use sea_orm_migration::MigratorTrait;
use tracing::info;

use crate::application::identity::AuthService;
use crate::config::AppConfig;
use crate::infrastructure::crypto::password::PasswordHasher;
use crate::infrastructure::database::migrator::Migrator;
use crate::infrastructure::database::{init_database, UserRepository};
use crate::support::errors::{AppError, InfraError};

// ── Options ────────────────────────────────────────────────────────

/// Options for starting the auth runtime.
pub struct RuntimeOptions {
    /// Application configuration.
    pub config: AppConfig,
    /// Run database migrations on startup (default: true).
    pub auto_migrate: bool,
}

impl Default for RuntimeOptions {
    fn default() -> Self {
        Self {
            config: AppConfig::default(),
            auto_migrate: true,
        }
    }
}

// ── AuthRuntime ────────────────────────────────────────────────────

/// A database-backed [`AuthService`] and the connection it runs on.
pub struct AuthRuntime {
    pub service: Arc<AuthService<UserRepository>>,
    /// The configuration the runtime was started with.
    pub config: AppConfig,

    db: DatabaseConnection,
}

impl AuthRuntime {
    /// Connect to the database, run migrations (if enabled) and build the
    /// auth service with the configured scrypt settings.
    pub async fn start(opts: RuntimeOptions) -> Result<Self, AppError> {
        let config = opts.config;

        let hasher = PasswordHasher::new(config.scrypt_settings())?;

        let db = init_database(&config.database_config())
            .await
            .map_err(InfraError::from)?;

        if opts.auto_migrate {
            info!("Running database migrations...");
            Migrator::up(&db, None).await.map_err(InfraError::from)?;
            info!("Migrations completed");
        }

        let repo = Arc::new(UserRepository::new(db.clone()));
        let service = Arc::new(AuthService::new(repo, hasher));

        Ok(Self {
            service,
            config,
            db,
        })
    }

    /// Close the database pool.
    pub async fn shutdown(self) -> Result<(), AppError> {
        self.db.close().await.map_err(InfraError::from)?;
        info!("Database connection closed");
        Ok(())
    }
}

/// Initialize tracing (logging) from the application config.
///
/// Call this once at process startup (before [`AuthRuntime::start`]).
pub fn init_tracing(config: &AppConfig) {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.logging.level));

    match config.logging.format.to_lowercase().as_str() {
        "json" => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer())
                .init();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::DomainError;

    fn memory_config() -> AppConfig {
        let mut config = AppConfig::from_toml_str(
            r#"
            [database]
            url = "sqlite::memory:"
            max_connections = 1

            [security]
            scrypt_log_n = 4
            "#,
        )
        .unwrap();
        config.logging.level = "warn".to_string();
        config
    }

    #[tokio::test]
    async fn test_runtime_signup_signin() {
        let runtime = AuthRuntime::start(RuntimeOptions {
            config: memory_config(),
            auto_migrate: true,
        })
        .await
        .unwrap();

        let created = runtime.service.signup("a@x.com", "pw1").await.unwrap();
        let user = runtime.service.signin("a@x.com", "pw1").await.unwrap();
        assert_eq!(user.id, created.id);

        let err = runtime.service.signup("a@x.com", "pw2").await.unwrap_err();
        assert!(matches!(err, DomainError::EmailInUse(_)));

        runtime.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn test_runtime_rejects_invalid_scrypt_settings() {
        let mut config = memory_config();
        config.security.scrypt_log_n = 64;

        let result = AuthRuntime::start(RuntimeOptions {
            config,
            auto_migrate: true,
        })
        .await;
        assert!(matches!(result, Err(AppError::Infra(InfraError::Crypto(_)))));
    }

    #[tokio::test]
    async fn test_runtime_without_migrations_reports_storage_error() {
        let runtime = AuthRuntime::start(RuntimeOptions {
            config: memory_config(),
            auto_migrate: false,
        })
        .await
        .unwrap();

        let err = runtime.service.signin("a@x.com", "pw").await.unwrap_err();
        assert!(matches!(err, DomainError::Storage(_)));
    }
}
