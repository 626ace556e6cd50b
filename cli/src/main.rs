//! Users Auth — CLI
//!
//! Sign users up and in against the configured database.
//!
//! ```sh
//! # Create a user (default config: ~/.config/users-auth/config.toml)
//! users-auth signup --email a@x.com --password pw1
//!
//! # Authenticate
//! users-auth signin --email a@x.com --password pw1
//!
//! # Point at another database
//! users-auth --database-url "sqlite://./other.db?mode=rwc" signin --email a@x.com
//!
//! # Validate config and exit
//! users-auth check
//! ```

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use tracing::{error, info};

use users_auth::{init_tracing, AppConfig, AuthRuntime, PasswordHasher, RuntimeOptions, User};

/// Users Auth — email + password signup and signin.
#[derive(Parser, Debug)]
#[command(name = "users-auth", version, about = "Email + password signup and signin")]
struct Cli {
    /// Path to the configuration file (TOML).
    #[arg(short, long, env = "USERS_AUTH_CONFIG")]
    config: Option<PathBuf>,

    /// Override the database URL.
    #[arg(long, env = "DATABASE_URL")]
    database_url: Option<String>,

    /// Override the log level (trace, debug, info, warn, error).
    #[arg(short, long)]
    log_level: Option<String>,

    /// Skip database migrations on startup.
    #[arg(long)]
    no_migrate: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Register a new user.
    Signup(Credentials),
    /// Authenticate an existing user.
    Signin(Credentials),
    /// Validate the configuration and print the effective values.
    /// Fails if the config file cannot be loaded.
    Check,
}

#[derive(Args, Debug)]
struct Credentials {
    #[arg(short, long)]
    email: String,

    #[arg(short, long, env = "USERS_AUTH_PASSWORD", hide_env_values = true)]
    password: String,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // ── Load configuration ─────────────────────────────────────
    let config_path = cli
        .config
        .clone()
        .unwrap_or_else(users_auth::default_config_path);

    let (mut config, load_err) = match AppConfig::load(&config_path) {
        Ok(cfg) => (cfg, None),
        Err(e) => (AppConfig::default(), Some(e)),
    };

    if let Some(ref level) = cli.log_level {
        config.logging.level = level.clone();
    }

    // Init tracing first so subsequent logs are formatted properly
    init_tracing(&config);
    match load_err {
        None => info!("Configuration loaded from {}", config_path.display()),
        Some(ref e) => {
            error!("Failed to load config from {}: {}", config_path.display(), e);
            error!("Using default configuration.");
        }
    }

    // ── Apply CLI overrides ────────────────────────────────────
    if let Some(ref url) = cli.database_url {
        info!("CLI override: database_url = {}", url);
        config.database.url = url.clone();
    }

    // ── Config validation mode ─────────────────────────────────
    let (signup, creds) = match cli.command {
        Command::Check if load_err.is_some() => return ExitCode::FAILURE,
        Command::Check => return check_config(&config, &config_path),
        Command::Signup(creds) => (true, creds),
        Command::Signin(creds) => (false, creds),
    };

    // ── Start runtime ──────────────────────────────────────────
    let runtime = match AuthRuntime::start(RuntimeOptions {
        config,
        auto_migrate: !cli.no_migrate,
    })
    .await
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("Failed to start: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let result = if signup {
        runtime.service.signup(&creds.email, &creds.password).await
    } else {
        runtime.service.signin(&creds.email, &creds.password).await
    };

    let code = match result {
        Ok(user) => print_user(&user),
        Err(e) => {
            error!(kind = ?e.kind(), "{}", e);
            ExitCode::FAILURE
        }
    };

    if let Err(e) = runtime.shutdown().await {
        error!("Shutdown failed: {}", e);
    }
    code
}

fn check_config(config: &AppConfig, config_path: &Path) -> ExitCode {
    let hasher = match PasswordHasher::new(config.scrypt_settings()) {
        Ok(hasher) => hasher,
        Err(e) => {
            error!("Invalid security settings: {}", e);
            return ExitCode::FAILURE;
        }
    };
    let rendered = match config.to_toml_string() {
        Ok(rendered) => rendered,
        Err(e) => {
            error!("Failed to render configuration: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let s = hasher.settings();
    println!("Configuration is valid");
    println!("   Config file : {}", config_path.display());
    println!("   scrypt      : N=2^{} r={} p={} len={}", s.log_n, s.r, s.p, s.key_len);
    println!();
    println!("{}", rendered);
    ExitCode::SUCCESS
}

fn print_user(user: &User) -> ExitCode {
    match serde_json::to_string_pretty(user) {
        Ok(json) => {
            println!("{}", json);
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("Failed to serialize user: {}", e);
            ExitCode::FAILURE
        }
    }
}
