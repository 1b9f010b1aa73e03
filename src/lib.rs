//! PMP Accounts
//!
//! User account management for the PMP platform:
//! - Registration with personal team provisioning
//! - Email/password login with Argon2 password hashes
//! - Emails stored encrypted with a deterministic codec
//! - Password reset links carrying a sealed `{id, email}` payload

pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::{AppConfig, Environment};

use std::sync::Arc;

use sqlx::PgPool;
use tracing::info;

use domain::{TeamInvitationRepository, TeamRepository, UserRepository};
use infrastructure::{
    crypto::{AesSivCodec, Argon2Hasher, UuidTokenGenerator},
    invitation::{InMemoryTeamInvitationRepository, PostgresTeamInvitationRepository},
    mail::LogMailer,
    storage,
    team::{InMemoryTeamRepository, PostgresTeamRepository},
    user::{InMemoryUserRepository, PostgresUserRepository, UserController, UserControllerDeps},
};

/// Storage backing the controller's repositories
struct Repositories {
    users: Arc<dyn UserRepository>,
    teams: Arc<dyn TeamRepository>,
    invitations: Arc<dyn TeamInvitationRepository>,
}

impl Repositories {
    fn in_memory() -> Self {
        Self {
            users: Arc::new(InMemoryUserRepository::new()),
            teams: Arc::new(InMemoryTeamRepository::new()),
            invitations: Arc::new(InMemoryTeamInvitationRepository::new()),
        }
    }

    fn postgres(pool: PgPool) -> Self {
        Self {
            users: Arc::new(PostgresUserRepository::new(pool.clone())),
            teams: Arc::new(PostgresTeamRepository::new(pool.clone())),
            invitations: Arc::new(PostgresTeamInvitationRepository::new(pool)),
        }
    }
}

/// Connect to PostgreSQL if `database.url` is configured
pub async fn connect_database(config: &AppConfig) -> anyhow::Result<Option<PgPool>> {
    match config.postgres_config() {
        Some(postgres) => Ok(Some(storage::connect(&postgres).await?)),
        None => Ok(None),
    }
}

/// Build a controller on PostgreSQL when configured, in memory otherwise
pub async fn create_user_controller(config: &AppConfig) -> anyhow::Result<UserController> {
    match connect_database(config).await? {
        Some(pool) => {
            info!("Using PostgreSQL storage for accounts");
            build_controller(config, Repositories::postgres(pool))
        }
        None => {
            info!("No database configured, using in-memory storage for accounts");
            build_controller(config, Repositories::in_memory())
        }
    }
}

/// Build a controller backed entirely by in-memory storage
pub fn create_in_memory_user_controller(config: &AppConfig) -> anyhow::Result<UserController> {
    build_controller(config, Repositories::in_memory())
}

/// Log transport; reset links are only logged outside production
fn log_mailer(environment: Environment) -> LogMailer {
    match environment {
        Environment::Production => LogMailer::new(),
        Environment::Development | Environment::Test => LogMailer::with_links(),
    }
}

fn build_controller(config: &AppConfig, repositories: Repositories) -> anyhow::Result<UserController> {
    config.validate()?;

    let codec = AesSivCodec::new(&config.auth.secret, &config.auth.salt)?;

    let deps = UserControllerDeps {
        users: repositories.users,
        teams: repositories.teams,
        invitations: repositories.invitations,
        mailer: Arc::new(log_mailer(config.environment)),
        codec: Arc::new(codec),
        hasher: Arc::new(Argon2Hasher::new()),
        tokens: Arc::new(UuidTokenGenerator::new()),
    };

    Ok(UserController::new(deps, config.controller_config()))
}
