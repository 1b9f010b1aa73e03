//! Migrate command - applies the account schema to PostgreSQL

use serde_json::json;
use tracing::info;

use super::print_json;
use crate::config::AppConfig;
use crate::infrastructure::storage::{run_account_migrations, PostgresMigrator};

/// Apply pending migrations and report the resulting schema version
pub async fn run(config: &AppConfig) -> anyhow::Result<()> {
    let Some(pool) = crate::connect_database(config).await? else {
        anyhow::bail!("database.url must be configured to run migrations");
    };

    let applied = run_account_migrations(&pool).await?;
    let version = PostgresMigrator::new(pool).current_version().await?;

    info!(applied = applied.len(), ?version, "Migrations complete");
    print_json(&json!({ "applied": applied, "version": version }))
}
