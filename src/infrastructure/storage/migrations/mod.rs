//! Database migrations infrastructure

use sqlx::postgres::PgPool;
use tracing::info;

use crate::domain::DomainError;

/// Versioned schema migrator backed by a `_migrations` bookkeeping table
#[derive(Debug, Clone)]
pub struct PostgresMigrator {
    pool: PgPool,
}

impl PostgresMigrator {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Creates the migrations table if it doesn't exist
    async fn ensure_migrations_table(&self) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS _migrations (
                version BIGINT PRIMARY KEY,
                description TEXT NOT NULL,
                installed_on TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                success BOOLEAN NOT NULL DEFAULT TRUE
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to create migrations table: {}", e)))?;

        Ok(())
    }

    async fn is_applied(&self, version: i64) -> Result<bool, DomainError> {
        sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM _migrations WHERE version = $1)")
            .bind(version)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to check migration status: {}", e)))
    }

    /// Runs a single migration, returning whether it was applied now
    pub async fn run_migration(&self, migration: &Migration) -> Result<bool, DomainError> {
        self.ensure_migrations_table().await?;

        if self.is_applied(migration.version).await? {
            return Ok(false);
        }

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| DomainError::storage(format!("Failed to start migration: {}", e)))?;

        sqlx::raw_sql(&migration.up)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                DomainError::storage(format!(
                    "Failed to run migration {}: {}",
                    migration.version, e
                ))
            })?;

        sqlx::query("INSERT INTO _migrations (version, description) VALUES ($1, $2)")
            .bind(migration.version)
            .bind(&migration.description)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                DomainError::storage(format!(
                    "Failed to record migration {}: {}",
                    migration.version, e
                ))
            })?;

        tx.commit().await.map_err(|e| {
            DomainError::storage(format!(
                "Failed to commit migration {}: {}",
                migration.version, e
            ))
        })?;

        info!(version = migration.version, description = %migration.description, "Applied migration");
        Ok(true)
    }

    /// Returns the latest applied migration version
    pub async fn current_version(&self) -> Result<Option<i64>, DomainError> {
        self.ensure_migrations_table().await?;

        sqlx::query_scalar("SELECT MAX(version) FROM _migrations WHERE success = TRUE")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to get migration version: {}", e)))
    }
}

/// Represents a database migration
#[derive(Debug, Clone)]
pub struct Migration {
    /// Migration version, strictly increasing
    pub version: i64,
    /// Human-readable description
    pub description: String,
    /// SQL to run when applying the migration
    pub up: String,
}

impl Migration {
    pub fn new(
        version: i64,
        description: impl Into<String>,
        up: impl Into<String>,
    ) -> Self {
        Self {
            version,
            description: description.into(),
            up: up.into(),
        }
    }
}

/// Schema for users, teams, memberships and invitations
pub fn account_migrations() -> Vec<Migration> {
    vec![
        Migration::new(
            1,
            "Create users table",
            r#"
            CREATE TABLE IF NOT EXISTS users (
                id UUID PRIMARY KEY,
                name VARCHAR(100) NOT NULL,
                oneaccount_id VARCHAR(255),
                email TEXT NOT NULL,
                password_hash TEXT NOT NULL,
                icon TEXT,
                active BOOLEAN NOT NULL DEFAULT TRUE,
                password_reset_token TEXT,
                created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                CONSTRAINT users_email_key UNIQUE (email)
            );
            CREATE INDEX IF NOT EXISTS idx_users_created_at ON users(created_at);
            "#,
        ),
        Migration::new(
            2,
            "Create teams table",
            r#"
            CREATE TABLE IF NOT EXISTS teams (
                id UUID PRIMARY KEY,
                name VARCHAR(120) NOT NULL,
                created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
            );
            "#,
        ),
        Migration::new(
            3,
            "Create team_roles table",
            r#"
            CREATE TABLE IF NOT EXISTS team_roles (
                id UUID PRIMARY KEY,
                team_id UUID NOT NULL REFERENCES teams(id) ON DELETE CASCADE,
                user_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
                role VARCHAR(20) NOT NULL,
                can_export BOOLEAN NOT NULL DEFAULT FALSE,
                created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                CONSTRAINT team_roles_membership_key UNIQUE (team_id, user_id)
            );
            CREATE INDEX IF NOT EXISTS idx_team_roles_user_id ON team_roles(user_id);
            "#,
        ),
        Migration::new(
            4,
            "Create team_invitations table",
            r#"
            CREATE TABLE IF NOT EXISTS team_invitations (
                id UUID PRIMARY KEY,
                team_id UUID NOT NULL REFERENCES teams(id) ON DELETE CASCADE,
                email TEXT NOT NULL,
                created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
            );
            CREATE INDEX IF NOT EXISTS idx_team_invitations_email ON team_invitations(email);
            "#,
        ),
    ]
}

/// Runs all pending account migrations, returning the versions applied now
pub async fn run_account_migrations(pool: &PgPool) -> Result<Vec<i64>, DomainError> {
    let migrator = PostgresMigrator::new(pool.clone());
    let mut applied = Vec::new();

    for migration in account_migrations() {
        if migrator.run_migration(&migration).await? {
            applied.push(migration.version);
        }
    }

    Ok(applied)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_migration_creation() {
        let migration = Migration::new(1, "Test migration", "CREATE TABLE test");

        assert_eq!(migration.version, 1);
        assert_eq!(migration.description, "Test migration");
        assert_eq!(migration.up, "CREATE TABLE test");
    }

    #[test]
    fn test_account_migrations_order() {
        let migrations = account_migrations();

        assert_eq!(migrations.len(), 4);

        for i in 1..migrations.len() {
            assert!(
                migrations[i].version > migrations[i - 1].version,
                "Migrations should be in ascending order"
            );
        }
    }

    #[test]
    fn test_referenced_tables_created_first() {
        let migrations = account_migrations();
        let position = |table: &str| {
            migrations
                .iter()
                .position(|m| m.up.contains(&format!("CREATE TABLE IF NOT EXISTS {} ", table)))
                .unwrap()
        };

        assert!(position("users") < position("team_roles"));
        assert!(position("teams") < position("team_roles"));
        assert!(position("teams") < position("team_invitations"));
    }

    #[test]
    fn test_account_migrations_content() {
        for migration in account_migrations() {
            assert!(!migration.description.is_empty());
            assert!(!migration.up.is_empty());
        }
    }

    #[test]
    fn test_email_is_unique() {
        let users = &account_migrations()[0];
        assert!(users.up.contains("UNIQUE (email)"));
    }
}
