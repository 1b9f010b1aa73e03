//! PostgreSQL user repository implementation

use async_trait::async_trait;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::domain::user::{User, UserId, UserRecord, UserRepository};
use crate::domain::DomainError;

const USER_COLUMNS: &str = "id, name, oneaccount_id, email, password_hash, icon, active, \
                            password_reset_token, created_at, updated_at";

/// Unique constraint on `users.email`, named in the users migration
const EMAIL_UNIQUE_CONSTRAINT: &str = "users_email_key";

/// PostgreSQL implementation of UserRepository
#[derive(Debug, Clone)]
pub struct PostgresUserRepository {
    pool: PgPool,
}

impl PostgresUserRepository {
    /// Create a new repository with the given connection pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn get(&self, id: &UserId) -> Result<Option<User>, DomainError> {
        let row = sqlx::query(&format!("SELECT {} FROM users WHERE id = $1", USER_COLUMNS))
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to get user: {}", e)))?;

        row.as_ref().map(row_to_user).transpose()
    }

    async fn get_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM users WHERE email = $1",
            USER_COLUMNS
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to get user by email: {}", e)))?;

        row.as_ref().map(row_to_user).transpose()
    }

    async fn list_by_ids(&self, ids: &[UserId]) -> Result<Vec<User>, DomainError> {
        let ids: Vec<Uuid> = ids.iter().map(UserId::as_uuid).collect();

        let rows = sqlx::query(&format!(
            "SELECT {} FROM users WHERE id = ANY($1) ORDER BY created_at",
            USER_COLUMNS
        ))
        .bind(ids)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to list users by id: {}", e)))?;

        rows.iter().map(row_to_user).collect()
    }

    async fn create(&self, user: User) -> Result<User, DomainError> {
        sqlx::query(
            r#"
            INSERT INTO users (id, name, oneaccount_id, email, password_hash, icon, active,
                               password_reset_token, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            "#,
        )
        .bind(user.id().as_uuid())
        .bind(user.name())
        .bind(user.oneaccount_id())
        .bind(user.email())
        .bind(user.password_hash())
        .bind(user.icon())
        .bind(user.is_active())
        .bind(user.password_reset_token())
        .bind(user.created_at())
        .bind(user.updated_at())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                create_conflict(violated_constraint(&e), user.id())
            } else {
                DomainError::storage(format!("Failed to create user: {}", e))
            }
        })?;

        Ok(user)
    }

    async fn update(&self, user: &User) -> Result<User, DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE users
            SET name = $2, oneaccount_id = $3, email = $4, password_hash = $5, icon = $6,
                active = $7, password_reset_token = $8, updated_at = $9
            WHERE id = $1
            "#,
        )
        .bind(user.id().as_uuid())
        .bind(user.name())
        .bind(user.oneaccount_id())
        .bind(user.email())
        .bind(user.password_hash())
        .bind(user.icon())
        .bind(user.is_active())
        .bind(user.password_reset_token())
        .bind(user.updated_at())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                DomainError::conflict("Email is already registered")
            } else {
                DomainError::storage(format!("Failed to update user: {}", e))
            }
        })?;

        if result.rows_affected() == 0 {
            return Err(DomainError::not_found(format!(
                "User '{}' not found",
                user.id()
            )));
        }

        Ok(user.clone())
    }

    async fn delete(&self, id: &UserId) -> Result<bool, DomainError> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to delete user: {}", e)))?;

        Ok(result.rows_affected() > 0)
    }

    async fn list(&self) -> Result<Vec<User>, DomainError> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM users ORDER BY created_at",
            USER_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to list users: {}", e)))?;

        rows.iter().map(row_to_user).collect()
    }

    async fn count(&self) -> Result<usize, DomainError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to count users: {}", e)))?;

        Ok(count as usize)
    }

    async fn any(&self) -> Result<bool, DomainError> {
        sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users)")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to check for users: {}", e)))
    }
}

/// Whether a sqlx error is a unique constraint violation
pub(crate) fn is_unique_violation(error: &sqlx::Error) -> bool {
    match error {
        sqlx::Error::Database(db) => db.is_unique_violation(),
        _ => false,
    }
}

/// Name of the constraint a database error reports, if any
fn violated_constraint(error: &sqlx::Error) -> Option<&str> {
    match error {
        sqlx::Error::Database(db) => db.constraint(),
        _ => None,
    }
}

fn create_conflict(constraint: Option<&str>, id: &UserId) -> DomainError {
    match constraint {
        Some(EMAIL_UNIQUE_CONSTRAINT) => DomainError::conflict("Email is already registered"),
        _ => DomainError::conflict(format!("User with ID '{}' already exists", id)),
    }
}

fn row_to_user(row: &sqlx::postgres::PgRow) -> Result<User, DomainError> {
    let column_error =
        |e: sqlx::Error| DomainError::storage(format!("Invalid user row in database: {}", e));

    let record = UserRecord {
        id: UserId::from_uuid(row.try_get("id").map_err(column_error)?),
        name: row.try_get("name").map_err(column_error)?,
        oneaccount_id: row.try_get("oneaccount_id").map_err(column_error)?,
        email: row.try_get("email").map_err(column_error)?,
        password_hash: row.try_get("password_hash").map_err(column_error)?,
        icon: row.try_get("icon").map_err(column_error)?,
        active: row.try_get("active").map_err(column_error)?,
        password_reset_token: row.try_get("password_reset_token").map_err(column_error)?,
        created_at: row.try_get("created_at").map_err(column_error)?,
        updated_at: row.try_get("updated_at").map_err(column_error)?,
    };

    Ok(User::from(record))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_columns_cover_every_record_field() {
        for column in [
            "id",
            "name",
            "oneaccount_id",
            "email",
            "password_hash",
            "icon",
            "active",
            "password_reset_token",
            "created_at",
            "updated_at",
        ] {
            assert!(
                USER_COLUMNS.split(',').any(|c| c.trim() == column),
                "missing column {}",
                column
            );
        }
    }

    #[test]
    fn test_non_database_error_is_not_unique_violation() {
        assert!(!is_unique_violation(&sqlx::Error::RowNotFound));
        assert!(violated_constraint(&sqlx::Error::RowNotFound).is_none());
    }

    #[test]
    fn test_email_constraint_matches_users_migration() {
        let users = &crate::infrastructure::storage::account_migrations()[0];
        assert!(
            users
                .up
                .contains(&format!("CONSTRAINT {} UNIQUE (email)", EMAIL_UNIQUE_CONSTRAINT))
        );
    }

    #[test]
    fn test_create_conflict_by_constraint_name() {
        let id = UserId::generate();

        let err = create_conflict(Some(EMAIL_UNIQUE_CONSTRAINT), &id);
        assert!(matches!(
            err,
            DomainError::Conflict { ref message } if message == "Email is already registered"
        ));

        let err = create_conflict(Some("users_pkey"), &id);
        assert!(matches!(
            err,
            DomainError::Conflict { ref message } if message.contains(&id.to_string())
        ));

        let err = create_conflict(None, &id);
        assert!(matches!(err, DomainError::Conflict { ref message } if message.contains("ID")));
    }
}
