//! PostgreSQL team repository implementation

use async_trait::async_trait;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::domain::team::{MemberRole, Team, TeamId, TeamRepository, TeamRole, TeamRoleId};
use crate::domain::user::UserId;
use crate::domain::DomainError;
use crate::infrastructure::user::is_unique_violation;

/// PostgreSQL implementation of TeamRepository
#[derive(Debug, Clone)]
pub struct PostgresTeamRepository {
    pool: PgPool,
}

impl PostgresTeamRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TeamRepository for PostgresTeamRepository {
    async fn create_team(&self, team: Team) -> Result<Team, DomainError> {
        sqlx::query(
            "INSERT INTO teams (id, name, created_at, updated_at) VALUES ($1, $2, $3, $4)",
        )
        .bind(team.id().as_uuid())
        .bind(team.name())
        .bind(team.created_at())
        .bind(team.updated_at())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                DomainError::conflict(format!("Team '{}' already exists", team.id()))
            } else {
                DomainError::storage(format!("Failed to create team: {}", e))
            }
        })?;

        Ok(team)
    }

    async fn get_team(&self, id: &TeamId) -> Result<Option<Team>, DomainError> {
        let row = sqlx::query("SELECT id, name, created_at, updated_at FROM teams WHERE id = $1")
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to get team: {}", e)))?;

        row.as_ref().map(row_to_team).transpose()
    }

    async fn delete_team(&self, id: &TeamId) -> Result<bool, DomainError> {
        // team_roles rows go with the team via ON DELETE CASCADE
        let result = sqlx::query("DELETE FROM teams WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to delete team: {}", e)))?;

        Ok(result.rows_affected() > 0)
    }

    async fn list_teams_by_ids(&self, ids: &[TeamId]) -> Result<Vec<Team>, DomainError> {
        let ids: Vec<Uuid> = ids.iter().map(TeamId::as_uuid).collect();

        let rows = sqlx::query(
            "SELECT id, name, created_at, updated_at FROM teams WHERE id = ANY($1) ORDER BY name",
        )
        .bind(ids)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to list teams: {}", e)))?;

        rows.iter().map(row_to_team).collect()
    }

    async fn count_teams(&self) -> Result<usize, DomainError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM teams")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to count teams: {}", e)))?;

        Ok(count as usize)
    }

    async fn create_role(&self, role: TeamRole) -> Result<TeamRole, DomainError> {
        sqlx::query(
            r#"
            INSERT INTO team_roles (id, team_id, user_id, role, can_export, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(role.id.as_uuid())
        .bind(role.team_id.as_uuid())
        .bind(role.user_id.as_uuid())
        .bind(role.role.as_str())
        .bind(role.can_export)
        .bind(role.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db) if db.is_foreign_key_violation() => {
                DomainError::not_found(format!("Team '{}' not found", role.team_id))
            }
            _ if is_unique_violation(&e) => DomainError::conflict(format!(
                "User '{}' is already a member of team '{}'",
                role.user_id, role.team_id
            )),
            _ => DomainError::storage(format!("Failed to create team role: {}", e)),
        })?;

        Ok(role)
    }

    async fn roles_for_user(&self, user_id: &UserId) -> Result<Vec<TeamRole>, DomainError> {
        let rows = sqlx::query(
            r#"
            SELECT id, team_id, user_id, role, can_export, created_at
            FROM team_roles
            WHERE user_id = $1
            ORDER BY created_at
            "#,
        )
        .bind(user_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to list user roles: {}", e)))?;

        rows.iter().map(row_to_role).collect()
    }

    async fn roles_for_team(&self, team_id: &TeamId) -> Result<Vec<TeamRole>, DomainError> {
        let rows = sqlx::query(
            r#"
            SELECT id, team_id, user_id, role, can_export, created_at
            FROM team_roles
            WHERE team_id = $1
            ORDER BY created_at
            "#,
        )
        .bind(team_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to list team roles: {}", e)))?;

        rows.iter().map(row_to_role).collect()
    }
}

fn column_error(e: sqlx::Error) -> DomainError {
    DomainError::storage(format!("Invalid team row in database: {}", e))
}

fn row_to_team(row: &sqlx::postgres::PgRow) -> Result<Team, DomainError> {
    Ok(Team::restore(
        TeamId::from_uuid(row.try_get("id").map_err(column_error)?),
        row.try_get("name").map_err(column_error)?,
        row.try_get("created_at").map_err(column_error)?,
        row.try_get("updated_at").map_err(column_error)?,
    ))
}

fn row_to_role(row: &sqlx::postgres::PgRow) -> Result<TeamRole, DomainError> {
    let role: String = row.try_get("role").map_err(column_error)?;

    Ok(TeamRole {
        id: TeamRoleId::from_uuid(row.try_get("id").map_err(column_error)?),
        team_id: TeamId::from_uuid(row.try_get("team_id").map_err(column_error)?),
        user_id: UserId::from_uuid(row.try_get("user_id").map_err(column_error)?),
        role: role
            .parse::<MemberRole>()
            .map_err(|e| DomainError::storage(format!("Invalid team role in database: {}", e)))?,
        can_export: row.try_get("can_export").map_err(column_error)?,
        created_at: row.try_get("created_at").map_err(column_error)?,
    })
}
