//! PostgreSQL team invitation repository implementation

use async_trait::async_trait;
use sqlx::{PgPool, Row};

use crate::domain::invitation::{TeamInvitation, TeamInvitationId, TeamInvitationRepository};
use crate::domain::team::TeamId;
use crate::domain::DomainError;

/// PostgreSQL implementation of TeamInvitationRepository
#[derive(Debug, Clone)]
pub struct PostgresTeamInvitationRepository {
    pool: PgPool,
}

impl PostgresTeamInvitationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TeamInvitationRepository for PostgresTeamInvitationRepository {
    async fn create(&self, invitation: TeamInvitation) -> Result<TeamInvitation, DomainError> {
        sqlx::query(
            "INSERT INTO team_invitations (id, team_id, email, created_at) VALUES ($1, $2, $3, $4)",
        )
        .bind(invitation.id.as_uuid())
        .bind(invitation.team_id.as_uuid())
        .bind(&invitation.email)
        .bind(invitation.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db) if db.is_foreign_key_violation() => {
                DomainError::not_found(format!("Team '{}' not found", invitation.team_id))
            }
            _ => DomainError::storage(format!("Failed to create invitation: {}", e)),
        })?;

        Ok(invitation)
    }

    async fn list_by_email(&self, email: &str) -> Result<Vec<TeamInvitation>, DomainError> {
        let rows = sqlx::query(
            r#"
            SELECT id, team_id, email, created_at
            FROM team_invitations
            WHERE email = $1
            ORDER BY created_at
            "#,
        )
        .bind(email)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to list invitations: {}", e)))?;

        rows.iter().map(row_to_invitation).collect()
    }
}

fn row_to_invitation(row: &sqlx::postgres::PgRow) -> Result<TeamInvitation, DomainError> {
    let column_error =
        |e: sqlx::Error| DomainError::storage(format!("Invalid invitation row in database: {}", e));

    Ok(TeamInvitation {
        id: TeamInvitationId::from_uuid(row.try_get("id").map_err(column_error)?),
        team_id: TeamId::from_uuid(row.try_get("team_id").map_err(column_error)?),
        email: row.try_get("email").map_err(column_error)?,
        created_at: row.try_get("created_at").map_err(column_error)?,
    })
}
