//! Team repository trait

use async_trait::async_trait;

#[cfg(test)]
use mockall::automock;

use super::entity::{Team, TeamId, TeamRole};
use crate::domain::user::UserId;
use crate::domain::DomainError;

/// Repository for teams and their membership rows
#[cfg_attr(test, automock)]
#[async_trait]
pub trait TeamRepository: Send + Sync {
    /// Create a new team
    async fn create_team(&self, team: Team) -> Result<Team, DomainError>;

    /// Get a team by ID
    async fn get_team(&self, id: &TeamId) -> Result<Option<Team>, DomainError>;

    /// Delete a team and its membership rows
    async fn delete_team(&self, id: &TeamId) -> Result<bool, DomainError>;

    /// Get every team whose ID is in `ids`
    async fn list_teams_by_ids(&self, ids: &[TeamId]) -> Result<Vec<Team>, DomainError>;

    /// Count all teams
    async fn count_teams(&self) -> Result<usize, DomainError>;

    /// Add a user to a team
    async fn create_role(&self, role: TeamRole) -> Result<TeamRole, DomainError>;

    /// Memberships held by a user
    async fn roles_for_user(&self, user_id: &UserId) -> Result<Vec<TeamRole>, DomainError>;

    /// Memberships of a team
    async fn roles_for_team(&self, team_id: &TeamId) -> Result<Vec<TeamRole>, DomainError>;
}
