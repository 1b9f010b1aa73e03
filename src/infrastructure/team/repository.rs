//! In-memory team repository implementation

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::team::{Team, TeamId, TeamRepository, TeamRole, TeamRoleId};
use crate::domain::user::UserId;
use crate::domain::DomainError;

#[derive(Debug, Default)]
struct Tables {
    teams: HashMap<TeamId, Team>,
    roles: HashMap<TeamRoleId, TeamRole>,
}

/// In-memory implementation of TeamRepository
#[derive(Debug, Clone, Default)]
pub struct InMemoryTeamRepository {
    tables: Arc<RwLock<Tables>>,
}

impl InMemoryTeamRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

fn sorted_roles<'a>(roles: impl Iterator<Item = &'a TeamRole>) -> Vec<TeamRole> {
    let mut roles: Vec<TeamRole> = roles.cloned().collect();
    roles.sort_by_key(|r| r.created_at);
    roles
}

#[async_trait]
impl TeamRepository for InMemoryTeamRepository {
    async fn create_team(&self, team: Team) -> Result<Team, DomainError> {
        let mut tables = self.tables.write().await;

        if tables.teams.contains_key(team.id()) {
            return Err(DomainError::conflict(format!(
                "Team '{}' already exists",
                team.id()
            )));
        }

        tables.teams.insert(*team.id(), team.clone());
        Ok(team)
    }

    async fn get_team(&self, id: &TeamId) -> Result<Option<Team>, DomainError> {
        Ok(self.tables.read().await.teams.get(id).cloned())
    }

    async fn delete_team(&self, id: &TeamId) -> Result<bool, DomainError> {
        let mut tables = self.tables.write().await;

        let removed = tables.teams.remove(id).is_some();
        tables.roles.retain(|_, role| role.team_id != *id);

        Ok(removed)
    }

    async fn list_teams_by_ids(&self, ids: &[TeamId]) -> Result<Vec<Team>, DomainError> {
        let tables = self.tables.read().await;

        let mut teams: Vec<Team> = tables
            .teams
            .values()
            .filter(|t| ids.contains(t.id()))
            .cloned()
            .collect();
        teams.sort_by(|a, b| a.name().cmp(b.name()));

        Ok(teams)
    }

    async fn count_teams(&self) -> Result<usize, DomainError> {
        Ok(self.tables.read().await.teams.len())
    }

    async fn create_role(&self, role: TeamRole) -> Result<TeamRole, DomainError> {
        let mut tables = self.tables.write().await;

        if !tables.teams.contains_key(&role.team_id) {
            return Err(DomainError::not_found(format!(
                "Team '{}' not found",
                role.team_id
            )));
        }

        let duplicate = tables
            .roles
            .values()
            .any(|r| r.team_id == role.team_id && r.user_id == role.user_id);

        if duplicate {
            return Err(DomainError::conflict(format!(
                "User '{}' is already a member of team '{}'",
                role.user_id, role.team_id
            )));
        }

        tables.roles.insert(role.id, role.clone());
        Ok(role)
    }

    async fn roles_for_user(&self, user_id: &UserId) -> Result<Vec<TeamRole>, DomainError> {
        let tables = self.tables.read().await;
        Ok(sorted_roles(
            tables.roles.values().filter(|r| r.user_id == *user_id),
        ))
    }

    async fn roles_for_team(&self, team_id: &TeamId) -> Result<Vec<TeamRole>, DomainError> {
        let tables = self.tables.read().await;
        Ok(sorted_roles(
            tables.roles.values().filter(|r| r.team_id == *team_id),
        ))
    }
}
