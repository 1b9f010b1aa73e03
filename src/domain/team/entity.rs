//! Team, team role and related types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::validation::{validate_team_name, TeamValidationError};
use crate::domain::id::uuid_id;
use crate::domain::user::UserId;

uuid_id!(
    /// Team identifier
    TeamId
);

uuid_id!(
    /// Identifier of a user's membership row in a team
    TeamRoleId
);

/// Permission level of a user within a team
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum MemberRole {
    /// Team owner - full control including team deletion
    Owner,
    /// Team admin - can manage members and resources
    Admin,
    /// Regular team member
    #[default]
    Member,
}

impl MemberRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Owner => "owner",
            Self::Admin => "admin",
            Self::Member => "member",
        }
    }
}

impl std::fmt::Display for MemberRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for MemberRole {
    type Err = TeamValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "owner" => Ok(Self::Owner),
            "admin" => Ok(Self::Admin),
            "member" => Ok(Self::Member),
            other => Err(TeamValidationError::UnknownRole(other.to_string())),
        }
    }
}

/// Team entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Team {
    id: TeamId,
    name: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Team {
    /// Create a new team with a fresh id
    pub fn new(name: impl Into<String>) -> Result<Self, TeamValidationError> {
        let name = name.into();
        validate_team_name(&name)?;
        let now = Utc::now();

        Ok(Self {
            id: TeamId::generate(),
            name,
            created_at: now,
            updated_at: now,
        })
    }

    /// The personal workspace provisioned for a freshly created user
    pub fn personal_space(owner_name: &str) -> Result<Self, TeamValidationError> {
        Self::new(format!("{}'s space", owner_name))
    }

    /// Rebuild a team from persisted fields
    pub fn restore(
        id: TeamId,
        name: String,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            name,
            created_at,
            updated_at,
        }
    }

    pub fn id(&self) -> &TeamId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    pub fn set_name(&mut self, name: impl Into<String>) -> Result<(), TeamValidationError> {
        let name = name.into();
        validate_team_name(&name)?;
        self.name = name;
        self.updated_at = Utc::now();
        Ok(())
    }
}

/// Membership of a user in a team
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamRole {
    pub id: TeamRoleId,
    pub team_id: TeamId,
    pub user_id: UserId,
    pub role: MemberRole,
    pub can_export: bool,
    pub created_at: DateTime<Utc>,
}

impl TeamRole {
    pub fn new(team_id: TeamId, user_id: UserId, role: MemberRole, can_export: bool) -> Self {
        Self {
            id: TeamRoleId::generate(),
            team_id,
            user_id,
            role,
            can_export,
            created_at: Utc::now(),
        }
    }

    /// Owner membership with export rights, granted on a user's own space
    pub fn owner(team_id: TeamId, user_id: UserId) -> Self {
        Self::new(team_id, user_id, MemberRole::Owner, true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_personal_space_name() {
        let team = Team::personal_space("Ada").unwrap();
        assert_eq!(team.name(), "Ada's space");
    }

    #[test]
    fn test_team_empty_name_rejected() {
        assert!(Team::new("  ").is_err());
    }

    #[test]
    fn test_set_name() {
        let mut team = Team::new("Alpha").unwrap();
        team.set_name("Beta").unwrap();
        assert_eq!(team.name(), "Beta");
        assert!(team.set_name("").is_err());
        assert_eq!(team.name(), "Beta");
    }

    #[test]
    fn test_owner_role() {
        let team_id = TeamId::generate();
        let user_id = UserId::generate();
        let role = TeamRole::owner(team_id, user_id);

        assert_eq!(role.role, MemberRole::Owner);
        assert!(role.can_export);
        assert_eq!(role.team_id, team_id);
        assert_eq!(role.user_id, user_id);
    }

    #[test]
    fn test_member_role_round_trip_through_str() {
        for role in [MemberRole::Owner, MemberRole::Admin, MemberRole::Member] {
            assert_eq!(role.as_str().parse::<MemberRole>().unwrap(), role);
        }
        assert!("superuser".parse::<MemberRole>().is_err());
    }
}
