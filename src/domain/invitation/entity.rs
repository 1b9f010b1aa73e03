//! Team invitation entity

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::id::uuid_id;
use crate::domain::team::{Team, TeamId};

uuid_id!(
    /// Team invitation identifier
    TeamInvitationId
);

/// Pending invitation of an email address to a team
///
/// Like [`crate::domain::user::User`], `email` is stored encrypted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamInvitation {
    pub id: TeamInvitationId,
    pub team_id: TeamId,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

impl TeamInvitation {
    pub fn new(team_id: TeamId, encrypted_email: impl Into<String>) -> Self {
        Self {
            id: TeamInvitationId::generate(),
            team_id,
            email: encrypted_email.into(),
            created_at: Utc::now(),
        }
    }
}

/// Invitations addressed to one email, with the teams they point at
#[derive(Debug, Clone, Default, Serialize)]
pub struct PendingInvites {
    pub invitations: Vec<TeamInvitation>,
    pub teams: Vec<Team>,
}

impl PendingInvites {
    pub fn is_empty(&self) -> bool {
        self.invitations.is_empty()
    }

    /// Distinct team ids referenced by the invitations, in first-seen order
    pub fn team_ids(invitations: &[TeamInvitation]) -> Vec<TeamId> {
        let mut ids: Vec<TeamId> = Vec::with_capacity(invitations.len());
        for invitation in invitations {
            if !ids.contains(&invitation.team_id) {
                ids.push(invitation.team_id);
            }
        }
        ids
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_team_ids_are_distinct() {
        let team_a = TeamId::generate();
        let team_b = TeamId::generate();
        let invitations = vec![
            TeamInvitation::new(team_a, "enc"),
            TeamInvitation::new(team_b, "enc"),
            TeamInvitation::new(team_a, "enc"),
        ];

        assert_eq!(PendingInvites::team_ids(&invitations), vec![team_a, team_b]);
    }

    #[test]
    fn test_default_is_empty() {
        assert!(PendingInvites::default().is_empty());
    }
}
