//! In-memory team invitation repository

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::invitation::{TeamInvitation, TeamInvitationId, TeamInvitationRepository};
use crate::domain::DomainError;

/// In-memory implementation of TeamInvitationRepository
#[derive(Debug, Clone, Default)]
pub struct InMemoryTeamInvitationRepository {
    invitations: Arc<RwLock<HashMap<TeamInvitationId, TeamInvitation>>>,
}

impl InMemoryTeamInvitationRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TeamInvitationRepository for InMemoryTeamInvitationRepository {
    async fn create(&self, invitation: TeamInvitation) -> Result<TeamInvitation, DomainError> {
        let mut invitations = self.invitations.write().await;

        if invitations.contains_key(&invitation.id) {
            return Err(DomainError::conflict(format!(
                "Invitation '{}' already exists",
                invitation.id
            )));
        }

        invitations.insert(invitation.id, invitation.clone());
        Ok(invitation)
    }

    async fn list_by_email(&self, email: &str) -> Result<Vec<TeamInvitation>, DomainError> {
        let invitations = self.invitations.read().await;

        let mut result: Vec<TeamInvitation> = invitations
            .values()
            .filter(|i| i.email == email)
            .cloned()
            .collect();
        result.sort_by_key(|i| i.created_at);

        Ok(result)
    }
}
