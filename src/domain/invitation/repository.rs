//! Team invitation repository trait

use async_trait::async_trait;

use super::entity::TeamInvitation;
use crate::domain::DomainError;

/// Repository for pending team invitations
#[async_trait]
pub trait TeamInvitationRepository: Send + Sync {
    /// Store a new invitation
    async fn create(&self, invitation: TeamInvitation) -> Result<TeamInvitation, DomainError>;

    /// All invitations addressed to an encrypted email
    async fn list_by_email(&self, email: &str) -> Result<Vec<TeamInvitation>, DomainError>;
}
