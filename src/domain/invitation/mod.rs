//! Team invitation domain

mod entity;
mod repository;

pub use entity::{PendingInvites, TeamInvitation, TeamInvitationId};
pub use repository::TeamInvitationRepository;
