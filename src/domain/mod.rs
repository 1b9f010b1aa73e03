//! Domain layer - Core account entities, contracts and errors

pub mod error;
pub(crate) mod id;
pub mod invitation;
pub mod mail;
pub mod team;
pub mod user;

pub use error::DomainError;
pub use invitation::{PendingInvites, TeamInvitation, TeamInvitationId, TeamInvitationRepository};
pub use mail::{MailReceipt, Mailer, PasswordResetEmail};
pub use team::{MemberRole, Team, TeamId, TeamRepository, TeamRole, TeamRoleId};
pub use user::{User, UserId, UserProfile, UserRepository, UserUpdate, UserWithRoles};
