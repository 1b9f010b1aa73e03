//! Team domain module
//!
//! Teams are shared workspaces. Users join them through `TeamRole` rows,
//! and every new user gets a personal space unless provisioning is restricted.

mod entity;
mod repository;
mod validation;

pub use entity::{MemberRole, Team, TeamId, TeamRole, TeamRoleId};
pub use repository::TeamRepository;
pub use validation::{validate_team_name, TeamValidationError};

#[cfg(test)]
pub use repository::MockTeamRepository;
