//! Team invitation infrastructure implementations

mod postgres_repository;
mod repository;

pub use postgres_repository::PostgresTeamInvitationRepository;
pub use repository::InMemoryTeamInvitationRepository;
