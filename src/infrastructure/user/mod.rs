//! User infrastructure module
//!
//! Storage backends for user accounts and the controller that drives the
//! account lifecycle.

mod controller;
mod postgres_repository;
mod repository;

pub use controller::{
    ChangePasswordRequest, CreateUserRequest, PasswordChanged, UserController,
    UserControllerConfig, UserControllerDeps,
};
pub(crate) use postgres_repository::is_unique_violation;
pub use postgres_repository::PostgresUserRepository;
pub use repository::InMemoryUserRepository;
