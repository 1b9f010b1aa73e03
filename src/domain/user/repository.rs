//! User repository trait

use async_trait::async_trait;

use super::entity::{User, UserId};
use crate::domain::DomainError;

/// Repository trait for user storage
///
/// Email arguments are the encrypted form as stored on [`User`].
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Get a user by their ID
    async fn get(&self, id: &UserId) -> Result<Option<User>, DomainError>;

    /// Get a user by their encrypted email
    async fn get_by_email(&self, email: &str) -> Result<Option<User>, DomainError>;

    /// Get every user whose ID is in `ids`
    async fn list_by_ids(&self, ids: &[UserId]) -> Result<Vec<User>, DomainError>;

    /// Create a new user
    async fn create(&self, user: User) -> Result<User, DomainError>;

    /// Update an existing user
    async fn update(&self, user: &User) -> Result<User, DomainError>;

    /// Delete a user, returning whether a row was removed
    async fn delete(&self, id: &UserId) -> Result<bool, DomainError>;

    /// List all users
    async fn list(&self) -> Result<Vec<User>, DomainError>;

    /// Count users
    async fn count(&self) -> Result<usize, DomainError>;

    /// Check if an encrypted email is registered
    async fn email_exists(&self, email: &str) -> Result<bool, DomainError> {
        Ok(self.get_by_email(email).await?.is_some())
    }

    /// Check whether any user exists at all
    async fn any(&self) -> Result<bool, DomainError> {
        Ok(self.count().await? > 0)
    }
}
