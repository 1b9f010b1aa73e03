//! In-memory user repository implementation

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::user::{User, UserId, UserRepository};
use crate::domain::DomainError;

#[derive(Debug, Default)]
struct Tables {
    users: HashMap<UserId, User>,
    /// Encrypted email -> user ID
    email_index: HashMap<String, UserId>,
}

/// In-memory implementation of UserRepository
#[derive(Debug, Clone, Default)]
pub struct InMemoryUserRepository {
    tables: Arc<RwLock<Tables>>,
}

impl InMemoryUserRepository {
    /// Create a new empty repository
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a repository with initial users
    pub fn with_users(users: Vec<User>) -> Self {
        let mut tables = Tables::default();

        for user in users {
            tables.email_index.insert(user.email().to_string(), *user.id());
            tables.users.insert(*user.id(), user);
        }

        Self {
            tables: Arc::new(RwLock::new(tables)),
        }
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn get(&self, id: &UserId) -> Result<Option<User>, DomainError> {
        let tables = self.tables.read().await;
        Ok(tables.users.get(id).cloned())
    }

    async fn get_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
        let tables = self.tables.read().await;

        Ok(tables
            .email_index
            .get(email)
            .and_then(|id| tables.users.get(id))
            .cloned())
    }

    async fn list_by_ids(&self, ids: &[UserId]) -> Result<Vec<User>, DomainError> {
        let tables = self.tables.read().await;

        let mut users: Vec<User> = tables
            .users
            .values()
            .filter(|u| ids.contains(u.id()))
            .cloned()
            .collect();
        users.sort_by_key(|u| u.created_at());

        Ok(users)
    }

    async fn create(&self, user: User) -> Result<User, DomainError> {
        let mut tables = self.tables.write().await;

        if tables.users.contains_key(user.id()) {
            return Err(DomainError::conflict(format!(
                "User with ID '{}' already exists",
                user.id()
            )));
        }

        if tables.email_index.contains_key(user.email()) {
            return Err(DomainError::conflict("Email is already registered"));
        }

        tables.email_index.insert(user.email().to_string(), *user.id());
        tables.users.insert(*user.id(), user.clone());

        Ok(user)
    }

    async fn update(&self, user: &User) -> Result<User, DomainError> {
        let mut tables = self.tables.write().await;

        let old_email = match tables.users.get(user.id()) {
            Some(existing) => existing.email().to_string(),
            None => {
                return Err(DomainError::not_found(format!(
                    "User '{}' not found",
                    user.id()
                )));
            }
        };

        if old_email != user.email() {
            if tables.email_index.contains_key(user.email()) {
                return Err(DomainError::conflict("Email is already registered"));
            }

            tables.email_index.remove(&old_email);
            tables.email_index.insert(user.email().to_string(), *user.id());
        }

        tables.users.insert(*user.id(), user.clone());

        Ok(user.clone())
    }

    async fn delete(&self, id: &UserId) -> Result<bool, DomainError> {
        let mut tables = self.tables.write().await;

        match tables.users.remove(id) {
            Some(user) => {
                tables.email_index.remove(user.email());
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn list(&self) -> Result<Vec<User>, DomainError> {
        let tables = self.tables.read().await;

        let mut users: Vec<User> = tables.users.values().cloned().collect();
        users.sort_by_key(|u| u.created_at());

        Ok(users)
    }

    async fn count(&self) -> Result<usize, DomainError> {
        Ok(self.tables.read().await.users.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_user(name: &str, email: &str) -> User {
        User::new(name, email, "hashed_password")
    }

    #[tokio::test]
    async fn test_create_and_get() {
        let repo = InMemoryUserRepository::new();
        let user = create_test_user("Ada", "enc-ada");

        repo.create(user.clone()).await.unwrap();

        let retrieved = repo.get(user.id()).await.unwrap();
        assert!(retrieved.is_some());
        assert_eq!(retrieved.unwrap().name(), "Ada");
    }

    #[tokio::test]
    async fn test_get_by_email() {
        let repo = InMemoryUserRepository::new();
        let user = create_test_user("Ada", "enc-ada");

        repo.create(user.clone()).await.unwrap();

        let retrieved = repo.get_by_email("enc-ada").await.unwrap();
        assert_eq!(retrieved.unwrap().id(), user.id());

        let not_found = repo.get_by_email("enc-nobody").await.unwrap();
        assert!(not_found.is_none());
    }

    #[tokio::test]
    async fn test_duplicate_email() {
        let repo = InMemoryUserRepository::new();

        repo.create(create_test_user("Ada", "enc-same")).await.unwrap();

        let result = repo.create(create_test_user("Grace", "enc-same")).await;
        assert!(result.unwrap_err().is_conflict());
    }

    #[tokio::test]
    async fn test_update_reindexes_email() {
        let repo = InMemoryUserRepository::new();
        let mut user = create_test_user("Ada", "enc-old");

        repo.create(user.clone()).await.unwrap();

        user.set_email("enc-new");
        repo.update(&user).await.unwrap();

        assert!(repo.get_by_email("enc-old").await.unwrap().is_none());
        assert!(repo.get_by_email("enc-new").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_update_email_conflict() {
        let repo = InMemoryUserRepository::new();
        let ada = create_test_user("Ada", "enc-ada");
        let mut grace = create_test_user("Grace", "enc-grace");

        repo.create(ada).await.unwrap();
        repo.create(grace.clone()).await.unwrap();

        grace.set_email("enc-ada");
        assert!(repo.update(&grace).await.unwrap_err().is_conflict());
    }

    #[tokio::test]
    async fn test_update_missing_user() {
        let repo = InMemoryUserRepository::new();
        let user = create_test_user("Ada", "enc-ada");

        assert!(repo.update(&user).await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_delete() {
        let repo = InMemoryUserRepository::new();
        let user = create_test_user("Ada", "enc-ada");

        repo.create(user.clone()).await.unwrap();

        assert!(repo.delete(user.id()).await.unwrap());
        assert!(repo.get(user.id()).await.unwrap().is_none());
        assert!(!repo.email_exists("enc-ada").await.unwrap());

        assert!(!repo.delete(user.id()).await.unwrap());
    }

    #[tokio::test]
    async fn test_list_by_ids() {
        let repo = InMemoryUserRepository::new();
        let ada = create_test_user("Ada", "enc-ada");
        let grace = create_test_user("Grace", "enc-grace");

        repo.create(ada.clone()).await.unwrap();
        repo.create(grace).await.unwrap();

        let found = repo
            .list_by_ids(&[*ada.id(), UserId::generate()])
            .await
            .unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id(), ada.id());
    }

    #[tokio::test]
    async fn test_list_count_and_any() {
        let repo = InMemoryUserRepository::new();
        assert!(!repo.any().await.unwrap());

        repo.create(create_test_user("Ada", "enc-ada")).await.unwrap();
        repo.create(create_test_user("Grace", "enc-grace")).await.unwrap();

        assert_eq!(repo.list().await.unwrap().len(), 2);
        assert_eq!(repo.count().await.unwrap(), 2);
        assert!(repo.any().await.unwrap());
    }

    #[tokio::test]
    async fn test_with_users() {
        let repo = InMemoryUserRepository::with_users(vec![
            create_test_user("Ada", "enc-ada"),
            create_test_user("Grace", "enc-grace"),
        ]);

        assert_eq!(repo.count().await.unwrap(), 2);
        assert!(repo.email_exists("enc-grace").await.unwrap());
    }
}
