//! User entity and related types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::id::uuid_id;
use crate::domain::team::TeamRole;

uuid_id!(
    /// User identifier
    UserId
);

/// User account record
///
/// `email` holds the codec-encrypted address exactly as it is stored;
/// lookups encrypt the caller's input and compare ciphertexts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    id: UserId,
    name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    oneaccount_id: Option<String>,
    email: String,
    /// Argon2 password hash - never exposed in serialization
    #[serde(skip_serializing, default)]
    password_hash: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    icon: Option<String>,
    active: bool,
    /// Outstanding reset token - never exposed in serialization
    #[serde(skip_serializing, default)]
    password_reset_token: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Every persisted column of a user, used to rebuild the entity from storage
#[derive(Debug, Clone)]
pub struct UserRecord {
    pub id: UserId,
    pub name: String,
    pub oneaccount_id: Option<String>,
    pub email: String,
    pub password_hash: String,
    pub icon: Option<String>,
    pub active: bool,
    pub password_reset_token: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<UserRecord> for User {
    fn from(record: UserRecord) -> Self {
        Self {
            id: record.id,
            name: record.name,
            oneaccount_id: record.oneaccount_id,
            email: record.email,
            password_hash: record.password_hash,
            icon: record.icon,
            active: record.active,
            password_reset_token: record.password_reset_token,
            created_at: record.created_at,
            updated_at: record.updated_at,
        }
    }
}

impl User {
    /// Create a new, active user
    pub fn new(
        name: impl Into<String>,
        encrypted_email: impl Into<String>,
        password_hash: impl Into<String>,
    ) -> Self {
        let now = Utc::now();

        Self {
            id: UserId::generate(),
            name: name.into(),
            oneaccount_id: None,
            email: encrypted_email.into(),
            password_hash: password_hash.into(),
            icon: None,
            active: true,
            password_reset_token: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Set the external account id (builder pattern)
    pub fn with_oneaccount_id(mut self, oneaccount_id: Option<String>) -> Self {
        self.oneaccount_id = oneaccount_id;
        self
    }

    /// Set the icon (builder pattern)
    pub fn with_icon(mut self, icon: Option<String>) -> Self {
        self.icon = icon;
        self
    }

    // Getters

    pub fn id(&self) -> &UserId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn oneaccount_id(&self) -> Option<&str> {
        self.oneaccount_id.as_deref()
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn password_hash(&self) -> &str {
        &self.password_hash
    }

    pub fn icon(&self) -> Option<&str> {
        self.icon.as_deref()
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn password_reset_token(&self) -> Option<&str> {
        self.password_reset_token.as_deref()
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    // Mutators

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
        self.touch();
    }

    pub fn set_oneaccount_id(&mut self, oneaccount_id: Option<String>) {
        self.oneaccount_id = oneaccount_id;
        self.touch();
    }

    pub fn set_email(&mut self, encrypted_email: impl Into<String>) {
        self.email = encrypted_email.into();
        self.touch();
    }

    pub fn set_password_hash(&mut self, password_hash: impl Into<String>) {
        self.password_hash = password_hash.into();
        self.touch();
    }

    pub fn set_icon(&mut self, icon: Option<String>) {
        self.icon = icon;
        self.touch();
    }

    pub fn set_active(&mut self, active: bool) {
        self.active = active;
        self.touch();
    }

    /// Replace the outstanding reset token; only one is ever kept
    pub fn set_password_reset_token(&mut self, token: impl Into<String>) {
        self.password_reset_token = Some(token.into());
        self.touch();
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

/// Public view of a user, without credential material
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: UserId,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub oneaccount_id: Option<String>,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&User> for UserProfile {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            oneaccount_id: user.oneaccount_id.clone(),
            email: user.email.clone(),
            icon: user.icon.clone(),
            active: user.active,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

impl From<User> for UserProfile {
    fn from(user: User) -> Self {
        Self::from(&user)
    }
}

/// A user together with its team memberships
#[derive(Debug, Clone, Serialize)]
pub struct UserWithRoles {
    #[serde(flatten)]
    pub user: User,
    pub team_roles: Vec<TeamRole>,
}

/// Partial update of a user; `None` leaves the field untouched
///
/// `email` and `password` are plaintext here and are encrypted/hashed
/// by the controller before they reach storage.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserUpdate {
    pub name: Option<String>,
    pub oneaccount_id: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub icon: Option<String>,
    pub active: Option<bool>,
}

impl UserUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_oneaccount_id(mut self, oneaccount_id: impl Into<String>) -> Self {
        self.oneaccount_id = Some(oneaccount_id.into());
        self
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn with_password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(password.into());
        self
    }

    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    pub fn with_active(mut self, active: bool) -> Self {
        self.active = Some(active);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.oneaccount_id.is_none()
            && self.email.is_none()
            && self.password.is_none()
            && self.icon.is_none()
            && self.active.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_user() -> User {
        User::new("Ada", "enc-email", "hashed_password")
    }

    #[test]
    fn test_user_creation() {
        let user = create_test_user();

        assert_eq!(user.name(), "Ada");
        assert_eq!(user.email(), "enc-email");
        assert_eq!(user.password_hash(), "hashed_password");
        assert!(user.is_active());
        assert!(user.password_reset_token().is_none());
        assert!(user.oneaccount_id().is_none());
    }

    #[test]
    fn test_builder_fields() {
        let user = create_test_user()
            .with_oneaccount_id(Some("oa-42".to_string()))
            .with_icon(Some("rocket".to_string()));

        assert_eq!(user.oneaccount_id(), Some("oa-42"));
        assert_eq!(user.icon(), Some("rocket"));
    }

    #[test]
    fn test_reset_token_is_overwritten() {
        let mut user = create_test_user();

        user.set_password_reset_token("first");
        user.set_password_reset_token("second");

        assert_eq!(user.password_reset_token(), Some("second"));
    }

    #[test]
    fn test_update_password_touches_timestamp() {
        let mut user = create_test_user();
        let original_updated = user.updated_at();

        std::thread::sleep(std::time::Duration::from_millis(10));

        user.set_password_hash("new_hash");
        assert_eq!(user.password_hash(), "new_hash");
        assert!(user.updated_at() > original_updated);
    }

    #[test]
    fn test_user_serialization_excludes_credentials() {
        let mut user = create_test_user();
        user.set_password_reset_token("reset-token-value");

        let json = serde_json::to_string(&user).unwrap();
        assert!(!json.contains("hashed_password"));
        assert!(!json.contains("password_hash"));
        assert!(!json.contains("reset-token-value"));
        assert!(!json.contains("password_reset_token"));
    }

    #[test]
    fn test_profile_has_no_credentials() {
        let mut user = create_test_user();
        user.set_password_reset_token("reset-token-value");

        let profile = UserProfile::from(&user);
        assert_eq!(profile.id, *user.id());

        let json = serde_json::to_value(&profile).unwrap();
        let object = json.as_object().unwrap();
        assert!(!object.contains_key("password"));
        assert!(!object.contains_key("password_hash"));
        assert!(!object.contains_key("password_reset_token"));
    }

    #[test]
    fn test_user_with_roles_flattens_user() {
        let user = create_test_user();
        let with_roles = UserWithRoles {
            user: user.clone(),
            team_roles: Vec::new(),
        };

        let json = serde_json::to_value(&with_roles).unwrap();
        assert_eq!(json["name"], "Ada");
        assert!(json["team_roles"].as_array().unwrap().is_empty());
    }

    #[test]
    fn test_update_is_empty() {
        assert!(UserUpdate::new().is_empty());
        assert!(!UserUpdate::new().with_active(false).is_empty());
    }

    #[test]
    fn test_record_restores_every_field() {
        let now = Utc::now();
        let id = UserId::generate();
        let user = User::from(UserRecord {
            id,
            name: "Grace".to_string(),
            oneaccount_id: Some("oa-1".to_string()),
            email: "enc".to_string(),
            password_hash: "hash".to_string(),
            icon: None,
            active: false,
            password_reset_token: Some("tok".to_string()),
            created_at: now,
            updated_at: now,
        });

        assert_eq!(*user.id(), id);
        assert!(!user.is_active());
        assert_eq!(user.password_reset_token(), Some("tok"));
    }
}
