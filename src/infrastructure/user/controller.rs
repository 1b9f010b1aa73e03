//! User account controller
//!
//! Orchestrates account lifecycle, credential checks, personal team
//! provisioning and the password reset flow on top of the repository,
//! crypto and mail collaborators.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::domain::invitation::{PendingInvites, TeamInvitationRepository};
use crate::domain::mail::{MailReceipt, Mailer, PasswordResetEmail};
use crate::domain::team::{Team, TeamId, TeamRepository, TeamRole};
use crate::domain::user::{
    normalize_email, validate_email, validate_name, validate_password, User, UserId,
    UserProfile, UserRepository, UserUpdate, UserWithRoles,
};
use crate::domain::DomainError;
use crate::infrastructure::crypto::{PasswordHasher, ResetTokenGenerator, SecretCodec};

/// Request for creating a new user
#[derive(Debug, Clone, Deserialize)]
pub struct CreateUserRequest {
    pub name: String,
    #[serde(default)]
    pub oneaccount_id: Option<String>,
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub icon: Option<String>,
}

/// Request for completing a password reset
#[derive(Debug, Clone, Deserialize)]
pub struct ChangePasswordRequest {
    pub token: String,
    pub hash: String,
    pub password: String,
}

/// Outcome of a successful password change
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PasswordChanged {
    pub completed: bool,
}

/// Payload sealed into the `hash` parameter of a reset link
#[derive(Debug, Serialize, Deserialize)]
struct ResetClaims {
    id: UserId,
    email: String,
}

/// Settings the controller needs from the process configuration
#[derive(Debug, Clone)]
pub struct UserControllerConfig {
    /// Base URL of the web client, used to build reset links
    pub client_url: String,
    /// When set, new users do not get a personal team
    pub team_restricted: bool,
}

impl Default for UserControllerConfig {
    fn default() -> Self {
        Self {
            client_url: "http://localhost:3000".to_string(),
            team_restricted: false,
        }
    }
}

/// Collaborators of the user controller
#[derive(Clone)]
pub struct UserControllerDeps {
    pub users: Arc<dyn UserRepository>,
    pub teams: Arc<dyn TeamRepository>,
    pub invitations: Arc<dyn TeamInvitationRepository>,
    pub mailer: Arc<dyn Mailer>,
    pub codec: Arc<dyn SecretCodec>,
    pub hasher: Arc<dyn PasswordHasher>,
    pub tokens: Arc<dyn ResetTokenGenerator>,
}

/// Account lifecycle and authentication operations
pub struct UserController {
    deps: UserControllerDeps,
    config: UserControllerConfig,
}

impl std::fmt::Debug for UserController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserController")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl UserController {
    pub fn new(deps: UserControllerDeps, config: UserControllerConfig) -> Self {
        Self { deps, config }
    }

    /// Register a new user and, unless provisioning is restricted, give them
    /// a personal team they own
    ///
    /// A failure while provisioning the team removes whatever was written
    /// so far, including the user.
    pub async fn create_user(&self, request: CreateUserRequest) -> Result<User, DomainError> {
        validate_name(&request.name).map_err(|e| DomainError::validation(e.to_string()))?;

        let email = normalize_email(&request.email);
        validate_email(&email).map_err(|e| DomainError::validation(e.to_string()))?;
        validate_password(&request.password)
            .map_err(|e| DomainError::validation(e.to_string()))?;

        let encrypted_email = self.deps.codec.encrypt(&email)?;

        if self.deps.users.email_exists(&encrypted_email).await? {
            return Err(DomainError::conflict("Email is already registered"));
        }

        let password_hash = self.deps.hasher.hash(&request.password)?;

        let user = User::new(request.name.trim(), encrypted_email, password_hash)
            .with_oneaccount_id(request.oneaccount_id)
            .with_icon(request.icon);

        let user = self.deps.users.create(user).await?;
        info!(user_id = %user.id(), "Created user");

        if self.config.team_restricted {
            debug!(user_id = %user.id(), "Team provisioning restricted, skipping personal space");
            return Ok(user);
        }

        if let Err(e) = self.provision_personal_space(&user).await {
            self.rollback_user(user.id()).await;
            return Err(e);
        }

        Ok(user)
    }

    async fn provision_personal_space(&self, user: &User) -> Result<(), DomainError> {
        let team = Team::personal_space(user.name())
            .map_err(|e| DomainError::validation(e.to_string()))?;
        let team = self.deps.teams.create_team(team).await?;

        let role = TeamRole::owner(*team.id(), *user.id());

        if let Err(e) = self.deps.teams.create_role(role).await {
            warn!(team_id = %team.id(), error = %e, "Owner role creation failed, removing team");

            if let Err(cleanup) = self.deps.teams.delete_team(team.id()).await {
                warn!(team_id = %team.id(), error = %cleanup, "Failed to remove team");
            }

            return Err(e);
        }

        info!(user_id = %user.id(), team_id = %team.id(), "Provisioned personal space");
        Ok(())
    }

    async fn rollback_user(&self, id: &UserId) {
        warn!(user_id = %id, "Rolling back user creation");

        if let Err(e) = self.deps.users.delete(id).await {
            warn!(user_id = %id, error = %e, "Failed to remove user during rollback");
        }
    }

    /// Delete a user; succeeds whether or not the user existed
    pub async fn delete_user(&self, id: &UserId) -> Result<bool, DomainError> {
        let removed = self.deps.users.delete(id).await?;
        info!(user_id = %id, removed, "Deleted user");
        Ok(true)
    }

    /// Check an email/password pair and return the matching user
    pub async fn login(&self, email: &str, password: &str) -> Result<User, DomainError> {
        let encrypted_email = self.encrypt_email(email)?;

        let user = self
            .deps
            .users
            .get_by_email(&encrypted_email)
            .await?
            .ok_or_else(|| DomainError::not_found("No user is registered with this email"))?;

        if !self.deps.hasher.verify(password, user.password_hash()) {
            warn!(user_id = %user.id(), "Rejected login: wrong password");
            return Err(DomainError::unauthorized("Invalid email or password"));
        }

        info!(user_id = %user.id(), "User logged in");
        Ok(user)
    }

    /// All users, without credential fields
    pub async fn find_all(&self) -> Result<Vec<UserProfile>, DomainError> {
        let users = self.deps.users.list().await?;
        Ok(users.iter().map(UserProfile::from).collect())
    }

    pub async fn find_by_id(&self, id: &UserId) -> Result<UserWithRoles, DomainError> {
        let user = self
            .deps
            .users
            .get(id)
            .await?
            .ok_or_else(|| DomainError::not_found(format!("User '{}' not found", id)))?;

        self.with_roles(user).await
    }

    pub async fn find_by_email(&self, email: &str) -> Result<UserWithRoles, DomainError> {
        let encrypted_email = self.encrypt_email(email)?;

        let user = self
            .deps
            .users
            .get_by_email(&encrypted_email)
            .await?
            .ok_or_else(|| DomainError::not_found("No user is registered with this email"))?;

        self.with_roles(user).await
    }

    async fn with_roles(&self, user: User) -> Result<UserWithRoles, DomainError> {
        let team_roles = self.deps.teams.roles_for_user(user.id()).await?;
        Ok(UserWithRoles { user, team_roles })
    }

    pub async fn email_exists(&self, email: &str) -> Result<bool, DomainError> {
        let encrypted_email = self.encrypt_email(email)?;
        self.deps.users.email_exists(&encrypted_email).await
    }

    /// Apply a partial update and return the fresh record
    pub async fn update(
        &self,
        id: &UserId,
        changes: UserUpdate,
    ) -> Result<UserWithRoles, DomainError> {
        let mut user = self
            .deps
            .users
            .get(id)
            .await?
            .ok_or_else(|| DomainError::not_found(format!("User '{}' not found", id)))?;

        if let Some(name) = changes.name {
            validate_name(&name).map_err(|e| DomainError::validation(e.to_string()))?;
            user.set_name(name.trim());
        }

        if let Some(oneaccount_id) = changes.oneaccount_id {
            user.set_oneaccount_id(Some(oneaccount_id));
        }

        if let Some(email) = changes.email {
            let email = normalize_email(&email);
            validate_email(&email).map_err(|e| DomainError::validation(e.to_string()))?;
            user.set_email(self.deps.codec.encrypt(&email)?);
        }

        if let Some(password) = changes.password {
            validate_password(&password).map_err(|e| DomainError::validation(e.to_string()))?;
            user.set_password_hash(self.deps.hasher.hash(&password)?);
        }

        if let Some(icon) = changes.icon {
            user.set_icon(Some(icon));
        }

        if let Some(active) = changes.active {
            user.set_active(active);
        }

        self.deps.users.update(&user).await?;
        debug!(user_id = %id, "Updated user");

        self.find_by_id(id).await
    }

    /// Invitations addressed to `email` and the teams they reference
    pub async fn get_team_invites_by_user(&self, email: &str) -> Result<PendingInvites, DomainError> {
        let encrypted_email = self.encrypt_email(email)?;
        let invitations = self.deps.invitations.list_by_email(&encrypted_email).await?;

        if invitations.is_empty() {
            return Ok(PendingInvites::default());
        }

        let team_ids = PendingInvites::team_ids(&invitations);
        let teams = self.deps.teams.list_teams_by_ids(&team_ids).await?;

        Ok(PendingInvites { invitations, teams })
    }

    /// Users among `ids` that belong to `team_id`, with only that team's roles loaded
    pub async fn get_users_by_id(
        &self,
        ids: &[UserId],
        team_id: &TeamId,
    ) -> Result<Vec<UserWithRoles>, DomainError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let team_roles = self.deps.teams.roles_for_team(team_id).await?;
        let users = self.deps.users.list_by_ids(ids).await?;

        let members = users
            .into_iter()
            .filter_map(|user| {
                let roles: Vec<TeamRole> = team_roles
                    .iter()
                    .filter(|r| r.user_id == *user.id())
                    .cloned()
                    .collect();

                (!roles.is_empty()).then_some(UserWithRoles {
                    user,
                    team_roles: roles,
                })
            })
            .collect();

        Ok(members)
    }

    /// Issue a fresh reset token and mail the reset link to the user
    pub async fn request_password_reset(&self, email: &str) -> Result<MailReceipt, DomainError> {
        let email = normalize_email(email);
        let encrypted_email = self.deps.codec.encrypt(&email)?;

        let mut user = self
            .deps
            .users
            .get_by_email(&encrypted_email)
            .await?
            .ok_or_else(|| DomainError::not_found("No user is registered with this email"))?;

        let token = self.deps.tokens.generate();
        user.set_password_reset_token(token.as_str());
        let user = self.deps.users.update(&user).await?;

        let claims = ResetClaims {
            id: *user.id(),
            email: email.clone(),
        };
        let payload = serde_json::to_string(&claims)
            .map_err(|e| DomainError::internal(format!("Failed to encode reset claims: {}", e)))?;
        let hash = self.deps.codec.encrypt(&payload)?;

        info!(user_id = %user.id(), "Issued password reset token");

        self.deps
            .mailer
            .password_reset(PasswordResetEmail {
                email,
                reset_url: self.reset_url(&token, &hash),
            })
            .await
    }

    /// Complete a reset: check the token carried by the link, store the new
    /// password and rotate the token so the link cannot be reused
    pub async fn change_password(
        &self,
        request: ChangePasswordRequest,
    ) -> Result<PasswordChanged, DomainError> {
        let claims = self.decode_reset_hash(&request.hash)?;

        validate_password(&request.password)
            .map_err(|e| DomainError::validation(e.to_string()))?;

        let mut user = self
            .deps
            .users
            .get(&claims.id)
            .await?
            .ok_or_else(|| DomainError::not_found(format!("User '{}' not found", claims.id)))?;

        let token_matches = user
            .password_reset_token()
            .is_some_and(|stored| constant_time_compare(stored, &request.token));

        if !token_matches {
            warn!(user_id = %user.id(), "Rejected password change: stale or unknown token");
            return Err(DomainError::unauthorized(
                "Password reset token is invalid or has already been used",
            ));
        }

        if self.encrypt_email(&claims.email)? != user.email() {
            warn!(user_id = %user.id(), "Rejected password change: email mismatch");
            return Err(DomainError::unauthorized(
                "Password reset link does not belong to this account",
            ));
        }

        user.set_password_hash(self.deps.hasher.hash(&request.password)?);
        user.set_password_reset_token(self.deps.tokens.generate());
        self.deps.users.update(&user).await?;

        info!(user_id = %user.id(), "Password changed via reset link");
        Ok(PasswordChanged { completed: true })
    }

    pub async fn are_there_any_users(&self) -> Result<bool, DomainError> {
        self.deps.users.any().await
    }

    fn encrypt_email(&self, email: &str) -> Result<String, DomainError> {
        self.deps.codec.encrypt(&normalize_email(email))
    }

    fn decode_reset_hash(&self, hash: &str) -> Result<ResetClaims, DomainError> {
        let payload = self
            .deps
            .codec
            .decrypt(hash)
            .map_err(|_| DomainError::invalid_token("Password reset link is malformed"))?;

        serde_json::from_str(&payload)
            .map_err(|_| DomainError::invalid_token("Password reset link is malformed"))
    }

    fn reset_url(&self, token: &str, hash: &str) -> String {
        format!(
            "{}/passwordReset?token={}&hash={}",
            self.config.client_url.trim_end_matches('/'),
            token,
            hash
        )
    }
}

/// Compare two strings in constant time
fn constant_time_compare(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }

    a.bytes()
        .zip(b.bytes())
        .fold(0u8, |acc, (x, y)| acc | (x ^ y))
        == 0
}
