//! User administration commands

use clap::Args;
use serde_json::json;

use super::print_json;
use crate::domain::{TeamId, UserId, UserUpdate};
use crate::infrastructure::user::{CreateUserRequest, UserController};

#[derive(Args, Clone)]
pub struct CreateUserArgs {
    /// Display name
    #[arg(long)]
    pub name: String,

    /// Email address used to log in
    #[arg(long)]
    pub email: String,

    /// Initial password
    #[arg(long)]
    pub password: String,

    /// Linked external account id
    #[arg(long)]
    pub oneaccount_id: Option<String>,

    #[arg(long)]
    pub icon: Option<String>,
}

/// Identify a user by id or by email
#[derive(Args, Clone)]
#[group(required = true, multiple = false)]
pub struct UserSelector {
    #[arg(long)]
    pub id: Option<UserId>,

    #[arg(long)]
    pub email: Option<String>,
}

#[derive(Args, Clone)]
pub struct UpdateUserArgs {
    /// User to update
    pub id: UserId,

    #[arg(long)]
    pub name: Option<String>,

    #[arg(long)]
    pub email: Option<String>,

    #[arg(long)]
    pub password: Option<String>,

    #[arg(long)]
    pub oneaccount_id: Option<String>,

    #[arg(long)]
    pub icon: Option<String>,

    /// Activate or deactivate the account
    #[arg(long)]
    pub active: Option<bool>,
}

impl From<UpdateUserArgs> for UserUpdate {
    fn from(args: UpdateUserArgs) -> Self {
        Self {
            name: args.name,
            oneaccount_id: args.oneaccount_id,
            email: args.email,
            password: args.password,
            icon: args.icon,
            active: args.active,
        }
    }
}

#[derive(Args, Clone)]
pub struct DeleteUserArgs {
    /// User to delete
    pub id: UserId,
}

#[derive(Args, Clone)]
pub struct TeamMembersArgs {
    /// Team whose members to report
    #[arg(long)]
    pub team: TeamId,

    /// Candidate users; repeat the flag for several
    #[arg(long = "user")]
    pub users: Vec<UserId>,
}

#[derive(Args, Clone)]
pub struct InvitesArgs {
    /// Invited email address
    pub email: String,
}

pub async fn create(controller: &UserController, args: CreateUserArgs) -> anyhow::Result<()> {
    let user = controller
        .create_user(CreateUserRequest {
            name: args.name,
            oneaccount_id: args.oneaccount_id,
            email: args.email,
            password: args.password,
            icon: args.icon,
        })
        .await?;

    print_json(&user)
}

pub async fn list(controller: &UserController) -> anyhow::Result<()> {
    print_json(&controller.find_all().await?)
}

pub async fn show(controller: &UserController, selector: UserSelector) -> anyhow::Result<()> {
    let user = match (selector.id, selector.email) {
        (Some(id), _) => controller.find_by_id(&id).await?,
        (None, Some(email)) => controller.find_by_email(&email).await?,
        (None, None) => anyhow::bail!("either --id or --email is required"),
    };

    print_json(&user)
}

pub async fn update(controller: &UserController, args: UpdateUserArgs) -> anyhow::Result<()> {
    let id = args.id;
    let changes = UserUpdate::from(args);

    if changes.is_empty() {
        anyhow::bail!("nothing to update");
    }

    print_json(&controller.update(&id, changes).await?)
}

pub async fn delete(controller: &UserController, args: DeleteUserArgs) -> anyhow::Result<()> {
    let deleted = controller.delete_user(&args.id).await?;
    print_json(&json!({ "deleted": deleted }))
}

pub async fn team_members(controller: &UserController, args: TeamMembersArgs) -> anyhow::Result<()> {
    print_json(&controller.get_users_by_id(&args.users, &args.team).await?)
}

pub async fn invites(controller: &UserController, args: InvitesArgs) -> anyhow::Result<()> {
    print_json(&controller.get_team_invites_by_user(&args.email).await?)
}

pub async fn status(controller: &UserController) -> anyhow::Result<()> {
    let has_users = controller.are_there_any_users().await?;
    print_json(&json!({ "has_users": has_users }))
}
