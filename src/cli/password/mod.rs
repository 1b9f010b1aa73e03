//! Login and password reset commands

use clap::Args;

use super::print_json;
use crate::domain::UserProfile;
use crate::infrastructure::user::{ChangePasswordRequest, UserController};

#[derive(Args, Clone)]
pub struct LoginArgs {
    #[arg(long)]
    pub email: String,

    #[arg(long)]
    pub password: String,
}

#[derive(Args, Clone)]
pub struct RequestResetArgs {
    /// Email of the account to reset
    pub email: String,
}

#[derive(Args, Clone)]
pub struct ChangePasswordArgs {
    /// `token` query parameter of the reset link
    #[arg(long)]
    pub token: String,

    /// `hash` query parameter of the reset link
    #[arg(long)]
    pub hash: String,

    /// New password
    #[arg(long)]
    pub password: String,
}

pub async fn login(controller: &UserController, args: LoginArgs) -> anyhow::Result<()> {
    let user = controller.login(&args.email, &args.password).await?;
    print_json(&UserProfile::from(user))
}

pub async fn request_reset(controller: &UserController, args: RequestResetArgs) -> anyhow::Result<()> {
    print_json(&controller.request_password_reset(&args.email).await?)
}

pub async fn change(controller: &UserController, args: ChangePasswordArgs) -> anyhow::Result<()> {
    let changed = controller
        .change_password(ChangePasswordRequest {
            token: args.token,
            hash: args.hash,
            password: args.password,
        })
        .await?;

    print_json(&changed)
}
