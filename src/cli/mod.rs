//! CLI module for PMP Accounts
//!
//! Operator commands over the account controller. Every command prints its
//! result to stdout as JSON; logs go to stderr.

pub mod migrate;
pub mod password;
pub mod users;

use clap::{Parser, Subcommand};
use serde::Serialize;

use crate::config::AppConfig;
use crate::infrastructure::user::UserController;

/// PMP Accounts - user account administration
#[derive(Parser)]
#[command(name = "pmp-accounts")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Apply pending database migrations
    Migrate,

    #[command(flatten)]
    Account(AccountCommand),
}

/// Commands served by the account controller
#[derive(Subcommand)]
pub enum AccountCommand {
    /// Register a user (and their personal team unless restricted)
    CreateUser(users::CreateUserArgs),

    /// List every user without credential fields
    ListUsers,

    /// Show one user with their team roles
    ShowUser(users::UserSelector),

    /// Apply a partial update to a user
    UpdateUser(users::UpdateUserArgs),

    /// Delete a user
    DeleteUser(users::DeleteUserArgs),

    /// Show the members of a team among the given users
    TeamMembers(users::TeamMembersArgs),

    /// Check an email/password pair
    Login(password::LoginArgs),

    /// Send a password reset link
    ///
    /// The link goes to the mail transport. The built-in log transport writes
    /// it to the log outside production only. Without `database.url` the
    /// reset token is kept in memory and lost when the command exits, so a
    /// reset can only be completed against a configured database.
    RequestPasswordReset(password::RequestResetArgs),

    /// Complete a password reset with the token and hash from the link
    ///
    /// Needs the same `database.url` the link was requested against; in-memory
    /// storage does not outlive a single command.
    ChangePassword(password::ChangePasswordArgs),

    /// List pending team invitations for an email
    Invites(users::InvitesArgs),

    /// Report whether any user exists
    Status,
}

/// Dispatch a parsed command
pub async fn run(command: Command, config: &AppConfig) -> anyhow::Result<()> {
    match command {
        Command::Migrate => migrate::run(config).await,
        Command::Account(command) => {
            let controller = crate::create_user_controller(config).await?;
            dispatch(&controller, command).await
        }
    }
}

async fn dispatch(controller: &UserController, command: AccountCommand) -> anyhow::Result<()> {
    match command {
        AccountCommand::CreateUser(args) => users::create(controller, args).await,
        AccountCommand::ListUsers => users::list(controller).await,
        AccountCommand::ShowUser(args) => users::show(controller, args).await,
        AccountCommand::UpdateUser(args) => users::update(controller, args).await,
        AccountCommand::DeleteUser(args) => users::delete(controller, args).await,
        AccountCommand::TeamMembers(args) => users::team_members(controller, args).await,
        AccountCommand::Login(args) => password::login(controller, args).await,
        AccountCommand::RequestPasswordReset(args) => {
            password::request_reset(controller, args).await
        }
        AccountCommand::ChangePassword(args) => password::change(controller, args).await,
        AccountCommand::Invites(args) => users::invites(controller, args).await,
        AccountCommand::Status => users::status(controller).await,
    }
}

/// Print a value as pretty JSON on stdout
pub(crate) fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_create_user() {
        let cli = Cli::try_parse_from([
            "pmp-accounts",
            "create-user",
            "--name",
            "Ada",
            "--email",
            "ada@example.com",
            "--password",
            "password123",
        ])
        .unwrap();

        match cli.command {
            Command::Account(AccountCommand::CreateUser(args)) => {
                assert_eq!(args.name, "Ada");
                assert_eq!(args.email, "ada@example.com");
                assert!(args.icon.is_none());
            }
            _ => panic!("expected create-user"),
        }
    }

    #[test]
    fn test_parse_migrate() {
        let cli = Cli::try_parse_from(["pmp-accounts", "migrate"]).unwrap();
        assert!(matches!(cli.command, Command::Migrate));

        let cli = Cli::try_parse_from(["pmp-accounts", "status"]).unwrap();
        assert!(matches!(cli.command, Command::Account(AccountCommand::Status)));
    }

    #[test]
    fn test_reset_help_explains_link_delivery() {
        let cli = Cli::command();

        let request = cli.find_subcommand("request-password-reset").unwrap();
        let help = request.get_long_about().unwrap().to_string();
        assert!(help.contains("outside production"));
        assert!(help.contains("database.url"));

        let change = cli.find_subcommand("change-password").unwrap();
        let help = change.get_long_about().unwrap().to_string();
        assert!(help.contains("database.url"));
    }

    #[test]
    fn test_show_user_requires_selector() {
        assert!(Cli::try_parse_from(["pmp-accounts", "show-user"]).is_err());
        assert!(Cli::try_parse_from([
            "pmp-accounts",
            "show-user",
            "--id",
            "0b9c1d0e-5b8a-4c55-9a4e-3c1f0a6b2d11",
            "--email",
            "ada@example.com",
        ])
        .is_err());
        assert!(Cli::try_parse_from(["pmp-accounts", "show-user", "--email", "ada@example.com"]).is_ok());
    }

    #[test]
    fn test_invalid_user_id_rejected_at_parse() {
        assert!(Cli::try_parse_from(["pmp-accounts", "delete-user", "not-a-uuid"]).is_err());
    }
}
