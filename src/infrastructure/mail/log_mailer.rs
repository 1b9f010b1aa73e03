//! Mailer that only records the send in the application log

use async_trait::async_trait;
use tracing::info;
use uuid::Uuid;

use crate::domain::mail::{MailReceipt, Mailer, PasswordResetEmail};
use crate::domain::DomainError;

/// Logs outgoing mail instead of delivering it
///
/// Used when no mail transport is wired in, e.g. local development.
/// The reset URL carries credentials, so it is only logged when the mailer
/// is built with [`LogMailer::with_links`].
#[derive(Debug, Clone, Default)]
pub struct LogMailer {
    log_links: bool,
}

impl LogMailer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Also log the reset URL, for non-production setups without a transport
    pub fn with_links() -> Self {
        Self { log_links: true }
    }

    fn logged_link<'a>(&self, email: &'a PasswordResetEmail) -> Option<&'a str> {
        self.log_links.then_some(email.reset_url.as_str())
    }
}

#[async_trait]
impl Mailer for LogMailer {
    async fn password_reset(&self, email: PasswordResetEmail) -> Result<MailReceipt, DomainError> {
        let message_id = Uuid::new_v4().to_string();

        match self.logged_link(&email) {
            Some(reset_url) => info!(
                message_id = %message_id,
                recipient = %email.email,
                reset_url = %reset_url,
                "Password reset email queued (log transport)"
            ),
            None => info!(
                message_id = %message_id,
                recipient = %email.email,
                "Password reset email queued (log transport)"
            ),
        }

        Ok(MailReceipt::accepted(message_id, email.email))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reset_email() -> PasswordResetEmail {
        PasswordResetEmail {
            email: "ada@example.com".to_string(),
            reset_url: "https://app.example.com/passwordReset?token=t&hash=h".to_string(),
        }
    }

    #[test]
    fn test_link_logged_only_when_enabled() {
        let email = reset_email();

        assert!(LogMailer::new().logged_link(&email).is_none());
        assert_eq!(
            LogMailer::with_links().logged_link(&email),
            Some("https://app.example.com/passwordReset?token=t&hash=h")
        );
    }

    #[tokio::test]
    async fn test_accepts_recipient() {
        let receipt = LogMailer::with_links()
            .password_reset(reset_email())
            .await
            .unwrap();

        assert_eq!(receipt.accepted, vec!["ada@example.com".to_string()]);
        assert!(!receipt.message_id.is_empty());
    }
}
