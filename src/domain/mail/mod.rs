//! Outgoing mail contract

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

#[cfg(test)]
use mockall::automock;

use crate::domain::DomainError;

/// Password reset message for a single recipient
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PasswordResetEmail {
    /// Plaintext recipient address
    pub email: String,
    /// Link carrying the reset token and hash
    pub reset_url: String,
}

/// What the mail collaborator reports back after accepting a message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MailReceipt {
    pub message_id: String,
    pub accepted: Vec<String>,
}

impl MailReceipt {
    pub fn accepted(message_id: impl Into<String>, recipient: impl Into<String>) -> Self {
        Self {
            message_id: message_id.into(),
            accepted: vec![recipient.into()],
        }
    }
}

/// Sends account emails
#[cfg_attr(test, automock)]
#[async_trait]
pub trait Mailer: Send + Sync {
    /// Send a password reset link
    async fn password_reset(&self, email: PasswordResetEmail) -> Result<MailReceipt, DomainError>;
}
