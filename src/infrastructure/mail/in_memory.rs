//! Mailer that keeps sent messages in memory

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::mail::{MailReceipt, Mailer, PasswordResetEmail};
use crate::domain::DomainError;

/// Collects password reset emails in an outbox for later inspection
#[derive(Debug, Clone, Default)]
pub struct InMemoryMailer {
    outbox: Arc<RwLock<Vec<PasswordResetEmail>>>,
}

impl InMemoryMailer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every email sent so far, oldest first
    pub async fn sent(&self) -> Vec<PasswordResetEmail> {
        self.outbox.read().await.clone()
    }

    /// The most recent email, if any
    pub async fn last(&self) -> Option<PasswordResetEmail> {
        self.outbox.read().await.last().cloned()
    }
}

#[async_trait]
impl Mailer for InMemoryMailer {
    async fn password_reset(&self, email: PasswordResetEmail) -> Result<MailReceipt, DomainError> {
        let mut outbox = self.outbox.write().await;
        outbox.push(email.clone());

        Ok(MailReceipt::accepted(
            format!("in-memory-{}", outbox.len()),
            email.email,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_outbox_records_messages() {
        let mailer = InMemoryMailer::new();
        assert!(mailer.last().await.is_none());

        let receipt = mailer
            .password_reset(PasswordResetEmail {
                email: "ada@example.com".to_string(),
                reset_url: "https://app/passwordReset?token=a&hash=b".to_string(),
            })
            .await
            .unwrap();

        assert_eq!(receipt.message_id, "in-memory-1");
        assert_eq!(mailer.sent().await.len(), 1);
        assert_eq!(mailer.last().await.unwrap().email, "ada@example.com");
    }
}
