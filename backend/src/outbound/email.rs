//! Welcome-mail adapter.
//!
//! Actual delivery belongs to an external provider; this adapter records the
//! trigger so development and test environments surface the activation link
//! in the logs instead of sending anything.

use async_trait::async_trait;
use tracing::info;

use crate::domain::ports::{MailerError, WelcomeEmail, WelcomeMailer};

/// Mailer that logs the welcome message instead of delivering it.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogWelcomeMailer;

impl LogWelcomeMailer {
    /// Create a new logging mailer.
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl WelcomeMailer for LogWelcomeMailer {
    async fn send_welcome(&self, mail: &WelcomeEmail) -> Result<(), MailerError> {
        info!(
            username = %mail.username,
            email = %mail.email,
            activation_url = %mail.activation_url,
            "welcome email queued"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::account::{EmailAddress, Username};

    #[tokio::test]
    async fn logging_mailer_accepts_messages() {
        let mailer = LogWelcomeMailer::new();
        let mail = WelcomeEmail {
            username: Username::new("alice").expect("valid username"),
            email: EmailAddress::new("alice@example.com").expect("valid email"),
            activation_url: "http://localhost:3000/confirm/token".to_owned(),
        };

        mailer.send_welcome(&mail).await.expect("send succeeds");
    }
}
