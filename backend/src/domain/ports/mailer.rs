//! Port for triggering the registration welcome email.
//!
//! Delivery itself is an external concern; only the trigger and its failure
//! signal matter to the domain, because a failed send rolls back the freshly
//! created account.

use async_trait::async_trait;

use crate::domain::account::{EmailAddress, Username};

use super::define_port_error;

define_port_error! {
    /// Errors surfaced by mail adapters.
    pub enum MailerError {
        /// The message could not be handed to the delivery provider.
        Delivery { message: String } => "welcome mail delivery failed: {message}",
    }
}

/// Welcome message sent after registration, carrying the one-time activation
/// link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WelcomeEmail {
    pub username: Username,
    pub email: EmailAddress,
    pub activation_url: String,
}

/// Port handing welcome mail to the delivery provider.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait WelcomeMailer: Send + Sync {
    /// Trigger delivery of the welcome email.
    async fn send_welcome(&self, mail: &WelcomeEmail) -> Result<(), MailerError>;
}

/// Fixture mailer that accepts every message.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureWelcomeMailer;

#[async_trait]
impl WelcomeMailer for FixtureWelcomeMailer {
    async fn send_welcome(&self, _mail: &WelcomeEmail) -> Result<(), MailerError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn fixture_accepts_every_message() {
        let mailer = FixtureWelcomeMailer;
        let mail = WelcomeEmail {
            username: Username::new("alice").expect("valid username"),
            email: EmailAddress::new("alice@example.com").expect("valid email"),
            activation_url: "http://localhost:3000/confirm/token".to_owned(),
        };

        mailer.send_welcome(&mail).await.expect("fixture send");
    }
}
