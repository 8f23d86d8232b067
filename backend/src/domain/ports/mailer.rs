//! Driven port for welcome notifications.
//!
//! Delivery itself is an external relay's concern. Failures here are always
//! logged and swallowed by the caller; a mail problem must never fail the
//! user creation that triggered it.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::account::{EmailAddress, FullName};

/// Errors surfaced by mailer adapters.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MailerError {
    /// Handing the message to the relay failed.
    #[error("welcome mail delivery failed: {message}")]
    Delivery {
        /// Underlying failure description.
        message: String,
    },
}

impl MailerError {
    /// Helper for delivery failures.
    pub fn delivery(message: impl Into<String>) -> Self {
        Self::Delivery {
            message: message.into(),
        }
    }
}

/// Port for sending the welcome mail after manager-initiated user creation.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait WelcomeMailer: Send + Sync {
    /// Send a welcome message to a freshly created account.
    async fn send_welcome(
        &self,
        email: &EmailAddress,
        full_name: &FullName,
    ) -> Result<(), MailerError>;
}
