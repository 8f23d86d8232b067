//! Welcome-mail adapter.
//!
//! Actual delivery belongs to an external relay outside this repository. The
//! default adapter records the send through tracing so operators can follow
//! the flow end to end; callers already treat every mailer failure as
//! non-fatal.

use async_trait::async_trait;
use tracing::info;

use crate::domain::account::{EmailAddress, FullName};
use crate::domain::ports::{MailerError, WelcomeMailer};

/// Mailer that records welcome sends in the application log.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingMailer;

#[async_trait]
impl WelcomeMailer for TracingMailer {
    async fn send_welcome(
        &self,
        email: &EmailAddress,
        full_name: &FullName,
    ) -> Result<(), MailerError> {
        info!(email = %email, name = %full_name, "welcome mail recorded");
        Ok(())
    }
}
