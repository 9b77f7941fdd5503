//! Account mail composition and dispatch.

use std::sync::Arc;

use tracing::{error, info};

use roster_core::config::MailConfig;
use roster_core::result::AppResult;
use roster_entity::user::User;

use super::template::{
    INVITATION_SUBJECT, RESET_SUBJECT, invitation_body, password_reset_body, reset_link,
};
use super::transport::{MailMessage, MailTransport};

/// Composes account mail and hands it to the configured transport.
#[derive(Clone)]
pub struct MailService {
    transport: Arc<dyn MailTransport>,
    from_name: String,
    from_email: String,
    origin: String,
}

impl std::fmt::Debug for MailService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MailService")
            .field("transport", &self.transport.name())
            .field("origin", &self.origin)
            .finish()
    }
}

impl MailService {
    /// Creates a mail service. `origin` is the public frontend origin.
    pub fn new(
        config: &MailConfig,
        origin: impl Into<String>,
        transport: Arc<dyn MailTransport>,
    ) -> Self {
        Self {
            transport,
            from_name: config.from_name.clone(),
            from_email: config.from_email.clone(),
            origin: origin.into(),
        }
    }

    fn sender(&self) -> String {
        format!("\"{}\" <{}>", self.from_name, self.from_email)
    }

    async fn deliver(&self, message: MailMessage) -> AppResult<()> {
        match self.transport.send(&message).await {
            Ok(()) => {
                info!(
                    to = %message.to,
                    subject = %message.subject,
                    transport = self.transport.name(),
                    "Mail sent"
                );
                Ok(())
            }
            Err(e) => {
                error!(
                    to = %message.to,
                    subject = %message.subject,
                    error = %e,
                    "Mail delivery failed"
                );
                Err(e)
            }
        }
    }

    /// Sends the password reset link.
    pub async fn send_password_reset(&self, user: &User, token: &str) -> AppResult<()> {
        let url = reset_link(&self.origin, token)?;
        let greeting = user.first_name.as_deref().unwrap_or("User");
        self.deliver(MailMessage {
            from: self.sender(),
            to: user.email.clone(),
            subject: RESET_SUBJECT.to_string(),
            text: password_reset_body(greeting, &url, &self.from_name),
        })
        .await
    }

    /// Sends the invitation link.
    pub async fn send_invitation(&self, user: &User, token: &str) -> AppResult<()> {
        let url = reset_link(&self.origin, token)?;
        let greeting = user.first_name.as_deref().unwrap_or("there");
        self.deliver(MailMessage {
            from: self.sender(),
            to: user.email.clone(),
            subject: INVITATION_SUBJECT.to_string(),
            text: invitation_body(greeting, &url, &self.from_name),
        })
        .await
    }
}
