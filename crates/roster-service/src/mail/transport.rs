//! Mail delivery backends.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use tokio::sync::Mutex;
use tracing::{info, warn};

use roster_core::config::{MailConfig, MailTransportKind};
use roster_core::error::{AppError, ErrorKind};
use roster_core::result::AppResult;

/// A fully composed plain-text message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MailMessage {
    /// `"Name" <address>` sender.
    pub from: String,
    /// Recipient address.
    pub to: String,
    pub subject: String,
    /// Plain-text body.
    pub text: String,
}

/// Delivers composed messages.
#[async_trait]
pub trait MailTransport: Send + Sync {
    /// Deliver one message.
    async fn send(&self, message: &MailMessage) -> AppResult<()>;

    /// Short name for logs.
    fn name(&self) -> &'static str;
}

/// Writes messages to the log instead of delivering them.
#[derive(Debug, Clone, Default)]
pub struct LogTransport;

#[async_trait]
impl MailTransport for LogTransport {
    async fn send(&self, message: &MailMessage) -> AppResult<()> {
        info!(
            to = %message.to,
            subject = %message.subject,
            body = %message.text,
            "Mail (log transport)"
        );
        Ok(())
    }

    fn name(&self) -> &'static str {
        "log"
    }
}

/// Keeps messages in memory so callers can inspect what would have been sent.
#[derive(Debug, Clone, Default)]
pub struct MemoryTransport {
    sent: Arc<Mutex<Vec<MailMessage>>>,
    failing: Arc<AtomicBool>,
}

impl MemoryTransport {
    /// Creates an empty transport.
    pub fn new() -> Self {
        Self::default()
    }

    /// Every message accepted so far, oldest first.
    pub async fn messages(&self) -> Vec<MailMessage> {
        self.sent.lock().await.clone()
    }

    /// The most recent message sent to `to`.
    pub async fn last_to(&self, to: &str) -> Option<MailMessage> {
        self.sent
            .lock()
            .await
            .iter()
            .rev()
            .find(|m| m.to == to)
            .cloned()
    }

    /// Make subsequent sends fail (or succeed again).
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }
}

#[async_trait]
impl MailTransport for MemoryTransport {
    async fn send(&self, message: &MailMessage) -> AppResult<()> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(AppError::external_service("Mail transport unavailable"));
        }
        self.sent.lock().await.push(message.clone());
        Ok(())
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}

/// POSTs each message as JSON to a relay endpoint.
#[derive(Debug, Clone)]
pub struct HttpRelayTransport {
    client: reqwest::Client,
    url: String,
    token: Option<String>,
}

impl HttpRelayTransport {
    /// Creates a relay transport.
    pub fn new(url: impl Into<String>, token: Option<String>) -> AppResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| {
                AppError::with_source(ErrorKind::Configuration, "Failed to build mail client", e)
            })?;
        Ok(Self {
            client,
            url: url.into(),
            token,
        })
    }
}

#[async_trait]
impl MailTransport for HttpRelayTransport {
    async fn send(&self, message: &MailMessage) -> AppResult<()> {
        let mut request = self.client.post(&self.url).json(message);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await.map_err(|e| {
            AppError::with_source(ErrorKind::ExternalService, "Mail relay unreachable", e)
        })?;

        let status = response.status();
        if !status.is_success() {
            warn!(status = %status, to = %message.to, "Mail relay rejected message");
            return Err(AppError::external_service(format!(
                "Mail relay responded with {status}"
            )));
        }
        Ok(())
    }

    fn name(&self) -> &'static str {
        "http"
    }
}

/// Builds the transport selected by configuration.
pub fn build_transport(config: &MailConfig) -> AppResult<Arc<dyn MailTransport>> {
    match config.transport {
        MailTransportKind::Log => Ok(Arc::new(LogTransport)),
        MailTransportKind::Memory => Ok(Arc::new(MemoryTransport::new())),
        MailTransportKind::Http => {
            let url = config.relay_url.clone().ok_or_else(|| {
                AppError::configuration("mail.relay_url is required for the http transport")
            })?;
            Ok(Arc::new(HttpRelayTransport::new(
                url,
                config.relay_token.clone(),
            )?))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message() -> MailMessage {
        MailMessage {
            from: "\"App\" <noreply@example.com>".to_string(),
            to: "ada@example.com".to_string(),
            subject: "Hello".to_string(),
            text: "Hi".to_string(),
        }
    }

    #[tokio::test]
    async fn test_memory_transport_records_and_fails_on_demand() {
        let transport = MemoryTransport::new();
        transport.send(&message()).await.unwrap();
        assert_eq!(transport.messages().await.len(), 1);
        assert!(transport.last_to("ada@example.com").await.is_some());

        transport.set_failing(true);
        let err = transport.send(&message()).await.unwrap_err();
        assert!(err.is(ErrorKind::ExternalService));
        assert_eq!(transport.messages().await.len(), 1);
    }

    #[test]
    fn test_http_transport_requires_relay_url() {
        let config = MailConfig {
            transport: MailTransportKind::Http,
            ..MailConfig::default()
        };
        assert!(build_transport(&config).is_err());
    }
}
