//! Outgoing mail configuration.

use serde::{Deserialize, Serialize};

/// How outgoing mail leaves the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MailTransportKind {
    /// Write messages to the log only.
    #[default]
    Log,
    /// Keep messages in memory (tests and local tooling).
    Memory,
    /// POST messages as JSON to `relay_url`.
    Http,
}

/// Mail sender configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MailConfig {
    /// Transport selection.
    #[serde(default)]
    pub transport: MailTransportKind,
    /// Relay endpoint for the `http` transport.
    #[serde(default)]
    pub relay_url: Option<String>,
    /// Bearer token sent to the relay, if it requires one.
    #[serde(default)]
    pub relay_token: Option<String>,
    /// Display name in the `From` header.
    #[serde(default = "default_from_name")]
    pub from_name: String,
    /// Address in the `From` header.
    #[serde(default = "default_from_email")]
    pub from_email: String,
}

impl Default for MailConfig {
    fn default() -> Self {
        Self {
            transport: MailTransportKind::default(),
            relay_url: None,
            relay_token: None,
            from_name: default_from_name(),
            from_email: default_from_email(),
        }
    }
}

fn default_from_name() -> String {
    "App".to_string()
}

fn default_from_email() -> String {
    "noreply@example.com".to_string()
}
