//! Outgoing mail: message composition and pluggable delivery.

pub mod service;
pub mod template;
pub mod transport;

pub use service::MailService;
pub use transport::{
    HttpRelayTransport, LogTransport, MailMessage, MailTransport, MemoryTransport, build_transport,
};
