//! Email delivery seam, consumed only by the code-request path.

use async_trait::async_trait;
use lambda_http::tracing;

#[derive(Debug, thiserror::Error)]
pub enum MailerError {
    #[error("Email provider unavailable: {0}")]
    Unavailable(String),
}

/// Transactional email delivery collaborator.
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<(), MailerError>;
}

/// Default wiring: the send is traced; the deployed provider sits behind this
/// trait.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingMailer;

#[async_trait]
impl Mailer for TracingMailer {
    async fn send(&self, to: &str, subject: &str, _body: &str) -> Result<(), MailerError> {
        tracing::info!(target: "mail", "send to {}: {}", to, subject);
        Ok(())
    }
}

impl TracingMailer {
    pub const fn new() -> Self {
        Self
    }
}
