use async_trait::async_trait;

#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    #[error("Invalid mail address {address:?}: {reason}")]
    InvalidAddress { address: String, reason: String },
    #[error("Could not build message: {0}")]
    Message(String),
    #[error("Mail transport failed: {0}")]
    Transport(String),
}

#[async_trait]
pub trait Notifier: Send + Sync {
    /// Deliver one plain-text message. A single attempt; no retry.
    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<(), NotifyError>;
}

/// Used when mail is switched off in configuration.
pub struct NoopNotifier;

#[async_trait]
impl Notifier for NoopNotifier {
    async fn send(&self, to: &str, subject: &str, _body: &str) -> Result<(), NotifyError> {
        tracing::debug!("Mail disabled, not sending {:?} to {}", subject, to);
        Ok(())
    }
}
