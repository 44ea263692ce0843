use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;

use crate::config::EmailConfig;

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("Email request failed: {0}")]
    Request(#[from] reqwest::Error),
}

/// A plain-text email
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmailMessage {
    pub to: String,
    pub subject: String,
    pub body: String,
}

impl EmailMessage {
    pub fn new(to: impl Into<String>, subject: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            to: to.into(),
            subject: subject.into(),
            body: body.into(),
        }
    }
}

/// Outbound email channel
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, message: &EmailMessage) -> Result<(), NotifyError>;

    fn provider_name(&self) -> &'static str;
}

/// Sends a message within `limit`, logging any failure instead of returning it
///
/// Returns whether the message was delivered.
pub async fn dispatch(notifier: &dyn Notifier, message: EmailMessage, limit: Duration) -> bool {
    match tokio::time::timeout(limit, notifier.send(&message)).await {
        Ok(Ok(())) => {
            tracing::debug!(
                to = %message.to,
                provider = notifier.provider_name(),
                "Email sent"
            );
            true
        }
        Ok(Err(e)) => {
            tracing::warn!(
                to = %message.to,
                provider = notifier.provider_name(),
                error = %e,
                "Email delivery failed"
            );
            false
        }
        Err(_) => {
            tracing::warn!(
                to = %message.to,
                provider = notifier.provider_name(),
                limit_ms = limit.as_millis() as u64,
                "Email delivery timed out"
            );
            false
        }
    }
}

/// Writes messages to the log; used when no email API is configured
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn send(&self, message: &EmailMessage) -> Result<(), NotifyError> {
        tracing::info!(to = %message.to, subject = %message.subject, "Email (log only)");
        Ok(())
    }

    fn provider_name(&self) -> &'static str {
        "log"
    }
}

#[derive(Serialize)]
struct EmailPayload<'a> {
    from: &'a str,
    to: &'a str,
    subject: &'a str,
    text: &'a str,
}

/// Posts messages as JSON to a transactional email API
pub struct HttpEmailNotifier {
    client: reqwest::Client,
    config: EmailConfig,
}

impl HttpEmailNotifier {
    pub fn new(config: EmailConfig) -> reqwest::Result<Self> {
        Ok(Self {
            client: super::http_client()?,
            config,
        })
    }
}

#[async_trait]
impl Notifier for HttpEmailNotifier {
    async fn send(&self, message: &EmailMessage) -> Result<(), NotifyError> {
        let payload = EmailPayload {
            from: &self.config.from,
            to: &message.to,
            subject: &message.subject,
            text: &message.body,
        };

        let mut request = self.client.post(&self.config.api_url).json(&payload);
        if let Some(key) = &self.config.api_key {
            request = request.bearer_auth(key);
        }

        request.send().await?.error_for_status()?;
        Ok(())
    }

    fn provider_name(&self) -> &'static str {
        "http"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct StalledNotifier;

    #[async_trait]
    impl Notifier for StalledNotifier {
        async fn send(&self, _message: &EmailMessage) -> Result<(), NotifyError> {
            std::future::pending().await
        }

        fn provider_name(&self) -> &'static str {
            "stalled"
        }
    }

    fn message() -> EmailMessage {
        EmailMessage::new("ada@example.com", "Hi", "Hello")
    }

    #[tokio::test]
    async fn stalled_delivery_gives_up() {
        let delivered = dispatch(&StalledNotifier, message(), Duration::from_millis(20)).await;
        assert!(!delivered);
    }

    #[tokio::test]
    async fn log_notifier_delivers() {
        assert!(dispatch(&LogNotifier, message(), Duration::from_secs(1)).await);
    }
}
