// libs/notification-cell/src/transport.rs
use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::models::NotificationError;

/// A composed message ready for delivery, with the relay credentials the
/// clinic configured at runtime.
#[derive(Debug, Clone, Serialize)]
pub struct OutgoingMail {
    pub from: String,
    pub to: String,
    pub subject: String,
    pub body: String,
    pub username: String,
    pub password: String,
}

#[async_trait]
pub trait MailTransport: Send + Sync {
    async fn send(&self, mail: &OutgoingMail) -> Result<(), NotificationError>;
}

/// Delivers mail through an HTTP relay endpoint.
pub struct RelayMailer {
    client: reqwest::Client,
    relay_url: String,
}

impl RelayMailer {
    pub fn new(relay_url: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            relay_url: relay_url.to_string(),
        }
    }
}

#[async_trait]
impl MailTransport for RelayMailer {
    async fn send(&self, mail: &OutgoingMail) -> Result<(), NotificationError> {
        if self.relay_url.is_empty() {
            return Err(NotificationError::NotConfigured);
        }

        let response = self
            .client
            .post(&self.relay_url)
            .json(mail)
            .send()
            .await
            .map_err(|e| NotificationError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response
                .json::<Value>()
                .await
                .ok()
                .and_then(|v| v.get("error").and_then(|e| e.as_str()).map(String::from))
                .unwrap_or_else(|| format!("HTTP {}", status));
            return Err(NotificationError::Rejected(detail));
        }

        debug!("Mail accepted by relay for {}", mail.to);
        Ok(())
    }
}
