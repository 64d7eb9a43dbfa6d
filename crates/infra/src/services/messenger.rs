use crate::config::WebhookSettings;
use memento_domain::{Delivery, Recipient};
use reqwest::Client;
use serde::Serialize;
use std::sync::{Mutex, PoisonError};
use thiserror::Error;
use tokio::time::Instant;
use tracing::{error, info};

#[derive(Error, Debug)]
pub enum DeliveryError {
    #[error("Outbound transport is unavailable: {0}")]
    Transport(String),
    #[error("Outbound transport rejected the delivery with status: {0}")]
    Rejected(u16),
}

/// Outbound transport for fired reminders
#[async_trait::async_trait]
pub trait IMessenger: Send + Sync {
    async fn send(&self, delivery: &Delivery) -> Result<(), DeliveryError>;
}

#[derive(Debug, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
enum RecipientDTO {
    #[serde(rename = "user", rename_all = "camelCase")]
    User { user_id: String },
    #[serde(rename = "channel", rename_all = "camelCase")]
    Channel { channel_id: String, role_id: String },
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct DeliveryDTO {
    reminder_id: String,
    recipient: RecipientDTO,
    content: String,
}

impl DeliveryDTO {
    fn new(delivery: &Delivery) -> Self {
        let recipient = match &delivery.recipient {
            Recipient::User { user_id } => RecipientDTO::User {
                user_id: user_id.as_string(),
            },
            Recipient::Channel {
                channel_id,
                role_id,
            } => RecipientDTO::Channel {
                channel_id: channel_id.as_string(),
                role_id: role_id.as_string(),
            },
        };
        Self {
            reminder_id: delivery.reminder_id.as_string(),
            recipient,
            content: delivery.content(),
        }
    }
}

/// Posts every delivery as JSON to the configured webhook
pub struct WebhookMessenger {
    client: Client,
    settings: WebhookSettings,
}

impl WebhookMessenger {
    pub fn new(settings: WebhookSettings) -> anyhow::Result<Self> {
        // A webhook that never answers must not hold up the scheduler
        let client = Client::builder().timeout(settings.timeout).build()?;
        Ok(Self { client, settings })
    }
}

#[async_trait::async_trait]
impl IMessenger for WebhookMessenger {
    async fn send(&self, delivery: &Delivery) -> Result<(), DeliveryError> {
        let res = self
            .client
            .post(&self.settings.url)
            .header("memento-webhook-key", &self.settings.key)
            .json(&DeliveryDTO::new(delivery))
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    error!(
                        "Webhook did not answer within {:?} for reminder: {}",
                        self.settings.timeout, delivery.reminder_id
                    );
                } else {
                    error!("Error informing webhook of reminder: {:?}", e);
                }
                DeliveryError::Transport(e.to_string())
            })?;

        let status = res.status();
        if !status.is_success() {
            error!(
                "Webhook responded with status {} for reminder: {}",
                status, delivery.reminder_id
            );
            return Err(DeliveryError::Rejected(status.as_u16()));
        }
        Ok(())
    }
}

/// Used when no webhook is configured, deliveries only end up in the logs
pub struct LogMessenger;

#[async_trait::async_trait]
impl IMessenger for LogMessenger {
    async fn send(&self, delivery: &Delivery) -> Result<(), DeliveryError> {
        info!(
            "Delivering reminder {} to {}: {}",
            delivery.reminder_id,
            delivery.recipient.owner(),
            delivery.content()
        );
        Ok(())
    }
}

/// Records every delivery attempt along with when it happened
pub struct InMemoryMessenger {
    sent: Mutex<Vec<(Delivery, Instant)>>,
    failing: bool,
}

impl InMemoryMessenger {
    pub fn new() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            failing: false,
        }
    }

    /// A messenger that records attempts but fails every one of them
    pub fn failing() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            failing: true,
        }
    }

    pub fn sent(&self) -> Vec<(Delivery, Instant)> {
        self.sent
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn deliveries(&self) -> Vec<Delivery> {
        self.sent().into_iter().map(|(d, _)| d).collect()
    }
}

impl Default for InMemoryMessenger {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl IMessenger for InMemoryMessenger {
    async fn send(&self, delivery: &Delivery) -> Result<(), DeliveryError> {
        self.sent
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((delivery.clone(), Instant::now()));
        if self.failing {
            return Err(DeliveryError::Transport("messenger is offline".into()));
        }
        Ok(())
    }
}
