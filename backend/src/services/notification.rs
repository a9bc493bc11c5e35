//! Notification dispatch for order-submitted notices
//!
//! Status transitions never wait on delivery: handlers push a rendered
//! message onto an in-process channel and a background task drains it.
//! Delivery failures are logged and dropped.

use serde::Serialize;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::config::NotificationConfig;

/// A message to deliver
#[derive(Debug, Clone)]
pub struct Notification {
    pub recipient: String,
    pub subject: String,
    pub body: String,
}

/// Message gateway client
///
/// Posts to a configured HTTP gateway. When no endpoint is configured the
/// client is disabled and messages are only logged.
#[derive(Clone)]
pub enum NotificationClient {
    Gateway(GatewayClient),
    Disabled,
}

#[derive(Clone)]
pub struct GatewayClient {
    endpoint: String,
    api_key: Option<String>,
    from_address: Option<String>,
    http_client: reqwest::Client,
}

/// Gateway message payload
#[derive(Debug, Serialize)]
struct GatewayMessage<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    from: Option<&'a str>,
    to: &'a str,
    subject: &'a str,
    body: &'a str,
}

impl NotificationClient {
    /// Build a client from configuration
    pub fn from_config(config: &NotificationConfig) -> Self {
        match &config.api_endpoint {
            Some(endpoint) => NotificationClient::Gateway(GatewayClient {
                endpoint: endpoint.clone(),
                api_key: config.api_key.clone(),
                from_address: config.from_address.clone(),
                http_client: reqwest::Client::new(),
            }),
            None => NotificationClient::Disabled,
        }
    }

    /// Deliver one notification
    pub async fn send(&self, notification: &Notification) -> Result<(), String> {
        match self {
            NotificationClient::Disabled => {
                tracing::debug!(
                    recipient = %notification.recipient,
                    subject = %notification.subject,
                    body = %notification.body,
                    "notification delivery disabled; message dropped"
                );
                Ok(())
            }
            NotificationClient::Gateway(client) => client.send(notification).await,
        }
    }
}

impl GatewayClient {
    async fn send(&self, notification: &Notification) -> Result<(), String> {
        let message = GatewayMessage {
            from: self.from_address.as_deref(),
            to: &notification.recipient,
            subject: &notification.subject,
            body: &notification.body,
        };

        let mut request = self.http_client.post(&self.endpoint).json(&message);
        if let Some(key) = &self.api_key {
            request = request.header("Authorization", format!("Bearer {}", key));
        }

        let response = request
            .send()
            .await
            .map_err(|e| format!("Failed to send notification: {}", e))?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(format!("Gateway returned {}", response.status()))
        }
    }
}

/// Spawn the background task that drains the notification channel
pub fn spawn_dispatcher(
    client: NotificationClient,
    mut receiver: mpsc::Receiver<Notification>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(notification) = receiver.recv().await {
            match client.send(&notification).await {
                Ok(()) => {
                    tracing::debug!(
                        recipient = %notification.recipient,
                        subject = %notification.subject,
                        "notification delivered"
                    );
                }
                Err(err) => {
                    tracing::error!(
                        recipient = %notification.recipient,
                        subject = %notification.subject,
                        error = %err,
                        "notification delivery failed"
                    );
                }
            }
        }
    })
}
