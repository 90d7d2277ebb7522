use futures::future::join_all;
use serde::Serialize;
use std::sync::Arc;
use tracing::{error, info, warn};

use crate::error::Error;
use crate::gitlab::events::ParsedEvent;
use crate::message::{translate, Translation};
use crate::platform::client::{DeliveryResponse, Notifier};
use crate::platform::{Platform, WireMessage};

pub const SUPPRESSED_MSG: &str = "message is empty, suppressed.";

/// Outcome of one platform delivery, as reported back to GitLab.
#[derive(Debug, Clone, Serialize)]
pub struct DeliveryReport {
    pub platform: Platform,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub msg: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub webhook_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub webhook_message: Option<WireMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_data: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl DeliveryReport {
    fn empty(platform: Platform) -> Self {
        Self {
            platform,
            success: false,
            msg: None,
            webhook_url: None,
            webhook_message: None,
            status: None,
            response_data: None,
            error: None,
        }
    }

    pub fn suppressed(platform: Platform) -> Self {
        Self {
            success: true,
            msg: Some(SUPPRESSED_MSG.to_string()),
            ..Self::empty(platform)
        }
    }

    pub fn failed(platform: Platform, error: &Error) -> Self {
        Self {
            error: Some(error.to_string()),
            ..Self::empty(platform)
        }
    }

    pub fn delivered(
        platform: Platform,
        url: &str,
        message: WireMessage,
        response: DeliveryResponse,
    ) -> Self {
        Self {
            success: response.is_success(),
            webhook_url: Some(url.to_string()),
            webhook_message: Some(message),
            status: Some(response.status),
            response_data: Some(response.body),
            ..Self::empty(platform)
        }
    }
}

pub struct Dispatcher {
    notifier: Arc<dyn Notifier>,
}

impl Dispatcher {
    pub fn new(notifier: Arc<dyn Notifier>) -> Self {
        Self { notifier }
    }

    /// Deliver to every target concurrently. Reports come back in target
    /// order; one platform failing never affects another.
    pub async fn dispatch(
        &self,
        event: &ParsedEvent,
        targets: &[(Platform, String)],
    ) -> Vec<DeliveryReport> {
        join_all(
            targets
                .iter()
                .map(|(platform, url)| self.deliver(event, *platform, url)),
        )
        .await
    }

    async fn deliver(&self, event: &ParsedEvent, platform: Platform, url: &str) -> DeliveryReport {
        let object_kind = event.object_kind();

        let message = match translate(event, platform) {
            Ok(Translation::Message(message)) => message,
            Ok(_) => {
                info!(%platform, object_kind, "{}", SUPPRESSED_MSG);
                return DeliveryReport::suppressed(platform);
            }
            Err(e) => {
                warn!(%platform, object_kind, error = %e, "failed to translate event");
                return DeliveryReport::failed(platform, &e);
            }
        };

        match self.notifier.send(platform, url, &message).await {
            Ok(response) => {
                if response.is_success() {
                    info!(%platform, object_kind, status = response.status, "notification sent");
                } else {
                    warn!(%platform, object_kind, status = response.status, "webhook rejected notification");
                }
                DeliveryReport::delivered(platform, url, message, response)
            }
            Err(e) => {
                error!(%platform, object_kind, error = %e, "failed to send notification");
                DeliveryReport::failed(platform, &e)
            }
        }
    }
}
