use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use std::time::Duration;
use tracing::debug;

use crate::error::Result;
use crate::platform::{Platform, WireMessage};

/// What a platform webhook answered.
#[derive(Debug, Clone, PartialEq)]
pub struct DeliveryResponse {
    pub status: u16,
    pub body: serde_json::Value,
}

impl DeliveryResponse {
    pub fn is_success(&self) -> bool {
        self.status == 200
    }
}

#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(
        &self,
        platform: Platform,
        url: &str,
        message: &WireMessage,
    ) -> Result<DeliveryResponse>;
}

#[derive(Clone)]
pub struct HttpNotifier {
    http: Client,
}

impl HttpNotifier {
    pub fn new(timeout: Duration) -> Result<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("labhook/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { http })
    }
}

#[async_trait]
impl Notifier for HttpNotifier {
    async fn send(
        &self,
        platform: Platform,
        url: &str,
        message: &WireMessage,
    ) -> Result<DeliveryResponse> {
        debug!(%platform, url, "posting notification");
        let response = self
            .http
            .post(url)
            .header(CONTENT_TYPE, "application/json; charset=UTF-8")
            .json(message)
            .send()
            .await?;

        let status = response.status().as_u16();
        let text = response.text().await?;
        let body = serde_json::from_str(&text).unwrap_or(serde_json::Value::String(text));

        Ok(DeliveryResponse { status, body })
    }
}
