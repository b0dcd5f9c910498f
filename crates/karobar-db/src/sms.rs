//! # SMS Gateway
//!
//! Outbound balance/receipt notifications to salesmen and shopkeepers.
//!
//! Delivery sits strictly above the reconciliation flow: an entry is
//! committed before any message is attempted, and a failed send never
//! rolls anything back. Callers get an [`SmsOutcome`] to surface in the
//! UI and nothing more.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::error::{DbError, DbResult};

/// Result of one delivery attempt.
#[derive(Debug, Clone)]
pub struct SmsOutcome {
    /// Whether the provider accepted the message.
    pub success: bool,

    /// Provider status text, or a local failure description.
    pub message: String,
}

/// Outbound SMS delivery.
#[async_trait]
pub trait SmsGateway: Send + Sync {
    /// Sends one message. Transport failures are reported in the outcome,
    /// not as errors; `Err` is reserved for misconfiguration.
    async fn send(&self, recipient_phone: &str, message: &str) -> DbResult<SmsOutcome>;
}

// =============================================================================
// HTTP provider
// =============================================================================

/// HTTP gateway configuration.
#[derive(Debug, Clone)]
pub struct SmsConfig {
    /// Provider endpoint URL.
    pub endpoint: String,

    /// Provider API key.
    pub api_key: String,

    /// Sender id shown on the recipient's phone.
    pub sender_id: String,

    /// Request timeout.
    pub timeout: Duration,
}

impl Default for SmsConfig {
    fn default() -> Self {
        Self {
            endpoint: String::new(),
            api_key: String::new(),
            sender_id: "KAROBAR".to_string(),
            timeout: Duration::from_secs(15),
        }
    }
}

impl SmsConfig {
    /// Set the endpoint URL.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Set the API key.
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = api_key.into();
        self
    }

    /// Set the sender id.
    pub fn with_sender_id(mut self, sender_id: impl Into<String>) -> Self {
        self.sender_id = sender_id.into();
        self
    }

    /// Set the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

#[derive(Debug, Deserialize)]
struct ProviderResponse {
    status: Option<String>,
    message: Option<String>,
}

/// Gateway backed by an HTTP SMS provider.
pub struct HttpSmsGateway {
    client: Client,
    config: SmsConfig,
}

impl HttpSmsGateway {
    /// Creates a gateway from configuration.
    pub fn new(config: SmsConfig) -> DbResult<Self> {
        if config.endpoint.is_empty() {
            return Err(DbError::Internal(
                "SMS endpoint not configured".to_string(),
            ));
        }

        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| DbError::Internal(format!("SMS client: {e}")))?;

        Ok(Self { client, config })
    }
}

#[async_trait]
impl SmsGateway for HttpSmsGateway {
    async fn send(&self, recipient_phone: &str, message: &str) -> DbResult<SmsOutcome> {
        let response = self
            .client
            .post(&self.config.endpoint)
            .json(&serde_json::json!({
                "api_key": self.config.api_key,
                "sender": self.config.sender_id,
                "to": recipient_phone,
                "message": message,
            }))
            .send()
            .await;

        let response = match response {
            Ok(response) => response,
            Err(e) => {
                warn!(recipient = %recipient_phone, error = %e, "SMS send failed");
                return Ok(SmsOutcome {
                    success: false,
                    message: e.to_string(),
                });
            }
        };

        let status = response.status();
        let body: ProviderResponse = response.json().await.unwrap_or(ProviderResponse {
            status: None,
            message: None,
        });

        let success = status.is_success();
        if success {
            debug!(recipient = %recipient_phone, "SMS accepted by provider");
        } else {
            warn!(
                recipient = %recipient_phone,
                status = %status,
                "SMS rejected by provider"
            );
        }

        Ok(SmsOutcome {
            success,
            message: body
                .message
                .or(body.status)
                .unwrap_or_else(|| status.to_string()),
        })
    }
}

// =============================================================================
// No-op gateway
// =============================================================================

/// Gateway that records nothing and always reports success. Default when
/// no provider is configured, and the stand-in for tests.
#[derive(Debug, Default)]
pub struct NoopSmsGateway;

#[async_trait]
impl SmsGateway for NoopSmsGateway {
    async fn send(&self, recipient_phone: &str, _message: &str) -> DbResult<SmsOutcome> {
        debug!(recipient = %recipient_phone, "SMS delivery disabled, skipping");
        Ok(SmsOutcome {
            success: true,
            message: "delivery disabled".to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_builder() {
        let config = SmsConfig::default()
            .with_endpoint("https://sms.example.com/send")
            .with_api_key("key123")
            .with_sender_id("MYSHOP")
            .with_timeout(Duration::from_secs(5));

        assert_eq!(config.endpoint, "https://sms.example.com/send");
        assert_eq!(config.api_key, "key123");
        assert_eq!(config.sender_id, "MYSHOP");
        assert_eq!(config.timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_empty_endpoint_fails() {
        assert!(HttpSmsGateway::new(SmsConfig::default()).is_err());
    }

    #[tokio::test]
    async fn test_noop_gateway_always_succeeds() {
        let gateway = NoopSmsGateway;
        let outcome = gateway.send("03001234567", "Balance: Rs 130.00").await.unwrap();
        assert!(outcome.success);
    }
}
