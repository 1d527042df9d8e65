//! Outbound message delivery.

use crate::errors::SendError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// A visitor's message, in the template parameter names the mail service expects.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactMessage {
    /// Sender name.
    #[serde(rename = "from_name")]
    pub name: String,
    /// Sender address.
    #[serde(rename = "from_email")]
    pub email: String,
    /// Message body.
    pub message: String,
}

impl ContactMessage {
    /// Creates a message.
    #[must_use]
    pub fn new(name: impl Into<String>, email: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            message: message.into(),
        }
    }

    /// Returns true if every field is blank.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.name.trim().is_empty() && self.email.trim().is_empty() && self.message.trim().is_empty()
    }
}

/// Delivers contact messages.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MessageSender: Send + Sync {
    /// Sends one message. Errors carry the service's own text.
    async fn send(&self, message: &ContactMessage) -> Result<(), SendError>;
}

/// Stands in when no mail service is configured. Every send fails.
#[derive(Debug, Clone)]
pub struct UnconfiguredSender {
    reason: String,
}

impl UnconfiguredSender {
    /// Creates a sender that always fails with `reason`.
    #[must_use]
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

#[async_trait]
impl MessageSender for UnconfiguredSender {
    async fn send(&self, _message: &ContactMessage) -> Result<(), SendError> {
        Err(SendError::NotConfigured(self.reason.clone()))
    }
}

#[cfg(feature = "emailjs")]
pub use emailjs::EmailJsSender;

#[cfg(feature = "emailjs")]
mod emailjs {
    use super::{ContactMessage, MessageSender};
    use crate::config::ContactConfig;
    use crate::errors::SendError;
    use async_trait::async_trait;
    use reqwest::Client;
    use serde::Serialize;
    use tracing::{debug, warn};

    #[derive(Serialize)]
    struct SendRequest<'a> {
        service_id: &'a str,
        template_id: &'a str,
        user_id: &'a str,
        template_params: &'a ContactMessage,
    }

    /// Sends through the EmailJS REST API.
    #[derive(Debug, Clone)]
    pub struct EmailJsSender {
        endpoint: String,
        service_id: String,
        template_id: String,
        public_key: String,
        client: Client,
    }

    impl EmailJsSender {
        /// Builds a sender from configuration. All three credentials are required.
        pub fn from_config(config: &ContactConfig) -> Result<Self, SendError> {
            let require = |value: &Option<String>, name: &str| {
                value
                    .clone()
                    .filter(|v| !v.is_empty())
                    .ok_or_else(|| SendError::NotConfigured(format!("missing {name}")))
            };
            let timeout = config
                .timeout()
                .map_err(|err| SendError::NotConfigured(err.to_string()))?;
            let client = Client::builder()
                .timeout(timeout)
                .build()
                .map_err(|err| SendError::Transport(err.to_string()))?;

            Ok(Self {
                endpoint: config.endpoint.clone(),
                service_id: require(&config.service_id, "service id")?,
                template_id: require(&config.template_id, "template id")?,
                public_key: require(&config.public_key, "public key")?,
                client,
            })
        }
    }

    #[async_trait]
    impl MessageSender for EmailJsSender {
        async fn send(&self, message: &ContactMessage) -> Result<(), SendError> {
            let body = SendRequest {
                service_id: &self.service_id,
                template_id: &self.template_id,
                user_id: &self.public_key,
                template_params: message,
            };
            debug!(endpoint = %self.endpoint, "Sending contact message");

            let response = self
                .client
                .post(&self.endpoint)
                .json(&body)
                .send()
                .await
                .map_err(|err| SendError::Transport(err.to_string()))?;

            let status = response.status();
            if status.is_success() {
                return Ok(());
            }
            let text = response.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), body = %text, "Mail service rejected message");
            Err(SendError::Rejected {
                status: status.as_u16(),
                body: if text.is_empty() {
                    "Check console".to_string()
                } else {
                    text
                },
            })
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn test_requires_credentials() {
            let err = EmailJsSender::from_config(&ContactConfig::default()).unwrap_err();
            assert_eq!(err, SendError::NotConfigured("missing service id".to_string()));

            let config = ContactConfig::default().with_credentials("svc", "tpl", "key");
            assert!(EmailJsSender::from_config(&config).is_ok());
        }

        #[test]
        fn test_rejects_negative_timeout() {
            let config = ContactConfig {
                timeout_seconds: -3.0,
                ..ContactConfig::default().with_credentials("svc", "tpl", "key")
            };
            let err = EmailJsSender::from_config(&config).unwrap_err();
            assert!(matches!(err, SendError::NotConfigured(reason) if reason.contains("timeout_seconds")));
        }

        #[test]
        fn test_request_shape() {
            let message = ContactMessage::new("Ada", "ada@example.com", "Hello");
            let body = SendRequest {
                service_id: "svc",
                template_id: "tpl",
                user_id: "key",
                template_params: &message,
            };
            assert_eq!(
                serde_json::to_value(&body).unwrap(),
                serde_json::json!({
                    "service_id": "svc",
                    "template_id": "tpl",
                    "user_id": "key",
                    "template_params": {
                        "from_name": "Ada",
                        "from_email": "ada@example.com",
                        "message": "Hello"
                    }
                })
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_message() {
        assert!(ContactMessage::default().is_blank());
        assert!(!ContactMessage::new("", "", "hi").is_blank());
    }

    #[tokio::test]
    async fn test_mock_sender() {
        let mut sender = MockMessageSender::new();
        sender.expect_send().times(1).returning(|_| Ok(()));
        assert!(sender.send(&ContactMessage::new("a", "b", "c")).await.is_ok());
    }

    #[tokio::test]
    async fn test_unconfigured_sender_always_fails() {
        let sender = UnconfiguredSender::new("mail service disabled");
        let err = sender.send(&ContactMessage::new("a", "b", "c")).await.unwrap_err();
        assert_eq!(err, SendError::NotConfigured("mail service disabled".to_string()));
    }
}
