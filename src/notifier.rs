//! Telegram notification delivery with a plain-text fallback

use crate::{
    constants::{REQUEST_TIMEOUT_SECS, TELEGRAM_API_URL, TELEGRAM_PARSE_MODE, USER_AGENT},
    error::NotifyError,
    message::strip_markup,
};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;

/// Body of a Telegram `sendMessage` call
///
/// `parse_mode` serializes as `null` for the plain-text fallback.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SendMessageRequest {
    pub chat_id: String,
    pub text: String,
    pub parse_mode: Option<String>,
    pub disable_web_page_preview: bool,
}

impl SendMessageRequest {
    /// Request with Markdown formatting enabled
    pub fn formatted(chat_id: &str, text: &str) -> Self {
        Self {
            chat_id: chat_id.to_string(),
            text: text.to_string(),
            parse_mode: Some(TELEGRAM_PARSE_MODE.to_string()),
            disable_web_page_preview: true,
        }
    }

    /// Same request with formatting disabled and markup stripped
    pub fn plain(&self) -> Self {
        Self {
            chat_id: self.chat_id.clone(),
            text: strip_markup(&self.text),
            parse_mode: None,
            disable_web_page_preview: self.disable_web_page_preview,
        }
    }
}

/// Transport for chat messages
///
/// `Ok(())` means the API answered 200; any other status is
/// `NotifyError::Rejected`.
#[async_trait]
pub trait MessageSender: Send + Sync {
    async fn send_message(&self, request: &SendMessageRequest) -> Result<(), NotifyError>;

    /// Returns the name of this sender
    fn sender_name(&self) -> &'static str;
}

/// Telegram Bot API sender
pub struct TelegramSender {
    client: Client,
    endpoint: String,
}

impl TelegramSender {
    /// Creates a sender against the public Telegram API
    pub fn new(token: &str) -> Result<Self, NotifyError> {
        Self::with_base_url(TELEGRAM_API_URL, token)
    }

    /// Creates a sender against a custom base URL (local Bot API server, tests)
    pub fn with_base_url(base_url: &str, token: &str) -> Result<Self, NotifyError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self {
            client,
            endpoint: format!(
                "{}/bot{}/sendMessage",
                base_url.trim_end_matches('/'),
                token
            ),
        })
    }
}

#[async_trait]
impl MessageSender for TelegramSender {
    async fn send_message(&self, request: &SendMessageRequest) -> Result<(), NotifyError> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(NotifyError::Rejected {
                status: status.as_u16(),
                body: response.text().await.unwrap_or_default(),
            });
        }

        Ok(())
    }

    fn sender_name(&self) -> &'static str {
        "telegram"
    }
}

/// How a message eventually got through
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    /// First attempt, Markdown rendered
    Formatted,
    /// Second attempt, markup stripped
    PlainText,
}

/// Sends chat messages to one destination
#[derive(Clone)]
pub struct Notifier {
    sender: Arc<dyn MessageSender>,
    chat_id: String,
}

impl Notifier {
    pub fn new(sender: Arc<dyn MessageSender>, chat_id: impl Into<String>) -> Self {
        Self {
            sender,
            chat_id: chat_id.into(),
        }
    }

    /// Delivers a message, retrying once as plain text if the API rejects it
    ///
    /// Transport errors on the first attempt are returned without a retry.
    pub async fn send(&self, text: &str) -> Result<Delivery, NotifyError> {
        let request = SendMessageRequest::formatted(&self.chat_id, text);

        match self.sender.send_message(&request).await {
            Ok(()) => Ok(Delivery::Formatted),
            Err(NotifyError::Rejected { status, body }) => {
                tracing::error!(
                    status,
                    body = %body,
                    sender = self.sender.sender_name(),
                    "Formatted message rejected, retrying as plain text"
                );
                self.sender.send_message(&request.plain()).await?;
                Ok(Delivery::PlainText)
            }
            Err(e) => Err(e),
        }
    }

    /// Delivers a message and reports only whether it got through
    pub async fn notify(&self, text: &str) -> bool {
        match self.send(text).await {
            Ok(delivery) => {
                tracing::info!(?delivery, "Message sent");
                true
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to send message");
                false
            }
        }
    }
}


#[cfg(test)]
mod tests {
    use super::mock::{MockOutcome, MockSender};
    use super::*;
    use crate::test_support::{CannedResponse, TestServer};

    #[tokio::test]
    async fn test_formatted_delivery() {
        let sender = MockSender::new();
        let notifier = Notifier::new(Arc::new(sender.clone()), "42");

        assert_eq!(notifier.send("*hi*").await.unwrap(), Delivery::Formatted);

        let sent = sender.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].chat_id, "42");
        assert_eq!(sent[0].text, "*hi*");
        assert_eq!(sent[0].parse_mode.as_deref(), Some("Markdown"));
        assert!(sent[0].disable_web_page_preview);
    }

    #[tokio::test]
    async fn test_rejection_falls_back_to_plain_text() {
        let sender = MockSender::new();
        sender.push_outcome(MockOutcome::Status(400));
        let notifier = Notifier::new(Arc::new(sender.clone()), "42");

        assert!(notifier.notify("🚨 *ALERT - BTC/USDT* 🚨").await);

        let sent = sender.sent();
        assert_eq!(sent.len(), 2);
        assert_eq!(sent[1].parse_mode, None);
        assert_eq!(sent[1].text, "🚨 ALERT - BTC/USDT 🚨");
    }

    #[tokio::test]
    async fn test_both_attempts_rejected() {
        let sender = MockSender::new();
        sender.push_outcome(MockOutcome::Status(400));
        sender.push_outcome(MockOutcome::Status(500));
        let notifier = Notifier::new(Arc::new(sender.clone()), "42");

        assert!(!notifier.notify("*x*").await);
        assert_eq!(sender.sent().len(), 2);
    }

    #[tokio::test]
    async fn test_transport_failure_is_not_retried() {
        let sender = MockSender::new();
        sender.push_outcome(MockOutcome::NetworkDown);
        let notifier = Notifier::new(Arc::new(sender.clone()), "42");

        assert!(!notifier.notify("*x*").await);
        assert_eq!(sender.sent().len(), 1);
    }

    #[tokio::test]
    async fn test_telegram_sender_over_http() {
        let server = TestServer::start(vec![
            CannedResponse::new(400, r#"{"ok":false,"description":"can't parse entities"}"#),
            CannedResponse::new(200, r#"{"ok":true}"#),
        ])
        .await;
        let sender = TelegramSender::with_base_url(&server.base_url, "123:abc").unwrap();
        let notifier = Notifier::new(Arc::new(sender), "-100200");

        let delivery = notifier.send("*bold* and _it_").await.unwrap();
        assert_eq!(delivery, Delivery::PlainText);

        let requests = server.requests().await;
        assert_eq!(
            requests[0].request_line,
            "POST /bot123:abc/sendMessage HTTP/1.1"
        );

        let first: serde_json::Value = serde_json::from_str(&requests[0].body).unwrap();
        assert_eq!(first["chat_id"], "-100200");
        assert_eq!(first["parse_mode"], "Markdown");
        assert_eq!(first["disable_web_page_preview"], true);

        let second: serde_json::Value = serde_json::from_str(&requests[1].body).unwrap();
        assert!(second["parse_mode"].is_null());
        assert_eq!(second["text"], "bold and it");
    }
}
