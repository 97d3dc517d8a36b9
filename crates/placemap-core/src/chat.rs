//! Relay between the chat widget and an n8n workflow webhook.

use std::time::Duration;

use anyhow::{Context, Result};
use chrono::{SecondsFormat, Utc};
use reqwest::Client;
use serde::Serialize;
use serde_json::{json, Value};
use thiserror::Error;
use tracing::{debug, error, info};

use crate::config::ChatConfig;

pub const DEFAULT_CHAT_ACTION: &str = "sendMessage";
const NO_RESPONSE: &str = "No response";

#[derive(Debug, Error)]
pub enum ChatError {
    #[error("Webhook URL not configured")]
    NotConfigured,

    #[error("webhook error: {status} - {body}")]
    Upstream { status: u16, body: String },

    #[error("webhook request failed: {0}")]
    Transport(#[from] reqwest::Error),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatReply {
    pub message: String,
    pub data: Value,
}

impl ChatReply {
    /// Workflows answer under different keys depending on the node that
    /// produced the reply.
    pub fn from_webhook(data: Value) -> Self {
        let message = ["message", "output", "response"]
            .iter()
            .find_map(|key| {
                data.get(*key)
                    .and_then(Value::as_str)
                    .filter(|text| !text.is_empty())
            })
            .unwrap_or(NO_RESPONSE)
            .to_string();
        Self { message, data }
    }
}

pub struct ChatClient {
    client: Client,
    config: ChatConfig,
}

impl ChatClient {
    pub fn new(config: ChatConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .context("Failed to create chat HTTP client")?;
        Ok(Self { client, config })
    }

    /// Forwards a single message to the workflow webhook.
    pub async fn send_message(&self, message: &str) -> Result<ChatReply, ChatError> {
        let url = self
            .config
            .webhook_url
            .as_deref()
            .ok_or(ChatError::NotConfigured)?;

        let payload = json!({
            "message": message,
            "timestamp": Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        });
        let data = self.post(url, &payload).await?;
        Ok(ChatReply::from_webhook(data))
    }

    /// Forwards a message within a chat session; the webhook's JSON comes
    /// back untouched.
    pub async fn send_chat_input(
        &self,
        session_id: &str,
        message: &str,
        action: Option<&str>,
    ) -> Result<Value, ChatError> {
        let url = self
            .config
            .chat_url
            .as_deref()
            .ok_or(ChatError::NotConfigured)?;

        let payload = json!({
            "action": action.unwrap_or(DEFAULT_CHAT_ACTION),
            "sessionId": session_id,
            "chatInput": message,
        });
        self.post(url, &payload).await
    }

    async fn post(&self, url: &str, payload: &Value) -> Result<Value, ChatError> {
        info!("Sending message to chat webhook");

        let mut request = self.client.post(url).json(payload);
        if let Some(api_key) = &self.config.api_key {
            request = request.bearer_auth(api_key);
        }

        let response = request.send().await?;
        let status = response.status();
        debug!(%status, "Chat webhook responded");

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!(%status, %body, "Chat webhook returned an error");
            return Err(ChatError::Upstream {
                status: status.as_u16(),
                body,
            });
        }

        Ok(response.json::<Value>().await?)
    }
}
