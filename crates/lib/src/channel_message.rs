//! Channel message API: create, update and delete app messages in a channel via the webhook.

use crate::error::Result;
use crate::token::TokenStore;
use crate::webhook::Webhook;
use reqwest::Method;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Opaque attachment, passed through to the webhook untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Attachment(pub serde_json::Value);

/// Request body: `{ "message", "attachments", "resourceId"? }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelMessageBody {
    pub message: String,
    #[serde(default)]
    pub attachments: Vec<Attachment>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_id: Option<String>,
}

/// Client for the channel message endpoints. Every call reads the session token first.
#[derive(Clone)]
pub struct ChannelMessages {
    webhook: Webhook,
    tokens: Arc<TokenStore>,
}

fn seg(s: &str) -> String {
    urlencoding::encode(s).into_owned()
}

impl ChannelMessages {
    pub fn new(webhook: Webhook, tokens: Arc<TokenStore>) -> Self {
        Self { webhook, tokens }
    }

    pub fn webhook(&self) -> &Webhook {
        &self.webhook
    }

    async fn send(
        &self,
        method: Method,
        path: String,
        body: Option<ChannelMessageBody>,
    ) -> Result<reqwest::Response> {
        let token = self.tokens.get()?;
        let body = body.map(serde_json::to_value).transpose()?;
        self.webhook.call(method, &path, &token, body.as_ref()).await
    }

    /// POST `{base}/{channelToken}`.
    pub async fn create(
        &self,
        channel_token: &str,
        message: &str,
        attachments: Vec<Attachment>,
        resource_id: Option<&str>,
    ) -> Result<reqwest::Response> {
        let body = ChannelMessageBody {
            message: message.to_string(),
            attachments,
            resource_id: resource_id.map(String::from),
        };
        self.send(Method::POST, seg(channel_token), Some(body)).await
    }

    /// PUT `{base}/{channelToken}/message/{messageId}`.
    pub async fn update_by_message_id(
        &self,
        channel_token: &str,
        message_id: &str,
        message: &str,
        attachments: Vec<Attachment>,
    ) -> Result<reqwest::Response> {
        let body = ChannelMessageBody {
            message: message.to_string(),
            attachments,
            resource_id: None,
        };
        let path = format!("{}/message/{}", seg(channel_token), seg(message_id));
        self.send(Method::PUT, path, Some(body)).await
    }

    /// PUT `{base}/{channelToken}/resource/{resourceId}`; the body carries the
    /// replacement resource id, if any.
    pub async fn update_by_resource_id(
        &self,
        channel_token: &str,
        resource_id: &str,
        message: &str,
        attachments: Vec<Attachment>,
        new_resource_id: Option<&str>,
    ) -> Result<reqwest::Response> {
        let body = ChannelMessageBody {
            message: message.to_string(),
            attachments,
            resource_id: new_resource_id.map(String::from),
        };
        let path = format!("{}/resource/{}", seg(channel_token), seg(resource_id));
        self.send(Method::PUT, path, Some(body)).await
    }

    /// DELETE `{base}/{channelToken}/message/{messageId}`.
    pub async fn delete_by_message_id(
        &self,
        channel_token: &str,
        message_id: &str,
    ) -> Result<reqwest::Response> {
        let path = format!("{}/message/{}", seg(channel_token), seg(message_id));
        self.send(Method::DELETE, path, None).await
    }

    /// DELETE `{base}/{channelToken}/resource/{resourceId}`.
    pub async fn delete_by_resource_id(
        &self,
        channel_token: &str,
        resource_id: &str,
    ) -> Result<reqwest::Response> {
        let path = format!("{}/resource/{}", seg(channel_token), seg(resource_id));
        self.send(Method::DELETE, path, None).await
    }
}
