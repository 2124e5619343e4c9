//! Envelopes posted to the parent host, and the pure functions that build them.
//!
//! One canonical schema, tagged on `type`. Actions are carried in a flat
//! `action` field; older `content.action` nesting is not produced.

use crate::action::{Action, ActionKind};
use crate::error::{DevKitError, Result};
use serde::{Deserialize, Serialize};

pub const DISPATCH_APP_ACTION: &str = "DISPATCH_APP_ACTION";
pub const SYNC_MESSAGE_HEIGHT: &str = "SYNC_MESSAGE_HEIGHT";
pub const AUTO_ADJUST_MESSAGE_HEIGHT: &str = "AUTO_ADJUST_MESSAGE_HEIGHT";
pub const AUTH_COMPLETE: &str = "AUTH_COMPLETE";

/// Height carried by `SYNC_MESSAGE_HEIGHT`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeightPayload {
    #[serde(rename = "resizeHeight")]
    pub resize_height: u32,
}

/// Height carried by `AUTO_ADJUST_MESSAGE_HEIGHT`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScrollPayload {
    #[serde(rename = "scrollHeight")]
    pub scroll_height: u32,
}

/// Envelope posted to the parent host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Message {
    /// `{ "type": "DISPATCH_APP_ACTION", "action" }`
    #[serde(rename = "DISPATCH_APP_ACTION")]
    DispatchAppAction { action: Action },
    /// `{ "type": "SYNC_MESSAGE_HEIGHT", "resizeId", "payload": { "resizeHeight" } }`
    #[serde(rename = "SYNC_MESSAGE_HEIGHT")]
    SyncMessageHeight {
        #[serde(rename = "resizeId")]
        resize_id: String,
        payload: HeightPayload,
    },
    /// `{ "type": "AUTO_ADJUST_MESSAGE_HEIGHT", "weekdayId", "payload": { "scrollHeight" } }`,
    /// sent by one-shot height sync.
    #[serde(rename = "AUTO_ADJUST_MESSAGE_HEIGHT")]
    AutoAdjustMessageHeight {
        #[serde(rename = "weekdayId")]
        weekday_id: String,
        payload: ScrollPayload,
    },
    /// `{ "type": "AUTH_COMPLETE" }`
    #[serde(rename = "AUTH_COMPLETE")]
    AuthComplete,
}

impl Message {
    /// Wire discriminator.
    pub fn type_name(&self) -> &'static str {
        match self {
            Message::DispatchAppAction { .. } => DISPATCH_APP_ACTION,
            Message::SyncMessageHeight { .. } => SYNC_MESSAGE_HEIGHT,
            Message::AutoAdjustMessageHeight { .. } => AUTO_ADJUST_MESSAGE_HEIGHT,
            Message::AuthComplete => AUTH_COMPLETE,
        }
    }

    pub fn action(&self) -> Option<&Action> {
        match self {
            Message::DispatchAppAction { action } => Some(action),
            _ => None,
        }
    }

    /// Correlation id and height of either height envelope.
    pub fn height(&self) -> Option<(&str, u32)> {
        match self {
            Message::SyncMessageHeight { resize_id, payload } => {
                Some((resize_id.as_str(), payload.resize_height))
            }
            Message::AutoAdjustMessageHeight {
                weekday_id,
                payload,
            } => Some((weekday_id.as_str(), payload.scroll_height)),
            _ => None,
        }
    }

    pub fn to_json(&self) -> Result<serde_json::Value> {
        Ok(serde_json::to_value(self)?)
    }
}

fn require_non_empty(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(DevKitError::InvalidArgument(format!("{} must not be empty", field)));
    }
    Ok(())
}

fn dispatch(action: Action) -> Message {
    Message::DispatchAppAction { action }
}

pub fn close_modal() -> Message {
    dispatch(Action::close(ActionKind::ModalClose))
}

pub fn close_panel() -> Message {
    dispatch(Action::close(ActionKind::PanelClose))
}

/// Open a panel titled `name` showing `url`. `name` and `url` must be non-empty.
pub fn open_panel(name: &str, url: &str, channel_token: &str) -> Result<Message> {
    require_non_empty("name", name)?;
    require_non_empty("url", url)?;
    Ok(dispatch(Action::panel(name, url, channel_token)))
}

/// Open a modal titled `name` showing `url` at the given CSS `width` and `height`.
pub fn open_modal(
    name: &str,
    url: &str,
    width: &str,
    height: &str,
    channel_token: &str,
) -> Result<Message> {
    require_non_empty("name", name)?;
    require_non_empty("url", url)?;
    Ok(dispatch(Action::modal(name, url, width, height, channel_token)))
}

pub fn auth_complete() -> Message {
    Message::AuthComplete
}

pub fn sync_height(resize_id: impl Into<String>, height: u32) -> Message {
    Message::SyncMessageHeight {
        resize_id: resize_id.into(),
        payload: HeightPayload {
            resize_height: height,
        },
    }
}

pub fn auto_adjust_height(weekday_id: impl Into<String>, height: u32) -> Message {
    Message::AutoAdjustMessageHeight {
        weekday_id: weekday_id.into(),
        payload: ScrollPayload {
            scroll_height: height,
        },
    }
}
