//! App action types dispatched to the host (open/close modal or panel).

use serde::{Deserialize, Serialize};

/// Kind of app action; serialized as the action's `type` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActionKind {
    #[serde(rename = "modal")]
    Modal,
    #[serde(rename = "modal-close")]
    ModalClose,
    #[serde(rename = "panel")]
    Panel,
    #[serde(rename = "panel-close")]
    PanelClose,
}

impl ActionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActionKind::Modal => "modal",
            ActionKind::ModalClose => "modal-close",
            ActionKind::Panel => "panel",
            ActionKind::PanelClose => "panel-close",
        }
    }
}

/// Iframe geometry for a modal or panel. `height` and `width` are only set for modals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payload {
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<String>,
}

/// Wire action: `{ "type", "name"?, "payload"?, "token"? }`.
///
/// `token` is the channel token the host uses to correlate the action with an
/// installed app instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Action {
    #[serde(rename = "type")]
    pub kind: ActionKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<Payload>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

impl Action {
    /// A close action for the given kind.
    pub fn close(kind: ActionKind) -> Self {
        Self {
            kind,
            name: None,
            payload: None,
            token: None,
        }
    }

    pub fn panel(name: impl Into<String>, url: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            kind: ActionKind::Panel,
            name: Some(name.into()),
            payload: Some(Payload {
                url: url.into(),
                height: None,
                width: None,
            }),
            token: Some(token.into()),
        }
    }

    pub fn modal(
        name: impl Into<String>,
        url: impl Into<String>,
        width: impl Into<String>,
        height: impl Into<String>,
        token: impl Into<String>,
    ) -> Self {
        Self {
            kind: ActionKind::Modal,
            name: Some(name.into()),
            payload: Some(Payload {
                url: url.into(),
                height: Some(height.into()),
                width: Some(width.into()),
            }),
            token: Some(token.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn kind_wire_names() {
        for kind in [
            ActionKind::Modal,
            ActionKind::ModalClose,
            ActionKind::Panel,
            ActionKind::PanelClose,
        ] {
            let v = serde_json::to_value(kind).unwrap();
            assert_eq!(v, json!(kind.as_str()));
        }
    }

    #[test]
    fn close_action_omits_optional_fields() {
        let v = serde_json::to_value(Action::close(ActionKind::PanelClose)).unwrap();
        assert_eq!(v, json!({ "type": "panel-close" }));
    }

    #[test]
    fn modal_action_carries_geometry() {
        let v = serde_json::to_value(Action::modal("M", "https://m", "400px", "300px", "t")).unwrap();
        assert_eq!(
            v,
            json!({
                "type": "modal",
                "name": "M",
                "payload": { "url": "https://m", "height": "300px", "width": "400px" },
                "token": "t"
            })
        );
    }

    #[test]
    fn panel_payload_has_no_geometry() {
        let v = serde_json::to_value(Action::panel("P", "https://p", "t")).unwrap();
        assert_eq!(v["payload"], json!({ "url": "https://p" }));
    }
}
