//! JSON wire format shared with clients.
//!
//! One message shape travels both ways. An absent `Position` is
//! overloaded: with an empty `WindowType` it asks the server to open
//! instances, with a known type it means that window closed (outbound) or
//! should be closed (inbound).

use casement_common::{Rect, SyncEvent};
use casement_sync::Command;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireMessage {
    #[serde(rename = "WindowType", default)]
    pub window_type: String,
    #[serde(rename = "Position", default)]
    pub position: Option<WirePosition>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct WirePosition {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl From<Rect> for WirePosition {
    fn from(r: Rect) -> Self {
        Self {
            left: r.left,
            top: r.top,
            right: r.right,
            bottom: r.bottom,
        }
    }
}

impl From<WirePosition> for Rect {
    fn from(p: WirePosition) -> Self {
        Rect::new(p.left, p.top, p.right, p.bottom)
    }
}

impl From<&SyncEvent> for WireMessage {
    fn from(event: &SyncEvent) -> Self {
        match event {
            SyncEvent::Upsert { window_type, rect } => Self {
                window_type: window_type.clone(),
                position: Some((*rect).into()),
            },
            SyncEvent::Closed { window_type } => Self {
                window_type: window_type.clone(),
                position: None,
            },
        }
    }
}

impl WireMessage {
    /// Map an inbound message to a command. `None` means malformed: a
    /// position without a window type.
    pub fn into_command(self) -> Option<Command> {
        match (self.window_type.is_empty(), self.position) {
            (true, None) => Some(Command::Open),
            (true, Some(_)) => None,
            (false, Some(position)) => Some(Command::Move {
                window_type: self.window_type,
                rect: position.into(),
            }),
            (false, None) => Some(Command::Close {
                window_type: self.window_type,
            }),
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// Decode one inbound text frame.
pub fn decode(text: &str) -> Result<Command, String> {
    let message: WireMessage =
        serde_json::from_str(text).map_err(|e| format!("invalid JSON: {e}"))?;
    message
        .into_command()
        .ok_or_else(|| "Position given without WindowType".to_string())
}

/// Encode one outbound event.
pub fn encode(event: &SyncEvent) -> Result<String, serde_json::Error> {
    WireMessage::from(event).to_json()
}
