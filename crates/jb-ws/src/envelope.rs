use crate::{Result as WsErrorResult, WsError};

use std::panic::Location;

use axum::extract::ws::Message;
use error_location::ErrorLocation;
use jb_core::Notification;
use serde::Serialize;

/// Event name used for direct per-user deliveries
pub const DIRECT_EVENT: &str = "notification";

/// Wire frame pushed to clients: an event name plus the tagged payload.
///
/// Serialized once per delivery (or once per broadcast) as JSON text.
#[derive(Debug, Serialize)]
pub struct Envelope<'a> {
    pub event: &'a str,
    pub notification: &'a Notification,
}

impl<'a> Envelope<'a> {
    pub fn new(event: &'a str, notification: &'a Notification) -> Self {
        Self {
            event,
            notification,
        }
    }

    /// Envelope for a direct delivery
    pub fn direct(notification: &'a Notification) -> Self {
        Self::new(DIRECT_EVENT, notification)
    }

    /// Serialize to the JSON text carried on the wire
    #[track_caller]
    pub fn encode_text(&self) -> WsErrorResult<String> {
        serde_json::to_string(self).map_err(|e| WsError::Encode {
            source: e,
            location: ErrorLocation::from(Location::caller()),
        })
    }

    /// Serialize to a ready-to-send WebSocket frame
    #[track_caller]
    pub fn encode(&self) -> WsErrorResult<Message> {
        Ok(Message::Text(self.encode_text()?.into()))
    }
}
