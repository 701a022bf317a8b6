use crate::{CoreError, NotificationKind, Result as CoreErrorResult};

use std::panic::Location;

use chrono::{DateTime, Utc};
use error_location::ErrorLocation;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A single push notification.
///
/// Constructed, routed, and discarded within one delivery call. The router
/// never persists it; durable delivery is the caller's concern.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    /// Kind-specific structured payload, passed through unmodified
    #[serde(default)]
    pub data: Value,
}

impl Notification {
    pub fn new(
        kind: NotificationKind,
        title: impl Into<String>,
        message: impl Into<String>,
        data: Value,
    ) -> Self {
        Self {
            kind,
            title: title.into(),
            message: message.into(),
            timestamp: Utc::now(),
            data,
        }
    }

    /// Caller contract check, applied before any registry access
    #[track_caller]
    pub fn validate(&self) -> CoreErrorResult<()> {
        if self.title.trim().is_empty() {
            return Err(CoreError::Validation {
                message: "notification title cannot be empty".to_string(),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        if self.message.trim().is_empty() {
            return Err(CoreError::Validation {
                message: "notification message cannot be empty".to_string(),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        Ok(())
    }
}
