use crate::{CoreError, Result as CoreErrorResult};

use std::panic::Location;
use std::str::FromStr;

use error_location::ErrorLocation;
use serde::{Deserialize, Serialize};

/// Semantic type tag carried by every notification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    /// An employer received a new application
    JobApplication,
    /// An applicant's application changed status
    ApplicationUpdate,
    /// An interview was scheduled for an applicant
    Interview,
    /// Administrative broadcast to a role group or everyone
    SystemMessage,
    /// A newly posted job matching a seeker's profile
    NewJobMatch,
}

impl NotificationKind {
    /// Convert to wire string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::JobApplication => "job_application",
            Self::ApplicationUpdate => "application_update",
            Self::Interview => "interview",
            Self::SystemMessage => "system_message",
            Self::NewJobMatch => "new_job_match",
        }
    }
}

impl FromStr for NotificationKind {
    type Err = CoreError;

    #[track_caller]
    fn from_str(s: &str) -> CoreErrorResult<Self> {
        match s {
            "job_application" => Ok(Self::JobApplication),
            "application_update" => Ok(Self::ApplicationUpdate),
            "interview" => Ok(Self::Interview),
            "system_message" => Ok(Self::SystemMessage),
            "new_job_match" => Ok(Self::NewJobMatch),
            _ => Err(CoreError::InvalidNotificationKind {
                value: s.to_string(),
                location: ErrorLocation::from(Location::caller()),
            }),
        }
    }
}

impl std::fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
