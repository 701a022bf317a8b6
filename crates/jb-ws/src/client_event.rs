use crate::{Result as WsErrorResult, WsError};

use std::panic::Location;

use error_location::ErrorLocation;
use serde::Deserialize;
use serde_json::Value;

/// Events a connected client may emit over the socket.
///
/// One closed set dispatched through the router, rather than a handler
/// wired up per event name. Field names follow the SPA's camelCase wire
/// convention.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum ClientEvent {
    /// A seeker applied to a job; the employer should hear about it
    JobApplied(JobApplied),
    /// An employer moved an application through its pipeline
    ApplicationStatusUpdated(ApplicationStatusUpdated),
    /// An employer scheduled an interview with an applicant
    InterviewScheduled(InterviewScheduled),
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobApplied {
    pub employer_id: String,
    pub applicant_name: String,
    pub job_title: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationStatusUpdated {
    pub applicant_id: String,
    pub job_title: String,
    pub status: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InterviewScheduled {
    pub applicant_id: String,
    pub job_title: String,
    pub date: String,
}

/// Parse an inbound text frame into a typed event plus its raw `data`
/// value, which is forwarded unmodified inside the resulting notification.
#[track_caller]
pub fn parse_client_event(text: &str) -> WsErrorResult<(ClientEvent, Value)> {
    let value: Value = serde_json::from_str(text).map_err(|e| WsError::Decode {
        source: e,
        location: ErrorLocation::from(Location::caller()),
    })?;

    let data = value.get("data").cloned().unwrap_or(Value::Null);

    let event: ClientEvent = serde_json::from_value(value).map_err(|e| WsError::Decode {
        source: e,
        location: ErrorLocation::from(Location::caller()),
    })?;

    Ok((event, data))
}
