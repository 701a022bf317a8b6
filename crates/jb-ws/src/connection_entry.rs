use crate::ConnectionId;

use axum::extract::ws::Message;
use chrono::{DateTime, Utc};
use jb_core::Role;
use tokio::sync::mpsc;

/// One currently-connected user.
///
/// The entry owns the only route to the user's live transport: a bounded
/// sender drained by the connection's send task. At most one entry exists
/// per user_id at any time; the registry enforces last-connection-wins.
#[derive(Debug, Clone)]
pub struct ConnectionEntry {
    pub connection_id: ConnectionId,
    pub user_id: String,
    pub role: Role,
    pub connected_at: DateTime<Utc>,
    pub sender: mpsc::Sender<Message>,
}
