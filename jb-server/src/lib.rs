pub mod admin;
pub mod error;
pub mod health;
pub mod logger;
pub mod routes;

pub use admin::{BroadcastRequest, BroadcastResponse, PresenceResponse};
pub use error::{Result as ServerErrorResult, ServerError};
pub use routes::build_router;
