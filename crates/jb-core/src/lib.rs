pub mod error;
pub mod models;

pub use error::{CoreError, Result};
pub use models::notification::Notification;
pub use models::notification_kind::NotificationKind;
pub use models::role::Role;
