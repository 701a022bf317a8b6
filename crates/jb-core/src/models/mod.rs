pub mod notification;
pub mod notification_kind;
pub mod role;
