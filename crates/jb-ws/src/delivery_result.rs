/// Outcome of a single direct delivery attempt.
///
/// `NoActiveConnection` is a normal result, not an error: the caller
/// decides whether to fall back to a durable channel such as email.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryResult {
    /// The payload was handed to the recipient's live transport
    Delivered,
    /// The recipient has no usable live connection
    NoActiveConnection,
}

impl DeliveryResult {
    pub fn is_delivered(&self) -> bool {
        matches!(self, Self::Delivered)
    }
}
