use metrics::{counter, gauge, histogram};

/// Metrics collector for presence and notification delivery
#[derive(Clone)]
pub struct Metrics {
    prefix: &'static str,
}

impl Metrics {
    pub fn new() -> Self {
        Self { prefix: "jb_ws" }
    }

    /// Record new connection established
    pub fn connection_established(&self) {
        counter!(format!("{}.connections.established", self.prefix)).increment(1);
        gauge!(format!("{}.connections.active", self.prefix)).increment(1.0);
    }

    /// Record connection closed
    pub fn connection_closed(&self, reason: &str) {
        counter!(format!("{}.connections.closed", self.prefix)).increment(1);
        counter!(format!("{}.connections.closed.{}", self.prefix, reason)).increment(1);
        gauge!(format!("{}.connections.active", self.prefix)).decrement(1.0);
    }

    /// Record a reconnect displacing a previous connection
    pub fn connection_replaced(&self) {
        counter!(format!("{}.connections.replaced", self.prefix)).increment(1);
    }

    /// Record a notification handed to a live transport
    pub fn notification_delivered(&self, kind: &str) {
        counter!(format!("{}.notifications.delivered", self.prefix)).increment(1);
        counter!(format!("{}.notifications.delivered.{}", self.prefix, kind)).increment(1);
    }

    /// Record a notification that found no usable connection
    pub fn notification_dropped(&self, kind: &str, reason: &str) {
        counter!(format!("{}.notifications.dropped", self.prefix)).increment(1);
        counter!(format!("{}.notifications.dropped.{}", self.prefix, kind)).increment(1);
        counter!(format!("{}.notifications.dropped_reason.{}", self.prefix, reason)).increment(1);
    }

    /// Record a broadcast fan-out
    pub fn broadcast_published(&self, event: &str, attempted: usize) {
        counter!(format!("{}.broadcast.published", self.prefix)).increment(1);
        counter!(format!("{}.broadcast.published.{}", self.prefix, event)).increment(1);
        histogram!(format!("{}.broadcast.recipients", self.prefix)).record(attempted as f64);
    }

    /// Record an inbound client event
    pub fn client_event_received(&self, event: &str) {
        counter!(format!("{}.events.received", self.prefix)).increment(1);
        counter!(format!("{}.events.received.{}", self.prefix, event)).increment(1);
    }

    /// Record error occurrence
    pub fn error_occurred(&self, error_type: &str) {
        counter!(format!("{}.errors.total", self.prefix)).increment(1);
        counter!(format!("{}.errors.{}", self.prefix, error_type)).increment(1);
    }

    /// Record delivery latency for one push
    pub fn delivery_latency(&self, duration: std::time::Duration) {
        histogram!(format!("{}.delivery.latency_ms", self.prefix))
            .record(duration.as_millis() as f64);
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}
