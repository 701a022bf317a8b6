/// Configuration for the notification router
#[derive(Debug, Clone)]
pub struct RouterConfig {
    /// Upper bound on a single push; expiry treats the recipient as offline
    pub send_timeout_secs: u64,
    /// Maximum in-flight pushes per broadcast call, so one wedged
    /// connection cannot stall the rest of the group
    pub max_concurrent_pushes: usize,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            send_timeout_secs: 5,
            max_concurrent_pushes: 32,
        }
    }
}
