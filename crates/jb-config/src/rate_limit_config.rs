use crate::{ConfigError, ConfigErrorResult};

use serde::Deserialize;

pub const MIN_MAX_REQUESTS: u32 = 1;
pub const MAX_MAX_REQUESTS: u32 = 100_000;
pub const DEFAULT_MAX_REQUESTS: u32 = 100;

pub const MIN_WINDOW_SECS: u64 = 1;
pub const MAX_WINDOW_SECS: u64 = 3600;
pub const DEFAULT_WINDOW_SECS: u64 = 60;

/// Per-connection inbound event rate limiting
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RateLimitConfig {
    /// Maximum client events per window
    pub max_requests: u32,
    /// Window duration in seconds
    pub window_secs: u64,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            max_requests: DEFAULT_MAX_REQUESTS,
            window_secs: DEFAULT_WINDOW_SECS,
        }
    }
}

impl RateLimitConfig {
    pub fn validate(&self) -> ConfigErrorResult<()> {
        if self.max_requests < MIN_MAX_REQUESTS || self.max_requests > MAX_MAX_REQUESTS {
            return Err(ConfigError::config(format!(
                "rate_limit.max_requests must be {}-{}, got {}",
                MIN_MAX_REQUESTS, MAX_MAX_REQUESTS, self.max_requests
            )));
        }

        if self.window_secs < MIN_WINDOW_SECS || self.window_secs > MAX_WINDOW_SECS {
            return Err(ConfigError::config(format!(
                "rate_limit.window_secs must be {}-{}, got {}",
                MIN_WINDOW_SECS, MAX_WINDOW_SECS, self.window_secs
            )));
        }

        Ok(())
    }
}
