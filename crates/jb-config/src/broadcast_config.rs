use crate::{ConfigError, ConfigErrorResult};

use serde::Deserialize;

pub const MIN_MAX_CONCURRENT_PUSHES: usize = 1;
pub const MAX_MAX_CONCURRENT_PUSHES: usize = 1024;
pub const DEFAULT_MAX_CONCURRENT_PUSHES: usize = 32;

/// Broadcast fan-out settings.
///
/// Fan-out is bounded so a slow or wedged recipient cannot stall delivery
/// to the rest of a role group.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BroadcastConfig {
    /// Maximum in-flight pushes per broadcast call
    pub max_concurrent_pushes: usize,
}

impl Default for BroadcastConfig {
    fn default() -> Self {
        Self {
            max_concurrent_pushes: DEFAULT_MAX_CONCURRENT_PUSHES,
        }
    }
}

impl BroadcastConfig {
    pub fn validate(&self) -> ConfigErrorResult<()> {
        if self.max_concurrent_pushes < MIN_MAX_CONCURRENT_PUSHES
            || self.max_concurrent_pushes > MAX_MAX_CONCURRENT_PUSHES
        {
            return Err(ConfigError::config(format!(
                "broadcast.max_concurrent_pushes must be {}-{}, got {}",
                MIN_MAX_CONCURRENT_PUSHES, MAX_MAX_CONCURRENT_PUSHES, self.max_concurrent_pushes
            )));
        }

        Ok(())
    }
}
