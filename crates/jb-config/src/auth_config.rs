use crate::{ConfigError, ConfigErrorResult};

use serde::Deserialize;

/// Minimum HS256 secret length in bytes
pub const MIN_JWT_SECRET_LEN: usize = 32;

/// Connect-time authentication settings.
///
/// Exactly one of `jwt_secret` (HS256) or `jwt_public_key_path` (RS256)
/// must be configured; every connection attempt is rejected before touching
/// the registry unless its token validates.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct AuthConfig {
    /// Shared HS256 secret
    pub jwt_secret: Option<String>,
    /// Path to an RS256 public key PEM, relative to the config directory
    pub jwt_public_key_path: Option<String>,
}

impl AuthConfig {
    pub fn validate(&self) -> ConfigErrorResult<()> {
        match (&self.jwt_secret, &self.jwt_public_key_path) {
            (None, None) => Err(ConfigError::auth(
                "one of auth.jwt_secret or auth.jwt_public_key_path is required",
            )),
            (Some(_), Some(_)) => Err(ConfigError::auth(
                "auth.jwt_secret and auth.jwt_public_key_path are mutually exclusive",
            )),
            (Some(secret), None) => {
                if secret.len() < MIN_JWT_SECRET_LEN {
                    return Err(ConfigError::auth(format!(
                        "auth.jwt_secret must be at least {} bytes, got {}",
                        MIN_JWT_SECRET_LEN,
                        secret.len()
                    )));
                }
                Ok(())
            }
            (None, Some(path)) => {
                if path.is_empty() {
                    return Err(ConfigError::auth(
                        "auth.jwt_public_key_path cannot be empty",
                    ));
                }
                Ok(())
            }
        }
    }
}
