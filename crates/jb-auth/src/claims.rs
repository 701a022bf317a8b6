use crate::{AuthError, Result as AuthErrorResult};

use std::panic::Location;
use std::str::FromStr;

use error_location::ErrorLocation;
use jb_core::Role;
use serde::{Deserialize, Serialize};

/// JWT claims supplied by the portal's identity provider at connect time
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user_id)
    pub sub: String,
    /// Audience tier, must name one of the closed set of roles
    pub role: String,
    /// Expiration timestamp (Unix)
    pub exp: i64,
    /// Issued at timestamp (Unix)
    pub iat: i64,
}

impl Claims {
    /// Validate claims after JWT signature verification
    #[track_caller]
    pub fn validate(&self) -> AuthErrorResult<()> {
        if self.sub.is_empty() {
            return Err(AuthError::InvalidClaim {
                claim: "sub".to_string(),
                message: "sub (user_id) cannot be empty".to_string(),
                location: ErrorLocation::from(Location::caller()),
            });
        }
        if self.sub.len() > 128 {
            return Err(AuthError::InvalidClaim {
                claim: "sub".to_string(),
                message: "sub (user_id) exceeds maximum length".to_string(),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        // Role must resolve into the closed enum before any registry mutation
        self.role()?;

        Ok(())
    }

    /// Parse the role claim into the closed role set
    #[track_caller]
    pub fn role(&self) -> AuthErrorResult<Role> {
        Role::from_str(&self.role).map_err(|e| AuthError::InvalidClaim {
            claim: "role".to_string(),
            message: e.to_string(),
            location: ErrorLocation::from(Location::caller()),
        })
    }
}
