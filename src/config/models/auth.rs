//! Authentication configuration

use super::*;
use serde::{Deserialize, Serialize};

/// Authentication configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// JWT signing secret
    pub jwt_secret: String,
    /// Access-token lifetime in minutes
    #[serde(default = "default_access_ttl_minutes")]
    pub access_ttl_minutes: u64,
    /// Refresh-token lifetime in days
    #[serde(default = "default_refresh_ttl_days")]
    pub refresh_ttl_days: u64,
    /// Service-token lifetime in minutes
    #[serde(default = "default_service_ttl_minutes")]
    pub service_ttl_minutes: u64,
    /// Token issuer
    #[serde(default = "default_issuer")]
    pub issuer: String,
    /// Token audience
    #[serde(default = "default_audience")]
    pub audience: String,
    /// Login brute-force throttling
    #[serde(default)]
    pub throttle: ThrottleConfig,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            // A fresh random secret per process; real deployments configure one
            jwt_secret: crate::utils::crypto::generate_signing_secret(),
            access_ttl_minutes: default_access_ttl_minutes(),
            refresh_ttl_days: default_refresh_ttl_days(),
            service_ttl_minutes: default_service_ttl_minutes(),
            issuer: default_issuer(),
            audience: default_audience(),
            throttle: ThrottleConfig::default(),
        }
    }
}

impl AuthConfig {
    /// Validate authentication configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.jwt_secret.len() < 32 {
            return Err("JWT secret must be at least 32 characters long".to_string());
        }

        if self.jwt_secret == "your-secret-key" || self.jwt_secret == "change-me" {
            return Err(
                "JWT secret must not use placeholder values. Generate a random secret.".to_string(),
            );
        }

        if self.access_ttl_minutes == 0 || self.access_ttl_minutes > 24 * 60 {
            return Err("Access-token lifetime must be between 1 minute and 1 day".to_string());
        }

        if self.refresh_ttl_days == 0 || self.refresh_ttl_days > 90 {
            return Err("Refresh-token lifetime must be between 1 and 90 days".to_string());
        }

        if self.service_ttl_minutes == 0 || self.service_ttl_minutes > 24 * 60 {
            return Err("Service-token lifetime must be between 1 minute and 1 day".to_string());
        }

        if self.issuer.is_empty() || self.audience.is_empty() {
            return Err("Token issuer and audience cannot be empty".to_string());
        }

        self.throttle.validate()?;

        Ok(())
    }
}

/// Login throttling configuration
///
/// Failed attempts inside the window escalate into exponentially growing
/// lockouts per client address.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThrottleConfig {
    /// Failed attempts tolerated inside the window
    #[serde(default = "default_throttle_max_attempts")]
    pub max_attempts: u32,
    /// Length of the failure-counting window in seconds
    #[serde(default = "default_throttle_window_secs")]
    pub window_secs: u64,
    /// First lockout length in seconds; doubles per repeated lockout
    #[serde(default = "default_throttle_lockout_base_secs")]
    pub lockout_base_secs: u64,
}

impl Default for ThrottleConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_throttle_max_attempts(),
            window_secs: default_throttle_window_secs(),
            lockout_base_secs: default_throttle_lockout_base_secs(),
        }
    }
}

impl ThrottleConfig {
    /// Validate throttling configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.max_attempts == 0 {
            return Err("Throttle max_attempts cannot be 0".to_string());
        }
        if self.window_secs == 0 || self.lockout_base_secs == 0 {
            return Err("Throttle window and lockout base cannot be 0".to_string());
        }
        Ok(())
    }
}
