//! Decision engine configuration

use super::*;
use serde::{Deserialize, Serialize};

/// Verdict applied when no policy governs a path
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DefaultDecision {
    Allow,
    /// Unlisted routes stay closed
    #[default]
    Deny,
}

/// Decision engine configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecisionConfig {
    /// Verdict for paths no policy governs
    #[serde(default)]
    pub default_decision: DefaultDecision,
    /// Seconds between policy snapshot refreshes
    #[serde(default = "default_policy_refresh_secs")]
    pub policy_refresh_secs: u64,
    /// Principal TTL cache sizing
    #[serde(default)]
    pub principal_cache: PrincipalCacheConfig,
}

impl Default for DecisionConfig {
    fn default() -> Self {
        Self {
            default_decision: DefaultDecision::default(),
            policy_refresh_secs: default_policy_refresh_secs(),
            principal_cache: PrincipalCacheConfig::default(),
        }
    }
}

impl DecisionConfig {
    /// Validate decision configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.policy_refresh_secs == 0 {
            return Err("Policy refresh interval cannot be 0".to_string());
        }
        self.principal_cache.validate()?;
        Ok(())
    }
}

/// Principal TTL cache configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrincipalCacheConfig {
    /// Maximum cached principals
    #[serde(default = "default_principal_cache_capacity")]
    pub capacity: u64,
    /// Seconds a cached principal stays fresh
    #[serde(default = "default_principal_cache_ttl_secs")]
    pub ttl_secs: u64,
}

impl Default for PrincipalCacheConfig {
    fn default() -> Self {
        Self {
            capacity: default_principal_cache_capacity(),
            ttl_secs: default_principal_cache_ttl_secs(),
        }
    }
}

impl PrincipalCacheConfig {
    /// Validate cache configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.capacity == 0 {
            return Err("Principal cache capacity cannot be 0".to_string());
        }
        if self.ttl_secs == 0 {
            return Err("Principal cache TTL cannot be 0".to_string());
        }
        Ok(())
    }
}
