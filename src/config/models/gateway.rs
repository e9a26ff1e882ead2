//! Main gateway configuration

use super::*;
use serde::{Deserialize, Serialize};

/// Main gateway configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct GatewayConfig {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,
    /// Authentication configuration
    #[serde(default)]
    pub auth: AuthConfig,
    /// Decision engine configuration
    #[serde(default)]
    pub decision: DecisionConfig,
    /// Principals, roles, and policies loaded into the in-memory stores
    #[serde(default)]
    pub seed: SeedConfig,
}
