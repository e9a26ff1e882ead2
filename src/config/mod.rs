//! Configuration management for the gateway
//!
//! This module handles loading, validation, and defaults for all gateway
//! configuration.

pub mod models;

pub use models::*;

use crate::utils::error::{GatewayError, Result};
use std::path::Path;
use tracing::{debug, info};

/// Main configuration struct for the gateway
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Gateway configuration
    pub gateway: GatewayConfig,
}

impl Config {
    /// Load configuration from file
    pub async fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        info!("Loading configuration from: {:?}", path);

        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| GatewayError::Config(format!("Failed to read config file: {}", e)))?;

        let gateway: GatewayConfig = serde_yaml::from_str(&content)
            .map_err(|e| GatewayError::Config(format!("Failed to parse config: {}", e)))?;

        let mut config = Self { gateway };
        config.apply_env_overrides()?;
        config.validate()?;

        debug!("Configuration loaded successfully");
        Ok(config)
    }

    /// Build configuration from defaults and environment variables
    pub fn from_env() -> Result<Self> {
        info!("Loading configuration from environment");

        let mut config = Self::default();
        config.apply_env_overrides()?;
        config.validate()?;
        Ok(config)
    }

    /// Environment variables take precedence over file values
    fn apply_env_overrides(&mut self) -> Result<()> {
        if let Ok(host) = std::env::var("GATEHOUSE_HOST") {
            self.gateway.server.host = host;
        }
        if let Ok(port) = std::env::var("GATEHOUSE_PORT") {
            self.gateway.server.port = port
                .parse()
                .map_err(|_| GatewayError::Config(format!("Invalid GATEHOUSE_PORT: {}", port)))?;
        }
        if let Ok(secret) = std::env::var("GATEHOUSE_JWT_SECRET") {
            self.gateway.auth.jwt_secret = secret;
        }
        Ok(())
    }

    /// Get server configuration
    pub fn server(&self) -> &ServerConfig {
        &self.gateway.server
    }

    /// Get auth configuration
    pub fn auth(&self) -> &AuthConfig {
        &self.gateway.auth
    }

    /// Get decision engine configuration
    pub fn decision(&self) -> &DecisionConfig {
        &self.gateway.decision
    }

    /// Get seed data
    pub fn seed(&self) -> &SeedConfig {
        &self.gateway.seed
    }

    /// Validate the entire configuration
    pub fn validate(&self) -> Result<()> {
        debug!("Validating configuration");

        self.gateway
            .server
            .validate()
            .map_err(|e| GatewayError::Config(format!("Server config error: {}", e)))?;

        self.gateway
            .auth
            .validate()
            .map_err(|e| GatewayError::Config(format!("Auth config error: {}", e)))?;

        self.gateway
            .decision
            .validate()
            .map_err(|e| GatewayError::Config(format!("Decision config error: {}", e)))?;

        self.gateway
            .seed
            .validate()
            .map_err(|e| GatewayError::Config(format!("Seed data error: {}", e)))?;

        debug!("Configuration validation completed");
        Ok(())
    }

    /// Convert to YAML string
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(&self.gateway)
            .map_err(|e| GatewayError::Config(format!("Failed to serialize config to YAML: {}", e)))
    }
}
